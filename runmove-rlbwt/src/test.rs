use crate::{
    bwt_to_rlbwt, rlbwt_to_invphi, rlbwt_to_phi, Alphabet, ByteAlphabet, MoveFl, MoveInvPhi,
    MoveLf, MovePhi, Nucleotide, RlbwtOptions, RunPermLf, RunPermPhi, Symbols, MAX_ALPHABET,
};
use runmove_base::{MemWriter, Result, Writer};
use runmove_perm::{RunDataMode, SplitParams};
use runmove_table::Layout;
use test_log::test;

// Text GATTACATGATTACATAGATTACATT with terminator byte 1 appended. The BWT
// is TTTTTCCCGGGAAAT#ATTTTAAAAAA (# marking the terminator), nine runs.
const TEXT: &[u8] = b"GATTACATGATTACATAGATTACATT";
const HEADS: [u8; 9] = [b'T', b'C', b'G', b'A', b'T', 1, b'A', b'T', b'A'];
const LENS: [u64; 9] = [5, 3, 3, 3, 1, 1, 1, 4, 6];
const SA: [u64; 27] = [
    26, 12, 4, 21, 16, 14, 6, 23, 9, 1, 18, 13, 5, 22, 8, 0, 17, 25, 11, 3, 20, 15, 7, 24, 10, 2,
    19,
];

fn counts_of(seq: &[u8]) -> [u64; MAX_ALPHABET] {
    let mut counts = [0_u64; MAX_ALPHABET];
    for &c in seq {
        counts[c as usize] += 1;
    }
    counts
}

#[test]
fn test_byte_alphabet() -> Result<()> {
    let alpha = ByteAlphabet::from_counts(&counts_of(b"aabbbz"))?;
    assert_eq!(alpha.sigma(), 3);
    assert_eq!(alpha.map(b'a'), 0);
    assert_eq!(alpha.map(b'b'), 1);
    assert_eq!(alpha.map(b'z'), 2);
    assert_eq!(alpha.unmap(2), b'z');
    assert_eq!(alpha.code_width(), 2);
    assert_eq!(alpha.map_sequence(b"zab"), vec![2, 0, 1]);

    let mut w = MemWriter::new();
    alpha.write(&mut w)?;
    let mut r = w.try_into_reader()?;
    let loaded = ByteAlphabet::read(&mut r)?;
    assert_eq!(loaded.sigma(), 3);
    assert_eq!(loaded.map(b'z'), 2);
    Ok(())
}

#[test]
fn test_byte_alphabet_rejects_full_range() {
    let counts = [1_u64; MAX_ALPHABET];
    assert!(ByteAlphabet::from_counts(&counts).is_err());
}

#[test]
fn test_nucleotide_alphabet() -> Result<()> {
    let alpha = Nucleotide::from_counts(&counts_of(b"ACGTNacgtn\x00\x01"))?;
    assert_eq!(alpha.sigma(), 7);
    assert_eq!(alpha.code_width(), 3);
    assert_eq!(alpha.map(b'A'), alpha.map(b'a'));
    assert_eq!(alpha.unmap(alpha.map(b'G')), b'G');
    assert_eq!(alpha.map(0), 0);
    assert_eq!(alpha.map(1), 1);

    assert!(Nucleotide::from_counts(&counts_of(b"ACGU")).is_err());

    // Serializes nothing.
    let mut w = MemWriter::new();
    alpha.write(&mut w)?;
    assert!(w.is_empty());
    Ok(())
}

#[test]
fn test_bwt_to_rlbwt() {
    let bwt = b"TTTTTCCCGGGAAAT\x01ATTTTAAAAAA";
    let (heads, lens) = bwt_to_rlbwt(bwt);
    assert_eq!(heads, HEADS.to_vec());
    assert_eq!(lens, LENS.to_vec());
}

// Reading BWT characters along LF steps from the start spells the text
// reversed, excluding the terminator.
#[test]
fn test_lf_inverts_bwt() -> Result<()> {
    let mut lf: MoveLf = MoveLf::new_with(&HEADS, &LENS, &RlbwtOptions::default(), |_, _, _, _| [])?;
    assert_eq!(lf.size(), 27);
    assert_eq!(lf.permutation_runs(), 9);

    // The LF cycle covers the whole domain.
    lf.first();
    lf.lf_by(lf.size());
    assert_eq!(lf.position(), lf.structure().first());

    let mut recovered = vec![0_u8; TEXT.len()];
    lf.first();
    for i in 1..lf.size() as usize {
        recovered[TEXT.len() - i] = lf.character();
        lf.lf();
    }
    assert_eq!(recovered, TEXT);
    Ok(())
}

// One FL step from the start lands on the first text character; continuing
// spells the text forward.
#[test]
fn test_fl_spells_text_forward() -> Result<()> {
    let mut fl: MoveFl = MoveFl::new_with(&HEADS, &LENS, &RlbwtOptions::default(), |_, _, _, _| [])?;
    assert_eq!(fl.size(), 27);

    fl.first();
    fl.fl_by(fl.size());
    assert_eq!(fl.position(), fl.structure().first());

    let mut recovered = Vec::with_capacity(TEXT.len());
    fl.first();
    fl.fl();
    for _ in 1..fl.size() {
        recovered.push(fl.character());
        fl.fl();
    }
    assert_eq!(recovered, TEXT);
    Ok(())
}

#[test]
fn test_lf_with_splitting_agrees() -> Result<()> {
    let mut opts = RlbwtOptions::default();
    opts.split = SplitParams::capped(2);
    let mut split: MoveLf = MoveLf::new_with(&HEADS, &LENS, &opts, |_, _, _, _| [])?;
    assert_eq!(split.permutation_runs(), 9);
    assert!(split.move_runs() > 9);

    let mut recovered = vec![0_u8; TEXT.len()];
    split.first();
    for i in 1..split.size() as usize {
        recovered[TEXT.len() - i] = split.character();
        split.lf();
    }
    assert_eq!(recovered, TEXT);
    Ok(())
}

#[test]
fn test_lf_user_columns() -> Result<()> {
    let run_data: Vec<[u64; 2]> = (0..HEADS.len() as u64).map(|i| [i * 10, i * 5]).collect();
    for mode in [RunDataMode::Integrated, RunDataMode::Separated] {
        let mut opts = RlbwtOptions::default();
        opts.mode = mode;
        let mut lf: RunPermLf<2> = RunPermLf::new(&HEADS, &LENS, &run_data, &opts)?;
        lf.first();
        for _ in 0..lf.size() {
            let interval = lf.position().interval;
            assert_eq!(lf.get(0), run_data[interval][0]);
            assert_eq!(lf.get(1), run_data[interval][1]);
            lf.lf();
        }
    }
    Ok(())
}

#[test]
fn test_lf_serialize_load() -> Result<()> {
    let mut lf: MoveLf<ByteAlphabet> =
        MoveLf::new_with(&HEADS, &LENS, &RlbwtOptions::default(), |_, _, _, _| [])?;
    let mut w = MemWriter::new();
    lf.write(&mut w)?;
    let mut r = w.try_into_reader()?;
    let mut loaded: MoveLf<ByteAlphabet> =
        MoveLf::read(&mut r, Layout::Relative, RunDataMode::Integrated)?;
    assert_eq!(loaded.size(), lf.size());
    assert_eq!(loaded.move_runs(), lf.move_runs());
    lf.first();
    loaded.first();
    for _ in 0..lf.size() {
        assert_eq!(loaded.position(), lf.position());
        assert_eq!(loaded.character(), lf.character());
        lf.lf();
        loaded.lf();
    }
    Ok(())
}

// Walking InvPhi from last() and reading SA reconstructs the suffix array in
// order.
#[test]
fn test_invphi_reconstructs_sa() -> Result<()> {
    let (lengths, interval_perm, domain) = rlbwt_to_invphi(&HEADS, &LENS)?;
    assert_eq!(domain, 27);
    assert_eq!(lengths.len(), 9);
    assert_eq!(lengths.iter().sum::<u64>(), domain);

    let mut ip = MoveInvPhi::from_runs(&lengths, &interval_perm, domain)?;
    ip.last();
    let mut recovered = Vec::with_capacity(SA.len());
    for _ in 0..domain {
        recovered.push(ip.sa());
        ip.inv_phi();
    }
    assert_eq!(recovered, SA.to_vec());
    Ok(())
}

// The Phi mirror: walking Phi visits the suffix array back to front.
#[test]
fn test_phi_reconstructs_sa() -> Result<()> {
    let (lengths, interval_perm, domain) = rlbwt_to_phi(&HEADS, &LENS)?;
    assert_eq!(domain, 27);
    assert_eq!(lengths.iter().sum::<u64>(), domain);

    let mut phi = MovePhi::from_runs(&lengths, &interval_perm, domain)?;
    phi.last();
    phi.phi();
    let mut recovered = vec![0_u64; SA.len()];
    for i in 0..SA.len() {
        recovered[SA.len() - 1 - i] = phi.sa();
        phi.phi();
    }
    assert_eq!(recovered, SA.to_vec());
    Ok(())
}

// Bytes at or below the configured separator collapse on the LF build path;
// the FL build takes heads as given.
#[test]
fn test_symbols_clamp_applies_to_lf_only() -> Result<()> {
    let heads = [5_u8, 0, 1];
    let lens = [2_u64, 1, 1];
    let mut opts = RlbwtOptions::default();
    opts.symbols = Symbols {
        terminator: 1,
        separator: 2,
    };

    let lf: MoveLf<ByteAlphabet> = MoveLf::new_with(&heads, &lens, &opts, |_, _, _, _| [])?;
    assert_eq!(lf.character_at(0), 5);
    assert_eq!(lf.character_at(1), 1); // byte 0 clamped up to the terminator
    assert_eq!(lf.character_at(2), 1);

    let fl: MoveFl<ByteAlphabet> = MoveFl::new_with(&heads, &lens, &opts, |_, _, _, _| [])?;
    let f_chars: Vec<u8> = (0..fl.move_runs()).map(|i| fl.character_at(i)).collect();
    assert_eq!(f_chars, vec![0, 1, 5]);
    Ok(())
}

#[test]
fn test_phi_user_columns() -> Result<()> {
    let (lengths, interval_perm, domain) = rlbwt_to_phi(&HEADS, &LENS)?;
    let run_data: Vec<[u64; 1]> = (0..lengths.len() as u64).map(|i| [i + 100]).collect();
    let mut phi = RunPermPhi::<1>::new(
        &lengths,
        &interval_perm,
        domain,
        &run_data,
        RunDataMode::Separated,
        &SplitParams::none(),
    )?;
    phi.first();
    for _ in 0..domain {
        let interval = phi.position().interval;
        assert_eq!(phi.get(0), run_data[interval][0]);
        phi.phi();
    }
    Ok(())
}

#[test]
fn test_invphi_serialize_load() -> Result<()> {
    let (lengths, interval_perm, domain) = rlbwt_to_invphi(&HEADS, &LENS)?;
    let mut ip = MoveInvPhi::from_runs(&lengths, &interval_perm, domain)?;
    let mut w = MemWriter::new();
    ip.write(&mut w)?;
    let mut r = w.try_into_reader()?;
    let mut loaded = MoveInvPhi::read(&mut r, RunDataMode::Integrated)?;
    ip.last();
    loaded.last();
    for _ in 0..domain {
        assert_eq!(loaded.sa(), ip.sa());
        ip.inv_phi();
        loaded.inv_phi();
    }
    Ok(())
}
