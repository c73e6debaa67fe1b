// End-to-end walks through the public surface, mirroring how an index over a
// small DNA text would use the crates together.

use crate::{
    bwt_to_rlbwt, permutation_intervals, rlbwt_to_invphi, FileWriter, Layout, MoveInvPhi, MoveLf,
    MovePerm, Position, Result, RlbwtOptions, RunDataMode, RunPerm, RunPermOptions, SplitParams,
    Writer, MOVE_FILE_EXTENSION,
};
use test_log::test;

const TEXT: &[u8] = b"GATTACATGATTACATAGATTACATT";

fn rlbwt() -> (Vec<u8>, Vec<u64>) {
    bwt_to_rlbwt(b"TTTTTCCCGGGAAAT\x01ATTTTAAAAAA")
}

#[test]
fn test_runperm_example() -> Result<()> {
    let permutation: Vec<u64> = vec![6, 7, 8, 9, 10, 0, 1, 2, 3, 4, 5];
    let (lengths, interval_perm) = permutation_intervals(&permutation);
    let run_data: Vec<[u64; 2]> = vec![[1, 2], [3, 4]];
    let mut rp = RunPerm::<2>::new(
        &lengths,
        &interval_perm,
        permutation.len() as u64,
        &run_data,
        &RunPermOptions::default(),
    )?;
    assert_eq!(rp.size(), 11);
    assert_eq!(rp.move_runs(), 2);
    assert_eq!(rp.permutation_runs(), 2);

    // Interval order, via down().
    rp.first();
    assert_eq!(rp.get(0), 1);
    assert!(rp.down());
    assert_eq!(rp.get(1), 4);
    assert!(!rp.down());

    // Permutation order covers the domain and returns to the start.
    rp.first();
    for _ in 0..rp.size() {
        rp.next();
    }
    assert_eq!(rp.position(), Position::default());
    Ok(())
}

#[test]
fn test_moveperm_with_splitting_example() -> Result<()> {
    let lengths = [2_u64, 1, 8];
    let interval_perm = [9_u64, 0, 1];
    let opts = RunPermOptions {
        layout: Layout::Absolute,
        mode: RunDataMode::Integrated,
        split: SplitParams::capped(4),
    };
    let mut split = MovePerm::from_runs(&lengths, &interval_perm, 11, &opts)?;
    assert_eq!(split.move_runs(), 4);
    assert_eq!(split.permutation_runs(), 3);

    let mut plain = MovePerm::from_runs(
        &lengths,
        &interval_perm,
        11,
        &RunPermOptions {
            layout: Layout::Absolute,
            ..RunPermOptions::default()
        },
    )?;
    split.first();
    plain.first();
    for _ in 0..11 {
        assert_eq!(split.next().idx, plain.next().idx);
    }
    Ok(())
}

#[test]
fn test_rlbwt_pipeline_example() -> Result<()> {
    let (heads, lens) = rlbwt();

    // Invert the BWT through LF.
    let mut lf: MoveLf = MoveLf::new_with(&heads, &lens, &RlbwtOptions::default(), |_, _, _, _| [])?;
    let mut recovered = vec![0_u8; TEXT.len()];
    lf.first();
    for i in 1..lf.size() as usize {
        recovered[TEXT.len() - i] = lf.character();
        lf.lf();
    }
    assert_eq!(recovered, TEXT);

    // Recover the suffix array through InvPhi and check it against the text.
    let (phi_lengths, phi_perm, domain) = rlbwt_to_invphi(&heads, &lens)?;
    let mut ip = MoveInvPhi::from_runs(&phi_lengths, &phi_perm, domain)?;
    ip.last();
    let mut sa = Vec::with_capacity(domain as usize);
    for _ in 0..domain {
        sa.push(ip.sa());
        ip.inv_phi();
    }
    // Suffixes listed by the SA are sorted; terminator sorts lowest.
    let mut text = TEXT.to_vec();
    text.push(1);
    let suffix = |i: u64| &text[i as usize..];
    for w in sa.windows(2) {
        assert!(suffix(w[0]) < suffix(w[1]));
    }
    Ok(())
}

#[test]
fn test_persist_to_move_file() -> Result<()> {
    let (heads, lens) = rlbwt();
    let mut lf: MoveLf = MoveLf::new_with(&heads, &lens, &RlbwtOptions::default(), |_, _, _, _| [])?;

    let path = std::env::temp_dir().join(format!(
        "runmove-example-{}{}",
        std::process::id(),
        MOVE_FILE_EXTENSION
    ));
    let _ = std::fs::remove_file(&path);
    let mut w = FileWriter::try_create_non_existing(path.clone())?;
    lf.write(&mut w)?;
    let mut r = w.try_into_reader()?;
    let mut loaded: MoveLf = MoveLf::read(&mut r, Layout::Relative, RunDataMode::Integrated)?;
    drop(r);
    std::fs::remove_file(&path)?;

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
