// Move structures specialized to the run-length Burrows-Wheeler transform.
//
// From the RLBWT of a text (run head characters plus run lengths) this crate
// builds the four derived permutations as run-compressed move structures:
//
//   - LF: BWT position to the matching position in F = sorted(L). Stepping
//     LF walks the text backwards, inverting the BWT.
//   - FL: the inverse direction, F position to L position, spelling the text
//     forwards.
//   - Phi / InvPhi: suffix-array neighbor permutations over the SA samples
//     at BWT run boundaries, built in absolute layout so SA(pos) = pos.idx.
//
// Characters ride along as a mapped column in the packed rows; an alphabet
// supplies the byte-to-code bijection, either discovered from the input
// (ByteAlphabet) or the fixed nucleotide table (Nucleotide).

mod alphabet;
mod fl;
mod lf;
mod phi;

#[cfg(test)]
mod test;

pub use alphabet::{Alphabet, ByteAlphabet, Nucleotide, Symbols, MAX_ALPHABET, UNMAPPED};
pub use fl::{MoveFl, RunPermFl};
pub use lf::{MoveLf, RunPermLf};
pub use phi::{
    rlbwt_to_invphi, rlbwt_to_phi, MoveInvPhi, MovePhi, RunPermInvPhi, RunPermPhi,
};

use runmove_perm::{RunDataMode, SplitParams};
use runmove_table::Layout;

// Build options shared by the LF and FL structures.
#[derive(Clone, Copy, Debug)]
pub struct RlbwtOptions {
    pub layout: Layout,
    pub mode: RunDataMode,
    pub split: SplitParams,
    pub symbols: Symbols,
}

impl Default for RlbwtOptions {
    fn default() -> Self {
        RlbwtOptions {
            layout: Layout::Relative,
            mode: RunDataMode::Integrated,
            split: SplitParams::none(),
            symbols: Symbols::default(),
        }
    }
}

// Run-length encodes a raw BWT into (heads, run_lengths).
pub fn bwt_to_rlbwt(bwt: &[u8]) -> (Vec<u8>, Vec<u64>) {
    let mut heads = Vec::new();
    let mut run_lengths: Vec<u64> = Vec::new();
    for (i, &c) in bwt.iter().enumerate() {
        match run_lengths.last_mut() {
            Some(last) if i > 0 && c == bwt[i - 1] => *last += 1,
            _ => {
                heads.push(c);
                run_lengths.push(1);
            }
        }
    }
    (heads, run_lengths)
}
