// Run-compressed move structures for BWT-based sequence indexes.
//
// A permutation over {0, ..., n-1} with r runs of consecutive integers is
// stored in O(r) space as a bit-packed table of one row per run, and stepped
// in amortized constant time by interval-pointer/offset arithmetic. On top of
// that sit per-run user data columns and the RLBWT-derived permutations LF,
// FL, Phi and InvPhi used by r-index style structures over DNA-sized inputs.
//
// This crate re-exports the public surface of the workspace members:
//
//   runmove-base   errors, bit helpers, seekable IO
//   runmove-table  packed matrices, column layouts, the typed table view
//   runmove-perm   move structures, splitting, run-attached data
//   runmove-rlbwt  alphabets and the LF/FL/Phi/InvPhi specializations

#[cfg(test)]
mod test;

pub use runmove_base::{
    bit_width, err, overflow, Error, FileReader, FileWriter, MemReader, MemWriter, Reader, Result,
    Writer, MOVE_FILE_EXTENSION,
};
pub use runmove_perm::{
    apply_splitting, build_move_table, map_split_rows, permutation_intervals, split_by_max_length,
    CharColumn, MovePerm, MoveStructure, PermutationStats, RunDataMode, RunPerm, RunPermOptions,
    SplitParams, SplitResult,
};
pub use runmove_rlbwt::{
    bwt_to_rlbwt, rlbwt_to_invphi, rlbwt_to_phi, Alphabet, ByteAlphabet, MoveFl, MoveInvPhi,
    MoveLf, MovePhi, Nucleotide, RlbwtOptions, RunPermFl, RunPermInvPhi, RunPermLf, RunPermPhi,
    Symbols,
};
pub use runmove_table::{
    ColSpec, Layout, MoveTable, PackedMatrix, PackedMatrixAligned, PackedTable, Position,
    MAX_COLUMN_WIDTH,
};
