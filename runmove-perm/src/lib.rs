// Run-compressed permutation tables with O(1) amortized stepping.
//
// A permutation over {0, ..., n-1} that decomposes into r maximal runs of
// consecutive integers is stored as one packed row per run. Each row records
// where the run's image starts: the pointer names the row whose range
// contains the permuted start, and the offset places it within that row.
// Stepping a position is then one row lookup plus a fast-forward walk that
// restores the cursor to the row actually containing it; across n steps the
// walk does O(n + r) total work.
//
// Construction is a single sort of the run images plus one merged pass that
// writes every row's primary, pointer and offset. An optional splitter caps
// run lengths first, trading rows for narrower offset columns and shorter
// fast-forward walks; split sub-runs permute exactly like their parent, so
// query results never change.
//
// RunPerm attaches caller-defined data columns to the rows, either widened
// into the same packed matrix (integrated, better locality when every step
// reads them) or kept in a parallel matrix (separated), and carries a cursor
// with interval navigation and per-column predecessor/successor scans.

mod runperm;
mod split;
mod stats;
mod structure;


pub use runperm::{
    permutation_intervals, CharColumn, MovePerm, RunDataMode, RunPerm, RunPermOptions,
};
pub use split::{
    apply_splitting, map_split_rows, split_by_max_length, SplitParams, SplitResult,
};
pub use stats::PermutationStats;
pub use structure::{build_move_table, MoveStructure};
