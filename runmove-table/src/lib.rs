// Bit-packed row storage for run-compressed permutation tables.
//
// A table is m rows by k columns of unsigned integers, where column j has a
// fixed bit width w_j chosen at construction from input statistics. Rows are
// laid out back to back with no per-row padding, so row i begins at bit
// i * (w_0 + ... + w_{k-1}) of one contiguous byte buffer.
//
// Every column is capped at 57 bits. A cell then spans at most 8 bytes, so a
// single unaligned 64-bit little-endian load reaches any cell, and a
// load/mask/store writes one. The buffer carries 8 trailing bytes of padding
// so the load at the last cell stays inside the allocation.
//
// Column meanings are not stored here. A ColSpec names the columns of a row:
//
//   - primary: interval length (relative layout) or absolute start
//   - pointer: the row whose range contains this row's permuted start
//   - offset:  position of the permuted start within the pointed-to row
//   - character: mapped run head byte, present on BWT tables
//   - user columns: caller-attached per-run data, appended last
//
// and MoveTable binds a ColSpec to a table, giving the columns their names.
// PackedMatrixAligned trades ~25% space for byte-aligned loads; both variants
// implement PackedTable and are drop-in interchangeable underneath MoveTable.

mod aligned;
mod cols;
mod packed;
mod view;


pub use aligned::PackedMatrixAligned;
pub use cols::{ColSpec, Layout, Position};
pub use packed::{PackedMatrix, PackedTable, MAX_COLUMN_WIDTH};
pub use view::MoveTable;
