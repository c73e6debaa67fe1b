use crate::{
    cols::{ColSpec, Layout},
    packed::{PackedMatrix, PackedTable},
};
use runmove_base::{err, Reader, Result, Writer};

// Typed facade over a packed table: binds a ColSpec so callers read and write
// columns by meaning instead of by index. Length arithmetic for absolute rows
// needs the domain size, so it lives with the move structure, not here.
pub struct MoveTable<T: PackedTable = PackedMatrix> {
    spec: ColSpec,
    tbl: T,
}

impl<T: PackedTable> MoveTable<T> {
    pub fn with_widths(spec: ColSpec, rows: usize, widths: &[u8]) -> Result<Self> {
        if widths.len() != spec.num_cols() {
            return Err(err("width count does not match column spec"));
        }
        Ok(MoveTable {
            spec,
            tbl: T::with_widths(rows, widths)?,
        })
    }

    pub fn from_parts(spec: ColSpec, tbl: T) -> Result<Self> {
        if tbl.num_cols() != spec.num_cols() {
            return Err(err("table column count does not match column spec"));
        }
        Ok(MoveTable { spec, tbl })
    }

    pub fn spec(&self) -> ColSpec {
        self.spec
    }

    pub fn layout(&self) -> Layout {
        self.spec.layout
    }

    pub fn rows(&self) -> usize {
        self.tbl.rows()
    }

    pub fn table(&self) -> &T {
        &self.tbl
    }

    // The primary is the length column under Layout::Relative and the start
    // column under Layout::Absolute.
    pub fn get_primary(&self, i: usize) -> u64 {
        self.tbl.get(i, ColSpec::PRIMARY)
    }
    pub fn set_primary(&mut self, i: usize, val: u64) {
        self.tbl.set(i, ColSpec::PRIMARY, val)
    }

    pub fn get_pointer(&self, i: usize) -> usize {
        self.tbl.get(i, ColSpec::POINTER) as usize
    }
    pub fn set_pointer(&mut self, i: usize, val: usize) {
        self.tbl.set(i, ColSpec::POINTER, val as u64)
    }

    pub fn get_offset(&self, i: usize) -> u64 {
        self.tbl.get(i, ColSpec::OFFSET)
    }
    pub fn set_offset(&mut self, i: usize, val: u64) {
        self.tbl.set(i, ColSpec::OFFSET, val)
    }

    pub fn get_start(&self, i: usize) -> u64 {
        debug_assert_eq!(self.spec.layout, Layout::Absolute);
        self.get_primary(i)
    }

    pub fn get_character(&self, i: usize) -> u8 {
        self.tbl.get(i, self.spec.character_col()) as u8
    }
    pub fn set_character(&mut self, i: usize, val: u8) {
        self.tbl.set(i, self.spec.character_col(), val as u64)
    }

    pub fn get_user(&self, i: usize, j: usize) -> u64 {
        self.tbl.get(i, self.spec.user_col(j))
    }
    pub fn set_user(&mut self, i: usize, j: usize, val: u64) {
        self.tbl.set(i, self.spec.user_col(j), val)
    }

    pub fn write(&self, wr: &mut impl Writer) -> Result<()> {
        self.tbl.write(wr)
    }

    pub fn read(rd: &mut impl Reader, spec: ColSpec) -> Result<Self> {
        let tbl = T::read(rd, spec.num_cols())?;
        Ok(MoveTable { spec, tbl })
    }
}
