use runmove_base::{ceil_div, mask, overflow, Reader, Result, Writer};

// The widest column a packed matrix accepts. We read a 64-bit word at a time;
// 57 = 64 - 7 guarantees a cell starting at any in-byte shift still fits the
// word, so one unaligned load reaches any cell.
pub const MAX_COLUMN_WIDTH: u8 = 57;

// Common surface of the bit-packed and byte-aligned row stores. MoveTable and
// everything above it is generic over this, so the variants are drop-in
// interchangeable.
pub trait PackedTable: Sized {
    fn with_widths(rows: usize, widths: &[u8]) -> Result<Self>;

    fn rows(&self) -> usize;
    fn num_cols(&self) -> usize;
    fn widths(&self) -> &[u8];

    fn get(&self, row: usize, col: usize) -> u64;
    fn set(&mut self, row: usize, col: usize, val: u64);

    fn get_row(&self, row: usize, out: &mut [u64]) {
        debug_assert_eq!(out.len(), self.num_cols());
        for (col, slot) in out.iter_mut().enumerate() {
            *slot = self.get(row, col);
        }
    }

    fn set_row(&mut self, row: usize, vals: &[u64]) {
        debug_assert_eq!(vals.len(), self.num_cols());
        for (col, val) in vals.iter().enumerate() {
            self.set(row, col, *val);
        }
    }

    // Size in bytes of the backing buffer, padding included.
    fn data_bytes(&self) -> usize;

    fn write(&self, wr: &mut impl Writer) -> Result<()>;

    // The column count comes from the caller's ColSpec; rows, widths and data
    // bytes are read back from the stream.
    fn read(rd: &mut impl Reader, num_cols: usize) -> Result<Self>;
}

// Row-major bit-packed storage. Per-column bit offsets and masks are
// precomputed at construction so the get/set paths do no width arithmetic:
// get is one load, one shift, one mask; set is one load, two masks, one store.
pub struct PackedMatrix {
    rows: usize,
    row_bits: usize,
    widths: Vec<u8>,
    bit_offsets: Vec<u16>,
    extract_masks: Vec<u64>,
    // Indexed [col][shift] for the 8 possible in-byte bit shifts of a cell.
    clear_masks: Vec<[u64; 8]>,
    data: Vec<u8>,
}

impl PackedMatrix {
    fn layout(rows: usize, widths: Vec<u8>) -> Result<Self> {
        let mut bit_offsets = Vec::with_capacity(widths.len());
        let mut extract_masks = Vec::with_capacity(widths.len());
        let mut clear_masks = Vec::with_capacity(widths.len());
        let mut bit_pos: usize = 0;
        for &w in &widths {
            if w > MAX_COLUMN_WIDTH {
                return Err(overflow("column width exceeds 57 bits"));
            }
            let offset = u16::try_from(bit_pos).map_err(|_| overflow("row too wide"))?;
            bit_offsets.push(offset);
            let extract = mask(w);
            extract_masks.push(extract);
            let mut clears = [0_u64; 8];
            for (shift, slot) in clears.iter_mut().enumerate() {
                *slot = !(extract << shift);
            }
            clear_masks.push(clears);
            bit_pos += w as usize;
        }
        let row_bits = bit_pos;
        let data = vec![0_u8; ceil_div(rows * row_bits, 8) + 8];
        Ok(PackedMatrix {
            rows,
            row_bits,
            widths,
            bit_offsets,
            extract_masks,
            clear_masks,
            data,
        })
    }

    #[inline]
    fn load_word(&self, byte: usize) -> u64 {
        let mut bytes = [0_u8; 8];
        bytes.copy_from_slice(&self.data[byte..byte + 8]);
        u64::from_le_bytes(bytes)
    }

    #[inline]
    fn store_word(&mut self, byte: usize, word: u64) {
        self.data[byte..byte + 8].copy_from_slice(&word.to_le_bytes());
    }
}

impl PackedTable for PackedMatrix {
    fn with_widths(rows: usize, widths: &[u8]) -> Result<Self> {
        Self::layout(rows, widths.to_vec())
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn num_cols(&self) -> usize {
        self.widths.len()
    }

    fn widths(&self) -> &[u8] {
        &self.widths
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> u64 {
        debug_assert!(row < self.rows);
        let bit = row * self.row_bits + self.bit_offsets[col] as usize;
        let word = self.load_word(bit / 8);
        (word >> (bit % 8)) & self.extract_masks[col]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, val: u64) {
        debug_assert!(row < self.rows);
        debug_assert!(val <= self.extract_masks[col], "value too wide for column");
        let bit = row * self.row_bits + self.bit_offsets[col] as usize;
        let (byte, shift) = (bit / 8, bit % 8);
        let mut word = self.load_word(byte);
        word &= self.clear_masks[col][shift];
        word |= val << shift;
        self.store_word(byte, word);
    }

    fn data_bytes(&self) -> usize {
        self.data.len()
    }

    fn write(&self, wr: &mut impl Writer) -> Result<()> {
        wr.write_le_u64(self.rows as u64)?;
        wr.write_byte_slice(&self.widths)?;
        wr.write_byte_slice(&self.data)?;
        Ok(())
    }

    fn read(rd: &mut impl Reader, num_cols: usize) -> Result<Self> {
        let rows = rd.read_le_u64()? as usize;
        let widths = rd.read_byte_vec(num_cols)?;
        let mut matrix = Self::layout(rows, widths)?;
        matrix.data = rd.read_byte_vec(matrix.data.len())?;
        Ok(matrix)
    }
}
