use crate::packed::PackedTable;
use runmove_base::{ceil_div, mask, overflow, Reader, Result, Writer};

// Byte-aligned alternative to PackedMatrix: every column width is rounded up
// to whole bytes, so a cell read needs no shift at all. Costs roughly a
// quarter more space on typical inputs. The requested bit widths are kept
// (and serialized) so the value contract stays identical to the bit-packed
// variant: a column of requested width w holds values below 2^w.
pub struct PackedMatrixAligned {
    rows: usize,
    row_bytes: usize,
    widths: Vec<u8>,
    byte_offsets: Vec<u16>,
    extract_masks: Vec<u64>,
    data: Vec<u8>,
}

impl PackedMatrixAligned {
    fn layout(rows: usize, widths: Vec<u8>) -> Result<Self> {
        let mut byte_offsets = Vec::with_capacity(widths.len());
        let mut extract_masks = Vec::with_capacity(widths.len());
        let mut byte_pos: usize = 0;
        for &w in &widths {
            if w > 64 {
                return Err(overflow("column width exceeds 64 bits"));
            }
            let offset = u16::try_from(byte_pos).map_err(|_| overflow("row too wide"))?;
            byte_offsets.push(offset);
            extract_masks.push(mask(w));
            byte_pos += ceil_div(w as usize, 8);
        }
        let row_bytes = byte_pos;
        let data = vec![0_u8; rows * row_bytes + 8];
        Ok(PackedMatrixAligned {
            rows,
            row_bytes,
            widths,
            byte_offsets,
            extract_masks,
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

impl PackedTable for PackedMatrixAligned {
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
        let byte = row * self.row_bytes + self.byte_offsets[col] as usize;
        self.load_word(byte) & self.extract_masks[col]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, val: u64) {
        debug_assert!(row < self.rows);
        debug_assert!(val <= self.extract_masks[col], "value too wide for column");
        let byte = row * self.row_bytes + self.byte_offsets[col] as usize;
        let mut word = self.load_word(byte);
        word &= !self.extract_masks[col];
        word |= val;
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
