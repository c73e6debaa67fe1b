use runmove_base::{err, Result};

// Input statistics a build needs before it can size a packed matrix: the
// domain, the run count, the post-split row count, and the largest length a
// row can carry. Computed from the original partition without materializing
// the split.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PermutationStats {
    pub domain: u64,
    pub runs: usize,
    pub split_rows: usize,
    pub max_length: u64,
}

impl PermutationStats {
    pub fn new(lengths: &[u64], cap: Option<u64>) -> Result<Self> {
        if lengths.is_empty() {
            return Err(err("permutation has no runs"));
        }
        if cap == Some(0) {
            return Err(err("split cap must be positive"));
        }
        let mut domain: u64 = 0;
        let mut max_length: u64 = 0;
        let mut split_rows: usize = 0;
        for &l in lengths {
            if l == 0 {
                return Err(err("zero-length run"));
            }
            domain += l;
            max_length = max_length.max(l);
            split_rows += match cap {
                Some(cap) => l.div_ceil(cap) as usize,
                None => 1,
            };
        }
        if let Some(cap) = cap {
            max_length = max_length.min(cap);
        }
        Ok(PermutationStats {
            domain,
            runs: lengths.len(),
            split_rows,
            max_length,
        })
    }
}
