use runmove_base::{err, Result};

// Interval splitting. Capping run lengths at L rewrites the partition so no
// row exceeds L while the represented permutation stays identical: a run of
// length l starting at image v becomes ceil(l / L) rows of images
// v, v + L, v + 2L, ...

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SplitParams {
    // Cap on the length of any single row. Zero is rejected.
    pub max_run_length: Option<u64>,
    // Declared balancing knob; the present splitter treats it as an identity.
    pub balancing_factor: Option<u64>,
}

impl SplitParams {
    pub fn none() -> Self {
        SplitParams::default()
    }

    pub fn capped(max_run_length: u64) -> Self {
        SplitParams {
            max_run_length: Some(max_run_length),
            balancing_factor: None,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SplitResult {
    pub lengths: Vec<u64>,
    pub interval_perm: Vec<u64>,
    pub max_length: u64,
}

pub fn split_by_max_length(
    lengths: &[u64],
    interval_perm: &[u64],
    cap: u64,
) -> Result<SplitResult> {
    if cap == 0 {
        return Err(err("split cap must be positive"));
    }
    if lengths.len() != interval_perm.len() {
        return Err(err("length and permutation counts differ"));
    }
    let mut result = SplitResult {
        lengths: Vec::with_capacity(lengths.len()),
        interval_perm: Vec::with_capacity(lengths.len()),
        max_length: 0,
    };
    for (&l, &v) in lengths.iter().zip(interval_perm.iter()) {
        let mut remaining = l;
        let mut emitted: u64 = 0;
        while remaining > 0 {
            let chunk = remaining.min(cap);
            result.lengths.push(chunk);
            result.interval_perm.push(v + emitted);
            result.max_length = result.max_length.max(chunk);
            remaining -= chunk;
            emitted += chunk;
        }
    }
    Ok(result)
}

// Applies the configured splits; None means the input partition is used
// unchanged. Balancing is declared but reduces to the identity, so only the
// length cap has an effect.
pub fn apply_splitting(
    params: &SplitParams,
    lengths: &[u64],
    interval_perm: &[u64],
) -> Result<Option<SplitResult>> {
    match params.max_run_length {
        Some(cap) => Ok(Some(split_by_max_length(lengths, interval_perm, cap)?)),
        None => Ok(None),
    }
}

// Walks the post-split rows in lockstep with the original runs, handing each
// new row to `f` as (orig_interval, orig_interval_length,
// offset_of_new_row_from_orig_start, new_row_length, new_row_index). This is
// how per-run data is carried across a split: duplicated, or recomputed from
// the original run's coordinates.
pub fn map_split_rows(
    orig_lengths: &[u64],
    new_lengths: &[u64],
    mut f: impl FnMut(usize, u64, u64, u64, usize),
) {
    let mut new_idx = 0;
    let mut new_start: u64 = 0;
    let mut orig_start: u64 = 0;
    for (i, &orig_len) in orig_lengths.iter().enumerate() {
        while new_idx < new_lengths.len() && new_start < orig_start + orig_len {
            let new_len = new_lengths[new_idx];
            f(i, orig_len, new_start - orig_start, new_len, new_idx);
            new_start += new_len;
            new_idx += 1;
        }
        orig_start += orig_len;
    }
    debug_assert_eq!(new_idx, new_lengths.len());
}
