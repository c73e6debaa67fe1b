use crate::{
    split::{apply_splitting, SplitParams},
    stats::PermutationStats,
};
use runmove_base::{bit_width, err, Reader, Result, Writer};
use runmove_table::{ColSpec, Layout, MoveTable, PackedMatrix, PackedTable, Position};
use tracing::info;

// Builds a populated move table from a run partition. Splitting is applied
// first when configured; the returned vector holds the effective post-split
// lengths so callers can carry per-run columns across the split. Width
// selection, the image sort, and the pointer/offset pass all happen here, so
// wrapping structures construct through this one function.
pub fn build_move_table<T: PackedTable>(
    lengths: &[u64],
    interval_perm: &[u64],
    domain: u64,
    spec: ColSpec,
    split: &SplitParams,
    extra_widths: &[u8],
) -> Result<(MoveTable<T>, Vec<u64>)> {
    if lengths.len() != interval_perm.len() {
        return Err(err("length and permutation counts differ"));
    }
    if extra_widths.len() != spec.num_cols() - 3 {
        return Err(err("extra width count does not match column spec"));
    }
    let stats = PermutationStats::new(lengths, split.max_run_length)?;
    if stats.domain != domain {
        return Err(err("run lengths do not sum to the domain"));
    }

    let split_result = apply_splitting(split, lengths, interval_perm)?;
    let (eff_lengths, eff_perm): (&[u64], &[u64]) = match &split_result {
        Some(s) => (&s.lengths, &s.interval_perm),
        None => (lengths, interval_perm),
    };
    let rows = eff_lengths.len();
    debug_assert_eq!(rows, stats.split_rows);

    let mut widths = Vec::with_capacity(spec.num_cols());
    widths.push(match spec.layout {
        Layout::Relative => bit_width(stats.max_length),
        Layout::Absolute => bit_width(domain),
    });
    widths.push(bit_width(rows as u64));
    widths.push(bit_width(stats.max_length));
    widths.extend_from_slice(extra_widths);

    let mut view: MoveTable<T> = MoveTable::with_widths(spec, rows, &widths)?;

    // Sort row indices by run image; the images must tile the domain exactly,
    // anything else means a duplicated or missing permutation value.
    let mut order: Vec<usize> = (0..rows).collect();
    order.sort_unstable_by_key(|&k| eff_perm[k]);
    let mut expect: u64 = 0;
    for &k in &order {
        if eff_perm[k] != expect {
            return Err(err("interval permutation does not tile the domain"));
        }
        expect += eff_lengths[k];
    }

    // One merged pass: row k's primary, and pointer/offset for every row
    // whose image lands inside row k's range.
    let mut start_val: u64 = 0;
    let mut sort_itr = 0;
    for (tbl_idx, &length) in eff_lengths.iter().enumerate() {
        match spec.layout {
            Layout::Relative => view.set_primary(tbl_idx, length),
            Layout::Absolute => view.set_primary(tbl_idx, start_val),
        }
        while sort_itr < rows && eff_perm[order[sort_itr]] < start_val + length {
            view.set_pointer(order[sort_itr], tbl_idx);
            view.set_offset(order[sort_itr], eff_perm[order[sort_itr]] - start_val);
            sort_itr += 1;
        }
        start_val += length;
    }
    debug_assert_eq!(sort_itr, rows);

    let eff_lengths = match split_result {
        Some(s) => s.lengths,
        None => lengths.to_vec(),
    };
    Ok((view, eff_lengths))
}

// A run-compressed permutation over {0, ..., n-1}. Immutable once built;
// positions step forward under the permutation in amortized constant time.
pub struct MoveStructure<T: PackedTable = PackedMatrix> {
    view: MoveTable<T>,
    n: u64,
}

impl<T: PackedTable> MoveStructure<T> {
    pub fn new(
        lengths: &[u64],
        interval_perm: &[u64],
        domain: u64,
        layout: Layout,
        split: &SplitParams,
    ) -> Result<Self> {
        let (view, _) = build_move_table(
            lengths,
            interval_perm,
            domain,
            ColSpec::plain(layout),
            split,
            &[],
        )?;
        Self::from_table(view, domain)
    }

    // Wraps a pre-built table; the advanced entry point used by structures
    // that add character or user columns before wrapping.
    pub fn from_table(view: MoveTable<T>, domain: u64) -> Result<Self> {
        if view.rows() == 0 {
            return Err(err("move table has no rows"));
        }
        Ok(MoveStructure { view, n: domain })
    }

    pub fn size(&self) -> u64 {
        self.n
    }

    pub fn runs(&self) -> usize {
        self.view.rows()
    }

    pub fn layout(&self) -> Layout {
        self.view.layout()
    }

    pub fn spec(&self) -> ColSpec {
        self.view.spec()
    }

    pub fn view(&self) -> &MoveTable<T> {
        &self.view
    }

    // Interval start, absolute layout only. The one-past-the-end row reads as
    // the domain size, which keeps the length arithmetic uniform.
    pub fn get_start(&self, i: usize) -> u64 {
        debug_assert!(i <= self.runs());
        if i == self.runs() {
            self.n
        } else {
            self.view.get_start(i)
        }
    }

    pub fn get_length(&self, i: usize) -> u64 {
        match self.layout() {
            Layout::Relative => self.view.get_primary(i),
            Layout::Absolute => self.get_start(i + 1) - self.get_start(i),
        }
    }

    pub fn get_pointer(&self, i: usize) -> usize {
        self.view.get_pointer(i)
    }

    pub fn get_offset(&self, i: usize) -> u64 {
        self.view.get_offset(i)
    }

    pub fn get_character(&self, i: usize) -> u8 {
        self.view.get_character(i)
    }

    pub fn get_user(&self, i: usize, j: usize) -> u64 {
        self.view.get_user(i, j)
    }

    pub fn first(&self) -> Position {
        Position::default()
    }

    pub fn last(&self) -> Position {
        let interval = self.runs() - 1;
        let offset = self.get_length(interval) - 1;
        match self.layout() {
            Layout::Relative => Position::new(interval, offset),
            Layout::Absolute => Position::with_idx(interval, offset, self.n - 1),
        }
    }

    // One step of the permutation: land where the current interval's image
    // says, then fast-forward into the row that actually contains the target.
    pub fn step(&self, pos: Position) -> Position {
        debug_assert!(pos.interval < self.runs());
        let next = match self.layout() {
            Layout::Relative => {
                debug_assert!(pos.offset < self.get_length(pos.interval));
                Position::new(
                    self.get_pointer(pos.interval),
                    pos.offset + self.get_offset(pos.interval),
                )
            }
            Layout::Absolute => {
                debug_assert!(pos.idx < self.get_start(pos.interval + 1));
                let interval = self.get_pointer(pos.interval);
                let offset = self.get_offset(pos.interval) + pos.offset;
                Position::with_idx(interval, offset, self.get_start(interval) + offset)
            }
        };
        self.fast_forward(next)
    }

    fn fast_forward(&self, mut pos: Position) -> Position {
        match self.layout() {
            Layout::Relative => {
                let mut length = self.view.get_primary(pos.interval);
                while pos.offset >= length {
                    pos.offset -= length;
                    pos.interval += 1;
                    length = self.view.get_primary(pos.interval);
                }
            }
            Layout::Absolute => {
                let mut curr_start = pos.idx - pos.offset;
                let mut next_start = self.get_start(pos.interval + 1);
                while pos.idx >= next_start {
                    pos.offset -= next_start - curr_start;
                    pos.interval += 1;
                    curr_start = next_start;
                    next_start = self.get_start(pos.interval + 1);
                }
            }
        }
        pos
    }

    pub fn log_stats(&self) {
        let n = self.n;
        let r = self.runs();
        info!(target: "runmove", n, r, rate = n as f64 / r as f64, "move structure");
    }

    pub fn write(&self, wr: &mut impl Writer) -> Result<()> {
        wr.write_le_u64(self.n)?;
        wr.write_le_u64(self.runs() as u64)?;
        self.view.write(wr)
    }

    pub fn read(rd: &mut impl Reader, spec: ColSpec) -> Result<Self> {
        let n = rd.read_le_u64()?;
        let runs = rd.read_le_u64()? as usize;
        let view = MoveTable::read(rd, spec)?;
        if view.rows() != runs {
            return Err(err("row count mismatch in move structure header"));
        }
        Self::from_table(view, n)
    }
}
