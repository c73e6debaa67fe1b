use crate::{
    split::{apply_splitting, map_split_rows, SplitParams},
    structure::{build_move_table, MoveStructure},
};
use runmove_base::{bit_width, err, Reader, Result, Writer};
use runmove_table::{ColSpec, Layout, PackedMatrix, PackedTable, Position};

// Where the K user columns live relative to the move columns.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RunDataMode {
    // User columns widen the move rows themselves. Better locality when every
    // step also reads user data.
    Integrated,
    // User columns sit in a parallel packed matrix, row-aligned with the move
    // rows. Better when user data is rarely touched.
    Separated,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RunPermOptions {
    pub layout: Layout,
    pub mode: RunDataMode,
    pub split: SplitParams,
}

impl Default for RunPermOptions {
    fn default() -> Self {
        RunPermOptions {
            layout: Layout::Relative,
            mode: RunDataMode::Integrated,
            split: SplitParams::none(),
        }
    }
}

// The mapped character column of a BWT table: one code per original run, and
// the column width derived from the alphabet size.
#[derive(Clone, Copy, Debug)]
pub struct CharColumn<'a> {
    pub mapped: &'a [u8],
    pub width: u8,
}

// A move structure with K user-attached data columns per run and a held
// cursor. All navigation goes through the cursor: stepping under the
// permutation, interval-granular up/down, and backward/forward scans for a
// user column value.
pub struct RunPerm<const K: usize> {
    ms: MoveStructure<PackedMatrix>,
    run_data: Option<PackedMatrix>,
    position: Position,
    orig_runs: usize,
}

// A run-compressed permutation with no attached data.
pub type MovePerm = RunPerm<0>;

impl<const K: usize> RunPerm<K> {
    // One run-data row per original run; rows are duplicated across split
    // sub-runs.
    pub fn new(
        lengths: &[u64],
        interval_perm: &[u64],
        domain: u64,
        run_data: &[[u64; K]],
        opts: &RunPermOptions,
    ) -> Result<Self> {
        if run_data.len() != lengths.len() {
            return Err(err("run data count does not match run count"));
        }
        Self::build(
            lengths,
            interval_perm,
            domain,
            opts.layout,
            None,
            opts.mode,
            &opts.split,
            |orig, _, _, _| run_data[orig as usize],
        )
    }

    // Run data supplied by callback, invoked once per post-split row with
    // (orig_interval, orig_interval_length, new_offset_from_orig_start,
    // new_length).
    pub fn new_with(
        lengths: &[u64],
        interval_perm: &[u64],
        domain: u64,
        opts: &RunPermOptions,
        run_row: impl Fn(u64, u64, u64, u64) -> [u64; K],
    ) -> Result<Self> {
        Self::build(
            lengths,
            interval_perm,
            domain,
            opts.layout,
            None,
            opts.mode,
            &opts.split,
            run_row,
        )
    }

    // Full-control constructor: layout, optional character column, storage
    // mode, splitting, and the run-data callback. The BWT structures build
    // through here.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        lengths: &[u64],
        interval_perm: &[u64],
        domain: u64,
        layout: Layout,
        chars: Option<CharColumn>,
        mode: RunDataMode,
        split: &SplitParams,
        run_row: impl Fn(u64, u64, u64, u64) -> [u64; K],
    ) -> Result<Self> {
        if lengths.len() != interval_perm.len() {
            return Err(err("length and permutation counts differ"));
        }
        if let Some(c) = &chars {
            if c.mapped.len() != lengths.len() {
                return Err(err("character count does not match run count"));
            }
        }

        let split_result = apply_splitting(split, lengths, interval_perm)?;
        let (eff_lengths, eff_perm): (&[u64], &[u64]) = match &split_result {
            Some(s) => (&s.lengths, &s.interval_perm),
            None => (lengths, interval_perm),
        };
        let rows = eff_lengths.len();

        let mut data_rows = vec![[0_u64; K]; rows];
        map_split_rows(lengths, eff_lengths, |orig, orig_len, new_off, new_len, row| {
            data_rows[row] = run_row(orig as u64, orig_len, new_off, new_len);
        });
        let user_widths: Vec<u8> = (0..K)
            .map(|j| bit_width(data_rows.iter().map(|r| r[j]).max().unwrap_or(0)))
            .collect();

        let mut spec = match &chars {
            Some(_) => ColSpec::with_character(layout),
            None => ColSpec::plain(layout),
        };
        let mut extra_widths: Vec<u8> = Vec::new();
        if let Some(c) = &chars {
            extra_widths.push(c.width);
        }
        if mode == RunDataMode::Integrated {
            spec = spec.with_user_cols(K);
            extra_widths.extend_from_slice(&user_widths);
        }

        // Splitting already happened above, so the table build gets the
        // effective partition and no split of its own.
        let (mut view, _) = build_move_table::<PackedMatrix>(
            eff_lengths,
            eff_perm,
            domain,
            spec,
            &SplitParams::none(),
            &extra_widths,
        )?;

        if let Some(c) = &chars {
            map_split_rows(lengths, eff_lengths, |orig, _, _, _, row| {
                view.set_character(row, c.mapped[orig]);
            });
        }

        let run_data = match (mode, K) {
            (RunDataMode::Integrated, _) => {
                for (i, row) in data_rows.iter().enumerate() {
                    for (j, val) in row.iter().enumerate() {
                        view.set_user(i, j, *val);
                    }
                }
                None
            }
            (RunDataMode::Separated, 0) => None,
            (RunDataMode::Separated, _) => {
                let mut tbl = PackedMatrix::with_widths(rows, &user_widths)?;
                for (i, row) in data_rows.iter().enumerate() {
                    tbl.set_row(i, row);
                }
                Some(tbl)
            }
        };

        Ok(RunPerm {
            ms: MoveStructure::from_table(view, domain)?,
            run_data,
            position: Position::default(),
            orig_runs: lengths.len(),
        })
    }

    // === Cursor navigation ===

    pub fn first(&mut self) -> Position {
        self.position = self.ms.first();
        self.position
    }

    pub fn last(&mut self) -> Position {
        self.position = self.ms.last();
        self.position
    }

    pub fn next(&mut self) -> Position {
        self.position = self.ms.step(self.position);
        self.position
    }

    pub fn next_by(&mut self, steps: u64) -> Position {
        for _ in 0..steps {
            self.next();
        }
        self.position
    }

    // Move to the previous interval's last element; false if already at the
    // top.
    pub fn up(&mut self) -> bool {
        if self.position.interval == 0 {
            return false;
        }
        self.position.interval -= 1;
        self.position.offset = self.ms.get_length(self.position.interval) - 1;
        if self.ms.layout() == Layout::Absolute {
            self.position.idx = self.ms.get_start(self.position.interval) + self.position.offset;
        }
        true
    }

    // Move to the next interval's first element; false if already at the
    // bottom.
    pub fn down(&mut self) -> bool {
        if self.position.interval == self.ms.runs() - 1 {
            return false;
        }
        self.position.interval += 1;
        self.position.offset = 0;
        if self.ms.layout() == Layout::Absolute {
            self.position.idx = self.ms.get_start(self.position.interval);
        }
        true
    }

    // Walk backward until user column `col` holds `val`; lands on the last
    // element of the matched interval. The cursor is left where the walk
    // stopped even when nothing matched.
    pub fn pred(&mut self, col: usize, val: u64) -> Option<Position> {
        while self.user_at(self.position.interval, col) != val {
            if self.position.interval == 0 {
                return None;
            }
            self.position.interval -= 1;
        }
        self.position.offset = self.ms.get_length(self.position.interval) - 1;
        if self.ms.layout() == Layout::Absolute {
            self.position.idx = self.ms.get_start(self.position.interval) + self.position.offset;
        }
        Some(self.position)
    }

    // Walk forward until user column `col` holds `val`; lands on the first
    // element of the matched interval.
    pub fn succ(&mut self, col: usize, val: u64) -> Option<Position> {
        while self.user_at(self.position.interval, col) != val {
            if self.position.interval == self.ms.runs() - 1 {
                return None;
            }
            self.position.interval += 1;
        }
        self.position.offset = 0;
        if self.ms.layout() == Layout::Absolute {
            self.position.idx = self.ms.get_start(self.position.interval);
        }
        Some(self.position)
    }

    // === Accessors ===

    fn user_at(&self, interval: usize, col: usize) -> u64 {
        match &self.run_data {
            Some(tbl) => tbl.get(interval, col),
            None => self.ms.get_user(interval, col),
        }
    }

    // User column value at the cursor's interval.
    pub fn get(&self, col: usize) -> u64 {
        self.user_at(self.position.interval, col)
    }

    // User column value at an arbitrary interval.
    pub fn get_at(&self, interval: usize, col: usize) -> u64 {
        self.user_at(interval, col)
    }

    pub fn get_length(&self) -> u64 {
        self.ms.get_length(self.position.interval)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, pos: Position) {
        self.position = pos;
    }

    pub fn size(&self) -> u64 {
        self.ms.size()
    }

    // Row count of the underlying structure, post-split.
    pub fn move_runs(&self) -> usize {
        self.ms.runs()
    }

    // Run count of the input partition, pre-split.
    pub fn permutation_runs(&self) -> usize {
        self.orig_runs
    }

    pub fn structure(&self) -> &MoveStructure<PackedMatrix> {
        &self.ms
    }

    // === Serialization ===

    pub fn write(&self, wr: &mut impl Writer) -> Result<()> {
        wr.write_le_u64(self.orig_runs as u64)?;
        self.ms.write(wr)?;
        if let Some(tbl) = &self.run_data {
            tbl.write(wr)?;
        }
        Ok(())
    }

    pub fn read(
        rd: &mut impl Reader,
        layout: Layout,
        character: bool,
        mode: RunDataMode,
    ) -> Result<Self> {
        let orig_runs = rd.read_le_u64()? as usize;
        let mut spec = match character {
            true => ColSpec::with_character(layout),
            false => ColSpec::plain(layout),
        };
        if mode == RunDataMode::Integrated {
            spec = spec.with_user_cols(K);
        }
        let ms = MoveStructure::read(rd, spec)?;
        let run_data = if K > 0 && mode == RunDataMode::Separated {
            let tbl = PackedMatrix::read(rd, K)?;
            if tbl.rows() != ms.runs() {
                return Err(err("run data row count mismatch"));
            }
            Some(tbl)
        } else {
            None
        };
        Ok(RunPerm {
            ms,
            run_data,
            position: Position::default(),
            orig_runs,
        })
    }
}

impl MovePerm {
    // A move structure over a run partition, no attached data.
    pub fn from_runs(
        lengths: &[u64],
        interval_perm: &[u64],
        domain: u64,
        opts: &RunPermOptions,
    ) -> Result<Self> {
        RunPerm::new_with(lengths, interval_perm, domain, opts, |_, _, _, _| [])
    }

    // Extracts the run partition from a full permutation vector first.
    pub fn from_permutation(perm: &[u64], opts: &RunPermOptions) -> Result<Self> {
        let (lengths, interval_perm) = permutation_intervals(perm);
        Self::from_runs(&lengths, &interval_perm, perm.len() as u64, opts)
    }
}

// Decomposes a permutation vector into its maximal runs of consecutive
// integers, returning (lengths, interval_perm).
pub fn permutation_intervals(perm: &[u64]) -> (Vec<u64>, Vec<u64>) {
    let mut lengths = Vec::new();
    let mut interval_perm = Vec::new();
    for (i, &v) in perm.iter().enumerate() {
        match lengths.last_mut() {
            Some(last) if i > 0 && v == perm[i - 1] + 1 => *last += 1,
            _ => {
                lengths.push(1);
                interval_perm.push(v);
            }
        }
    }
    (lengths, interval_perm)
}
