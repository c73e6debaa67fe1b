use crate::{alphabet::ByteAlphabet, lf::MoveLf, RlbwtOptions};
use runmove_base::{Reader, Result, Writer};
use runmove_perm::{RunDataMode, RunPerm, RunPermOptions, SplitParams};
use runmove_table::{Layout, Position};

// Suffix-array neighbor permutations sampled at BWT run boundaries.
// Phi(i) = SA[SA^-1(i) - 1] and InvPhi(i) = SA[SA^-1(i) + 1], both wrapping
// at the ends of the suffix array. Restricted to the samples at run
// boundaries they are runny, so a move structure represents them in O(r)
// space; positions must carry the absolute index because SA(pos) = pos.idx.
//
// Construction walks an LF structure across the whole BWT once. Stepping LF
// from the terminator's row visits suffix-array values n-1, n-2, ..., 0, so
// the walk observes the SA value of every run head and run tail. Run tails
// seen in walk order carve InvPhi's interval lengths (run heads carve Phi's),
// and the samples at the opposite boundary of each neighboring run supply the
// interval images, wrapping modulo the run count.

fn boundary_runs(lf: &MoveLf<ByteAlphabet>) -> usize {
    let m = lf.move_runs();
    (1..m)
        .filter(|&i| lf.character_at(i) != lf.character_at(i - 1))
        .count()
        + 1
}

pub fn rlbwt_to_invphi(
    bwt_heads: &[u8],
    bwt_run_lengths: &[u64],
) -> Result<(Vec<u64>, Vec<u64>, u64)> {
    let mut lf: MoveLf<ByteAlphabet> =
        MoveLf::new_with(bwt_heads, bwt_run_lengths, &RlbwtOptions::default(), |_, _, _, _| [])?;
    let n = lf.size();
    let m = lf.move_runs();
    let runs = boundary_runs(&lf);

    let mut lengths = vec![0_u64; runs];
    let mut interval_perm = vec![0_u64; runs];
    let mut run_to_interval = vec![0_usize; m];
    let mut head_samples = vec![0_u64; m];
    let mut is_head = vec![false; m];

    let mut last_sample = n;
    let mut curr = runs;
    lf.first();
    for i in 0..n {
        let sa = n - 1 - i;
        let pos = lf.position();
        let interval = pos.interval;
        let at_tail = pos.offset == lf.structure().get_length(interval) - 1
            && (interval == m - 1 || lf.character_at(interval + 1) != lf.character_at(interval));
        if at_tail {
            curr -= 1;
            lengths[curr] = last_sample - sa;
            run_to_interval[interval] = curr;
            last_sample = sa;
        }
        let at_head = pos.offset == 0
            && (interval == 0 || lf.character_at(interval - 1) != lf.character_at(interval));
        if at_head {
            head_samples[interval] = sa;
            is_head[interval] = true;
        }
        lf.lf();
    }
    debug_assert_eq!(curr, 0);

    // Each run head's sample is the image of the interval carved at the
    // previous run's tail, wrapping at the top.
    for i in 0..m {
        if is_head[i] {
            let prev = if i == 0 { m - 1 } else { i - 1 };
            interval_perm[run_to_interval[prev]] = head_samples[i];
        }
    }
    Ok((lengths, interval_perm, n))
}

pub fn rlbwt_to_phi(
    bwt_heads: &[u8],
    bwt_run_lengths: &[u64],
) -> Result<(Vec<u64>, Vec<u64>, u64)> {
    let mut lf: MoveLf<ByteAlphabet> =
        MoveLf::new_with(bwt_heads, bwt_run_lengths, &RlbwtOptions::default(), |_, _, _, _| [])?;
    let n = lf.size();
    let m = lf.move_runs();
    let runs = boundary_runs(&lf);

    let mut lengths = vec![0_u64; runs];
    let mut interval_perm = vec![0_u64; runs];
    let mut run_to_interval = vec![0_usize; m];
    let mut tail_samples = vec![0_u64; m];
    let mut is_tail = vec![false; m];

    let mut last_sample = n;
    let mut curr = runs;
    lf.first();
    for i in 0..n {
        let sa = n - 1 - i;
        let pos = lf.position();
        let interval = pos.interval;
        let at_head = pos.offset == 0
            && (interval == 0 || lf.character_at(interval - 1) != lf.character_at(interval));
        if at_head {
            curr -= 1;
            lengths[curr] = last_sample - sa;
            run_to_interval[interval] = curr;
            last_sample = sa;
        }
        let at_tail = pos.offset == lf.structure().get_length(interval) - 1
            && (interval == m - 1 || lf.character_at(interval + 1) != lf.character_at(interval));
        if at_tail {
            tail_samples[interval] = sa;
            is_tail[interval] = true;
        }
        lf.lf();
    }
    debug_assert_eq!(curr, 0);

    // Mirror of the InvPhi stitch: each run tail's sample is the image of the
    // interval carved at the next run's head, wrapping at the bottom.
    for i in 0..m {
        if is_tail[i] {
            let next = if i == m - 1 { 0 } else { i + 1 };
            interval_perm[run_to_interval[next]] = tail_samples[i];
        }
    }
    Ok((lengths, interval_perm, n))
}

// Phi over SA samples, with K user columns per run. Positions are always
// absolute: SA(pos) is read straight off the cursor.
pub struct RunPermPhi<const K: usize> {
    perm: RunPerm<K>,
}

pub type MovePhi = RunPermPhi<0>;

impl<const K: usize> RunPermPhi<K> {
    pub fn new(
        lengths: &[u64],
        interval_perm: &[u64],
        domain: u64,
        run_data: &[[u64; K]],
        mode: RunDataMode,
        split: &SplitParams,
    ) -> Result<Self> {
        let opts = RunPermOptions {
            layout: Layout::Absolute,
            mode,
            split: *split,
        };
        Ok(RunPermPhi {
            perm: RunPerm::new(lengths, interval_perm, domain, run_data, &opts)?,
        })
    }

    // One Phi step at the cursor.
    pub fn phi(&mut self) -> Position {
        self.perm.next()
    }

    // Suffix-array value at the cursor.
    pub fn sa(&self) -> u64 {
        self.perm.position().idx
    }

    pub fn first(&mut self) -> Position {
        self.perm.first()
    }
    pub fn last(&mut self) -> Position {
        self.perm.last()
    }
    pub fn up(&mut self) -> bool {
        self.perm.up()
    }
    pub fn down(&mut self) -> bool {
        self.perm.down()
    }
    pub fn get(&self, col: usize) -> u64 {
        self.perm.get(col)
    }
    pub fn position(&self) -> Position {
        self.perm.position()
    }
    pub fn set_position(&mut self, pos: Position) {
        self.perm.set_position(pos)
    }
    pub fn size(&self) -> u64 {
        self.perm.size()
    }
    pub fn move_runs(&self) -> usize {
        self.perm.move_runs()
    }
    pub fn permutation_runs(&self) -> usize {
        self.perm.permutation_runs()
    }

    pub fn write(&self, wr: &mut impl Writer) -> Result<()> {
        self.perm.write(wr)
    }

    pub fn read(rd: &mut impl Reader, mode: RunDataMode) -> Result<Self> {
        Ok(RunPermPhi {
            perm: RunPerm::read(rd, Layout::Absolute, false, mode)?,
        })
    }
}

impl MovePhi {
    pub fn from_runs(lengths: &[u64], interval_perm: &[u64], domain: u64) -> Result<Self> {
        Self::new(
            lengths,
            interval_perm,
            domain,
            &vec![[0_u64; 0]; lengths.len()],
            RunDataMode::Integrated,
            &SplitParams::none(),
        )
    }
}

// InvPhi over SA samples, the forward suffix-array neighbor. Walking it from
// last() and reading SA(pos) reconstructs the suffix array front to back.
pub struct RunPermInvPhi<const K: usize> {
    perm: RunPerm<K>,
}

pub type MoveInvPhi = RunPermInvPhi<0>;

impl<const K: usize> RunPermInvPhi<K> {
    pub fn new(
        lengths: &[u64],
        interval_perm: &[u64],
        domain: u64,
        run_data: &[[u64; K]],
        mode: RunDataMode,
        split: &SplitParams,
    ) -> Result<Self> {
        let opts = RunPermOptions {
            layout: Layout::Absolute,
            mode,
            split: *split,
        };
        Ok(RunPermInvPhi {
            perm: RunPerm::new(lengths, interval_perm, domain, run_data, &opts)?,
        })
    }

    // One InvPhi step at the cursor.
    pub fn inv_phi(&mut self) -> Position {
        self.perm.next()
    }

    // Suffix-array value at the cursor.
    pub fn sa(&self) -> u64 {
        self.perm.position().idx
    }

    pub fn first(&mut self) -> Position {
        self.perm.first()
    }
    pub fn last(&mut self) -> Position {
        self.perm.last()
    }
    pub fn up(&mut self) -> bool {
        self.perm.up()
    }
    pub fn down(&mut self) -> bool {
        self.perm.down()
    }
    pub fn get(&self, col: usize) -> u64 {
        self.perm.get(col)
    }
    pub fn position(&self) -> Position {
        self.perm.position()
    }
    pub fn set_position(&mut self, pos: Position) {
        self.perm.set_position(pos)
    }
    pub fn size(&self) -> u64 {
        self.perm.size()
    }
    pub fn move_runs(&self) -> usize {
        self.perm.move_runs()
    }
    pub fn permutation_runs(&self) -> usize {
        self.perm.permutation_runs()
    }

    pub fn write(&self, wr: &mut impl Writer) -> Result<()> {
        self.perm.write(wr)
    }

    pub fn read(rd: &mut impl Reader, mode: RunDataMode) -> Result<Self> {
        Ok(RunPermInvPhi {
            perm: RunPerm::read(rd, Layout::Absolute, false, mode)?,
        })
    }
}

impl MoveInvPhi {
    pub fn from_runs(lengths: &[u64], interval_perm: &[u64], domain: u64) -> Result<Self> {
        Self::new(
            lengths,
            interval_perm,
            domain,
            &vec![[0_u64; 0]; lengths.len()],
            RunDataMode::Integrated,
            &SplitParams::none(),
        )
    }
}
