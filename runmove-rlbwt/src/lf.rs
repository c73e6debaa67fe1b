use crate::{
    alphabet::{Alphabet, Nucleotide, MAX_ALPHABET},
    RlbwtOptions,
};
use runmove_base::{err, Reader, Result, Writer};
use runmove_perm::{CharColumn, MoveStructure, RunDataMode, RunPerm};
use runmove_table::{Layout, PackedMatrix, Position};
use tracing::debug;

// The LF permutation of a run-length BWT: LF(i) is the position in
// F = sorted(L) corresponding to L[i]. Stepping LF from the start of the BWT
// walks the text backwards, which is how the text is inverted out of it.
//
// Built from the run heads and run lengths alone: per-byte totals give the C
// array, per-run head ranks give each run's rank among equal characters, and
// the run's image is C[head] + head_rank. Heads at or below the configured
// terminator and separator bytes collapse into those codes on this build
// path only.
pub struct RunPermLf<const K: usize, A: Alphabet = Nucleotide> {
    perm: RunPerm<K>,
    alphabet: A,
}

// LF with no user columns.
pub type MoveLf<A = Nucleotide> = RunPermLf<0, A>;

impl<const K: usize, A: Alphabet> RunPermLf<K, A> {
    // One run-data row per BWT run, duplicated across split sub-runs.
    pub fn new(
        bwt_heads: &[u8],
        bwt_run_lengths: &[u64],
        run_data: &[[u64; K]],
        opts: &RlbwtOptions,
    ) -> Result<Self> {
        if run_data.len() != bwt_heads.len() {
            return Err(err("run data count does not match run count"));
        }
        Self::new_with(bwt_heads, bwt_run_lengths, opts, |orig, _, _, _| {
            run_data[orig as usize]
        })
    }

    pub fn new_with(
        bwt_heads: &[u8],
        bwt_run_lengths: &[u64],
        opts: &RlbwtOptions,
        run_row: impl Fn(u64, u64, u64, u64) -> [u64; K],
    ) -> Result<Self> {
        if bwt_heads.len() != bwt_run_lengths.len() {
            return Err(err("head and length counts differ"));
        }
        if bwt_heads.is_empty() {
            return Err(err("empty BWT"));
        }
        let sym = opts.symbols;
        let heads: Vec<u8> = bwt_heads
            .iter()
            .map(|&c| {
                if c <= sym.terminator {
                    sym.terminator
                } else if c <= sym.separator {
                    sym.separator
                } else {
                    c
                }
            })
            .collect();

        let mut counts = [0_u64; MAX_ALPHABET];
        let mut head_ranks = vec![0_u64; heads.len()];
        let mut n: u64 = 0;
        for (i, (&c, &len)) in heads.iter().zip(bwt_run_lengths.iter()).enumerate() {
            head_ranks[i] = counts[c as usize];
            counts[c as usize] += len;
            n += len;
        }

        // C[c] counts the BWT characters strictly smaller than c.
        let mut c_array = [0_u64; MAX_ALPHABET];
        let mut seen: u64 = 0;
        for (c, slot) in c_array.iter_mut().enumerate() {
            *slot = seen;
            seen += counts[c];
        }
        let interval_perm: Vec<u64> = heads
            .iter()
            .zip(head_ranks.iter())
            .map(|(&c, &rank)| c_array[c as usize] + rank)
            .collect();

        let alphabet = A::from_counts(&counts)?;
        let mapped = alphabet.map_sequence(&heads);
        debug!(target: "runmove", n, r = heads.len(), sigma = alphabet.sigma(), "building LF");
        let perm = RunPerm::build(
            bwt_run_lengths,
            &interval_perm,
            n,
            opts.layout,
            Some(CharColumn {
                mapped: &mapped,
                width: alphabet.code_width(),
            }),
            opts.mode,
            &opts.split,
            run_row,
        )?;
        Ok(RunPermLf { perm, alphabet })
    }

    // One LF step at the cursor.
    pub fn lf(&mut self) -> Position {
        self.perm.next()
    }

    pub fn lf_by(&mut self, steps: u64) -> Position {
        self.perm.next_by(steps)
    }

    // BWT character at the cursor's run, as its original byte.
    pub fn character(&self) -> u8 {
        self.character_at(self.perm.position().interval)
    }

    pub fn character_at(&self, interval: usize) -> u8 {
        self.alphabet
            .unmap(self.perm.structure().get_character(interval))
    }

    pub fn alphabet(&self) -> &A {
        &self.alphabet
    }

    // === Cursor and structure surface, forwarded to the run permutation ===

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
    pub fn pred(&mut self, col: usize, val: u64) -> Option<Position> {
        self.perm.pred(col, val)
    }
    pub fn succ(&mut self, col: usize, val: u64) -> Option<Position> {
        self.perm.succ(col, val)
    }
    pub fn get(&self, col: usize) -> u64 {
        self.perm.get(col)
    }
    pub fn get_length(&self) -> u64 {
        self.perm.get_length()
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
    pub fn structure(&self) -> &MoveStructure<PackedMatrix> {
        self.perm.structure()
    }

    pub fn write(&self, wr: &mut impl Writer) -> Result<()> {
        self.perm.write(wr)?;
        self.alphabet.write(wr)
    }

    pub fn read(rd: &mut impl Reader, layout: Layout, mode: RunDataMode) -> Result<Self> {
        let perm = RunPerm::read(rd, layout, true, mode)?;
        let alphabet = A::read(rd)?;
        Ok(RunPermLf { perm, alphabet })
    }
}
