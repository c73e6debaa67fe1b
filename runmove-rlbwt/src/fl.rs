use crate::{
    alphabet::{Alphabet, Nucleotide, MAX_ALPHABET},
    RlbwtOptions,
};
use runmove_base::{err, Reader, Result, Writer};
use runmove_perm::{CharColumn, MoveStructure, RunDataMode, RunPerm};
use runmove_table::{Layout, PackedMatrix, Position};
use tracing::debug;

// The FL permutation of a run-length BWT, inverse of LF: given a position in
// F = sorted(L), FL returns the corresponding position in L. Stepping FL from
// the terminator's F position spells the text forward.
//
// Each BWT run contributes one F run: its length under its head character,
// with the run's BWT origin as the image. Flattening the per-character
// buckets in byte order yields the F partition. Heads are taken as given on
// this path; the terminator/separator collapse applies to the LF build only.
pub struct RunPermFl<const K: usize, A: Alphabet = Nucleotide> {
    perm: RunPerm<K>,
    alphabet: A,
}

// FL with no user columns.
pub type MoveFl<A = Nucleotide> = RunPermFl<0, A>;

impl<const K: usize, A: Alphabet> RunPermFl<K, A> {
    // One run-data row per F run, in F (flattened bucket) order, duplicated
    // across split sub-runs.
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

        // Bucket (run length, BWT origin) under each head byte; flattening in
        // byte order is the sort that produces F.
        let mut counts = [0_u64; MAX_ALPHABET];
        let mut buckets: Vec<Vec<(u64, u64)>> = vec![Vec::new(); MAX_ALPHABET];
        let mut n: u64 = 0;
        for (&c, &len) in bwt_heads.iter().zip(bwt_run_lengths.iter()) {
            buckets[c as usize].push((len, n));
            counts[c as usize] += len;
            n += len;
        }

        let r = bwt_heads.len();
        let mut f_heads = Vec::with_capacity(r);
        let mut f_lens = Vec::with_capacity(r);
        let mut interval_perm = Vec::with_capacity(r);
        for (c, bucket) in buckets.iter().enumerate() {
            for &(len, origin) in bucket {
                f_heads.push(c as u8);
                f_lens.push(len);
                interval_perm.push(origin);
            }
        }

        let alphabet = A::from_counts(&counts)?;
        let mapped = alphabet.map_sequence(&f_heads);
        debug!(target: "runmove", n, r, sigma = alphabet.sigma(), "building FL");
        let perm = RunPerm::build(
            &f_lens,
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
        Ok(RunPermFl { perm, alphabet })
    }

    // One FL step at the cursor.
    pub fn fl(&mut self) -> Position {
        self.perm.next()
    }

    pub fn fl_by(&mut self, steps: u64) -> Position {
        self.perm.next_by(steps)
    }

    // F character at the cursor's run, as its original byte.
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
        Ok(RunPermFl { perm, alphabet })
    }
}
