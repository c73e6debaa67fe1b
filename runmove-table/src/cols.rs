// Column layout descriptors. The same packed row shape serves two position
// representations: relative rows store each interval's length, absolute rows
// store each interval's starting index in the domain. Both keep a pointer
// column and an offset column after the primary.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Layout {
    // Rows are (length, pointer, offset); positions are (interval, offset).
    Relative,
    // Rows are (start, pointer, offset); positions also carry the absolute
    // index, bought with one extra integer per query position.
    Absolute,
}

// Describes the columns of one packed row: the three move columns, an
// optional character column (BWT tables), then any user columns.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ColSpec {
    pub layout: Layout,
    pub character: bool,
    pub user_cols: usize,
}

impl ColSpec {
    pub const PRIMARY: usize = 0;
    pub const POINTER: usize = 1;
    pub const OFFSET: usize = 2;

    pub fn plain(layout: Layout) -> Self {
        ColSpec {
            layout,
            character: false,
            user_cols: 0,
        }
    }

    pub fn with_character(layout: Layout) -> Self {
        ColSpec {
            layout,
            character: true,
            user_cols: 0,
        }
    }

    pub fn with_user_cols(mut self, user_cols: usize) -> Self {
        self.user_cols = user_cols;
        self
    }

    pub fn character_col(&self) -> usize {
        debug_assert!(self.character);
        3
    }

    pub fn user_col(&self, j: usize) -> usize {
        debug_assert!(j < self.user_cols);
        self.base_cols() + j
    }

    pub fn base_cols(&self) -> usize {
        3 + usize::from(self.character)
    }

    pub fn num_cols(&self) -> usize {
        self.base_cols() + self.user_cols
    }
}

// A cursor into a move structure. Under Layout::Relative only interval and
// offset are meaningful; under Layout::Absolute idx tracks the absolute
// domain index of the position. Equality compares interval and offset so
// positions from either layout compare the same way.
#[derive(Clone, Copy, Debug, Default, Eq)]
pub struct Position {
    pub interval: usize,
    pub offset: u64,
    pub idx: u64,
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.interval == other.interval && self.offset == other.offset
    }
}

impl Position {
    pub fn new(interval: usize, offset: u64) -> Self {
        Position {
            interval,
            offset,
            idx: 0,
        }
    }

    pub fn with_idx(interval: usize, offset: u64, idx: u64) -> Self {
        Position {
            interval,
            offset,
            idx,
        }
    }
}
