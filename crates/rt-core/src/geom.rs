/// Integer pixel position, `row` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PixelCoord {
    pub row: usize,
    pub col: usize,
}

/// 8-neighborhood offsets as `(d_row, d_col)`, in scan order: top-left, top,
/// top-right, left, right, bottom-left, bottom, bottom-right.
pub const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl PixelCoord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Shifts by `(d_row, d_col)`, returning `None` when the result leaves a
    /// `height` x `width` grid.
    #[inline]
    pub fn offset(self, d_row: isize, d_col: isize, height: usize, width: usize) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        if row >= height || col >= width {
            return None;
        }
        Some(Self { row, col })
    }

    /// In-bounds 8-connected neighbors, in [`NEIGHBORS_8`] order.
    pub fn neighbors8(self, height: usize, width: usize) -> impl Iterator<Item = Self> {
        NEIGHBORS_8
            .iter()
            .filter_map(move |&(dr, dc)| self.offset(dr, dc, height, width))
    }
}

impl From<(usize, usize)> for PixelCoord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}
