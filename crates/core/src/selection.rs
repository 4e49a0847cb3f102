use serde::{Deserialize, Serialize};

/// A cell position. Rows have no stable id, so `row` is the current index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoords {
    pub row: usize,
    pub col: usize,
}

impl CellCoords {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for CellCoords {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// A rectangular range of cells, inclusive on both ends.
///
/// Not normalized at rest: `start` is where the selection was anchored and
/// `end` follows the pointer, so `end` may lie above or left of `start`.
/// Call [`SelectionRange::normalized`] before iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: CellCoords,
    pub end: CellCoords,
}

impl SelectionRange {
    pub fn new(start: CellCoords, end: CellCoords) -> Self {
        Self { start, end }
    }

    /// Create a single-cell range.
    pub fn single(cell: CellCoords) -> Self {
        Self { start: cell, end: cell }
    }

    /// Swap coordinates as needed so start <= end componentwise.
    pub fn normalized(&self) -> Self {
        Self {
            start: CellCoords::new(self.min_row(), self.min_col()),
            end: CellCoords::new(self.max_row(), self.max_col()),
        }
    }

    pub fn min_row(&self) -> usize {
        self.start.row.min(self.end.row)
    }

    pub fn max_row(&self) -> usize {
        self.start.row.max(self.end.row)
    }

    pub fn min_col(&self) -> usize {
        self.start.col.min(self.end.col)
    }

    pub fn max_col(&self) -> usize {
        self.start.col.max(self.end.col)
    }

    /// Check if this range contains a cell.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.min_row() && row <= self.max_row() &&
        col >= self.min_col() && col <= self.max_col()
    }

    pub fn row_count(&self) -> usize {
        self.max_row() - self.min_row() + 1
    }

    pub fn col_count(&self) -> usize {
        self.max_col() - self.min_col() + 1
    }

    /// Number of cells in this range.
    pub fn cell_count(&self) -> usize {
        self.row_count() * self.col_count()
    }

    /// Check if this is a single cell.
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// Iterate over all cells in this range (row-major order, top-left first).
    pub fn cells(&self) -> impl Iterator<Item = CellCoords> {
        let (start_row, end_row) = (self.min_row(), self.max_row());
        let (start_col, end_col) = (self.min_col(), self.max_col());

        (start_row..=end_row).flat_map(move |r| {
            (start_col..=end_col).map(move |c| CellCoords::new(r, c))
        })
    }

    /// Clip the range to a `rows` x `cols` grid. Returns None when nothing is left.
    pub fn clamp_to(&self, rows: usize, cols: usize) -> Option<Self> {
        if rows == 0 || cols == 0 {
            return None;
        }
        let n = self.normalized();
        if n.start.row >= rows || n.start.col >= cols {
            return None;
        }
        Some(Self {
            start: n.start,
            end: CellCoords::new(n.end.row.min(rows - 1), n.end.col.min(cols - 1)),
        })
    }
}
