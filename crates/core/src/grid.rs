//! Grid module - occupancy of the logical snake grid
//!
//! The grid is `cols x rows` cells, each either empty or holding one segment
//! role. Coordinates are `(col, row)` with row 0 at the top. Cells map onto
//! square blocks of `point_size` pixels on the display.
//!
//! Occupancy lives here rather than being read back from the framebuffer, so
//! collision tests do not depend on what else has been drawn.

use serde::Serialize;

use crate::types::SegmentRole;

/// Logical grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Neighbour one step along `(dcol, drow)`, without bounds handling
    pub fn offset(self, (dcol, drow): (i32, i32)) -> Self {
        Self::new(self.col + dcol, self.row + drow)
    }
}

/// Row-major occupancy map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<Option<SegmentRole>>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![None; cols * rows],
        }
    }

    /// Grid sized for a display: whole cells only, any remainder strip is unused.
    pub fn for_display(width: usize, height: usize, point_size: usize) -> Self {
        let size = point_size.max(1);
        Self::new(width / size, height / size)
    }

    #[inline(always)]
    fn index(&self, cell: Cell) -> Option<usize> {
        if self.is_out_of_bounds(cell) {
            return None;
        }
        Some(cell.row as usize * self.cols + cell.col as usize)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cells
    pub fn area(&self) -> usize {
        self.cols * self.rows
    }

    /// Get cell content; `None` if out of bounds
    pub fn get(&self, cell: Cell) -> Option<Option<SegmentRole>> {
        self.index(cell).map(|idx| self.cells[idx])
    }

    /// Set cell content; returns false if out of bounds
    pub fn set(&mut self, cell: Cell, role: Option<SegmentRole>) -> bool {
        match self.index(cell) {
            Some(idx) => {
                self.cells[idx] = role;
                true
            }
            None => false,
        }
    }

    /// In bounds and empty
    pub fn is_free(&self, cell: Cell) -> bool {
        matches!(self.get(cell), Some(None))
    }

    /// In bounds and filled
    pub fn is_occupied(&self, cell: Cell) -> bool {
        matches!(self.get(cell), Some(Some(_)))
    }

    pub fn is_out_of_bounds(&self, cell: Cell) -> bool {
        cell.col < 0 || cell.row < 0 || cell.col >= self.cols as i32 || cell.row >= self.rows as i32
    }

    /// Fold an off-grid coordinate onto the opposite edge.
    ///
    /// Only one step past an edge is expected, which is all a single move can produce.
    pub fn wrap(&self, cell: Cell) -> Cell {
        let (cols, rows) = (self.cols as i32, self.rows as i32);
        let mut out = cell;
        if out.col >= cols {
            out.col = 0;
        } else if out.col < 0 {
            out.col = cols - 1;
        }
        if out.row >= rows {
            out.row = 0;
        } else if out.row < 0 {
            out.row = rows - 1;
        }
        out
    }

    /// Number of filled cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}
