//! Grid occupancy tracking for stall placement.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One grid cell's occupancy state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Cell {
    /// Free for placement.
    Empty,
    /// Permanently excluded from placement (aisle, drain, utility, entry).
    Reserved,
    /// Covered by the stall with this id.
    Stall(usize),
}

/// Fixed-size occupancy buffer for one layout attempt.
///
/// Reservation must happen before any `place` call; a reserved cell is never
/// reassigned afterward because `place` refuses every non-empty cell.
#[derive(Debug, Clone)]
pub struct GridOccupancy {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl GridOccupancy {
    /// Creates an empty grid of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Returns the grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the cell at (x, y), or None when out of bounds.
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Marks coordinates as reserved. Out-of-bounds coordinates are skipped.
    pub fn reserve<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        for (x, y) in cells {
            if x < self.width && y < self.height {
                self.cells[y * self.width + x] = Cell::Reserved;
            }
        }
    }

    /// Pure query: true if the w x h region at origin (x, y) lies fully in
    /// bounds and every covered cell is empty.
    pub fn is_region_free(&self, x: usize, y: usize, w: usize, h: usize) -> bool {
        if w == 0 || h == 0 {
            return false;
        }
        let Some(max_x) = self.width.checked_sub(w) else {
            return false;
        };
        let Some(max_y) = self.height.checked_sub(h) else {
            return false;
        };
        if x > max_x || y > max_y {
            return false;
        }
        for yy in y..y + h {
            for xx in x..x + w {
                if self.cells[yy * self.width + xx] != Cell::Empty {
                    return false;
                }
            }
        }
        true
    }

    /// Covers a w x h footprint with the given stall id.
    ///
    /// The whole region is checked before any cell is written; on failure
    /// the grid is untouched and false is returned.
    pub fn place(&mut self, id: usize, x: usize, y: usize, w: usize, h: usize) -> bool {
        if !self.is_region_free(x, y, w, h) {
            return false;
        }
        for yy in y..y + h {
            for xx in x..x + w {
                self.cells[yy * self.width + xx] = Cell::Stall(id);
            }
        }
        true
    }

    /// Number of reserved cells.
    pub fn reserved_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Reserved).count()
    }

    /// Number of cells covered by stalls.
    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c, Cell::Stall(_)))
            .count()
    }

    /// Number of empty cells.
    pub fn free_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Empty).count()
    }
}
