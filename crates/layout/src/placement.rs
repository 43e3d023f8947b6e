//! Placed stalls and exported layout records.

use crate::catalog::StallCatalog;
use crate::grid::{Cell, GridOccupancy};
use nalgebra::Point2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One placed stall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StallInstance {
    /// Unique id within the layout.
    pub id: usize,
    /// Index into the catalog's category list.
    pub category: usize,
    /// Footprint width in cells.
    pub width: usize,
    /// Footprint height in cells.
    pub height: usize,
    /// Origin column.
    pub x: usize,
    /// Origin row.
    pub y: usize,
}

impl StallInstance {
    /// Footprint center in cell coordinates.
    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// True if this footprint covers the given cell.
    pub fn covers(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// True if the two footprints share any cell.
    pub fn overlaps(&self, other: &StallInstance) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// A complete candidate layout: every requested stall placed, grid
/// materialized.
///
/// Scoring derives from the stall list and the site; the grid is carried for
/// occupancy export. Read-only once built.
#[derive(Debug, Clone)]
pub struct Placement {
    stalls: Vec<StallInstance>,
    grid: GridOccupancy,
}

impl Placement {
    /// Assembles a placement from placed stalls and their grid.
    pub fn new(mut stalls: Vec<StallInstance>, grid: GridOccupancy) -> Self {
        stalls.sort_by_key(|s| s.id);
        Self { stalls, grid }
    }

    /// Placed stalls in ascending id order.
    pub fn stalls(&self) -> &[StallInstance] {
        &self.stalls
    }

    /// The materialized occupancy grid.
    pub fn grid(&self) -> &GridOccupancy {
        &self.grid
    }

    /// Exports the record set a renderer or exporter needs.
    pub fn snapshot(&self, catalog: &StallCatalog) -> LayoutSnapshot {
        let stalls = self
            .stalls
            .iter()
            .map(|s| StallRecord {
                id: s.id,
                category: catalog.category(s.category).name.clone(),
                x: s.x,
                y: s.y,
                width: s.width,
                height: s.height,
            })
            .collect();

        LayoutSnapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            cells: self.grid.cells().to_vec(),
            stalls,
        }
    }
}

/// One stall's exported record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StallRecord {
    /// Stall id.
    pub id: usize,
    /// Category display name.
    pub category: String,
    /// Origin column.
    pub x: usize,
    /// Origin row.
    pub y: usize,
    /// Footprint width in cells.
    pub width: usize,
    /// Footprint height in cells.
    pub height: usize,
}

/// Exported view of one layout for renderers and exporters.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutSnapshot {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Row-major cell labels.
    pub cells: Vec<Cell>,
    /// Per-stall records in ascending id order.
    pub stalls: Vec<StallRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StallCategory;

    #[test]
    fn test_center() {
        let stall = StallInstance {
            id: 0,
            category: 0,
            width: 3,
            height: 3,
            x: 0,
            y: 0,
        };
        assert_eq!(stall.center(), Point2::new(1.5, 1.5));

        let stall = StallInstance {
            id: 1,
            category: 0,
            width: 4,
            height: 2,
            x: 5,
            y: 7,
        };
        assert_eq!(stall.center(), Point2::new(7.0, 8.0));
    }

    #[test]
    fn test_covers() {
        let stall = StallInstance {
            id: 0,
            category: 0,
            width: 2,
            height: 2,
            x: 3,
            y: 3,
        };

        assert!(stall.covers(3, 3));
        assert!(stall.covers(4, 4));
        assert!(!stall.covers(5, 3));
        assert!(!stall.covers(2, 3));
    }

    #[test]
    fn test_overlaps_shares_cell() {
        let a = StallInstance {
            id: 0,
            category: 0,
            width: 3,
            height: 3,
            x: 0,
            y: 0,
        };
        let b = StallInstance {
            id: 1,
            category: 0,
            width: 3,
            height: 3,
            x: 2,
            y: 2,
        };
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = StallInstance {
            id: 0,
            category: 0,
            width: 3,
            height: 3,
            x: 0,
            y: 0,
        };
        let b = StallInstance {
            id: 1,
            category: 0,
            width: 3,
            height: 3,
            x: 3,
            y: 0,
        };
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_placement_sorts_by_id() {
        let grid = GridOccupancy::new(10, 10);
        let stalls = vec![
            StallInstance { id: 2, category: 0, width: 1, height: 1, x: 0, y: 0 },
            StallInstance { id: 0, category: 0, width: 1, height: 1, x: 2, y: 0 },
            StallInstance { id: 1, category: 0, width: 1, height: 1, x: 4, y: 0 },
        ];

        let placement = Placement::new(stalls, grid);

        let ids: Vec<usize> = placement.stalls().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_snapshot_records() {
        let catalog = StallCatalog::new(vec![StallCategory::new("fish", 2, 2)]);
        let mut grid = GridOccupancy::new(6, 6);
        assert!(grid.place(0, 1, 2, 2, 2));
        let stalls = vec![StallInstance {
            id: 0,
            category: 0,
            width: 2,
            height: 2,
            x: 1,
            y: 2,
        }];

        let snapshot = Placement::new(stalls, grid).snapshot(&catalog);

        assert_eq!(snapshot.width, 6);
        assert_eq!(snapshot.height, 6);
        assert_eq!(snapshot.cells.len(), 36);
        assert_eq!(snapshot.cells[2 * 6 + 1], Cell::Stall(0));
        assert_eq!(
            snapshot.stalls,
            vec![StallRecord {
                id: 0,
                category: "fish".to_string(),
                x: 1,
                y: 2,
                width: 2,
                height: 2,
            }]
        );
    }
}
