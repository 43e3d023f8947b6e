//! Site plans: grid dimensions and reserved infrastructure.

use crate::grid::GridOccupancy;
use nalgebra::Point2;
use stallplan_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A site: grid dimensions plus fixed infrastructure coordinates.
///
/// Paths, drains, utilities, and entries are all reserved on the grid before
/// placement begins; drains and entries additionally act as distance targets
/// for scoring.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SitePlan {
    width: usize,
    height: usize,
    paths: Vec<(usize, usize)>,
    drains: Vec<(usize, usize)>,
    utilities: Vec<(usize, usize)>,
    entries: Vec<(usize, usize)>,
}

impl SitePlan {
    /// Creates an empty site of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            paths: Vec::new(),
            drains: Vec::new(),
            utilities: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Adds circulation path cells.
    pub fn with_paths<I>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        self.paths.extend(cells);
        self
    }

    /// Adds drain points.
    pub fn with_drains<I>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        self.drains.extend(cells);
        self
    }

    /// Adds utility points.
    pub fn with_utilities<I>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        self.utilities.extend(cells);
        self
    }

    /// Adds entry points.
    pub fn with_entries<I>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        self.entries.extend(cells);
        self
    }

    /// Returns the grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the circulation path cells.
    pub fn paths(&self) -> &[(usize, usize)] {
        &self.paths
    }

    /// Returns the drain points.
    pub fn drains(&self) -> &[(usize, usize)] {
        &self.drains
    }

    /// Returns the utility points.
    pub fn utilities(&self) -> &[(usize, usize)] {
        &self.utilities
    }

    /// Returns the entry points.
    pub fn entries(&self) -> &[(usize, usize)] {
        &self.entries
    }

    /// Drain positions as points for distance computation.
    pub fn drain_points(&self) -> Vec<Point2<f64>> {
        self.drains
            .iter()
            .map(|&(x, y)| Point2::new(x as f64, y as f64))
            .collect()
    }

    /// Entry positions as points for distance computation.
    pub fn entry_points(&self) -> Vec<Point2<f64>> {
        self.entries
            .iter()
            .map(|&(x, y)| Point2::new(x as f64, y as f64))
            .collect()
    }

    /// Builds a fresh grid with all infrastructure reserved.
    pub fn build_grid(&self) -> GridOccupancy {
        let mut grid = GridOccupancy::new(self.width, self.height);
        grid.reserve(self.paths.iter().copied());
        grid.reserve(self.drains.iter().copied());
        grid.reserve(self.utilities.iter().copied());
        grid.reserve(self.entries.iter().copied());
        grid
    }

    /// Validates dimensions and reserved coordinate bounds.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfiguration(
                "Grid dimensions must be positive".into(),
            ));
        }
        let groups = [
            ("path", &self.paths),
            ("drain", &self.drains),
            ("utility", &self.utilities),
            ("entry", &self.entries),
        ];
        for (kind, cells) in groups {
            for &(x, y) in cells.iter() {
                if x >= self.width || y >= self.height {
                    return Err(Error::InvalidConfiguration(format!(
                        "Reserved {kind} cell ({x}, {y}) is outside the {}x{} grid",
                        self.width, self.height
                    )));
                }
            }
        }
        Ok(())
    }

    /// The classic 20 x 20 market site: perimeter aisles, a two-cell central
    /// aisle, two drains on the south edge, and two corner entries.
    pub fn market_preset() -> Self {
        let mut paths = Vec::new();
        for y in 0..20 {
            paths.push((0, y));
            paths.push((19, y));
            paths.push((9, y));
            paths.push((10, y));
        }
        for x in 0..20 {
            paths.push((x, 0));
            paths.push((x, 19));
        }

        Self::new(20, 20)
            .with_paths(paths)
            .with_drains([(5, 19), (15, 19)])
            .with_entries([(0, 0), (19, 19)])
    }
}
