//! Stall category definitions and the placement work list.

use stallplan_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Traffic affinity used by the cellular growth strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Affinity {
    /// Prefers long-stay zones near circulation paths.
    LongStay,
    /// Prefers short-stay zones deeper into the site.
    ShortStay,
    /// No preference.
    #[default]
    Either,
}

/// One stall category: footprint options, counts, and nuisance levels.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StallCategory {
    /// Display name.
    pub name: String,
    /// Candidate footprint sizes as (width, height) in cells.
    pub footprints: Vec<(usize, usize)>,
    /// Number of instances to place.
    pub count: usize,
    /// Odor emission level (0 = none).
    pub odor: u32,
    /// Drainage need (0 = none).
    pub drainage: u32,
    /// Traffic affinity.
    pub affinity: Affinity,
}

impl StallCategory {
    /// Creates a category with a single footprint option and a count of one.
    pub fn new(name: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            name: name.into(),
            footprints: vec![(width, height)],
            count: 1,
            odor: 0,
            drainage: 0,
            affinity: Affinity::Either,
        }
    }

    /// Adds an alternative footprint size.
    pub fn with_footprint(mut self, width: usize, height: usize) -> Self {
        self.footprints.push((width, height));
        self
    }

    /// Sets the required instance count.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Sets the odor emission level.
    pub fn with_odor(mut self, odor: u32) -> Self {
        self.odor = odor;
        self
    }

    /// Sets the drainage need.
    pub fn with_drainage(mut self, drainage: u32) -> Self {
        self.drainage = drainage;
        self
    }

    /// Sets the traffic affinity.
    pub fn with_affinity(mut self, affinity: Affinity) -> Self {
        self.affinity = affinity;
        self
    }
}

/// A pending stall: identity and category, no position yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StallRequest {
    /// Unique id within one layout.
    pub id: usize,
    /// Index into the catalog's category list.
    pub category: usize,
}

/// Immutable set of stall categories plus their pairwise adjacency
/// preferences.
///
/// The adjacency matrix is square and symmetric: positive entries attract,
/// negative entries repel, zero is neutral.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StallCatalog {
    categories: Vec<StallCategory>,
    /// Row-major n x n matrix; entry (a, b) always equals entry (b, a).
    adjacency: Vec<f64>,
}

impl StallCatalog {
    /// Creates a catalog with all-zero adjacency preferences.
    pub fn new(categories: Vec<StallCategory>) -> Self {
        let n = categories.len();
        Self {
            categories,
            adjacency: vec![0.0; n * n],
        }
    }

    /// Returns the categories.
    pub fn categories(&self) -> &[StallCategory] {
        &self.categories
    }

    /// Returns the category at `index`.
    pub fn category(&self, index: usize) -> &StallCategory {
        &self.categories[index]
    }

    /// Symmetric adjacency preference between two categories.
    pub fn adjacency(&self, a: usize, b: usize) -> f64 {
        self.adjacency[a * self.categories.len() + b]
    }

    /// Sets the preference for one pair; writes both (a, b) and (b, a).
    pub fn set_adjacency(&mut self, a: usize, b: usize, preference: f64) {
        let n = self.categories.len();
        self.adjacency[a * n + b] = preference;
        self.adjacency[b * n + a] = preference;
    }

    /// Builder form of `set_adjacency`.
    pub fn with_adjacency(mut self, a: usize, b: usize, preference: f64) -> Self {
        self.set_adjacency(a, b, preference);
        self
    }

    /// Replaces the whole adjacency matrix (row-major, n x n).
    ///
    /// Rejects matrices of the wrong size or with asymmetric entries.
    pub fn with_adjacency_matrix(mut self, matrix: Vec<f64>) -> Result<Self> {
        let n = self.categories.len();
        if matrix.len() != n * n {
            return Err(Error::InvalidConfiguration(format!(
                "Adjacency matrix must be {n}x{n}, got {} entries",
                matrix.len()
            )));
        }
        for a in 0..n {
            for b in (a + 1)..n {
                if matrix[a * n + b] != matrix[b * n + a] {
                    return Err(Error::InvalidConfiguration(format!(
                        "Adjacency matrix must be symmetric, but ({a}, {b}) differs from ({b}, {a})"
                    )));
                }
            }
        }
        self.adjacency = matrix;
        Ok(self)
    }

    /// Expands categories into the per-instance work list, ids assigned in
    /// catalog order.
    pub fn requests(&self) -> Vec<StallRequest> {
        let mut requests = Vec::with_capacity(self.total_count());
        let mut id = 0;
        for (category, cat) in self.categories.iter().enumerate() {
            for _ in 0..cat.count {
                requests.push(StallRequest { id, category });
                id += 1;
            }
        }
        requests
    }

    /// Total number of instances across all categories.
    pub fn total_count(&self) -> usize {
        self.categories.iter().map(|c| c.count).sum()
    }

    /// Validates category definitions.
    pub fn validate(&self) -> Result<()> {
        for cat in &self.categories {
            if cat.count > 0 && cat.footprints.is_empty() {
                return Err(Error::InvalidConfiguration(format!(
                    "Category '{}' requires {} instances but has no footprint options",
                    cat.name, cat.count
                )));
            }
            for &(w, h) in &cat.footprints {
                if w == 0 || h == 0 {
                    return Err(Error::InvalidConfiguration(format!(
                        "Category '{}' has a zero-area footprint",
                        cat.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// The classic five-category market catalog.
    pub fn market_preset() -> Self {
        let categories = vec![
            StallCategory::new("vegetable", 3, 3).with_count(5).with_odor(1),
            StallCategory::new("meat", 4, 3)
                .with_count(3)
                .with_odor(3)
                .with_drainage(1)
                .with_affinity(Affinity::LongStay),
            StallCategory::new("fish", 4, 4)
                .with_count(2)
                .with_odor(4)
                .with_drainage(2)
                .with_affinity(Affinity::LongStay),
            StallCategory::new("cooked", 3, 2)
                .with_count(4)
                .with_odor(2)
                .with_affinity(Affinity::ShortStay),
            StallCategory::new("dry", 2, 2).with_count(6),
        ];

        let mut catalog = Self::new(categories);
        catalog.adjacency = vec![
            1.0, 0.0, -1.0, 1.0, 1.0, //
            0.0, 1.0, 1.0, -2.0, 0.0, //
            -1.0, 1.0, 1.0, -3.0, -1.0, //
            1.0, -2.0, -3.0, 1.0, 2.0, //
            1.0, 0.0, -1.0, 2.0, 1.0, //
        ];
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_expand_counts_in_order() {
        let catalog = StallCatalog::new(vec![
            StallCategory::new("a", 2, 2).with_count(2),
            StallCategory::new("b", 3, 1).with_count(1),
        ]);

        let requests = catalog.requests();

        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0], StallRequest { id: 0, category: 0 });
        assert_eq!(requests[1], StallRequest { id: 1, category: 0 });
        assert_eq!(requests[2], StallRequest { id: 2, category: 1 });
    }

    #[test]
    fn test_set_adjacency_is_symmetric() {
        let mut catalog = StallCatalog::new(vec![
            StallCategory::new("a", 1, 1),
            StallCategory::new("b", 1, 1),
        ]);

        catalog.set_adjacency(0, 1, -50.0);

        assert_eq!(catalog.adjacency(0, 1), -50.0);
        assert_eq!(catalog.adjacency(1, 0), -50.0);
    }

    #[test]
    fn test_adjacency_matrix_rejects_wrong_size() {
        let catalog = StallCatalog::new(vec![
            StallCategory::new("a", 1, 1),
            StallCategory::new("b", 1, 1),
        ]);

        assert!(catalog.with_adjacency_matrix(vec![1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_adjacency_matrix_rejects_asymmetry() {
        let catalog = StallCatalog::new(vec![
            StallCategory::new("a", 1, 1),
            StallCategory::new("b", 1, 1),
        ]);

        let result = catalog.with_adjacency_matrix(vec![0.0, 1.0, -1.0, 0.0]);

        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_zero_area_footprint() {
        let catalog = StallCatalog::new(vec![StallCategory::new("a", 0, 3)]);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_footprints() {
        let mut category = StallCategory::new("a", 2, 2).with_count(3);
        category.footprints.clear();
        let catalog = StallCatalog::new(vec![category]);

        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_validate_allows_zero_count_without_footprints() {
        let mut category = StallCategory::new("a", 2, 2).with_count(0);
        category.footprints.clear();
        let catalog = StallCatalog::new(vec![category]);

        assert!(catalog.validate().is_ok());
        assert!(catalog.requests().is_empty());
    }

    #[test]
    fn test_market_preset() {
        let catalog = StallCatalog::market_preset();

        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.categories().len(), 5);
        assert_eq!(catalog.total_count(), 20);

        // fish repels cooked food, dry goods attract cooked food
        assert_eq!(catalog.adjacency(2, 3), -3.0);
        assert_eq!(catalog.adjacency(3, 2), -3.0);
        assert_eq!(catalog.adjacency(4, 3), 2.0);

        assert_eq!(catalog.category(2).footprints, vec![(4, 4)]);
        assert_eq!(catalog.category(2).drainage, 2);
    }
}
