//! Layout scoring: five penalty terms combined by weighted sum.
//!
//! Lower totals are better. Overlapping or out-of-bounds layouts short-circuit
//! to a sentinel penalty orders of magnitude above any achievable valid score,
//! so stochastic search never ranks an invalid layout over a valid one.

use crate::catalog::StallCatalog;
use crate::placement::{Placement, StallInstance};
use crate::site::SitePlan;
use nalgebra::{distance, Point2};
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Weights for the five penalty terms.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitnessWeights {
    /// Circulation blockage weight.
    pub circulation: f64,
    /// Drainage distance weight.
    pub drainage: f64,
    /// Odor conflict weight.
    pub odor: f64,
    /// Adjacency preference weight.
    pub adjacency: f64,
    /// Entry path distance weight.
    pub path: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            circulation: 1.0,
            drainage: 1.5,
            odor: 2.0,
            adjacency: 1.5,
            path: 1.0,
        }
    }
}

/// Tunable scoring constants.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitnessConfig {
    /// Term weights.
    pub weights: FitnessWeights,
    /// Pairs closer than this contribute to the odor term.
    pub odor_radius: f64,
    /// Pair distances are floored to this before dividing.
    pub distance_floor: f64,
    /// Multiplier applied to a preference when two centers coincide.
    pub contact_factor: f64,
    /// Score assigned to an invalid placement.
    pub invalid_penalty: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            weights: FitnessWeights::default(),
            odor_radius: 5.0,
            distance_floor: 1.0,
            contact_factor: 10.0,
            invalid_penalty: 1.0e6,
        }
    }
}

impl FitnessConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the term weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the odor proximity radius.
    pub fn with_odor_radius(mut self, radius: f64) -> Self {
        self.odor_radius = radius.max(0.0);
        self
    }

    /// Sets the minimum pair distance used in divisions.
    pub fn with_distance_floor(mut self, floor: f64) -> Self {
        self.distance_floor = floor.max(f64::MIN_POSITIVE);
        self
    }

    /// Sets the invalid placement penalty.
    pub fn with_invalid_penalty(mut self, penalty: f64) -> Self {
        self.invalid_penalty = penalty.max(1.0);
        self
    }
}

/// Component penalties and the weighted total for one layout.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitnessReport {
    /// Fraction of circulation cells covered by stalls, as a percentage.
    pub circulation: f64,
    /// Mean drain distance scaled by drainage need.
    pub drainage: f64,
    /// Mean odor conflict over close pairs.
    pub odor: f64,
    /// Negated mean adjacency preference over all pairs.
    pub adjacency: f64,
    /// Mean distance to the nearest entry.
    pub path: f64,
    /// Weighted sum; lower is better.
    pub total: f64,
    /// False when the layout failed a structural check: overlapping stalls,
    /// a stall out of bounds, or a category index the catalog does not have.
    pub valid: bool,
}

impl FitnessReport {
    /// The report assigned to an invalid layout.
    pub fn invalid(penalty: f64) -> Self {
        Self {
            circulation: 0.0,
            drainage: 0.0,
            odor: 0.0,
            adjacency: 0.0,
            path: 0.0,
            total: penalty,
            valid: false,
        }
    }
}

/// Scores placements against a site plan and catalog.
///
/// Pure: the same placement always produces the same report.
pub struct FitnessEvaluator<'a> {
    catalog: &'a StallCatalog,
    drains: Vec<Point2<f64>>,
    entries: Vec<Point2<f64>>,
    path_cells: HashSet<(usize, usize)>,
    grid_width: usize,
    grid_height: usize,
    config: FitnessConfig,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator for one catalog and site.
    pub fn new(catalog: &'a StallCatalog, site: &'a SitePlan, config: FitnessConfig) -> Self {
        Self {
            catalog,
            drains: site.drain_points(),
            entries: site.entry_points(),
            path_cells: site.paths().iter().copied().collect(),
            grid_width: site.width(),
            grid_height: site.height(),
            config,
        }
    }

    /// Returns the scoring constants.
    pub fn config(&self) -> &FitnessConfig {
        &self.config
    }

    /// Scores one placement.
    pub fn evaluate(&self, placement: &Placement) -> FitnessReport {
        let stalls = placement.stalls();
        if !self.is_structurally_valid(stalls) {
            return FitnessReport::invalid(self.config.invalid_penalty);
        }

        let centers: Vec<Point2<f64>> = stalls.iter().map(|s| s.center()).collect();

        let circulation = self.circulation_term(stalls);
        let drainage = self.drainage_term(stalls, &centers);
        let odor = self.odor_term(stalls, &centers);
        let adjacency = self.adjacency_term(stalls, &centers);
        let path = self.path_term(&centers);

        let w = &self.config.weights;
        let total = w.circulation * circulation
            + w.drainage * drainage
            + w.odor * odor
            + w.adjacency * adjacency
            + w.path * path;

        FitnessReport {
            circulation,
            drainage,
            odor,
            adjacency,
            path,
            total,
            valid: true,
        }
    }

    /// Every stall names a known category, stays inside the grid, and shares
    /// no cell with another stall.
    fn is_structurally_valid(&self, stalls: &[StallInstance]) -> bool {
        let categories = self.catalog.categories().len();
        for (i, a) in stalls.iter().enumerate() {
            if a.category >= categories {
                return false;
            }
            if a.x + a.width > self.grid_width || a.y + a.height > self.grid_height {
                return false;
            }
            for b in &stalls[i + 1..] {
                if a.overlaps(b) {
                    return false;
                }
            }
        }
        true
    }

    /// Percentage of circulation cells covered by any stall footprint.
    ///
    /// Zero for any placement produced against a grid that reserved its paths
    /// first; nonzero flags a reservation ordering bug.
    fn circulation_term(&self, stalls: &[StallInstance]) -> f64 {
        if self.path_cells.is_empty() {
            return 0.0;
        }
        let covered = self
            .path_cells
            .iter()
            .filter(|&&(x, y)| stalls.iter().any(|s| s.covers(x, y)))
            .count();
        covered as f64 / self.path_cells.len() as f64 * 100.0
    }

    /// Mean over all stalls of (distance to nearest drain) * drainage need.
    fn drainage_term(&self, stalls: &[StallInstance], centers: &[Point2<f64>]) -> f64 {
        if stalls.is_empty() || self.drains.is_empty() {
            return 0.0;
        }
        let mut sum = 0.0;
        for (stall, center) in stalls.iter().zip(centers) {
            let need = self.catalog.category(stall.category).drainage;
            if need == 0 {
                continue;
            }
            let nearest = self
                .drains
                .iter()
                .map(|d| distance(center, d))
                .fold(f64::INFINITY, f64::min);
            sum += nearest * need as f64;
        }
        sum / stalls.len() as f64
    }

    /// Mean odor-level difference over pairs within the proximity radius,
    /// each divided by the (floored) pair distance.
    fn odor_term(&self, stalls: &[StallInstance], centers: &[Point2<f64>]) -> f64 {
        let n = stalls.len();
        if n < 2 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let odor_i = self.catalog.category(stalls[i].category).odor as f64;
            for j in (i + 1)..n {
                let dist = distance(&centers[i], &centers[j]);
                if dist < self.config.odor_radius {
                    let odor_j = self.catalog.category(stalls[j].category).odor as f64;
                    sum += (odor_i - odor_j).abs() / dist.max(self.config.distance_floor);
                }
            }
        }
        sum / pair_count(n)
    }

    /// Negated mean adjacency preference over all pairs, each divided by the
    /// pair distance. Attraction satisfied up close lowers the total;
    /// repulsion violated up close raises it.
    fn adjacency_term(&self, stalls: &[StallInstance], centers: &[Point2<f64>]) -> f64 {
        let n = stalls.len();
        if n < 2 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let pref = self
                    .catalog
                    .adjacency(stalls[i].category, stalls[j].category);
                let dist = distance(&centers[i], &centers[j]);
                sum += if dist == 0.0 {
                    pref * self.config.contact_factor
                } else {
                    pref / dist
                };
            }
        }
        -(sum / pair_count(n))
    }

    /// Mean distance from each stall center to its nearest entry.
    fn path_term(&self, centers: &[Point2<f64>]) -> f64 {
        if centers.is_empty() || self.entries.is_empty() {
            return 0.0;
        }
        let sum: f64 = centers
            .iter()
            .map(|c| {
                self.entries
                    .iter()
                    .map(|e| distance(c, e))
                    .fold(f64::INFINITY, f64::min)
            })
            .sum();
        sum / centers.len() as f64
    }
}

fn pair_count(n: usize) -> f64 {
    (n * (n - 1) / 2) as f64
}
