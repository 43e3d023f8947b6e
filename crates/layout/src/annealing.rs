//! Simulated annealing over stall coordinates.
//!
//! Each stall contributes an (x, y) pair to a continuous decision vector.
//! Points decode by truncation onto the grid; a point whose decoded layout
//! collides with reserved cells or other stalls evaluates to the invalid
//! penalty, which the annealer walks away from.

use crate::catalog::{StallCatalog, StallRequest};
use crate::fitness::FitnessEvaluator;
use crate::placement::{Placement, StallInstance};
use crate::site::SitePlan;
use rand::Rng;
use stallplan_core::{SaProblem, SaRunner};

/// Stall layout expressed as a continuous minimization problem.
pub struct CoordinateProblem<'a> {
    site: &'a SitePlan,
    evaluator: &'a FitnessEvaluator<'a>,
    requests: Vec<StallRequest>,
    footprints: Vec<(usize, usize)>,
}

impl<'a> CoordinateProblem<'a> {
    /// Builds the problem for one catalog and site.
    ///
    /// Each stall uses its category's first footprint option; the catalog
    /// must already have passed validation.
    pub fn new(
        catalog: &'a StallCatalog,
        site: &'a SitePlan,
        evaluator: &'a FitnessEvaluator<'a>,
    ) -> Self {
        let requests = catalog.requests();
        let footprints = requests
            .iter()
            .map(|r| catalog.category(r.category).footprints[0])
            .collect();
        Self {
            site,
            evaluator,
            requests,
            footprints,
        }
    }

    /// Decodes a point into a placement, or `None` when any stall lands on
    /// an occupied or out-of-bounds region.
    pub fn decode(&self, point: &[f64]) -> Option<Placement> {
        if point.len() != self.requests.len() * 2 {
            return None;
        }
        let mut grid = self.site.build_grid();
        let mut stalls = Vec::with_capacity(self.requests.len());
        for (i, request) in self.requests.iter().enumerate() {
            let (width, height) = self.footprints[i];
            let x = point[2 * i] as usize;
            let y = point[2 * i + 1] as usize;
            if !grid.place(request.id, x, y, width, height) {
                return None;
            }
            stalls.push(StallInstance {
                id: request.id,
                category: request.category,
                width,
                height,
                x,
                y,
            });
        }
        Some(Placement::new(stalls, grid))
    }
}

impl SaProblem for CoordinateProblem<'_> {
    fn dimensions(&self) -> usize {
        self.requests.len() * 2
    }

    fn bounds(&self, dimension: usize) -> (f64, f64) {
        let (width, height) = self.footprints[dimension / 2];
        let limit = if dimension % 2 == 0 {
            self.site.width().saturating_sub(width)
        } else {
            self.site.height().saturating_sub(height)
        };
        (0.0, limit as f64)
    }

    fn evaluate(&self, point: &[f64]) -> f64 {
        match self.decode(point) {
            Some(placement) => self.evaluator.evaluate(&placement).total,
            None => self.evaluator.config().invalid_penalty,
        }
    }

    fn neighbor<R: Rng>(&self, point: &[f64], step: f64, rng: &mut R) -> Vec<f64> {
        let mut next = point.to_vec();
        if next.is_empty() {
            return next;
        }
        let dim = rng.gen_range(0..next.len());
        let (lo, hi) = self.bounds(dim);
        // Never shrink below one cell or the chain freezes once cold.
        let span = ((hi - lo) * step).max(1.0);
        next[dim] = (next[dim] + rng.gen_range(-span..=span)).clamp(lo, hi);
        next
    }

    fn on_temperature_change(&self, temperature: f64, iteration: u64, best_value: f64) {
        log::debug!(
            "Layout annealing iteration {}: temp={:.4}, best={:.4}",
            iteration,
            temperature,
            best_value
        );
    }
}

/// Runs one annealing trial and decodes the best point found.
///
/// Returns `None` when the annealer never left the invalid region.
pub fn run_annealing_trial<R: Rng>(
    runner: &SaRunner<CoordinateProblem<'_>>,
    rng: &mut R,
) -> Option<Placement> {
    let result = runner.run_with_rng(rng);
    runner.problem().decode(&result.best_point)
}
