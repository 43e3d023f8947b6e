//! Trial orchestration: runs independent layout trials, scores them, and
//! retains the best few.
//!
//! Trials derive their own random streams from the base seed, so a run is
//! reproducible and the parallel and sequential paths return identical
//! results.

use crate::annealing::{run_annealing_trial, CoordinateProblem};
use crate::catalog::StallCatalog;
use crate::fitness::{FitnessConfig, FitnessEvaluator, FitnessReport};
use crate::placement::Placement;
use crate::restart::run_restart_trial;
use crate::seeding::run_seeding_trial;
use crate::site::SitePlan;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use stallplan_core::{Error, OptimizerConfig, Result, SaRunner, Strategy, TopK};

/// One retained layout with its score breakdown.
#[derive(Debug, Clone)]
pub struct RankedLayout {
    /// The placed stalls.
    pub placement: Placement,
    /// Component penalties and weighted total.
    pub report: FitnessReport,
}

/// Generates stall layouts for one catalog and site.
pub struct LayoutOptimizer {
    catalog: StallCatalog,
    site: SitePlan,
    config: OptimizerConfig,
    fitness: FitnessConfig,
}

impl LayoutOptimizer {
    /// Creates an optimizer with default scoring constants.
    pub fn new(catalog: StallCatalog, site: SitePlan, config: OptimizerConfig) -> Self {
        Self {
            catalog,
            site,
            config,
            fitness: FitnessConfig::default(),
        }
    }

    /// Overrides the scoring constants.
    pub fn with_fitness(mut self, fitness: FitnessConfig) -> Self {
        self.fitness = fitness;
        self
    }

    /// Returns the stall catalog.
    pub fn catalog(&self) -> &StallCatalog {
        &self.catalog
    }

    /// Returns the site plan.
    pub fn site(&self) -> &SitePlan {
        &self.site
    }

    /// Rejects structurally broken input before any trial runs.
    ///
    /// Geometric infeasibility (stalls that cannot fit) is not an error
    /// here; [`run`](Self::run) reports it as an empty result set and
    /// [`check_feasibility`](Self::check_feasibility) diagnoses it.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        self.catalog.validate()?;
        self.site.validate()?;

        let needs_drain = self
            .catalog
            .categories()
            .iter()
            .any(|c| c.count > 0 && c.drainage > 0);
        if needs_drain && self.site.drains().is_empty() {
            return Err(Error::InvalidConfiguration(
                "Catalog requires drainage but the site has no drain points".into(),
            ));
        }
        Ok(())
    }

    /// Optional preflight: explains obvious geometric dead ends.
    ///
    /// Catches footprints larger than the grid and catalogs whose minimum
    /// area exceeds the free cells. Passing this check does not guarantee a
    /// layout exists.
    pub fn check_feasibility(&self) -> Result<()> {
        let grid = self.site.build_grid();

        let mut needed = 0usize;
        for category in self.catalog.categories() {
            if category.count == 0 {
                continue;
            }
            let fits = category
                .footprints
                .iter()
                .any(|&(w, h)| w <= grid.width() && h <= grid.height());
            if !fits {
                return Err(Error::InvalidConfiguration(format!(
                    "No footprint of category '{}' fits the {}x{} grid",
                    category.name,
                    grid.width(),
                    grid.height()
                )));
            }
            let min_area = category
                .footprints
                .iter()
                .map(|&(w, h)| w * h)
                .min()
                .unwrap_or(0);
            needed += min_area * category.count;
        }

        let free = grid.free_count();
        if needed > free {
            return Err(Error::InvalidConfiguration(format!(
                "Stalls need at least {needed} free cells but the site has {free}"
            )));
        }
        Ok(())
    }

    /// Runs all trials and returns the retained layouts, best first.
    ///
    /// An empty vector means no trial produced a complete placement; that is
    /// the normal outcome for geometrically impossible requests, not an
    /// error.
    pub fn run(&self) -> Result<Vec<RankedLayout>> {
        self.validate()?;

        let evaluator = FitnessEvaluator::new(&self.catalog, &self.site, self.fitness.clone());

        let outcomes = match self.config.strategy {
            Strategy::MultiRestart => self.map_trials(|trial, rng| {
                let attempt = run_restart_trial(
                    &self.catalog,
                    &self.site,
                    self.config.placement_attempts,
                    self.config.shuffle_order,
                    rng,
                );
                match attempt {
                    Ok(placement) => Some(self.rank(&evaluator, trial, placement)),
                    Err(err) => {
                        log::debug!("Trial {trial} abandoned: {err}");
                        None
                    }
                }
            }),
            Strategy::Annealing => {
                let problem = CoordinateProblem::new(&self.catalog, &self.site, &evaluator);
                let runner = SaRunner::new(self.config.sa.clone(), problem);
                self.map_trials(|trial, rng| {
                    run_annealing_trial(&runner, rng)
                        .map(|placement| self.rank(&evaluator, trial, placement))
                })
            }
            Strategy::CellularGrowth => {
                // Seeding spends attempts across the whole trial, not per
                // stall, so scale the budget by the request count.
                let budget = self
                    .config
                    .placement_attempts
                    .saturating_mul(self.catalog.total_count().max(1));
                self.map_trials(|trial, rng| {
                    match run_seeding_trial(&self.catalog, &self.site, budget, rng) {
                        Ok(placement) => Some(self.rank(&evaluator, trial, placement)),
                        Err(err) => {
                            log::debug!("Trial {trial} abandoned: {err}");
                            None
                        }
                    }
                })
            }
        };

        let mut top = TopK::new(self.config.retain);
        for ranked in outcomes.into_iter().flatten() {
            top.push(ranked.report.total, ranked);
        }

        if top.is_empty() {
            log::warn!("No valid layout found in {} trials", self.config.trials);
        }

        Ok(top
            .into_sorted_vec()
            .into_iter()
            .map(|(_, ranked)| ranked)
            .collect())
    }

    /// Runs every trial through `run_trial`, in parallel when configured.
    ///
    /// Outcomes come back in trial order either way.
    fn map_trials<F>(&self, run_trial: F) -> Vec<Option<RankedLayout>>
    where
        F: Fn(usize, &mut StdRng) -> Option<RankedLayout> + Sync,
    {
        if self.config.parallel {
            (0..self.config.trials)
                .into_par_iter()
                .map(|trial| {
                    let mut rng = self.trial_rng(trial);
                    run_trial(trial, &mut rng)
                })
                .collect()
        } else {
            (0..self.config.trials)
                .map(|trial| {
                    let mut rng = self.trial_rng(trial);
                    run_trial(trial, &mut rng)
                })
                .collect()
        }
    }

    fn trial_rng(&self, trial: usize) -> StdRng {
        let stream = (trial as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        StdRng::seed_from_u64(self.config.seed ^ stream)
    }

    fn rank(
        &self,
        evaluator: &FitnessEvaluator<'_>,
        trial: usize,
        placement: Placement,
    ) -> RankedLayout {
        let report = evaluator.evaluate(&placement);
        log::debug!("Trial {}: score {:.4}", trial, report.total);
        RankedLayout { placement, report }
    }
}
