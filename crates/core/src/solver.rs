//! Optimizer strategy selection and configuration.

use crate::sa::SaConfig;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Layout search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Independent randomized packing runs (fast, robust).
    #[default]
    MultiRestart,
    /// Simulated annealing over continuous stall coordinates.
    Annealing,
    /// Field-guided incremental seeding (cellular growth).
    CellularGrowth,
}

/// Common configuration for layout optimization runs.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizerConfig {
    /// Search strategy.
    pub strategy: Strategy,

    /// Number of independent trials.
    pub trials: usize,

    /// Number of best layouts to retain.
    pub retain: usize,

    /// Base random seed; trial t derives its own stream from it.
    pub seed: u64,

    /// Random position attempts per stall before a trial is abandoned.
    pub placement_attempts: usize,

    /// Shuffle stall order at the start of each trial.
    pub shuffle_order: bool,

    /// Run trials on rayon workers.
    pub parallel: bool,

    /// Annealing parameters (used by `Strategy::Annealing`).
    pub sa: SaConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            trials: 30,
            retain: 5,
            seed: 0,
            placement_attempts: 1000,
            shuffle_order: true,
            parallel: false,
            sa: SaConfig::default(),
        }
    }
}

impl OptimizerConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the number of trials.
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials.max(1);
        self
    }

    /// Sets the number of retained layouts.
    pub fn with_retain(mut self, k: usize) -> Self {
        self.retain = k.max(1);
        self
    }

    /// Sets the base random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the per-stall placement attempt budget.
    pub fn with_placement_attempts(mut self, attempts: usize) -> Self {
        self.placement_attempts = attempts.max(1);
        self
    }

    /// Enables or disables stall order shuffling.
    pub fn with_shuffle_order(mut self, enabled: bool) -> Self {
        self.shuffle_order = enabled;
        self
    }

    /// Enables or disables parallel trial execution.
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the annealing parameters.
    pub fn with_sa(mut self, sa: SaConfig) -> Self {
        self.sa = sa;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(Error::InvalidConfiguration(
                "Trial count must be positive".into(),
            ));
        }
        if self.retain == 0 {
            return Err(Error::InvalidConfiguration(
                "Retained layout count must be positive".into(),
            ));
        }
        if self.placement_attempts == 0 {
            return Err(Error::InvalidConfiguration(
                "Placement attempt budget must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OptimizerConfig::default();
        assert_eq!(config.strategy, Strategy::MultiRestart);
        assert_eq!(config.trials, 30);
        assert_eq!(config.retain, 5);
        assert_eq!(config.placement_attempts, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders_clamp() {
        let config = OptimizerConfig::new()
            .with_trials(0)
            .with_retain(0)
            .with_placement_attempts(0);

        assert_eq!(config.trials, 1);
        assert_eq!(config.retain, 1);
        assert_eq!(config.placement_attempts, 1);
    }

    #[test]
    fn test_validate_rejects_zero_budgets() {
        let mut config = OptimizerConfig::default();
        config.trials = 0;
        assert!(config.validate().is_err());

        let mut config = OptimizerConfig::default();
        config.retain = 0;
        assert!(config.validate().is_err());

        let mut config = OptimizerConfig::default();
        config.placement_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_strategy_selection() {
        let config = OptimizerConfig::new().with_strategy(Strategy::Annealing);
        assert_eq!(config.strategy, Strategy::Annealing);
    }
}
