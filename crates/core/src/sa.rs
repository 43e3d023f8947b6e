//! Simulated Annealing over bounded continuous variables.
//!
//! Candidate solutions are points in a box-bounded real vector space; the
//! objective is minimized. Problems supply dimensions, per-variable bounds,
//! and the objective; the runner drives the temperature schedule and the
//! Metropolis acceptance rule. Neighbor generation perturbs one coordinate
//! at a time, with a step that shrinks as the temperature falls.

use rand::prelude::*;
use rayon::prelude::*;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cooling schedule types for Simulated Annealing.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CoolingSchedule {
    /// Geometric cooling: T_new = T * alpha (alpha typically 0.9-0.99).
    #[default]
    Geometric,
    /// Linear cooling: T_new = T - delta.
    Linear,
    /// Lundy-Mees: T_new = T / (1 + beta * T).
    LundyMees,
}

/// Configuration for Simulated Annealing.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaConfig {
    /// Initial temperature.
    pub initial_temp: f64,
    /// Final (minimum) temperature.
    pub final_temp: f64,
    /// Cooling rate (alpha for Geometric, delta for Linear, beta for LundyMees).
    pub cooling_rate: f64,
    /// Number of candidate moves at each temperature level.
    pub iterations_per_temp: usize,
    /// Maximum total iterations (None = temperature-based stopping only).
    pub max_iterations: Option<u64>,
    /// Cooling schedule type.
    pub cooling_schedule: CoolingSchedule,
    /// Fraction of a variable's range used as the move span at full temperature.
    pub step_scale: f64,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temp: 1000.0,
            final_temp: 0.001,
            cooling_rate: 0.95,
            iterations_per_temp: 100,
            max_iterations: Some(100_000),
            cooling_schedule: CoolingSchedule::Geometric,
            step_scale: 0.3,
        }
    }
}

impl SaConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial temperature.
    pub fn with_initial_temp(mut self, temp: f64) -> Self {
        self.initial_temp = temp.max(0.001);
        self
    }

    /// Sets the final temperature.
    pub fn with_final_temp(mut self, temp: f64) -> Self {
        self.final_temp = temp.max(0.0001);
        self
    }

    /// Sets the cooling rate.
    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate.clamp(0.001, 0.9999);
        self
    }

    /// Sets the iterations per temperature level.
    pub fn with_iterations_per_temp(mut self, iterations: usize) -> Self {
        self.iterations_per_temp = iterations.max(1);
        self
    }

    /// Sets the maximum iterations.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Sets the cooling schedule.
    pub fn with_cooling_schedule(mut self, schedule: CoolingSchedule) -> Self {
        self.cooling_schedule = schedule;
        self
    }

    /// Sets the move span fraction.
    pub fn with_step_scale(mut self, scale: f64) -> Self {
        self.step_scale = scale.clamp(0.01, 1.0);
        self
    }
}

/// Trait for problems optimized by Simulated Annealing.
///
/// Lower objective values are better.
pub trait SaProblem: Send + Sync {
    /// Number of decision variables.
    fn dimensions(&self) -> usize;

    /// Inclusive lower and upper bound of one variable.
    fn bounds(&self, dim: usize) -> (f64, f64);

    /// Objective value of a candidate point.
    fn evaluate(&self, point: &[f64]) -> f64;

    /// Creates an initial point drawn uniformly within bounds.
    fn initial_point<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        (0..self.dimensions())
            .map(|dim| {
                let (lo, hi) = self.bounds(dim);
                rng.gen_range(lo..=hi)
            })
            .collect()
    }

    /// Generates a neighbor by perturbing one coordinate, clamped to bounds.
    ///
    /// `step` is the current move span as a fraction of the variable's range
    /// (cooling shrinks it toward zero).
    fn neighbor<R: Rng>(&self, point: &[f64], step: f64, rng: &mut R) -> Vec<f64> {
        let mut next = point.to_vec();
        if next.is_empty() {
            return next;
        }
        let dim = rng.gen_range(0..next.len());
        let (lo, hi) = self.bounds(dim);
        let span = (hi - lo) * step;
        let delta = rng.gen_range(-span..=span);
        next[dim] = (next[dim] + delta).clamp(lo, hi);
        next
    }

    /// Called after each temperature level (for progress reporting).
    fn on_temperature_change(&self, _temperature: f64, _iteration: u64, _best_value: f64) {}
}

/// Result of a SA run.
#[derive(Debug, Clone)]
pub struct SaResult {
    /// The best point found.
    pub best_point: Vec<f64>,
    /// Objective value of the best point.
    pub best_value: f64,
    /// Final temperature reached.
    pub final_temperature: f64,
    /// Total iterations performed.
    pub iterations: u64,
    /// Total elapsed time.
    pub elapsed: Duration,
    /// Best objective value sampled at each temperature change.
    pub history: Vec<f64>,
}

/// Simulated Annealing runner.
pub struct SaRunner<P: SaProblem> {
    config: SaConfig,
    problem: P,
}

impl<P: SaProblem> SaRunner<P> {
    /// Creates a new SA runner.
    pub fn new(config: SaConfig, problem: P) -> Self {
        Self { config, problem }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SaConfig {
        &self.config
    }

    /// Returns the problem.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Runs the algorithm with a thread-local RNG.
    pub fn run(&self) -> SaResult {
        self.run_with_rng(&mut thread_rng())
    }

    /// Runs the algorithm with a specific RNG.
    ///
    /// Deterministic for a given RNG state.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> SaResult {
        let start = Instant::now();
        let mut history = Vec::new();

        let mut current_point = self.problem.initial_point(rng);
        let mut current_value = self.problem.evaluate(&current_point);
        let mut best_point = current_point.clone();
        let mut best_value = current_value;

        let mut temperature = self.config.initial_temp;
        let mut iteration = 0u64;

        let temp_delta = if matches!(self.config.cooling_schedule, CoolingSchedule::Linear) {
            (self.config.initial_temp - self.config.final_temp)
                / (self.config.max_iterations.unwrap_or(10_000) as f64
                    / self.config.iterations_per_temp as f64)
        } else {
            0.0
        };

        while temperature > self.config.final_temp {
            if let Some(max) = self.config.max_iterations {
                if iteration >= max {
                    break;
                }
            }

            for _ in 0..self.config.iterations_per_temp {
                iteration += 1;

                let step = self.config.step_scale * (temperature / self.config.initial_temp).min(1.0);
                let candidate = self.problem.neighbor(&current_point, step, rng);
                let candidate_value = self.problem.evaluate(&candidate);
                let delta = candidate_value - current_value;

                // Accept improvements always, regressions with probability exp(-delta/T).
                let accept = delta <= 0.0 || rng.gen::<f64>() < (-delta / temperature).exp();

                if accept {
                    current_point = candidate;
                    current_value = candidate_value;

                    if current_value < best_value {
                        best_point = current_point.clone();
                        best_value = current_value;
                    }
                }

                if let Some(max) = self.config.max_iterations {
                    if iteration >= max {
                        break;
                    }
                }
            }

            history.push(best_value);
            self.problem
                .on_temperature_change(temperature, iteration, best_value);

            temperature = self.cool_down(temperature, temp_delta);
        }

        history.push(best_value);

        SaResult {
            best_point,
            best_value,
            final_temperature: temperature,
            iterations: iteration,
            elapsed: start.elapsed(),
            history,
        }
    }

    /// Apply cooling schedule.
    fn cool_down(&self, current_temp: f64, delta: f64) -> f64 {
        match self.config.cooling_schedule {
            CoolingSchedule::Geometric => current_temp * self.config.cooling_rate,
            CoolingSchedule::Linear => (current_temp - delta).max(self.config.final_temp),
            CoolingSchedule::LundyMees => {
                current_temp / (1.0 + self.config.cooling_rate * current_temp)
            }
        }
    }

    /// Runs multiple independent SA instances in parallel and returns the
    /// best result.
    ///
    /// Each restart derives its own RNG stream from `seed`, so the outcome
    /// does not depend on thread scheduling. Ties on the best value keep the
    /// lowest restart index.
    pub fn run_parallel(&self, num_restarts: usize, seed: u64) -> SaResult {
        let num_restarts = num_restarts.max(1);

        let results: Vec<SaResult> = (0..num_restarts)
            .into_par_iter()
            .map(|restart| {
                let mut rng = StdRng::seed_from_u64(
                    seed ^ (restart as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15),
                );
                self.run_with_rng(&mut rng)
            })
            .collect();

        results
            .into_iter()
            .min_by(|a, b| {
                a.best_value
                    .partial_cmp(&b.best_value)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or_else(|| SaResult {
                best_point: Vec::new(),
                best_value: f64::INFINITY,
                final_temperature: 0.0,
                iterations: 0,
                elapsed: Duration::ZERO,
                history: Vec::new(),
            })
    }
}
