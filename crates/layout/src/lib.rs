//! # Stallplan Layout
//!
//! Grid-based market stall layout generation for the Stallplan engine.
//!
//! This crate places stall catalogs onto site plans with multi-restart,
//! annealing, and cellular-growth strategies, and ranks the results by a
//! weighted multi-criteria score.

pub mod annealing;
pub mod catalog;
pub mod fitness;
pub mod grid;
pub mod optimizer;
pub mod placement;
pub mod restart;
pub mod seeding;
pub mod site;

// Re-exports
pub use annealing::CoordinateProblem;
pub use catalog::{Affinity, StallCatalog, StallCategory, StallRequest};
pub use fitness::{FitnessConfig, FitnessEvaluator, FitnessReport, FitnessWeights};
pub use grid::{Cell, GridOccupancy};
pub use optimizer::{LayoutOptimizer, RankedLayout};
pub use placement::{LayoutSnapshot, Placement, StallInstance, StallRecord};
pub use site::SitePlan;
pub use stallplan_core::{Error, OptimizerConfig, Result, SaConfig, Strategy};
