//! # Stallplan Core
//!
//! Core optimization primitives for the stallplan layout engine.
//!
//! This crate provides the strategy-agnostic building blocks shared by the
//! layout domain crate:
//!
//! - **Error types**: `Error` and the `Result` alias
//! - **SA framework**: simulated annealing over bounded continuous variables
//! - **Ranking**: bounded retention of the best-scoring candidates
//! - **Optimizer configuration**: strategy selection and trial budgets
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod error;
pub mod rank;
pub mod sa;
pub mod solver;

// Re-exports
pub use error::{Error, Result};
pub use rank::TopK;
pub use sa::{CoolingSchedule, SaConfig, SaProblem, SaResult, SaRunner};
pub use solver::{OptimizerConfig, Strategy};
