//! # Stallplan
//!
//! Market stall layout generation engine.
//!
//! This crate provides algorithms for:
//! - **Placement**: Grid-based stall arrangement honoring reserved site cells
//! - **Optimization**: Multi-trial search ranked by a weighted layout score
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stallplan::layout::{LayoutOptimizer, SitePlan, StallCatalog};
//! use stallplan::core::OptimizerConfig;
//!
//! // Describe the site and the stalls to place
//! let site = SitePlan::market_preset();
//! let catalog = StallCatalog::market_preset();
//!
//! // Run the trials and keep the best layouts
//! let optimizer = LayoutOptimizer::new(catalog, site, OptimizerConfig::default());
//! let ranked = optimizer.run()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialization support

/// Core optimization primitives.
pub use stallplan_core as core;

/// Layout generation and scoring.
pub use stallplan_layout as layout;

// Re-export commonly used types at root level
pub use stallplan_core::{Error, OptimizerConfig, Result, Strategy};
pub use stallplan_layout::{LayoutOptimizer, RankedLayout, SitePlan, StallCatalog};
