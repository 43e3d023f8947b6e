//! Error types for stallplan.

use thiserror::Error;

/// Result type alias for stallplan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during layout generation.
#[derive(Debug, Error)]
pub enum Error {
    /// Catalog, site, or optimizer configuration is internally inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A stall could not be placed within its attempt budget.
    ///
    /// Recoverable: the optimizer abandons the layout attempt and retries
    /// from a fresh grid.
    #[error("No valid placement found for stall {stall} after {attempts} attempts")]
    PlacementFailed {
        /// Id of the stall that could not be placed.
        stall: usize,
        /// Number of positions tried before giving up.
        attempts: usize,
    },
}
