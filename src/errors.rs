//! Shared error types used across submodules.

use thiserror::Error;

use crate::simulation::SimulationError;

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum EdsError {
    /// Wraps configuration errors raised before any stage runs.
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    /// Raised when exporting results fails.
    #[error("export failed: {0}")]
    Io(#[from] std::io::Error),
}
