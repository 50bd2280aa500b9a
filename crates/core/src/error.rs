//! # Council Errors
//!
//! Typed errors for fatal, non-retryable conditions. Transient generation
//! failures travel as `anyhow::Error` through the fail-hard paths instead.

use thiserror::Error;

/// Errors that indicate caller misuse rather than a transient failure.
#[derive(Debug, Error)]
pub enum CouncilError {
    /// The requested expert id is not in the roster.
    #[error("unknown expert id: {0}")]
    UnknownExpert(String),
}
