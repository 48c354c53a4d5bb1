//! Error types for intersection queries.

use thiserror::Error;

/// Result type alias for oracle queries.
pub type OracleResult<T> = Result<T, OracleError>;

/// Errors an intersection oracle can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleError {
    /// The oracle could not answer the query at all.
    #[error("intersection oracle unavailable: {0}")]
    Unavailable(String),

    /// The ray has a non-finite origin or a zero/non-finite direction.
    #[error("invalid probe ray: origin {origin:?}, direction {direction:?}")]
    InvalidRay {
        /// Ray origin.
        origin: [f64; 3],
        /// Ray direction.
        direction: [f64; 3],
    },
}

impl OracleError {
    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(details: impl Into<String>) -> Self {
        Self::Unavailable(details.into())
    }
}
