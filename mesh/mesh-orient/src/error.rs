//! Error types for orientation repair.

use mesh_raycast::OracleError;
use mesh_types::{MeshError, TriangleId};
use thiserror::Error;

/// Result type alias for orientation operations.
pub type OrientResult<T> = Result<T, OrientError>;

/// Errors that can occur while repairing face orientation.
///
/// Every variant is reported before the mesh is modified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrientError {
    /// At least one pass is required.
    #[error("iterations must be at least 1, got {0}")]
    InvalidIterations(usize),

    /// Precision must be positive and finite.
    #[error("precision must be positive and finite, got {0}")]
    InvalidPrecision(f64),

    /// The oracle culls back faces, which breaks the case analysis.
    #[error("intersection oracle must report back-face hits")]
    BackfacesDisabled,

    /// The mesh violates its structural invariants.
    #[error("invalid mesh: {0}")]
    InvalidMesh(#[from] MeshError),

    /// The oracle failed to answer a probe.
    #[error("intersection oracle unavailable: {0}")]
    OracleUnavailable(#[from] OracleError),

    /// The oracle reported a hit on a triangle the mesh does not have.
    #[error("oracle reported triangle {id}, but the mesh has {triangle_count} triangles")]
    UnknownTriangle {
        /// Reported triangle id.
        id: TriangleId,
        /// Number of triangles in the mesh.
        triangle_count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert!(OrientError::InvalidIterations(0).to_string().contains("got 0"));
        assert!(
            OrientError::BackfacesDisabled
                .to_string()
                .contains("back-face")
        );

        let err: OrientError = OracleError::unavailable("offline").into();
        assert!(matches!(err, OrientError::OracleUnavailable(_)));
        assert!(err.to_string().contains("offline"));

        let err = OrientError::UnknownTriangle {
            id: 40,
            triangle_count: 12,
        };
        assert!(err.to_string().contains("triangle 40"));
    }
}
