//! Error types for mesh storage.

use thiserror::Error;

/// Result type for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors raised when a mesh does not satisfy its structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// A face references a vertex that does not exist.
    #[error(
        "submesh {submesh} triangle {triangle} references vertex {index} (mesh has {vertex_count} vertices)"
    )]
    InvalidIndex {
        /// Submesh holding the face.
        submesh: usize,
        /// Triangle position within that submesh.
        triangle: usize,
        /// The offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A submesh index is out of range.
    #[error("submesh {submesh} does not exist (mesh has {submesh_count} submeshes)")]
    NoSuchSubmesh {
        /// Requested submesh.
        submesh: usize,
        /// Number of submeshes in the mesh.
        submesh_count: usize,
    },

    /// Replacement faces do not match the submesh they replace.
    #[error("submesh {submesh} has {expected} triangles, got {actual}")]
    TriangleCountMismatch {
        /// Target submesh.
        submesh: usize,
        /// Triangle count of the existing submesh.
        expected: usize,
        /// Triangle count supplied.
        actual: usize,
    },
}
