//! Core mesh types for face orientation repair.
//!
//! This crate provides the data the orientation solver works on:
//!
//! - [`SubmeshMesh`] - Local-space vertices, faces grouped into submeshes,
//!   and a local-to-world [`Transform`]
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`TriangleId`] - Mesh-global triangle numbering shared with raycasters
//!
//! It also hosts the face geometry the solver relies on: world-space face
//! normals ([`SubmeshMesh::face_normal`]), probe points offset from a face
//! centroid ([`SubmeshMesh::probe_points`]) and winding flips
//! ([`flip_winding`]).
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Coordinate System
//!
//! Right-handed. Face winding is **counter-clockwise (CCW) when viewed from
//! outside**; normals point outward by the right-hand rule.
//!
//! # Example
//!
//! ```
//! use mesh_types::{unit_cube, Transform, Vector3};
//!
//! let cube = unit_cube().with_transform(Transform::translation(Vector3::new(0.0, 0.0, 5.0)));
//! let top = cube.face(2).unwrap();
//! let normal = cube.face_normal(top).unwrap();
//! assert!((normal.z - 1.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod mesh;
mod transform;
mod triangle;

pub use error::{MeshError, MeshResult};
pub use mesh::{SubmeshMesh, TriangleId, flip_winding, subdivided_box, unit_cube};
pub use transform::Transform;
pub use triangle::{DEGENERATE_EPSILON, Triangle};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
