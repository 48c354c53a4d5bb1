//! Raycast-driven face orientation repair.
//!
//! Imported and generated meshes often mix triangles wound one way with
//! triangles wound the other, so some face normals point into the solid.
//! This crate decides, for every triangle of a closed mesh, which side is
//! outside by looking at what rays fired off its two sides strike, and
//! reverses the winding of the ones that face in.
//!
//! # Algorithm
//!
//! For an unresolved triangle with normal `N`, one ray leaves a point just in
//! front of its centroid along `N` and one leaves a point just behind it
//! along `-N`:
//!
//! | Front ray | Back ray | Outcome |
//! |-----------|----------|---------|
//! | miss | hit | Faces out. The triangle behind is made to face `-N`. |
//! | hit | miss | Faces in: flipped. The triangle ahead is made to face `N`. |
//! | hit (resolved) | hit | Made to oppose the normal of the triangle ahead. |
//! | hit | hit (resolved) | Made to oppose the normal of the triangle behind. |
//! | otherwise | | Left for a later pass. |
//!
//! Passes repeat up to the configured number of iterations, so orientation
//! spreads inward from the triangles that see open space.
//!
//! # Quick Start
//!
//! ```
//! use mesh_orient::{fix_face_orientation, OrientParams};
//! use mesh_types::{flip_winding, unit_cube};
//!
//! let mut cube = unit_cube();
//! let mut faces = cube.submesh(0).unwrap().to_vec();
//! flip_winding(&mut faces[0]);
//! flip_winding(&mut faces[1]);
//! cube.set_submesh(0, faces).unwrap();
//!
//! let report = fix_face_orientation(&mut cube, &OrientParams::default()).unwrap();
//! assert_eq!(report.flipped, vec![0, 1]);
//! assert!(report.is_fully_resolved());
//! ```
//!
//! Bring your own raycaster by implementing
//! [`IntersectionOracle`](mesh_raycast::IntersectionOracle) and calling
//! [`FaceNormalSolver::recalculate_normals`] or [`recalculate_normals`].
//!
//! # Limitations
//!
//! - Meant for closed meshes. Open surfaces, isolated triangles and
//!   triangles whose rays both escape stay unresolved.
//! - No manifold or self-intersection checks; bad input may be left partly
//!   unresolved or flipped wrongly, but never panics.
//! - Orientation does not spread between submeshes.
//! - A resolution derived from a neighbour is not revisited if that
//!   neighbour is flipped later in the call.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod context;
mod error;
mod params;
mod report;
mod solver;
mod status;

pub use error::{OrientError, OrientResult};
pub use params::{OrientParams, Precision};
pub use report::{CaseCounts, OrientReport};
pub use solver::{FaceNormalSolver, fix_face_orientation, recalculate_normals};
pub use status::TriangleStatus;
