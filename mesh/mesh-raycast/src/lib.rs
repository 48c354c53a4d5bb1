//! Two-sided ray probes against triangle meshes.
//!
//! Orientation repair decides which way a triangle faces by firing one ray
//! off each side of it and looking at what those rays strike. This crate
//! provides the pieces for that:
//!
//! - [`IntersectionOracle`] - The seam to any raycasting service (a physics
//!   engine, a scripted test double, or the built-in BVH)
//! - [`ProbeHit`] - Explicit hit/miss result, with an adapter for hosts that
//!   report "no hit" as distance zero
//! - [`BvhOracle`] - Nearest-hit raycaster over a mesh in world space
//! - [`ProbeAdapter`] - Front/back probes for a face, offset by a precision
//!   distance to avoid self-hits
//!
//! # Algorithm
//!
//! [`BvhOracle`] splits world-space triangles at the median centroid along
//! the longest axis, then walks the tree nearest-box-first and tests leaves
//! with Möller–Trumbore. Back faces are reported unless
//! [`RaycastParams::hit_backfaces`] is turned off.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use mesh_raycast::{BvhOracle, IntersectionOracle, ProbeHit, RaycastParams};
//! use mesh_types::{unit_cube, Point3, Vector3};
//!
//! let cube = unit_cube();
//! let oracle = BvhOracle::build(&cube, RaycastParams::default());
//!
//! let hit = oracle.probe(&Point3::new(0.5, 0.5, 5.0), &Vector3::z()).unwrap();
//! assert_eq!(hit, ProbeHit::Miss);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod adapter;
mod bvh;
mod error;
mod oracle;
mod params;

pub use adapter::{FaceProbe, ProbeAdapter};
pub use bvh::BvhOracle;
pub use error::{OracleError, OracleResult};
pub use oracle::{IntersectionOracle, ProbeHit, check_ray};
pub use params::RaycastParams;
