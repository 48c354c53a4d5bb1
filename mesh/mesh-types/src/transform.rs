//! Local-to-world placement of a mesh.

use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Affine local-to-world transform stored as a homogeneous 4x4 matrix.
///
/// Only points are mapped. Face normals are rebuilt from world-space corners,
/// which stays correct under non-uniform scale and mirroring.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, Transform, Vector3};
///
/// let t = Transform::translation(Vector3::new(1.0, 0.0, 0.0))
///     .then(&Transform::uniform_scale(2.0));
/// let p = t.transform_point(&Point3::origin());
/// assert!((p.x - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform {
    matrix: Matrix4<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// The identity placement: local space is world space.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Pure translation.
    #[must_use]
    pub fn translation(offset: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&offset),
        }
    }

    /// Uniform scale about the origin.
    #[must_use]
    pub fn uniform_scale(factor: f64) -> Self {
        Self {
            matrix: Matrix4::new_scaling(factor),
        }
    }

    /// Per-axis scale about the origin.
    #[must_use]
    pub fn scale(factors: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&factors),
        }
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// A zero axis yields the identity.
    #[must_use]
    pub fn rotation(axis: Vector3<f64>, angle: f64) -> Self {
        Unit::try_new(axis, f64::EPSILON).map_or_else(Self::identity, |axis| Self {
            matrix: Rotation3::from_axis_angle(&axis, angle).to_homogeneous(),
        })
    }

    /// Apply `self` first, then `other`.
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        Self {
            matrix: other.matrix * self.matrix,
        }
    }

    /// Map a local-space point to world space.
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(point)
    }
}
