//! Triangle type for face geometry.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Squared cross-product length below which a triangle has no usable normal.
pub const DEGENERATE_EPSILON: f64 = 1e-24;

/// A triangle with resolved vertex positions.
///
/// Winding is **counter-clockwise (CCW) when viewed from the front**, so the
/// normal follows the right-hand rule over `v0 -> v1 -> v2`.
///
/// # Example
///
/// ```
/// use mesh_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// let normal = tri.normal().unwrap();
/// assert!((normal.z - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a triangle from three points.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Cross product of the two edges leaving `v0`.
    ///
    /// Its direction is the face normal for the current winding; its length is
    /// twice the triangle's area.
    #[inline]
    #[must_use]
    pub fn edge_cross(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Unit face normal, or `None` when the triangle has (near) zero area.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// // Collinear points have no normal
    /// let degen = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(2.0, 0.0, 0.0),
    /// );
    /// assert!(degen.normal().is_none());
    /// ```
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        unit_or_none(self.edge_cross())
    }

    /// Centroid (average of the three corners).
    #[inline]
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }
}

/// Normalize `v`, refusing vectors too short to carry a direction.
pub(crate) fn unit_or_none(v: Vector3<f64>) -> Option<Vector3<f64>> {
    let len_sq = v.norm_squared();
    if len_sq > DEGENERATE_EPSILON && len_sq.is_finite() {
        Some(v / len_sq.sqrt())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn right_triangle() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        )
    }

    #[test]
    fn normal_follows_ccw_winding() {
        let n = right_triangle().normal().unwrap();
        assert_relative_eq!(n, Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn swapping_two_corners_reverses_normal() {
        let tri = right_triangle();
        let swapped = Triangle::new(tri.v1, tri.v0, tri.v2);
        let n = tri.normal().unwrap();
        let m = swapped.normal().unwrap();
        assert_relative_eq!(n.dot(&m), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn centroid_is_corner_average() {
        let tri = right_triangle();
        assert_relative_eq!(tri.centroid(), Point3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn collinear_triangle_is_degenerate() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        );
        assert!(tri.normal().is_none());
    }

    #[test]
    fn repeated_vertex_is_degenerate() {
        let p = Point3::new(4.0, 5.0, 6.0);
        let tri = Triangle::new(p, p, Point3::new(0.0, 0.0, 0.0));
        assert!(tri.normal().is_none());
    }
}
