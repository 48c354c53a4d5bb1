//! Parameters for the BVH raycaster.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters for [`BvhOracle`](crate::BvhOracle).
///
/// # Example
///
/// ```
/// use mesh_raycast::RaycastParams;
///
/// let params = RaycastParams::default().max_distance(50.0);
/// assert!(params.hit_backfaces);
/// assert!((params.max_distance - 50.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RaycastParams {
    /// Tolerance for the minimum accepted hit distance, and for parallel rays
    /// relative to the product of a triangle's edge lengths.
    pub epsilon: f64,

    /// Maximum ray distance to trace. Set to 0 for unlimited.
    pub max_distance: f64,

    /// Report hits on triangles facing away from the ray.
    pub hit_backfaces: bool,
}

impl Default for RaycastParams {
    fn default() -> Self {
        Self {
            epsilon: 1e-9,
            max_distance: 0.0,
            hit_backfaces: true,
        }
    }
}

impl RaycastParams {
    /// Set the intersection tolerance.
    #[must_use]
    pub const fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the maximum ray distance (0 = unlimited).
    #[must_use]
    pub const fn max_distance(mut self, distance: f64) -> Self {
        self.max_distance = distance;
        self
    }

    /// Enable or disable back-face hits.
    #[must_use]
    pub const fn hit_backfaces(mut self, enabled: bool) -> Self {
        self.hit_backfaces = enabled;
        self
    }

    /// Effective trace limit.
    pub(crate) fn distance_limit(&self) -> f64 {
        if self.max_distance > 0.0 {
            self.max_distance
        } else {
            f64::INFINITY
        }
    }
}
