//! The intersection oracle seam.

use mesh_types::{Point3, TriangleId, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{OracleError, OracleResult};

/// Outcome of one probe ray.
///
/// # Example
///
/// ```
/// use mesh_raycast::ProbeHit;
///
/// // Hosts that signal "nothing found" with a zero distance
/// assert_eq!(ProbeHit::from_host(0.0, Some(3)), ProbeHit::Miss);
/// assert_eq!(ProbeHit::from_host(2.5, Some(3)).triangle(), Some(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProbeHit {
    /// The ray left the scene without touching the mesh.
    Miss,
    /// The ray struck `triangle` at `distance` along its direction.
    Hit {
        /// Distance from the ray origin (positive).
        distance: f64,
        /// Mesh-global id of the struck triangle.
        triangle: TriangleId,
    },
}

impl ProbeHit {
    /// Translate a host raycast result that encodes "no hit" as distance 0.
    ///
    /// Non-positive or non-finite distances and missing triangle ids are
    /// treated as misses.
    #[must_use]
    pub fn from_host(distance: f64, triangle: Option<TriangleId>) -> Self {
        match triangle {
            Some(triangle) if distance > 0.0 && distance.is_finite() => {
                Self::Hit { distance, triangle }
            }
            _ => Self::Miss,
        }
    }

    /// Whether the ray struck something.
    #[inline]
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    /// Id of the struck triangle.
    #[inline]
    #[must_use]
    pub const fn triangle(&self) -> Option<TriangleId> {
        match self {
            Self::Hit { triangle, .. } => Some(*triangle),
            Self::Miss => None,
        }
    }

    /// Hit distance, or `0.0` for a miss.
    #[inline]
    #[must_use]
    pub const fn distance(&self) -> f64 {
        match self {
            Self::Hit { distance, .. } => *distance,
            Self::Miss => 0.0,
        }
    }
}

/// A service that answers "what does this ray hit first?" in world space.
///
/// Orientation repair needs hits on back-facing geometry as well as
/// front-facing; oracles that cull back faces must say so through
/// [`hits_backfaces`](Self::hits_backfaces).
pub trait IntersectionOracle {
    /// Cast a ray from `origin` along `direction` and report the nearest hit.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] when the query cannot be answered.
    fn probe(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> OracleResult<ProbeHit>;

    /// Whether hits on back-facing triangles are reported.
    fn hits_backfaces(&self) -> bool {
        true
    }
}

impl<T: IntersectionOracle + ?Sized> IntersectionOracle for &T {
    fn probe(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> OracleResult<ProbeHit> {
        (**self).probe(origin, direction)
    }

    fn hits_backfaces(&self) -> bool {
        (**self).hits_backfaces()
    }
}

/// Reject rays no oracle can answer.
///
/// # Errors
///
/// Returns [`OracleError::InvalidRay`] for non-finite origins and zero or
/// non-finite directions.
pub fn check_ray(origin: &Point3<f64>, direction: &Vector3<f64>) -> OracleResult<()> {
    let finite = origin.coords.iter().chain(direction.iter()).all(|c| c.is_finite());
    if finite && direction.norm_squared() > 0.0 {
        Ok(())
    } else {
        Err(OracleError::InvalidRay {
            origin: [origin.x, origin.y, origin.z],
            direction: [direction.x, direction.y, direction.z],
        })
    }
}
