//! Face-level probing: two rays per triangle through an oracle.

use mesh_types::{Point3, SubmeshMesh, Vector3};

use crate::error::OracleResult;
use crate::oracle::{IntersectionOracle, ProbeHit};

/// Result of probing one face from both sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceProbe {
    /// World-space unit normal of the face at probing time.
    pub normal: Vector3<f64>,
    /// Hit of the ray leaving the front probe point along `+normal`.
    pub front: ProbeHit,
    /// Hit of the ray leaving the back probe point along `-normal`.
    pub back: ProbeHit,
}

/// Turns index triples of a mesh into world-space probe pairs.
///
/// Each face's centroid is pushed `precision` off the surface on either side
/// so neither ray starts on the face it was fired from.
///
/// # Example
///
/// ```
/// use mesh_raycast::{BvhOracle, ProbeAdapter, RaycastParams};
/// use mesh_types::unit_cube;
///
/// let cube = unit_cube();
/// let oracle = BvhOracle::build(&cube, RaycastParams::default());
/// let adapter = ProbeAdapter::new(&cube, &oracle, 1e-5);
///
/// let probe = adapter.probe_face(cube.face(2).unwrap()).unwrap().unwrap();
/// assert!(!probe.front.is_hit());
/// assert!(probe.back.is_hit());
/// ```
#[derive(Debug)]
pub struct ProbeAdapter<'a, O: ?Sized> {
    mesh: &'a SubmeshMesh,
    oracle: &'a O,
    precision: f64,
}

impl<'a, O: IntersectionOracle + ?Sized> ProbeAdapter<'a, O> {
    /// Create an adapter over `mesh` geometry.
    #[must_use]
    pub const fn new(mesh: &'a SubmeshMesh, oracle: &'a O, precision: f64) -> Self {
        Self {
            mesh,
            oracle,
            precision,
        }
    }

    /// World-space unit normal of `face` under the current winding.
    #[must_use]
    pub fn face_normal(&self, face: [u32; 3]) -> Option<Vector3<f64>> {
        self.mesh.face_normal(face)
    }

    /// Front and back probe points of `face`.
    #[must_use]
    pub fn probe_points(&self, face: [u32; 3]) -> Option<(Point3<f64>, Point3<f64>)> {
        let normal = self.face_normal(face)?;
        self.mesh.probe_points(face, &normal, self.precision)
    }

    /// Fire the front and back rays for `face`.
    ///
    /// Returns `Ok(None)` for a degenerate face, which has no direction to
    /// probe along.
    ///
    /// # Errors
    ///
    /// Propagates oracle failures.
    pub fn probe_face(&self, face: [u32; 3]) -> OracleResult<Option<FaceProbe>> {
        let Some(normal) = self.face_normal(face) else {
            return Ok(None);
        };
        let Some((front_point, back_point)) = self.mesh.probe_points(face, &normal, self.precision)
        else {
            return Ok(None);
        };
        let front = self.oracle.probe(&front_point, &normal)?;
        let back = self.oracle.probe(&back_point, &-normal)?;
        Ok(Some(FaceProbe {
            normal,
            front,
            back,
        }))
    }
}
