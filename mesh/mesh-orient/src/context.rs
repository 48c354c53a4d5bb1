//! Working state of one solver call.

use mesh_raycast::{IntersectionOracle, ProbeAdapter, ProbeHit};
use mesh_types::{SubmeshMesh, TriangleId, Vector3, flip_winding};
use tracing::{debug, trace};

use crate::error::{OrientError, OrientResult};
use crate::params::Precision;
use crate::report::{CaseCounts, OrientReport};
use crate::status::TriangleStatus;

/// Everything a call mutates, kept apart from the mesh until it succeeds.
///
/// Face buffers are copies of the mesh's submeshes; vertex positions and the
/// transform are read through the borrowed mesh. Triangle ids are
/// mesh-global throughout.
pub(crate) struct SolveContext<'a, O: ?Sized> {
    adapter: ProbeAdapter<'a, O>,
    faces: Vec<Vec<[u32; 3]>>,
    offsets: Vec<TriangleId>,
    status: Vec<TriangleStatus>,
    degenerate: Vec<bool>,
    resolved: usize,
    flipped: Vec<TriangleId>,
    cases: CaseCounts,
}

impl<'a, O: IntersectionOracle + ?Sized> SolveContext<'a, O> {
    pub(crate) fn new(mesh: &'a SubmeshMesh, oracle: &'a O, precision: Precision) -> Self {
        let faces: Vec<Vec<[u32; 3]>> = mesh.submeshes().map(<[_]>::to_vec).collect();
        let offsets = faces
            .iter()
            .scan(0, |next, sub| {
                let start = *next;
                *next += sub.len();
                Some(start)
            })
            .collect();
        let degenerate: Vec<bool> = mesh
            .faces()
            .map(|face| mesh.face_normal(face).is_none())
            .collect();

        let skipped = degenerate.iter().filter(|&&d| d).count();
        if skipped > 0 {
            debug!(count = skipped, "Skipping degenerate triangles");
        }

        Self {
            adapter: ProbeAdapter::new(mesh, oracle, precision.get()),
            faces,
            offsets,
            status: vec![TriangleStatus::Unresolved; degenerate.len()],
            degenerate,
            resolved: 0,
            flipped: Vec::new(),
            cases: CaseCounts::default(),
        }
    }

    /// `(resolved, flipped)` so far; a pass that leaves this unchanged
    /// changed nothing.
    pub(crate) fn progress(&self) -> (usize, usize) {
        (self.resolved, self.flipped.len())
    }

    /// Whether every triangle that can be resolved is.
    pub(crate) fn is_settled(&self) -> bool {
        self.status
            .iter()
            .zip(&self.degenerate)
            .all(|(s, &d)| d || s.is_resolved())
    }

    /// Visit every unresolved triangle once, submesh by submesh.
    pub(crate) fn pass(&mut self) -> OrientResult<()> {
        for submesh in 0..self.faces.len() {
            let start = self.offsets[submesh];
            for local in 0..self.faces[submesh].len() {
                let id = start + local;
                if self.status[id].is_resolved() || self.degenerate[id] {
                    continue;
                }
                self.visit(submesh, id)?;
            }
            debug!(
                submesh,
                triangles = self.faces[submesh].len(),
                resolved = self.resolved,
                "Finished submesh"
            );
        }
        Ok(())
    }

    /// Hand back the working faces and the call summary.
    pub(crate) fn finish(self, passes: usize) -> (Vec<Vec<[u32; 3]>>, OrientReport) {
        let degenerate = self.degenerate.iter().filter(|&&d| d).count();
        let report = OrientReport::new(passes, self.flipped, degenerate, self.cases, self.status);
        (self.faces, report)
    }

    fn triangle_count(&self) -> usize {
        self.status.len()
    }

    /// `(submesh, local index)` of an id known to be in range.
    fn locate(&self, id: TriangleId) -> (usize, usize) {
        // Empty submeshes share their offset with the next one, so take the
        // last submesh starting at or before `id`.
        let submesh = self
            .offsets
            .partition_point(|&start| start <= id)
            .saturating_sub(1);
        (submesh, id - self.offsets[submesh])
    }

    fn face(&self, id: TriangleId) -> [u32; 3] {
        let (submesh, local) = self.locate(id);
        self.faces[submesh][local]
    }

    /// Mark `id` resolved, reversing its winding first when `flip` is set.
    ///
    /// The only place status and winding change, so they cannot disagree.
    fn resolve(&mut self, id: TriangleId, flip: bool) {
        if flip {
            let (submesh, local) = self.locate(id);
            flip_winding(&mut self.faces[submesh][local]);
            self.flipped.push(id);
        }
        if !self.status[id].is_resolved() {
            self.status[id] = TriangleStatus::Resolved;
            self.resolved += 1;
        }
    }

    /// Resolve `target` so that the normal of `observed` agrees with
    /// `reference`, flipping `target` when it does not.
    ///
    /// Targets outside `submesh` or without a usable normal are left alone.
    fn propagate(
        &mut self,
        submesh: usize,
        reference: &Vector3<f64>,
        observed: TriangleId,
        target: TriangleId,
    ) {
        if self.degenerate[target] || self.degenerate[observed] {
            debug!(target, observed, "Not propagating through degenerate triangle");
            return;
        }
        let (target_submesh, _) = self.locate(target);
        if target_submesh != submesh {
            debug!(target, target_submesh, submesh, "Not propagating across submeshes");
            return;
        }
        let Some(normal) = self.adapter.face_normal(self.face(observed)) else {
            return;
        };
        self.resolve(target, reference.dot(&normal) <= 0.0);
    }

    fn hit_triangle(&self, hit: ProbeHit) -> OrientResult<Option<TriangleId>> {
        match hit.triangle() {
            Some(id) if id >= self.triangle_count() => Err(OrientError::UnknownTriangle {
                id,
                triangle_count: self.triangle_count(),
            }),
            other => Ok(other),
        }
    }

    /// Probe triangle `id` from both sides and act on what the rays hit.
    fn visit(&mut self, submesh: usize, id: TriangleId) -> OrientResult<()> {
        let Some(probe) = self.adapter.probe_face(self.face(id))? else {
            return Ok(());
        };
        let normal = probe.normal;
        let front = self.hit_triangle(probe.front)?;
        let back = self.hit_triangle(probe.back)?;

        match (front, back) {
            (None, Some(behind)) => {
                trace!(triangle = id, hit = behind, "Case A: back probe hit only");
                self.cases.a += 1;
                self.resolve(id, false);
                if behind != id {
                    self.propagate(submesh, &-normal, behind, behind);
                }
            }
            (Some(ahead), None) => {
                trace!(triangle = id, hit = ahead, "Case B: front probe hit only");
                self.cases.b += 1;
                self.resolve(id, true);
                if ahead != id {
                    // `normal` was taken before the flip: it points at `ahead`.
                    self.propagate(submesh, &normal, ahead, ahead);
                }
            }
            (Some(ahead), Some(_)) if self.status[ahead].is_resolved() => {
                trace!(triangle = id, neighbour = ahead, "Case C: front neighbour resolved");
                self.cases.c += 1;
                self.propagate(submesh, &-normal, ahead, id);
            }
            (Some(_), Some(behind)) if self.status[behind].is_resolved() => {
                trace!(triangle = id, neighbour = behind, "Case D: back neighbour resolved");
                self.cases.d += 1;
                self.propagate(submesh, &-normal, behind, id);
            }
            _ => {
                trace!(triangle = id, "Case E: undecided");
                self.cases.e += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_raycast::{BvhOracle, RaycastParams};
    use mesh_types::unit_cube;

    fn split_cube() -> SubmeshMesh {
        let cube = unit_cube();
        let faces = cube.submesh(0).unwrap().to_vec();
        SubmeshMesh::from_parts(
            cube.positions.clone(),
            vec![faces[..4].to_vec(), Vec::new(), faces[4..].to_vec()],
        )
    }

    #[test]
    fn locate_skips_empty_submeshes() {
        let mesh = split_cube();
        let oracle = BvhOracle::build(&mesh, RaycastParams::default());
        let ctx = SolveContext::new(&mesh, &oracle, Precision::default());
        assert_eq!(ctx.locate(0), (0, 0));
        assert_eq!(ctx.locate(3), (0, 3));
        assert_eq!(ctx.locate(4), (2, 0));
        assert_eq!(ctx.locate(11), (2, 7));
        assert_eq!(ctx.face(4), [0, 1, 5]);
    }

    #[test]
    fn resolve_flips_and_marks_together() {
        let mesh = unit_cube();
        let oracle = BvhOracle::build(&mesh, RaycastParams::default());
        let mut ctx = SolveContext::new(&mesh, &oracle, Precision::default());

        ctx.resolve(2, true);
        assert_eq!(ctx.face(2), [5, 4, 6]);
        assert!(ctx.status[2].is_resolved());
        assert_eq!(ctx.progress(), (1, 1));

        // Re-resolving counts the flip but not a second resolution.
        ctx.resolve(2, true);
        assert_eq!(ctx.face(2), [4, 5, 6]);
        assert_eq!(ctx.progress(), (1, 2));
    }

    #[test]
    fn propagate_checks_dot_product() {
        let mesh = unit_cube();
        let oracle = BvhOracle::build(&mesh, RaycastParams::default());
        let mut ctx = SolveContext::new(&mesh, &oracle, Precision::default());

        // Top side normal is +Z.
        ctx.propagate(0, &Vector3::z(), 2, 2);
        assert!(ctx.flipped.is_empty());
        assert!(ctx.status[2].is_resolved());

        ctx.propagate(0, &-Vector3::z(), 3, 3);
        assert_eq!(ctx.flipped, vec![3]);
        assert!(ctx.status[3].is_resolved());
    }

    #[test]
    fn propagate_stays_inside_submesh() {
        let mesh = split_cube();
        let oracle = BvhOracle::build(&mesh, RaycastParams::default());
        let mut ctx = SolveContext::new(&mesh, &oracle, Precision::default());

        ctx.propagate(0, &Vector3::z(), 5, 5);
        assert!(!ctx.status[5].is_resolved());
        assert_eq!(ctx.progress(), (0, 0));
    }

    #[test]
    fn unknown_hit_is_rejected() {
        let mesh = unit_cube();
        let oracle = BvhOracle::build(&mesh, RaycastParams::default());
        let ctx = SolveContext::new(&mesh, &oracle, Precision::default());

        let hit = ProbeHit::Hit {
            distance: 1.0,
            triangle: 12,
        };
        assert_eq!(
            ctx.hit_triangle(hit),
            Err(OrientError::UnknownTriangle {
                id: 12,
                triangle_count: 12,
            })
        );
        assert_eq!(ctx.hit_triangle(ProbeHit::Miss), Ok(None));
    }

    #[test]
    fn single_pass_settles_convex_cube() {
        let mesh = unit_cube();
        let oracle = BvhOracle::build(&mesh, RaycastParams::default());
        let mut ctx = SolveContext::new(&mesh, &oracle, Precision::default());

        ctx.pass().unwrap();
        assert!(ctx.is_settled());
        assert_eq!(ctx.progress(), (12, 0));
    }
}
