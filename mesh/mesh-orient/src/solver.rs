//! Iterative face orientation solver.

use mesh_raycast::{BvhOracle, IntersectionOracle, RaycastParams};
use mesh_types::SubmeshMesh;
use tracing::{debug, info, warn};

use crate::context::SolveContext;
use crate::error::{OrientError, OrientResult};
use crate::params::OrientParams;
use crate::report::OrientReport;

/// Makes every triangle of a closed mesh face outward.
///
/// Each pass probes every unresolved triangle with one ray off its front and
/// one off its back, then decides from what they hit whether the triangle
/// faces out, and resolves the struck neighbour along the way. Repeated
/// passes let this spread to triangles that were undecided earlier.
///
/// The mesh is only written once the whole call succeeds.
///
/// # Example
///
/// ```
/// use mesh_orient::FaceNormalSolver;
/// use mesh_raycast::{BvhOracle, RaycastParams};
/// use mesh_types::{flip_winding, unit_cube};
///
/// let mut cube = unit_cube();
/// let mut faces = cube.submesh(0).unwrap().to_vec();
/// flip_winding(&mut faces[5]);
/// cube.set_submesh(0, faces).unwrap();
///
/// let oracle = BvhOracle::build(&cube, RaycastParams::default());
/// let report = FaceNormalSolver::default()
///     .recalculate_normals(&mut cube, &oracle, 1)
///     .unwrap();
///
/// assert_eq!(report.flipped, vec![5]);
/// assert!(!cube.is_inside_out());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FaceNormalSolver {
    params: OrientParams,
}

impl FaceNormalSolver {
    /// Create a solver with the given parameters.
    #[must_use]
    pub const fn new(params: OrientParams) -> Self {
        Self { params }
    }

    /// Current parameters.
    #[must_use]
    pub const fn params(&self) -> &OrientParams {
        &self.params
    }

    /// Probe offset in world units.
    #[must_use]
    pub const fn precision(&self) -> f64 {
        self.params.precision.get()
    }

    /// Change the probe offset.
    ///
    /// Non-positive and non-finite values are ignored; returns whether the
    /// value was taken.
    pub fn set_precision(&mut self, precision: f64) -> bool {
        self.params.precision.set(precision)
    }

    /// Repair the winding of `mesh` in place using `iterations` passes.
    ///
    /// Triangles are visited submesh by submesh in declaration order, and in
    /// index order within a submesh. Per-vertex normals are rebuilt from the
    /// corrected winding before returning. A mesh without triangles is left
    /// alone.
    ///
    /// # Errors
    ///
    /// All checked before the mesh is touched:
    ///
    /// - [`OrientError::InvalidIterations`] if `iterations` is 0
    /// - [`OrientError::BackfacesDisabled`] if the oracle culls back faces
    /// - [`OrientError::InvalidMesh`] if a face references a missing vertex
    /// - [`OrientError::OracleUnavailable`] if a probe fails
    /// - [`OrientError::UnknownTriangle`] if the oracle reports an id the
    ///   mesh does not have
    pub fn recalculate_normals<O: IntersectionOracle + ?Sized>(
        &self,
        mesh: &mut SubmeshMesh,
        oracle: &O,
        iterations: usize,
    ) -> OrientResult<OrientReport> {
        let params = OrientParams {
            iterations,
            ..self.params
        };
        solve(mesh, oracle, &params)
    }

    /// Repair `mesh` with the solver's configured number of passes.
    ///
    /// # Errors
    ///
    /// See [`recalculate_normals`](Self::recalculate_normals).
    pub fn run<O: IntersectionOracle + ?Sized>(
        &self,
        mesh: &mut SubmeshMesh,
        oracle: &O,
    ) -> OrientResult<OrientReport> {
        solve(mesh, oracle, &self.params)
    }
}

/// Repair the winding of `mesh` with default settings.
///
/// # Errors
///
/// See [`FaceNormalSolver::recalculate_normals`].
pub fn recalculate_normals<O: IntersectionOracle + ?Sized>(
    mesh: &mut SubmeshMesh,
    oracle: &O,
    iterations: usize,
) -> OrientResult<OrientReport> {
    FaceNormalSolver::default().recalculate_normals(mesh, oracle, iterations)
}

/// Repair the winding of `mesh` against its own geometry.
///
/// Builds a [`BvhOracle`] over the mesh as it is placed by its transform, so
/// no external raycaster is needed.
///
/// # Errors
///
/// See [`FaceNormalSolver::recalculate_normals`].
///
/// # Example
///
/// ```
/// use mesh_orient::{fix_face_orientation, OrientParams};
/// use mesh_types::{flip_winding, unit_cube};
///
/// let mut cube = unit_cube();
/// let mut faces = cube.submesh(0).unwrap().to_vec();
/// faces.iter_mut().for_each(flip_winding);
/// cube.set_submesh(0, faces).unwrap();
/// assert!(cube.is_inside_out());
///
/// let report = fix_face_orientation(&mut cube, &OrientParams::default()).unwrap();
/// assert_eq!(report.flip_count(), 12);
/// assert!(!cube.is_inside_out());
/// ```
pub fn fix_face_orientation(
    mesh: &mut SubmeshMesh,
    params: &OrientParams,
) -> OrientResult<OrientReport> {
    params.validate()?;
    mesh.validate()?;
    let oracle = BvhOracle::build(mesh, RaycastParams::default());
    solve(mesh, &oracle, params)
}

fn solve<O: IntersectionOracle + ?Sized>(
    mesh: &mut SubmeshMesh,
    oracle: &O,
    params: &OrientParams,
) -> OrientResult<OrientReport> {
    params.validate()?;
    if !oracle.hits_backfaces() {
        return Err(OrientError::BackfacesDisabled);
    }
    mesh.validate()?;

    if mesh.is_empty() {
        debug!("Mesh has no triangles, nothing to orient");
        return Ok(OrientReport::empty());
    }

    info!(
        triangles = mesh.triangle_count(),
        submeshes = mesh.submesh_count(),
        iterations = params.iterations,
        precision = params.precision.get(),
        "Recalculating face orientation"
    );

    let (faces, report) = {
        let mut ctx = SolveContext::new(mesh, oracle, params.precision);
        let mut passes = 0;
        for pass in 0..params.iterations {
            let before = ctx.progress();
            ctx.pass()?;
            passes += 1;

            let (resolved, flipped) = ctx.progress();
            debug!(pass, resolved, flipped, "Finished pass");

            if params.stop_when_converged && (ctx.is_settled() || ctx.progress() == before) {
                debug!(passes, "Orientation converged");
                break;
            }
        }
        ctx.finish(passes)
    };

    for (index, faces) in faces.into_iter().enumerate() {
        mesh.set_submesh(index, faces)?;
    }
    mesh.recompute_normals();

    let unresolved = report.unresolved_count();
    if unresolved > 0 {
        warn!(
            unresolved,
            degenerate = report.degenerate,
            passes = report.passes,
            "Some triangles could not be oriented"
        );
    }
    info!(
        flipped = report.flip_count(),
        resolved = report.resolved_count(),
        unresolved,
        passes = report.passes,
        "Face orientation complete"
    );

    Ok(report)
}
