//! Summary of one orientation repair call.

use mesh_types::TriangleId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::status::TriangleStatus;

/// How often each classification case fired, summed over all passes.
///
/// - `a`: only the back probe hit; kept as is.
/// - `b`: only the front probe hit; flipped.
/// - `c`: both hit, front neighbour already resolved.
/// - `d`: both hit, back neighbour already resolved.
/// - `e`: nothing conclusive; left unresolved for the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaseCounts {
    /// Back hit only.
    pub a: usize,
    /// Front hit only.
    pub b: usize,
    /// Both hit, resolved via the front neighbour.
    pub c: usize,
    /// Both hit, resolved via the back neighbour.
    pub d: usize,
    /// Undecided.
    pub e: usize,
}

impl CaseCounts {
    /// Total number of classified visits.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.a + self.b + self.c + self.d + self.e
    }
}

/// Result of [`FaceNormalSolver::recalculate_normals`](crate::FaceNormalSolver::recalculate_normals).
///
/// # Example
///
/// ```
/// use mesh_orient::OrientReport;
///
/// let report = OrientReport::empty();
/// assert!(report.is_fully_resolved());
/// assert_eq!(report.flip_count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientReport {
    /// Number of triangles in the mesh.
    pub triangle_count: usize,
    /// Passes actually run (may be fewer than requested on convergence).
    pub passes: usize,
    /// Triangles whose winding was reversed, in flip order.
    ///
    /// A triangle flipped more than once appears more than once.
    pub flipped: Vec<TriangleId>,
    /// Triangles skipped for having no usable normal.
    pub degenerate: usize,
    /// Classification counters.
    pub cases: CaseCounts,
    statuses: Vec<TriangleStatus>,
}

impl OrientReport {
    /// Report for a mesh with nothing to do.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        passes: usize,
        flipped: Vec<TriangleId>,
        degenerate: usize,
        cases: CaseCounts,
        statuses: Vec<TriangleStatus>,
    ) -> Self {
        Self {
            triangle_count: statuses.len(),
            passes,
            flipped,
            degenerate,
            cases,
            statuses,
        }
    }

    /// Final status of every triangle, indexed by triangle id.
    #[must_use]
    pub fn statuses(&self) -> &[TriangleStatus] {
        &self.statuses
    }

    /// Final status of triangle `id`.
    #[must_use]
    pub fn status(&self, id: TriangleId) -> Option<TriangleStatus> {
        self.statuses.get(id).copied()
    }

    /// Number of flips applied.
    #[must_use]
    pub fn flip_count(&self) -> usize {
        self.flipped.len()
    }

    /// Number of resolved triangles.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.statuses.iter().filter(|s| s.is_resolved()).count()
    }

    /// Number of triangles left unresolved, degenerate ones included.
    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.triangle_count - self.resolved_count()
    }

    /// Ids of the triangles left unresolved.
    #[must_use]
    pub fn unresolved(&self) -> Vec<TriangleId> {
        self.statuses
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_resolved())
            .map(|(id, _)| id)
            .collect()
    }

    /// Whether every triangle ended up resolved.
    #[must_use]
    pub fn is_fully_resolved(&self) -> bool {
        self.unresolved_count() == 0
    }

    /// Whether the winding of `id` differs from its input winding.
    ///
    /// Two flips cancel out.
    #[must_use]
    pub fn winding_changed(&self, id: TriangleId) -> bool {
        self.flipped.iter().filter(|&&f| f == id).count() % 2 == 1
    }
}

impl std::fmt::Display for OrientReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Face Orientation Repair:")?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;
        writeln!(f, "  Passes: {}", self.passes)?;
        writeln!(f, "  Flipped: {}", self.flip_count())?;
        writeln!(f, "  Resolved: {}", self.resolved_count())?;
        writeln!(f, "  Unresolved: {}", self.unresolved_count())?;
        if self.degenerate > 0 {
            writeln!(f, "  Degenerate (skipped): {}", self.degenerate)?;
        }
        writeln!(
            f,
            "  Cases: A={} B={} C={} D={} E={}",
            self.cases.a, self.cases.b, self.cases.c, self.cases.d, self.cases.e
        )?;
        Ok(())
    }
}
