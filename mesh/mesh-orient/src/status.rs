//! Per-triangle orientation status.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether a triangle's winding has been confirmed outward-facing.
///
/// Every triangle starts a solver call [`Unresolved`](Self::Unresolved).
/// Once resolved it never goes back within the same call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TriangleStatus {
    /// Orientation not known yet.
    #[default]
    Unresolved,
    /// Current winding confirmed outward.
    Resolved,
}

impl TriangleStatus {
    /// Whether the triangle is resolved.
    #[inline]
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved)
    }
}
