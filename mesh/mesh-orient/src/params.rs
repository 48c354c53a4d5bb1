//! Parameters for orientation repair.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{OrientError, OrientResult};

/// Distance probe rays start off the surface, in world units.
///
/// A ray fired from a face's own centroid would strike that face, so probes
/// start slightly in front of and behind it. Always positive and finite:
/// [`set`](Self::set) ignores anything else.
///
/// # Example
///
/// ```
/// use mesh_orient::Precision;
///
/// let mut precision = Precision::default();
/// assert!((precision.get() - 1e-5).abs() < f64::EPSILON);
///
/// assert!(!precision.set(-1.0));
/// assert!((precision.get() - 1e-5).abs() < f64::EPSILON);
///
/// assert!(precision.set(1e-3));
/// assert!((precision.get() - 1e-3).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct Precision(f64);

impl Precision {
    /// Default probe offset.
    pub const DEFAULT: f64 = 1e-5;

    /// Wrap `value` if it is positive and finite.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        (value > 0.0 && value.is_finite()).then_some(Self(value))
    }

    /// Current value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Replace the value, unless `value` is non-positive or non-finite.
    ///
    /// Returns whether the new value was accepted.
    pub fn set(&mut self, value: f64) -> bool {
        match Self::new(value) {
            Some(p) => {
                *self = p;
                true
            }
            None => false,
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<f64> for Precision {
    type Error = OrientError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(OrientError::InvalidPrecision(value))
    }
}

impl From<Precision> for f64 {
    fn from(p: Precision) -> Self {
        p.0
    }
}

/// Configuration for [`FaceNormalSolver`](crate::FaceNormalSolver).
///
/// # Example
///
/// ```
/// use mesh_orient::OrientParams;
///
/// let params = OrientParams::default();
/// assert_eq!(params.iterations, 1);
/// assert!(params.stop_when_converged);
///
/// let params = OrientParams::default()
///     .with_iterations(3)
///     .with_precision(1e-4);
/// assert_eq!(params.iterations, 3);
/// assert!((params.precision.get() - 1e-4).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientParams {
    /// Probe offset off each face.
    pub precision: Precision,

    /// Number of passes over the mesh. Must be at least 1.
    ///
    /// Later passes let orientation spread to triangles whose neighbours were
    /// still unresolved when they were first visited.
    pub iterations: usize,

    /// Stop before `iterations` once a pass changes nothing or every
    /// non-degenerate triangle is resolved.
    ///
    /// Passes are deterministic, so a pass that changes nothing would repeat
    /// identically; stopping early never changes the result.
    pub stop_when_converged: bool,
}

impl Default for OrientParams {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            iterations: 1,
            stop_when_converged: true,
        }
    }
}

impl OrientParams {
    /// Several passes, for meshes with concave regions or thin walls where
    /// many triangles need a resolved neighbour first.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            iterations: 4,
            ..Self::default()
        }
    }

    /// Set the probe offset. Non-positive or non-finite values are ignored.
    #[must_use]
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision.set(precision);
        self
    }

    /// Set the number of passes.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Enable or disable early stopping.
    #[must_use]
    pub const fn stop_when_converged(mut self, enabled: bool) -> Self {
        self.stop_when_converged = enabled;
        self
    }

    /// Check the parameters before any work starts.
    ///
    /// # Errors
    ///
    /// Returns [`OrientError::InvalidIterations`] when `iterations` is 0.
    pub const fn validate(&self) -> OrientResult<()> {
        if self.iterations == 0 {
            return Err(OrientError::InvalidIterations(self.iterations));
        }
        Ok(())
    }
}
