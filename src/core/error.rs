//! Construction errors. Queries on a constructed shape never fail.

use thiserror::Error;

use crate::core::geometry::XYZEnum;
use crate::core::lineart::Float;

/// Input contract violations reported by shape constructors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    /// A stripe jitter fraction is not a finite value in [0, 1].
    #[error("jitter fraction along {axis:?} must lie in [0, 1], got {value}")]
    InvalidJitter { axis: XYZEnum, value: Float },

    /// A size parameter is negative or not finite.
    #[error("dimension `{name}` must be finite and non-negative, got {value}")]
    InvalidDimension { name: &'static str, value: Float },

    /// A mesh needs at least one triangle.
    #[error("mesh has no triangles")]
    EmptyMesh,
}
