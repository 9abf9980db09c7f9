//! Careful abstraction of geometric shapes is a key component of a
//! clean system design. All primitives implement a common interface,
//! and the hidden-line pass can use this interface without needing
//! any details about the underlying shape: it asks for bounds to build
//! its index, casts rays to decide visibility, and collects the paths
//! to plot.

// std
use std::fmt::Debug;
// lineart
use crate::core::geometry::{Bounds3f, Paths, Point3f, Ray};
use crate::core::lineart::{Float, INFINITY};

pub trait Shape: Debug + Send + Sync {
    fn bounding_box(&self) -> Bounds3f;
    /// Point membership, with every face pushed outwards by
    /// *tolerance*.
    fn contains(&self, p: &Point3f, tolerance: Float) -> bool;
    fn intersect(&self, ray: &Ray) -> Hit<'_>;
    fn paths(&self) -> Paths;
    /// Prepare acceleration data. Has to run before the first query;
    /// calling it again is a no-op.
    fn compile(&mut self);
}

/// Result of a ray query: the shape that was hit and the distance
/// along the ray. A miss has no shape and an infinite distance.
#[derive(Debug, Copy, Clone)]
pub struct Hit<'a> {
    pub shape: Option<&'a dyn Shape>,
    pub t: Float,
}

impl<'a> Hit<'a> {
    pub fn new(shape: &'a dyn Shape, t: Float) -> Self {
        Hit {
            shape: Some(shape),
            t,
        }
    }
    pub fn none() -> Self {
        Hit {
            shape: None,
            t: INFINITY,
        }
    }
    pub fn ok(&self) -> bool {
        self.shape.is_some() && self.t < INFINITY
    }
    /// The nearer of two hits.
    pub fn min(self, other: Hit<'a>) -> Hit<'a> {
        if self.t <= other.t {
            self
        } else {
            other
        }
    }
    /// The farther of two hits.
    pub fn max(self, other: Hit<'a>) -> Hit<'a> {
        if self.t > other.t {
            self
        } else {
            other
        }
    }
    /// Report the same distance on behalf of another shape, e.g. a
    /// solid answering for the triangle of its mesh that was hit.
    pub fn with_shape<'b>(self, shape: &'b dyn Shape) -> Hit<'b> {
        if self.ok() {
            Hit::new(shape, self.t)
        } else {
            Hit::none()
        }
    }
}

impl<'a> Default for Hit<'a> {
    fn default() -> Self {
        Hit::none()
    }
}
