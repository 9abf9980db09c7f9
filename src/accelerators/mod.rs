//! Acceleration structures reduce the number of ray intersection
//! tests. Without them a ray would have to be tested against every
//! primitive in turn to find the closest intersection, which is what
//! an uncompiled mesh does.
//!
//! - BVHAccel

pub mod bvh;
