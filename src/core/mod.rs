//! Geometry, numerics and the interfaces every shape implements.

pub mod error;
pub mod geometry;
pub mod lineart;
pub mod primitive;
pub mod rng;
pub mod shape;
