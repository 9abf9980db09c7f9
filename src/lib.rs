//! # rs_lineart
//!
//! Line-art primitives for a plotter-style renderer. Every shape
//! answers the same few questions through the [`Shape`] trait: its
//! bounding box, whether it contains a point, where a ray first hits
//! it, and which 3-D polylines draw it. A hidden-line pass casts rays
//! from points on those polylines towards the camera to decide what is
//! visible; that pass lives outside of this crate.
//!
//! The shapes are:
//!
//! 1. [AxisBox][cube], an axis-aligned box drawn by its twelve edges
//! 2. [StripedAxisBox][striped], the same box hatched with jittered
//!    marks at every stripe position
//! 3. [Shard][shard], a faceted bipyramid backed by a triangle mesh
//!
//! [`Shape`]: core/shape/trait.Shape.html
//! [cube]: shapes/cube/struct.AxisBox.html
//! [striped]: shapes/stripedcube/struct.StripedAxisBox.html
//! [shard]: shapes/shard/struct.Shard.html

#[macro_use]
extern crate impl_ops;

pub mod accelerators;
pub mod core;
pub mod shapes;
