//! All shapes implement the common `Shape` interface, so the
//! hidden-line pass needs no details about the underlying geometry.
//!
//! - AxisBox
//! - StripedAxisBox
//! - Shard
//! - Triangle
//!
//! ## Boxes
//!
//! Axis-aligned boxes are intersected with the slab method. A ray
//! that starts inside a box reports the face where it leaves, so a
//! point on a visible edge does not hide itself.
//!
//! ## Striped Boxes
//!
//! A striped box draws short marks around the box at regular
//! intervals along each axis. The marks are jittered by a seeded
//! random number generator.
//!
//! ## Shards
//!
//! A shard is two pyramids glued together at their rectangular base.
//! It is drawn and intersected through its triangle mesh.
//!
//! ## Triangle Meshes
//!
//! Each triangle stores its three vertices. A mesh owns its triangles
//! and builds a bounding volume hierarchy over them when compiled.

pub mod cube;
pub mod shard;
pub mod stripedcube;
pub mod triangle;
