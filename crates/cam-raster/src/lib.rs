//! Mesh rasterisation for the CNC toolpath pipeline.
//!
//! This crate turns a triangle soup into an oriented point cloud: a
//! [`TriangleIndex`] accelerates per-ray lookup, and [`MeshSampler`] drives
//! the downward-Z raycasting loop that samples the mesh on a regular XY
//! lattice.

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

pub mod sampler;
pub mod triangle_index;

pub use sampler::MeshSampler;
pub use triangle_index::TriangleIndex;
