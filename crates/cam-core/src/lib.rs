//! Core geometry primitives and error types for the CNC toolpath pipeline.
//!
//! This crate provides the leaves of the dependency tree: bounding boxes,
//! precomputed triangle attributes, ray–triangle intersection, and the
//! face-orientation filter shared by the mesh sampler and triangle index
//! that sit above it.

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod geometry;

pub use error::{CamError, Result};
pub use geometry::{ray_triangle_intersect, BoundingBox, FaceFilter, Triangle, EPSILON};

// Re-export glam types for convenience.
pub use glam::Vec3;
