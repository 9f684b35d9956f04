//! Error types for the CNC toolpath pipeline.
//!
//! The numerical core is deliberately total for the failure modes its
//! specification enumerates (empty input, degenerate triangle, out-of-range
//! rounding, missing terrain cell, tool entirely off terrain) — those are
//! recovered locally and never surface as `Err`. `CamError` exists only for
//! precondition violations a caller can avoid by construction: non-positive
//! steps, empty tools where a non-empty one is required, and shape
//! mismatches at the flat-array boundary.

use thiserror::Error;

/// Errors raised by precondition checks in the CNC toolpath pipeline.
#[derive(Error, Debug, PartialEq)]
pub enum CamError {
    /// A lattice or stride step was zero or negative.
    #[error("step must be positive, got {0}")]
    NonPositiveStep(f32),

    /// A stride (in grid cells) was zero.
    #[error("x_step/y_step must be at least 1, got {0}")]
    ZeroStride(u32),

    /// The sparse tool has no samples, so it cannot meaningfully scan terrain.
    #[error("tool has no sampled cells")]
    EmptyTool,

    /// The terrain mesh rasterised to no samples, so it has no height map.
    #[error("terrain has no sampled cells")]
    EmptyTerrain,

    /// A caller-provided output buffer did not match the expected length.
    #[error("buffer size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A triangle array's length was not a multiple of 9 floats.
    #[error("triangle buffer length {0} is not a multiple of 9")]
    MalformedTriangleBuffer(usize),
}

/// A specialized `Result` for CNC toolpath pipeline operations.
pub type Result<T> = std::result::Result<T, CamError>;
