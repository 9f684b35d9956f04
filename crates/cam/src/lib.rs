//! Toolpath synthesis for 3-axis CNC machining over triangle-mesh terrain.
//!
//! Turns a workpiece "terrain" mesh and a cutting "tool" mesh into a Z-height
//! raster: at each sampled XY position, the Z at which the tool's reference
//! point must sit so it touches but does not penetrate the terrain.
//!
//! ```text
//! triangles -> sampler -> point cloud -> height map ->
//!     (terrain map | sparse tool) -> synthesiser -> path grid
//! ```
//!
//! [`facade`] is the owned-Rust entry point; [`boundary`] is a flat-array
//! handle-based protocol for callers that cross a language boundary.

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

pub mod boundary;
pub mod facade;

pub use boundary::{Boundary, Handle};
pub use cam_core::{CamError, FaceFilter, Result, Triangle};
pub use cam_raster::MeshSampler;
pub use cam_toolpath::{ClearanceMode, HeightMap, SparseTool, TiledTerrain, ToolPath};
pub use facade::{rasterize_terrain, rasterize_tool, synthesize, synthesize_partial};
