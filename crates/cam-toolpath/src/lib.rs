//! Height maps, sparse tool representation, and toolpath synthesis for the
//! CNC toolpath pipeline.

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

pub mod height_map;
pub mod sparse_tool;
pub mod toolpath;

pub use height_map::HeightMap;
pub use sparse_tool::SparseTool;
pub use toolpath::{generate, generate_dense, generate_partial, generate_tiled, generate_with_mode};
pub use toolpath::{ClearanceMode, TiledTerrain, ToolPath};
