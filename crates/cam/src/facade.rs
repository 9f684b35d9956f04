//! Owned-Rust lifecycle API tying mesh rasterisation, height maps, and
//! toolpath synthesis into a single pipeline.
//!
//! This is the API idiomatic-Rust callers should reach for. `boundary`
//! builds a flat-array protocol on top of it for callers that can't hold
//! onto owned Rust values across a language boundary.

use cam_core::{CamError, FaceFilter, Result, Triangle};
use cam_raster::MeshSampler;
use cam_toolpath::{generate, generate_partial, HeightMap, SparseTool, ToolPath};
use std::ops::Range;

/// Rasterises a triangle soup into a terrain height map in one call:
/// sample → build_terrain.
///
/// `None` if the mesh is empty after filtering produces no samples.
#[must_use]
pub fn rasterize_terrain(triangles: &[Triangle], step: f32, filter: FaceFilter) -> Option<HeightMap> {
    let mut sampler = MeshSampler::new();
    let points = sampler.sample(triangles, step, filter);
    HeightMap::build_terrain(points, step)
}

/// Rasterises a triangle soup into a tool height map: sample → build_tool.
#[must_use]
pub fn rasterize_tool(triangles: &[Triangle], step: f32, filter: FaceFilter) -> Option<HeightMap> {
    let mut sampler = MeshSampler::new();
    let points = sampler.sample(triangles, step, filter);
    HeightMap::build_tool(points, step)
}

/// Runs the full pipeline: two triangle soups (terrain, tool) in, one
/// toolpath out.
///
/// # Errors
/// Returns [`CamError::NonPositiveStep`] if `step` is not positive,
/// [`CamError::ZeroStride`] if either stride is zero, or
/// [`CamError::EmptyTool`] if the tool mesh rasterises to no samples.
pub fn synthesize(
    terrain_triangles: &[Triangle],
    tool_triangles: &[Triangle],
    step: f32,
    x_step: u32,
    y_step: u32,
    oob_z: f32,
) -> Result<ToolPath> {
    if !(step > 0.0) {
        return Err(CamError::NonPositiveStep(step));
    }
    if x_step == 0 {
        return Err(CamError::ZeroStride(x_step));
    }
    if y_step == 0 {
        return Err(CamError::ZeroStride(y_step));
    }

    log::debug!(
        "synthesizing toolpath: {} terrain triangles, {} tool triangles, step {step}, stride {x_step}x{y_step}",
        terrain_triangles.len(),
        tool_triangles.len()
    );

    let terrain = rasterize_terrain(terrain_triangles, step, FaceFilter::Upward).ok_or(CamError::EmptyTerrain)?;
    let tool_map = rasterize_tool(tool_triangles, step, FaceFilter::Downward).ok_or(CamError::EmptyTool)?;
    let tool = SparseTool::from_height_map(&tool_map);
    if tool.is_empty() {
        return Err(CamError::EmptyTool);
    }

    Ok(generate(&terrain, &tool, x_step, y_step, oob_z))
}

/// Like [`synthesize`], but only for `rows` of the output — the entry
/// point for splitting work across parallel workers.
///
/// # Errors
/// Same conditions as [`synthesize`].
pub fn synthesize_partial(
    terrain_triangles: &[Triangle],
    tool_triangles: &[Triangle],
    step: f32,
    x_step: u32,
    y_step: u32,
    oob_z: f32,
    rows: Range<u32>,
) -> Result<ToolPath> {
    if !(step > 0.0) {
        return Err(CamError::NonPositiveStep(step));
    }
    if x_step == 0 {
        return Err(CamError::ZeroStride(x_step));
    }
    if y_step == 0 {
        return Err(CamError::ZeroStride(y_step));
    }

    let terrain = rasterize_terrain(terrain_triangles, step, FaceFilter::Upward).ok_or(CamError::EmptyTerrain)?;
    let tool_map = rasterize_tool(tool_triangles, step, FaceFilter::Downward).ok_or(CamError::EmptyTool)?;
    let tool = SparseTool::from_height_map(&tool_map);
    if tool.is_empty() {
        return Err(CamError::EmptyTool);
    }

    Ok(generate_partial(&terrain, &tool, x_step, y_step, oob_z, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn flat_plate(size: f32, z: f32) -> Vec<Triangle> {
        vec![
            Triangle::new(
                Vec3::new(0.0, 0.0, z),
                Vec3::new(size, 0.0, z),
                Vec3::new(size, size, z),
            ),
            Triangle::new(
                Vec3::new(0.0, 0.0, z),
                Vec3::new(size, size, z),
                Vec3::new(0.0, size, z),
            ),
        ]
    }

    fn downward_point_tool(z: f32) -> Vec<Triangle> {
        // A tiny downward-facing plate so it survives the tool's Downward filter.
        vec![
            Triangle::new(
                Vec3::new(-0.5, -0.5, z),
                Vec3::new(0.5, 0.5, z),
                Vec3::new(0.5, -0.5, z),
            ),
            Triangle::new(
                Vec3::new(-0.5, -0.5, z),
                Vec3::new(-0.5, 0.5, z),
                Vec3::new(0.5, 0.5, z),
            ),
        ]
    }

    #[test]
    fn synthesize_flat_plate_with_point_tool_is_flat() {
        let terrain = flat_plate(10.0, 0.0);
        let tool = downward_point_tool(0.0);
        let path = synthesize(&terrain, &tool, 1.0, 1, 1, -100.0).unwrap();
        assert!(path.as_slice().iter().all(|&z| (z - 0.0).abs() < 1e-3));
    }

    #[test]
    fn synthesize_rejects_non_positive_step() {
        let terrain = flat_plate(10.0, 0.0);
        let tool = downward_point_tool(0.0);
        let err = synthesize(&terrain, &tool, 0.0, 1, 1, -100.0).unwrap_err();
        assert_eq!(err, CamError::NonPositiveStep(0.0));
    }

    #[test]
    fn synthesize_rejects_zero_stride() {
        let terrain = flat_plate(10.0, 0.0);
        let tool = downward_point_tool(0.0);
        let err = synthesize(&terrain, &tool, 1.0, 0, 1, -100.0).unwrap_err();
        assert_eq!(err, CamError::ZeroStride(0));
    }

    #[test]
    fn synthesize_rejects_empty_tool_mesh() {
        let terrain = flat_plate(10.0, 0.0);
        let err = synthesize(&terrain, &[], 1.0, 1, 1, -100.0).unwrap_err();
        assert_eq!(err, CamError::EmptyTool);
    }

    #[test]
    fn synthesize_partial_matches_full_rows() {
        let terrain = flat_plate(10.0, 0.0);
        let tool = downward_point_tool(0.0);
        let full = synthesize(&terrain, &tool, 1.0, 1, 1, -100.0).unwrap();
        let (scanlines, _) = full.dims();
        let mid = scanlines / 2;

        let part = synthesize_partial(&terrain, &tool, 1.0, 1, 1, -100.0, 0..mid).unwrap();
        assert_eq!(part.as_slice(), &full.as_slice()[..part.as_slice().len()]);
    }
}
