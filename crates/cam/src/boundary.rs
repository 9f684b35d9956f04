//! Flat-`f32`-array functional boundary for callers that cannot hold onto
//! owned Rust values (e.g. a WASM host).
//!
//! This module is additive: it wraps [`crate::facade`] and the owned APIs
//! in `cam-core`/`cam-raster`/`cam-toolpath`, it does not replace them.
//! Because Rust ownership has no direct equivalent to a manually-freed
//! opaque handle, long-lived objects (height maps, sparse tools, toolpaths)
//! are kept in per-[`Boundary`]-instance slot tables and referenced by
//! integer [`Handle`]s; "freeing" one simply drops the Rust value from its
//! slot. A [`Boundary`] is not `Sync` and is not meant to be shared across
//! threads, matching the single-threaded contract of the rest of the crate.

use cam_core::{CamError, FaceFilter, Result, Triangle};
use cam_raster::MeshSampler;
use cam_toolpath::{generate, generate_partial, HeightMap, SparseTool, ToolPath};
use glam::Vec3;
use std::ops::Range;

/// An opaque reference to a value owned by a [`Boundary`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

#[derive(Default)]
struct Slots<T> {
    items: Vec<Option<T>>,
}

impl<T> Slots<T> {
    fn insert(&mut self, value: T) -> Handle {
        for (i, slot) in self.items.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(value);
                return Handle(i);
            }
        }
        self.items.push(Some(value));
        Handle(self.items.len() - 1)
    }

    fn get(&self, handle: Handle) -> Option<&T> {
        self.items.get(handle.0)?.as_ref()
    }

    fn remove(&mut self, handle: Handle) {
        if let Some(slot) = self.items.get_mut(handle.0) {
            *slot = None;
        }
    }
}

/// Decodes `filter` per the boundary's wire convention:
/// `0 = Upward, 1 = Downward, 2 = None`.
#[must_use]
pub fn decode_filter(filter: u8) -> FaceFilter {
    match filter {
        1 => FaceFilter::Downward,
        2 => FaceFilter::None,
        _ => FaceFilter::Upward,
    }
}

fn triangles_from_flat(buf: &[f32]) -> Result<Vec<Triangle>> {
    if buf.len() % 9 != 0 {
        return Err(CamError::MalformedTriangleBuffer(buf.len()));
    }
    Ok(buf
        .chunks_exact(9)
        .map(|c| {
            Triangle::new(
                Vec3::new(c[0], c[1], c[2]),
                Vec3::new(c[3], c[4], c[5]),
                Vec3::new(c[6], c[7], c[8]),
            )
        })
        .collect())
}

fn points_from_flat(buf: &[f32]) -> Result<Vec<Vec3>> {
    if buf.len() % 3 != 0 {
        return Err(CamError::SizeMismatch {
            expected: (buf.len() / 3) * 3,
            actual: buf.len(),
        });
    }
    Ok(buf.chunks_exact(3).map(|c| Vec3::new(c[0], c[1], c[2])).collect())
}

/// Owns the slot tables backing [`Handle`]s for one boundary session.
/// Construct one per independent pipeline run; it is not meant to be
/// shared across threads.
#[derive(Default)]
pub struct Boundary {
    sampler: MeshSampler,
    maps: Slots<HeightMap>,
    tools: Slots<SparseTool>,
    paths: Slots<ToolPath>,
}

impl Boundary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterises a flat `[x0,y0,z0, x1,y1,z1, ...]` triangle buffer into
    /// `out_points` (also flattened) and returns the number of points
    /// emitted. `out_points` is cleared first.
    ///
    /// # Errors
    /// [`CamError::MalformedTriangleBuffer`] if `triangles.len()` is not a
    /// multiple of 9.
    pub fn sample(
        &mut self,
        triangles: &[f32],
        step: f32,
        filter: u8,
        out_points: &mut Vec<f32>,
    ) -> Result<usize> {
        let tris = triangles_from_flat(triangles)?;
        let points = self.sampler.sample(&tris, step, decode_filter(filter));
        out_points.clear();
        out_points.extend(points.iter().flat_map(|p| [p.x, p.y, p.z]));
        Ok(points.len())
    }

    /// The bounds of the most recent `sample` call's input mesh, flattened
    /// as `[min.x, min.y, min.z, max.x, max.y, max.z]`. All zero if `sample`
    /// has not yet been called or the last mesh was empty.
    #[must_use]
    pub fn bounds(&self) -> [f32; 6] {
        match self.sampler.bounds() {
            Some(b) => [b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z],
            None => [0.0; 6],
        }
    }

    /// Drops the sampler's retained point cloud without clearing its bounds
    /// record.
    pub fn free_points(&mut self) {
        self.sampler.free_points();
    }

    /// Builds a terrain height map (absolute Z) from a flat `[x,y,z, ...]`
    /// point buffer and returns a handle to it.
    ///
    /// # Errors
    /// [`CamError::SizeMismatch`] if `points.len()` is not a multiple of 3,
    /// [`CamError::EmptyTerrain`] if the point buffer is empty.
    pub fn make_terrain(&mut self, points: &[f32], step: f32) -> Result<Handle> {
        let pts = points_from_flat(points)?;
        let map = HeightMap::build_terrain(&pts, step).ok_or(CamError::EmptyTerrain)?;
        Ok(self.maps.insert(map))
    }

    /// Builds a tool height map (Z relative to the tip) from a flat
    /// `[x,y,z, ...]` point buffer and returns a handle to it.
    ///
    /// # Errors
    /// [`CamError::SizeMismatch`] if `points.len()` is not a multiple of 3,
    /// [`CamError::EmptyTool`] if the point buffer is empty.
    pub fn make_tool(&mut self, points: &[f32], step: f32) -> Result<Handle> {
        let pts = points_from_flat(points)?;
        let map = HeightMap::build_tool(&pts, step).ok_or(CamError::EmptyTool)?;
        Ok(self.maps.insert(map))
    }

    /// `(width, height)` of a height map handle.
    ///
    /// # Errors
    /// [`CamError::SizeMismatch`] if `handle` does not refer to a live map
    /// (reused as a generic "invalid handle" signal at this boundary).
    pub fn map_dims(&self, handle: Handle) -> Result<(u32, u32)> {
        self.maps
            .get(handle)
            .map(HeightMap::dims)
            .ok_or(CamError::SizeMismatch { expected: 1, actual: 0 })
    }

    /// Drops the height map behind `handle`. A no-op if already freed.
    pub fn free_map(&mut self, handle: Handle) {
        self.maps.remove(handle);
    }

    /// Sparsifies the tool height map behind `handle` and returns a handle
    /// to the result.
    ///
    /// # Errors
    /// [`CamError::SizeMismatch`] if `handle` does not refer to a live map.
    pub fn make_sparse(&mut self, handle: Handle) -> Result<Handle> {
        let map = self
            .maps
            .get(handle)
            .ok_or(CamError::SizeMismatch { expected: 1, actual: 0 })?;
        let sparse = SparseTool::from_height_map(map);
        Ok(self.tools.insert(sparse))
    }

    /// Drops the sparse tool behind `handle`. A no-op if already freed.
    pub fn free_sparse(&mut self, handle: Handle) {
        self.tools.remove(handle);
    }

    /// Generates a full toolpath from a terrain map handle and a sparse
    /// tool handle.
    ///
    /// # Errors
    /// [`CamError::SizeMismatch`] if either handle does not refer to a live
    /// value, [`CamError::ZeroStride`] if either stride is zero.
    pub fn generate(
        &mut self,
        terrain: Handle,
        tool: Handle,
        x_step: u32,
        y_step: u32,
        oob_z: f32,
    ) -> Result<Handle> {
        self.generate_rows(terrain, tool, x_step, y_step, oob_z, None)
    }

    /// Like [`Boundary::generate`], but only for `rows` of the output.
    ///
    /// # Errors
    /// Same conditions as [`Boundary::generate`].
    pub fn generate_partial(
        &mut self,
        terrain: Handle,
        tool: Handle,
        x_step: u32,
        y_step: u32,
        oob_z: f32,
        rows: Range<u32>,
    ) -> Result<Handle> {
        self.generate_rows(terrain, tool, x_step, y_step, oob_z, Some(rows))
    }

    fn generate_rows(
        &mut self,
        terrain: Handle,
        tool: Handle,
        x_step: u32,
        y_step: u32,
        oob_z: f32,
        rows: Option<Range<u32>>,
    ) -> Result<Handle> {
        if x_step == 0 {
            return Err(CamError::ZeroStride(x_step));
        }
        if y_step == 0 {
            return Err(CamError::ZeroStride(y_step));
        }
        let terrain_map = self
            .maps
            .get(terrain)
            .ok_or(CamError::SizeMismatch { expected: 1, actual: 0 })?;
        let sparse_tool = self
            .tools
            .get(tool)
            .ok_or(CamError::SizeMismatch { expected: 1, actual: 0 })?;

        let path = match rows {
            Some(rows) => generate_partial(terrain_map, sparse_tool, x_step, y_step, oob_z, rows),
            None => generate(terrain_map, sparse_tool, x_step, y_step, oob_z),
        };
        Ok(self.paths.insert(path))
    }

    /// `(scanlines, points_per_line)` of a toolpath handle.
    ///
    /// # Errors
    /// [`CamError::SizeMismatch`] if `handle` does not refer to a live path.
    pub fn path_dims(&self, handle: Handle) -> Result<(u32, u32)> {
        self.paths
            .get(handle)
            .map(ToolPath::dims)
            .ok_or(CamError::SizeMismatch { expected: 1, actual: 0 })
    }

    /// Copies the toolpath behind `handle` into `out`, row-major.
    ///
    /// # Errors
    /// [`CamError::SizeMismatch`] if `handle` is not live, or if `out.len()`
    /// does not match `scanlines * points_per_line`.
    pub fn copy_path(&self, handle: Handle, out: &mut [f32]) -> Result<()> {
        let path = self
            .paths
            .get(handle)
            .ok_or(CamError::SizeMismatch { expected: 1, actual: 0 })?;
        if out.len() != path.as_slice().len() {
            return Err(CamError::SizeMismatch {
                expected: path.as_slice().len(),
                actual: out.len(),
            });
        }
        path.copy_into(out);
        Ok(())
    }

    /// Drops the toolpath behind `handle`. A no-op if already freed.
    pub fn free_path(&mut self, handle: Handle) {
        self.paths.remove(handle);
    }
}
