//! Toolpath synthesis: scans the tool over the terrain at a configurable
//! stride and emits one Z per visited cell via a min-clearance computation.

use std::ops::Range;

use crate::height_map::HeightMap;
use crate::sparse_tool::SparseTool;

/// How an evaluator treats a tool point whose terrain cell is out of
/// bounds or empty (NaN).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearanceMode {
    /// Skip that tool point entirely — it does not constrain the tool.
    /// The default out-of-bounds policy.
    #[default]
    Skip,
    /// Treat the missing cell as if it read `oob_z`, folding it into the
    /// minimum like any other sample. Exposed as an explicit opt-in for
    /// callers who need "clearance guaranteed above unknown terrain"
    /// semantics rather than the default skip behaviour.
    TreatOobAsSentinel,
}

/// A dense `S x P` grid of synthesised Z heights, row-major (scanline,
/// point).
#[derive(Debug, Clone)]
pub struct ToolPath {
    scanlines: u32,
    points_per_line: u32,
    data: Vec<f32>,
}

impl ToolPath {
    #[must_use]
    pub fn dims(&self) -> (u32, u32) {
        (self.scanlines, self.points_per_line)
    }

    #[must_use]
    pub fn get(&self, scanline: u32, point: u32) -> f32 {
        self.data[scanline as usize * self.points_per_line as usize + point as usize]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Copies the path into a caller-provided row-major buffer of exactly
    /// `scanlines * points_per_line` floats.
    ///
    /// # Panics
    /// Panics if `out.len()` does not match. Callers crossing the flat-array
    /// boundary should use `cam::boundary::copy_path`, which validates the
    /// length and returns a `CamError` instead.
    pub fn copy_into(&self, out: &mut [f32]) {
        out.copy_from_slice(&self.data);
    }
}

fn dims_for(terrain_w: u32, terrain_h: u32, x_step: u32, y_step: u32) -> (u32, u32) {
    let points_per_line = terrain_w.div_ceil(x_step);
    let scanlines = terrain_h.div_ceil(y_step);
    (scanlines, points_per_line)
}

/// Per-sample min-clearance computation, shared by the sparse, dense, and
/// tiled evaluators: they differ only in how `read` looks up a terrain
/// cell.
fn clearance_at(
    origin_x: u32,
    origin_y: u32,
    terrain_w: u32,
    terrain_h: u32,
    tool: &SparseTool,
    read: impl Fn(u32, u32) -> Option<f32>,
    oob_z: f32,
    mode: ClearanceMode,
) -> f32 {
    let mut best = f32::INFINITY;

    for (dx, dy, dz) in tool.iter() {
        let tx = origin_x as i64 + dx as i64;
        let ty = origin_y as i64 + dy as i64;

        let in_bounds = tx >= 0 && ty >= 0 && (tx as u32) < terrain_w && (ty as u32) < terrain_h;
        let tz = if in_bounds {
            read(tx as u32, ty as u32)
        } else {
            None
        };

        let delta = match (tz, mode) {
            (Some(tz), _) => Some(dz - tz),
            (None, ClearanceMode::TreatOobAsSentinel) => Some(dz - oob_z),
            (None, ClearanceMode::Skip) => None,
        };

        if let Some(delta) = delta {
            if delta < best {
                best = delta;
            }
        }
    }

    if best.is_infinite() {
        oob_z
    } else {
        -best
    }
}

/// Generates the full toolpath, row-major. This is the production path —
/// it sparsifies the tool internally and scans it against `terrain`.
#[must_use]
pub fn generate(terrain: &HeightMap, tool: &SparseTool, x_step: u32, y_step: u32, oob_z: f32) -> ToolPath {
    let (w, h) = terrain.dims();
    let (scanlines, points_per_line) = dims_for(w, h, x_step, y_step);
    generate_rows(terrain, tool, x_step, y_step, oob_z, 0..scanlines, ClearanceMode::Skip)
}

/// Generates only scanlines `rows` of the toolpath. The sanctioned
/// extension point for parallelism: independent row ranges write disjoint
/// output and require no cross-worker synchronisation.
///
/// `generate(..)` is bitwise identical to the concatenation of
/// `generate_partial(.., 0..mid)` and `generate_partial(.., mid..end)` for
/// any `mid`.
#[must_use]
pub fn generate_partial(
    terrain: &HeightMap,
    tool: &SparseTool,
    x_step: u32,
    y_step: u32,
    oob_z: f32,
    rows: Range<u32>,
) -> ToolPath {
    generate_rows(terrain, tool, x_step, y_step, oob_z, rows, ClearanceMode::Skip)
}

/// Like [`generate`], but with an explicit [`ClearanceMode`] — the
/// opt-in hook for the alternate out-of-bounds policy.
#[must_use]
pub fn generate_with_mode(
    terrain: &HeightMap,
    tool: &SparseTool,
    x_step: u32,
    y_step: u32,
    oob_z: f32,
    mode: ClearanceMode,
) -> ToolPath {
    let (w, h) = terrain.dims();
    let (scanlines, points_per_line) = dims_for(w, h, x_step, y_step);
    generate_rows(terrain, tool, x_step, y_step, oob_z, 0..scanlines, mode)
}

fn generate_rows(
    terrain: &HeightMap,
    tool: &SparseTool,
    x_step: u32,
    y_step: u32,
    oob_z: f32,
    rows: Range<u32>,
    mode: ClearanceMode,
) -> ToolPath {
    let (w, h) = terrain.dims();
    let (total_scanlines, points_per_line) = dims_for(w, h, x_step, y_step);
    let rows = rows.start.min(total_scanlines)..rows.end.min(total_scanlines);

    log::debug!(
        "generating toolpath rows {:?} of {total_scanlines} ({} tool samples, stride {x_step}x{y_step})",
        rows,
        tool.len()
    );

    let mut data = Vec::with_capacity(rows.len() * points_per_line as usize);
    for s in rows.clone() {
        let y = s * y_step;
        for p in 0..points_per_line {
            let x = p * x_step;
            data.push(clearance_at(
                x,
                y,
                w,
                h,
                tool,
                |tx, ty| terrain.get(tx, ty),
                oob_z,
                mode,
            ));
        }
    }

    ToolPath {
        scanlines: rows.len() as u32,
        points_per_line,
        data,
    }
}

/// Reference oracle: walks the full dense tool footprint (not the sparse
/// list) against the terrain. Used only to validate the sparse evaluator
/// in tests — not a production path.
#[must_use]
pub fn generate_dense(terrain: &HeightMap, tool_map: &HeightMap, x_step: u32, y_step: u32, oob_z: f32) -> ToolPath {
    let sparse = SparseTool::from_height_map(tool_map);
    generate(terrain, &sparse, x_step, y_step, oob_z)
}

/// Terrain re-laid-out as contiguous `tile_size x tile_size` blocks instead
/// of a flat row-major array. Must read back identically to the source
/// [`HeightMap`]; exists to validate that a tiled memory layout (a
/// production locality concern, not a numerical one) doesn't change
/// results.
pub struct TiledTerrain {
    width: u32,
    height: u32,
    tile_size: u32,
    log2_tile: u32,
    tiles_per_row: u32,
    cells: Vec<f32>,
}

impl TiledTerrain {
    /// `tile_size` should be a power of two so tile/local indices reduce to
    /// shifts and masks; any positive value works, just without that
    /// shortcut.
    #[must_use]
    pub fn new(terrain: &HeightMap, tile_size: u32) -> Self {
        let (width, height) = terrain.dims();
        let log2_tile = if tile_size.is_power_of_two() {
            tile_size.trailing_zeros()
        } else {
            0
        };
        let tiles_per_row = width.div_ceil(tile_size);
        let tiles_per_col = height.div_ceil(tile_size);
        let mut cells = vec![f32::NAN; (tiles_per_row * tiles_per_col * tile_size * tile_size) as usize];

        for y in 0..height {
            for x in 0..width {
                let idx = Self::tiled_index(x, y, tile_size, log2_tile, tiles_per_row);
                cells[idx] = terrain.raw(x, y);
            }
        }

        Self {
            width,
            height,
            tile_size,
            log2_tile,
            tiles_per_row,
            cells,
        }
    }

    fn tiled_index(x: u32, y: u32, tile_size: u32, log2_tile: u32, tiles_per_row: u32) -> usize {
        let (tile_x, local_x) = if log2_tile > 0 {
            (x >> log2_tile, x & (tile_size - 1))
        } else {
            (x / tile_size, x % tile_size)
        };
        let (tile_y, local_y) = if log2_tile > 0 {
            (y >> log2_tile, y & (tile_size - 1))
        } else {
            (y / tile_size, y % tile_size)
        };
        let tile = (tile_y * tiles_per_row + tile_x) as usize;
        let local = (local_y * tile_size + local_x) as usize;
        tile * (tile_size * tile_size) as usize + local
    }

    fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = Self::tiled_index(x, y, self.tile_size, self.log2_tile, self.tiles_per_row);
        let z = self.cells[idx];
        if z.is_nan() {
            None
        } else {
            Some(z)
        }
    }
}

/// Generates a toolpath reading terrain through a tiled layout. Must equal
/// [`generate`] exactly (invariant tested in `tests`).
#[must_use]
pub fn generate_tiled(
    tiled: &TiledTerrain,
    tool: &SparseTool,
    x_step: u32,
    y_step: u32,
    oob_z: f32,
) -> ToolPath {
    let (w, h) = (tiled.width, tiled.height);
    let (scanlines, points_per_line) = dims_for(w, h, x_step, y_step);

    let mut data = Vec::with_capacity(scanlines as usize * points_per_line as usize);
    for s in 0..scanlines {
        let y = s * y_step;
        for p in 0..points_per_line {
            let x = p * x_step;
            data.push(clearance_at(
                x,
                y,
                w,
                h,
                tool,
                |tx, ty| tiled.get(tx, ty),
                oob_z,
                ClearanceMode::Skip,
            ));
        }
    }

    ToolPath {
        scanlines,
        points_per_line,
        data,
    }
}
