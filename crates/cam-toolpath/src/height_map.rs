//! Dense 2-D Z array built from a point cloud, with NaN marking empty cells.

use glam::Vec3;

/// A dense grid of Z heights over an integer `(x, y)` lattice.
///
/// A cell is empty iff its value is NaN. `min_z`/`max_z` are computed over
/// non-NaN cells only. For a terrain map, values are absolute; for a tool
/// map (see [`HeightMap::build_tool`]) they are relative to the tool tip.
#[derive(Debug, Clone)]
pub struct HeightMap {
    width: u32,
    height: u32,
    x_min: f32,
    y_min: f32,
    step: f32,
    cells: Vec<f32>,
    min_z: f32,
    max_z: f32,
}

impl HeightMap {
    /// Builds an absolute-height terrain map from a point cloud at the
    /// given lattice `step`. Returns `None` for an empty cloud.
    #[must_use]
    pub fn build_terrain(points: &[Vec3], step: f32) -> Option<Self> {
        Self::build(points, step)
    }

    /// Builds a tool map: like [`HeightMap::build_terrain`], but every Z is
    /// first shifted down by the cloud's minimum Z, so the tool tip sits at
    /// Z = 0.
    #[must_use]
    pub fn build_tool(points: &[Vec3], step: f32) -> Option<Self> {
        let min_z = points.iter().map(|p| p.z).fold(f32::INFINITY, f32::min);
        if !min_z.is_finite() {
            return None;
        }
        let shifted: Vec<Vec3> = points
            .iter()
            .map(|p| Vec3::new(p.x, p.y, p.z - min_z))
            .collect();
        Self::build(&shifted, step)
    }

    fn build(points: &[Vec3], step: f32) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let (x_min, x_max) = min_max(points.iter().map(|p| p.x));
        let (y_min, y_max) = min_max(points.iter().map(|p| p.y));

        let width = (((x_max - x_min) / step).round() as i64 + 1).max(1) as u32;
        let height = (((y_max - y_min) / step).round() as i64 + 1).max(1) as u32;

        let mut cells = vec![f32::NAN; width as usize * height as usize];

        for p in points {
            let gx = grid_coord(p.x, x_min, step, width);
            let gy = grid_coord(p.y, y_min, step, height);
            cells[gy as usize * width as usize + gx as usize] = p.z;
        }

        let (min_z, max_z) = cells
            .iter()
            .copied()
            .filter(|z| !z.is_nan())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), z| {
                (lo.min(z), hi.max(z))
            });

        log::debug!("built {width}x{height} height map from {} points", points.len());

        Some(Self {
            width,
            height,
            x_min,
            y_min,
            step,
            cells,
            min_z,
            max_z,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn dims(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// `(min_z, max_z)` over populated (non-NaN) cells. `(+inf, -inf)` if
    /// every cell is empty.
    #[must_use]
    pub fn extrema(&self) -> (f32, f32) {
        (self.min_z, self.max_z)
    }

    /// Raw value at `(x, y)`, or NaN for out-of-range coordinates — matches
    /// the internal empty-cell representation.
    #[must_use]
    pub fn raw(&self, x: u32, y: u32) -> f32 {
        if x >= self.width || y >= self.height {
            return f32::NAN;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// `Some(z)` if `(x, y)` is in range and populated, `None` otherwise.
    /// Converts the NaN-sentinel representation to `Option` at this
    /// boundary, so internal NaN bookkeeping never leaks to callers.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        let z = self.raw(x, y);
        if z.is_nan() {
            None
        } else {
            Some(z)
        }
    }

    #[must_use]
    pub fn step(&self) -> f32 {
        self.step
    }

    #[must_use]
    pub fn origin(&self) -> (f32, f32) {
        (self.x_min, self.y_min)
    }

    #[must_use]
    pub(crate) fn cells(&self) -> &[f32] {
        &self.cells
    }
}

fn min_max(iter: impl Iterator<Item = f32>) -> (f32, f32) {
    iter.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn grid_coord(coord: f32, origin: f32, step: f32, res: u32) -> u32 {
    let raw = ((coord - origin) / step).round() as i64;
    raw.clamp(0, res as i64 - 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cloud_yields_no_map() {
        assert!(HeightMap::build_terrain(&[], 1.0).is_none());
        assert!(HeightMap::build_tool(&[], 1.0).is_none());
    }

    #[test]
    fn terrain_dims_match_spec_formula() {
        let points = vec![
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(10.0, 10.0, 2.0),
        ];
        let map = HeightMap::build_terrain(&points, 1.0).unwrap();
        assert_eq!(map.dims(), (11, 11));
    }

    #[test]
    fn tool_map_shifts_tip_to_zero() {
        let points = vec![
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(1.0, 0.0, 3.0),
            Vec3::new(0.0, 1.0, 8.0),
        ];
        let map = HeightMap::build_tool(&points, 1.0).unwrap();
        let (min_z, _) = map.extrema();
        assert_eq!(min_z, 0.0);
    }

    #[test]
    fn duplicate_points_at_same_cell_last_writer_wins() {
        let points = vec![Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 9.0)];
        let map = HeightMap::build_terrain(&points, 1.0).unwrap();
        assert_eq!(map.get(0, 0), Some(9.0));
    }

    #[test]
    fn cell_with_no_point_is_nan_sentinel() {
        let points = vec![
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(10.0, 10.0, 1.0),
        ];
        let map = HeightMap::build_terrain(&points, 1.0).unwrap();
        assert!(map.get(5, 5).is_none());
        assert!(map.raw(5, 5).is_nan());
    }

    #[test]
    fn out_of_range_reads_are_nan_not_panics() {
        let points = vec![Vec3::new(0.0, 0.0, 1.0)];
        let map = HeightMap::build_terrain(&points, 1.0).unwrap();
        assert!(map.get(999, 999).is_none());
    }
}
