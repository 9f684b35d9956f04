//! Uniform XY grid mapping lattice cells to overlapping triangles.

use cam_core::{BoundingBox, FaceFilter, Triangle};

/// Resolution is chosen so cells are roughly this wide, in mesh units.
const TARGET_CELL_SIZE: f32 = 5.0;
const MIN_RESOLUTION: u32 = 10;
const MAX_RESOLUTION: u32 = 100;

/// A uniform XY grid over a filtered triangle set.
///
/// Every cell owns the (possibly duplicated) indices of the triangles
/// whose 2-D bounding rectangle overlaps it — a triangle spanning several
/// cells appears in each.
pub struct TriangleIndex {
    res_x: u32,
    res_y: u32,
    cell_size_x: f32,
    cell_size_y: f32,
    grid_min_x: f32,
    grid_min_y: f32,
    cells: Vec<Vec<u32>>,
}

fn resolution_for_range(range: f32) -> u32 {
    let raw = (range / TARGET_CELL_SIZE).round() as i64 + 1;
    raw.clamp(MIN_RESOLUTION as i64, MAX_RESOLUTION as i64) as u32
}

impl TriangleIndex {
    /// Builds the index over `triangles`, keeping only those `filter` admits.
    #[must_use]
    pub fn build(triangles: &[Triangle], bounds: &BoundingBox, filter: FaceFilter) -> Self {
        let size = bounds.size();
        let res_x = resolution_for_range(size.x);
        let res_y = resolution_for_range(size.y);
        let cell_size_x = size.x / res_x as f32;
        let cell_size_y = size.y / res_y as f32;
        let grid_min_x = bounds.min.x;
        let grid_min_y = bounds.min.y;

        let mut cells = vec![Vec::new(); (res_x * res_y) as usize];

        for (idx, tri) in triangles.iter().enumerate() {
            if !filter.keeps(tri.nz) {
                continue;
            }

            let (min_x, max_x, min_y, max_y) = tri.xy_bbox;
            let min_cx = cell_index(min_x, grid_min_x, cell_size_x, res_x);
            let max_cx = cell_index(max_x, grid_min_x, cell_size_x, res_x);
            let min_cy = cell_index(min_y, grid_min_y, cell_size_y, res_y);
            let max_cy = cell_index(max_y, grid_min_y, cell_size_y, res_y);

            for cy in min_cy..=max_cy {
                for cx in min_cx..=max_cx {
                    cells[(cy * res_x + cx) as usize].push(idx as u32);
                }
            }
        }

        Self {
            res_x,
            res_y,
            cell_size_x,
            cell_size_y,
            grid_min_x,
            grid_min_y,
            cells,
        }
    }

    /// Returns the triangle indices whose bbox overlaps the cell containing `(x, y)`.
    #[must_use]
    pub fn query(&self, x: f32, y: f32) -> &[u32] {
        let cx = cell_index(x, self.grid_min_x, self.cell_size_x, self.res_x);
        let cy = cell_index(y, self.grid_min_y, self.cell_size_y, self.res_y);
        &self.cells[(cy * self.res_x + cx) as usize]
    }

    #[must_use]
    pub fn resolution(&self) -> (u32, u32) {
        (self.res_x, self.res_y)
    }
}

fn cell_index(coord: f32, grid_min: f32, cell_size: f32, res: u32) -> u32 {
    let raw = ((coord - grid_min) / cell_size).floor() as i64;
    raw.clamp(0, res as i64 - 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn flat_plate(z: f32) -> Vec<Triangle> {
        vec![
            Triangle::new(
                Vec3::new(0.0, 0.0, z),
                Vec3::new(10.0, 0.0, z),
                Vec3::new(10.0, 10.0, z),
            ),
            Triangle::new(
                Vec3::new(0.0, 0.0, z),
                Vec3::new(10.0, 10.0, z),
                Vec3::new(0.0, 10.0, z),
            ),
        ]
    }

    #[test]
    fn resolution_clamped_to_range() {
        assert_eq!(resolution_for_range(1.0), MIN_RESOLUTION);
        assert_eq!(resolution_for_range(10_000.0), MAX_RESOLUTION);
    }

    #[test]
    fn every_surviving_triangle_appears_in_at_least_one_cell() {
        let tris = flat_plate(0.0);
        let bounds = BoundingBox {
            min: Vec3::new(0.0, 0.0, 0.0),
            max: Vec3::new(10.0, 10.0, 0.0),
        };
        let index = TriangleIndex::build(&tris, &bounds, FaceFilter::Upward);

        let mut seen = vec![false; tris.len()];
        for cell in &index.cells {
            for &t in cell {
                seen[t as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn query_returns_only_in_bounds_indices() {
        let tris = flat_plate(0.0);
        let bounds = BoundingBox {
            min: Vec3::new(0.0, 0.0, 0.0),
            max: Vec3::new(10.0, 10.0, 0.0),
        };
        let index = TriangleIndex::build(&tris, &bounds, FaceFilter::None);
        for &t in index.query(5.0, 5.0) {
            assert!((t as usize) < tris.len());
        }
    }
}
