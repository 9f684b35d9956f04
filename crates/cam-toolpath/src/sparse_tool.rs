//! Compact `(Δx, Δy, Δz)` representation of a tool height map.

use crate::height_map::HeightMap;

/// A tool represented as an unordered list of non-empty `(Δx, Δy, Δz)`
/// cells, offset from the tool's reference cell (the integer centre of its
/// height-map grid) and Z-shifted so the tip sits at `Δz = 0`.
#[derive(Debug, Clone, Default)]
pub struct SparseTool {
    dx: Vec<i32>,
    dy: Vec<i32>,
    dz: Vec<f32>,
}

impl SparseTool {
    /// Builds a sparse tool from a tool height map (already Z-shifted by
    /// [`HeightMap::build_tool`]).
    #[must_use]
    pub fn from_height_map(tool_map: &HeightMap) -> Self {
        let (w, h) = tool_map.dims();
        let cx = (w / 2) as i32;
        let cy = (h / 2) as i32;

        let count = tool_map.cells().iter().filter(|z| !z.is_nan()).count();
        let mut dx = Vec::with_capacity(count);
        let mut dy = Vec::with_capacity(count);
        let mut dz = Vec::with_capacity(count);

        for ty in 0..h {
            for tx in 0..w {
                if let Some(z) = tool_map.get(tx, ty) {
                    dx.push(tx as i32 - cx);
                    dy.push(ty as i32 - cy);
                    dz.push(z);
                }
            }
        }

        log::debug!(
            "sparsified {}x{} tool map to {} samples ({:.1}% of dense)",
            w,
            h,
            dz.len(),
            100.0 * dz.len() as f64 / (w as f64 * h as f64).max(1.0)
        );

        Self { dx, dy, dz }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dz.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dz.is_empty()
    }

    /// Iterates `(Δx, Δy, Δz)` triples in the order they were written.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, f32)> + '_ {
        self.dx
            .iter()
            .copied()
            .zip(self.dy.iter().copied())
            .zip(self.dz.iter().copied())
            .map(|((x, y), z)| (x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn tip_has_zero_delta_z() {
        let points = vec![
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(1.0, 0.0, 3.0),
            Vec3::new(0.0, 1.0, 8.0),
            Vec3::new(1.0, 1.0, 4.0),
        ];
        let tool_map = HeightMap::build_tool(&points, 1.0).unwrap();
        let sparse = SparseTool::from_height_map(&tool_map);
        let min_dz = sparse.iter().map(|(_, _, z)| z).fold(f32::INFINITY, f32::min);
        assert_eq!(min_dz, 0.0);
    }

    #[test]
    fn no_nans_and_no_duplicate_offsets() {
        let points = vec![
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(2.0, 2.0, 4.0),
            Vec3::new(1.0, 1.0, 2.0),
        ];
        let tool_map = HeightMap::build_tool(&points, 1.0).unwrap();
        let sparse = SparseTool::from_height_map(&tool_map);

        assert!(sparse.iter().all(|(_, _, z)| !z.is_nan()));

        let mut seen = std::collections::HashSet::new();
        for (dx, dy, _) in sparse.iter() {
            assert!(seen.insert((dx, dy)), "duplicate offset ({dx}, {dy})");
        }
    }

    #[test]
    fn reference_cell_is_integer_centre() {
        // A 3x3 tool map (width=3, height=3): centre cell (1,1) -> offset (0,0).
        let points = vec![
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(2.0, 2.0, 1.0),
        ];
        let tool_map = HeightMap::build_tool(&points, 1.0).unwrap();
        assert_eq!(tool_map.dims(), (3, 3));
        let sparse = SparseTool::from_height_map(&tool_map);
        assert!(sparse.iter().any(|(dx, dy, z)| dx == 0 && dy == 0 && z == 0.0));
    }
}
