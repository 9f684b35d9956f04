//! Z-ray mesh sampler: casts a ray per lattice point and keeps the best
//! intersection per the active [`FaceFilter`].

use cam_core::{ray_triangle_intersect, BoundingBox, FaceFilter, Triangle};
use glam::Vec3;

use crate::triangle_index::TriangleIndex;

const INITIAL_CAPACITY: usize = 1024;

/// Casts downward-Z rays on a regular XY lattice and retains the resulting
/// point cloud until the next call to [`MeshSampler::sample`].
///
/// Mirrors the original implementation's process-scoped output buffer, but
/// scoped to one owned instance instead of a true process global: nothing
/// stops a caller from constructing several samplers, each with its own
/// retained buffer and bounds record. A single instance is not reentrant —
/// callers must not invoke `sample` on the same instance concurrently.
#[derive(Default)]
pub struct MeshSampler {
    points: Vec<Vec3>,
    bounds: Option<BoundingBox>,
}

impl MeshSampler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(INITIAL_CAPACITY),
            bounds: None,
        }
    }

    /// Rasterises `triangles` (already parsed into [`Triangle`] records) on
    /// a lattice of spacing `step`, keeping the best intersection per ray
    /// according to `filter`. Replaces the previously retained point cloud.
    ///
    /// An empty `triangles` slice yields zero points, not an error.
    pub fn sample(&mut self, triangles: &[Triangle], step: f32, filter: FaceFilter) -> &[Vec3] {
        self.points.clear();

        let vertices: Vec<Vec3> = triangles
            .iter()
            .flat_map(|t| [t.v0, t.v1, t.v2])
            .collect();
        let bounds = match BoundingBox::from_points(&vertices) {
            Some(b) => b,
            None => {
                self.bounds = None;
                return &self.points;
            }
        };
        self.bounds = Some(bounds);

        let index = TriangleIndex::build(triangles, &bounds, filter);
        let dir = Vec3::Z;

        log::debug!(
            "sampling {} triangles on a {:?} x {:?} lattice at step {step}",
            triangles.len(),
            bounds.min,
            bounds.max
        );

        let mut x = bounds.min.x;
        while x <= bounds.max.x {
            let mut y = bounds.min.y;
            while y <= bounds.max.y {
                let origin = Vec3::new(x, y, bounds.min.z - 1.0);
                if let Some(best) = best_intersection(origin, dir, triangles, &index, filter) {
                    self.points.push(best);
                }
                y += step;
            }
            x += step;
        }

        &self.points
    }

    /// The bounds of the most recent `sample` call's input mesh (pre-filter,
    /// over all vertices), or `None` if `sample` has not been called, or the
    /// last mesh was empty.
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    /// Frees the retained point cloud without clearing the bounds record.
    pub fn free_points(&mut self) {
        self.points = Vec::new();
    }

    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }
}

fn best_intersection(
    origin: Vec3,
    dir: Vec3,
    triangles: &[Triangle],
    index: &TriangleIndex,
    filter: FaceFilter,
) -> Option<Vec3> {
    let candidates = index.query(origin.x, origin.y);
    let mut best: Option<Vec3> = None;

    for &t in candidates {
        let tri = &triangles[t as usize];
        if let Some(hit) = ray_triangle_intersect(origin, dir, tri) {
            best = Some(match (filter, best) {
                (FaceFilter::Downward, Some(b)) => {
                    if hit.z < b.z {
                        hit
                    } else {
                        b
                    }
                }
                (_, Some(b)) => {
                    if hit.z > b.z {
                        hit
                    } else {
                        b
                    }
                }
                (_, None) => hit,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn flat_triangle_pair(z: f32) -> Vec<Triangle> {
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
    fn empty_mesh_yields_no_points_and_no_bounds() {
        let mut sampler = MeshSampler::new();
        let pts = sampler.sample(&[], 1.0, FaceFilter::Upward);
        assert!(pts.is_empty());
        assert!(sampler.bounds().is_none());
    }

    #[test]
    fn flat_plate_samples_every_lattice_cell_at_plate_height() {
        let tris = flat_triangle_pair(3.0);
        let mut sampler = MeshSampler::new();
        let pts = sampler.sample(&tris, 1.0, FaceFilter::Upward).to_vec();
        assert_eq!(pts.len(), 11 * 11);
        for p in &pts {
            assert!((p.z - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn downward_filter_keeps_lowest_intersection() {
        // Two overlapping planes - a downward-facing one at z=1, upward at z=5.
        let mut tris = flat_triangle_pair(5.0);
        tris.extend(
            [
                Triangle::new(
                    Vec3::new(0.0, 0.0, 1.0),
                    Vec3::new(0.0, 10.0, 1.0),
                    Vec3::new(10.0, 0.0, 1.0),
                ),
                Triangle::new(
                    Vec3::new(10.0, 0.0, 1.0),
                    Vec3::new(0.0, 10.0, 1.0),
                    Vec3::new(10.0, 10.0, 1.0),
                ),
            ]
            .into_iter(),
        );

        let mut sampler = MeshSampler::new();
        let pts = sampler.sample(&tris, 5.0, FaceFilter::Downward).to_vec();
        assert!(pts.iter().all(|p| (p.z - 1.0).abs() < 1e-4));
    }

    #[test]
    fn bounds_reflects_most_recent_call_even_after_free_points() {
        let tris = flat_triangle_pair(2.0);
        let mut sampler = MeshSampler::new();
        sampler.sample(&tris, 1.0, FaceFilter::Upward);
        sampler.free_points();
        let b = sampler.bounds().expect("bounds retained after free_points");
        assert_eq!(b.min, Vec3::new(0.0, 0.0, 2.0));
        assert!(sampler.points().is_empty());
    }

    #[test]
    fn edge_on_triangle_under_none_filter_emits_nothing() {
        // Vertical triangle: a +Z ray is parallel to its plane, so intersection
        // always fails regardless of FaceFilter::None admitting it into the index.
        let tris = vec![Triangle::new(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
        )];
        let mut sampler = MeshSampler::new();
        let pts = sampler.sample(&tris, 0.5, FaceFilter::None);
        assert!(pts.is_empty());
    }

    proptest! {
        /// Every point a sampler emits lands on the XY lattice implied by
        /// the mesh bounds and step: an integer number of steps from
        /// `bounds.min` in both X and Y, regardless of plate size or step.
        #[test]
        fn sampled_points_land_on_the_xy_lattice(
            size in 2.0_f32..20.0,
            z in -5.0_f32..5.0,
            step in 0.25_f32..2.5,
        ) {
            let tris = flat_triangle_pair(z).into_iter().map(|t| Triangle::new(
                t.v0 * Vec3::new(size / 10.0, size / 10.0, 1.0),
                t.v1 * Vec3::new(size / 10.0, size / 10.0, 1.0),
                t.v2 * Vec3::new(size / 10.0, size / 10.0, 1.0),
            )).collect::<Vec<_>>();

            let mut sampler = MeshSampler::new();
            let pts = sampler.sample(&tris, step, FaceFilter::Upward).to_vec();
            let bounds = sampler.bounds().expect("non-empty mesh has bounds");

            for p in &pts {
                let steps_x = (p.x - bounds.min.x) / step;
                let steps_y = (p.y - bounds.min.y) / step;
                prop_assert!((steps_x - steps_x.round()).abs() < 1e-3);
                prop_assert!((steps_y - steps_y.round()).abs() < 1e-3);
            }
        }
    }
}
