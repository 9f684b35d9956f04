//! Geometry primitives: bounding boxes, triangle precompute, and
//! ray–triangle intersection.

use glam::Vec3;

/// Numerical tolerance used throughout the ray–triangle test.
pub const EPSILON: f32 = 1e-7;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Builds the bounding box of a (possibly empty) set of points.
    ///
    /// Returns `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let mut iter = points.iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Keep upward-facing, downward-facing, or all triangles when building a
/// [`crate::TriangleIndex`] / sampling a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceFilter {
    /// Keep triangles with `nz > 0` — the terrain's visible top surface.
    Upward,
    /// Keep triangles with `nz < 0` — the envelope the tool's tip sweeps.
    Downward,
    /// Keep every triangle regardless of orientation.
    None,
}

impl FaceFilter {
    /// Whether a triangle with the given precomputed `nz` survives this filter.
    #[must_use]
    pub fn keeps(self, nz: f32) -> bool {
        match self {
            FaceFilter::Upward => nz > 0.0,
            FaceFilter::Downward => nz < 0.0,
            FaceFilter::None => true,
        }
    }
}

/// A triangle plus the attributes the rest of the pipeline needs
/// precomputed: its 2-D (XY) bounding rectangle, and the signed Z
/// component of its unnormalised face normal.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    /// `(min_x, max_x, min_y, max_y)` over the three vertices.
    pub xy_bbox: (f32, f32, f32, f32),
    /// `(v1-v0) x (v2-v0)` dotted with `ẑ` — the sole orientation criterion.
    pub nz: f32,
}

impl Triangle {
    #[must_use]
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let min_x = v0.x.min(v1.x).min(v2.x);
        let max_x = v0.x.max(v1.x).max(v2.x);
        let min_y = v0.y.min(v1.y).min(v2.y);
        let max_y = v0.y.max(v1.y).max(v2.y);

        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let nz = e1.x * e2.y - e1.y * e2.x;

        Self {
            v0,
            v1,
            v2,
            xy_bbox: (min_x, max_x, min_y, max_y),
            nz,
        }
    }

    /// Cheap rejection test: does `(x, y)` fall inside this triangle's 2-D bbox?
    #[must_use]
    pub fn xy_bbox_contains(&self, x: f32, y: f32) -> bool {
        let (min_x, max_x, min_y, max_y) = self.xy_bbox;
        x >= min_x && x <= max_x && y >= min_y && y <= max_y
    }
}

/// Möller–Trumbore ray–triangle intersection, with an early 2-D bbox
/// rejection against `(origin.x, origin.y)`.
///
/// Fails in order on: a bbox miss, a near-zero determinant (ray parallel
/// to the triangle's plane), `u` outside `[0, 1]`, `v < 0` or `u + v > 1`,
/// and finally `t <= EPSILON`.
#[must_use]
pub fn ray_triangle_intersect(origin: Vec3, dir: Vec3, tri: &Triangle) -> Option<Vec3> {
    if !tri.xy_bbox_contains(origin.x, origin.y) {
        return None;
    }

    let edge1 = tri.v1 - tri.v0;
    let edge2 = tri.v2 - tri.v0;

    let h = dir.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < EPSILON {
        return None; // ray parallel to the triangle's plane
    }

    let f = 1.0 / a;
    let s = origin - tri.v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * dir.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t <= EPSILON {
        return None;
    }

    Some(origin + dir * t)
}
