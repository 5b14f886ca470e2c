//! Collision detection module
//!
//! Primitive intersection tests used by the collision world: the slab
//! method for rays against axis-aligned boxes, Möller–Trumbore for rays
//! against triangles, and separating-axis tests for oriented boxes
//! against boxes and triangles.
//!
//! # Separating Axis Theorem
//!
//! Two convex shapes are disjoint iff some axis exists on which their
//! projections do not overlap. For two oriented boxes the candidate axes
//! are the 3 face normals of each box plus the 9 pairwise edge cross
//! products. For a box against a triangle they are the 3 box axes, the
//! triangle normal, and the 9 cross products of box axes with triangle
//! edges.
//!
//! Touching (projections sharing only an endpoint) is NOT counted as
//! overlap, so a box resting exactly on a surface is reported free.
//!
//! # Example
//!
//! ```ignore
//! use holoforge_engine::physics::collision::{Obb, obb_triangle_overlap};
//! use glam::{Quat, Vec3};
//!
//! let obb = Obb::new(Vec3::new(0.0, 0.5, 0.0), Vec3::splat(0.5), Quat::IDENTITY);
//! let floor = [Vec3::new(-5.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 5.0), Vec3::new(5.0, 0.0, -5.0)];
//! assert!(!obb_triangle_overlap(&obb, &floor)); // resting, not penetrating
//! ```

use glam::{Quat, Vec3};

/// Axes shorter than this (squared) are skipped as degenerate cross products.
const DEGENERATE_AXIS_EPSILON: f32 = 1e-10;

// =============================================================================
// AABB
// =============================================================================

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An inverted box that contains nothing; growing it by any point yields
    /// a box around that point.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.grow(p);
        }
        aabb
    }

    pub fn grow(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Strict interior overlap; shared faces do not count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }
}

// =============================================================================
// OBB
// =============================================================================

/// Oriented bounding box: a center, half-extents along its local axes, and
/// the rotation taking local axes to world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obb {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub rotation: Quat,
}

impl Obb {
    pub fn new(center: Vec3, half_extents: Vec3, rotation: Quat) -> Self {
        Self {
            center,
            half_extents,
            rotation,
        }
    }

    /// World-space unit axes (local X, Y, Z).
    pub fn axes(&self) -> [Vec3; 3] {
        [
            self.rotation * Vec3::X,
            self.rotation * Vec3::Y,
            self.rotation * Vec3::Z,
        ]
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let [ax, ay, az] = self.axes();
        let h = self.half_extents;
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let sx = if i & 1 == 0 { -1.0 } else { 1.0 };
            let sy = if i & 2 == 0 { -1.0 } else { 1.0 };
            let sz = if i & 4 == 0 { -1.0 } else { 1.0 };
            *corner = self.center + ax * (sx * h.x) + ay * (sy * h.y) + az * (sz * h.z);
        }
        corners
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.corners())
    }

    /// Projection radius of the box onto a (not necessarily unit) axis.
    fn projected_radius(&self, axis: Vec3) -> f32 {
        let [ax, ay, az] = self.axes();
        self.half_extents.x * axis.dot(ax).abs()
            + self.half_extents.y * axis.dot(ay).abs()
            + self.half_extents.z * axis.dot(az).abs()
    }
}

// =============================================================================
// RAY TESTS
// =============================================================================

/// Performs ray-AABB (Axis-Aligned Bounding Box) intersection test using the slab method.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the intersection point (t >= 0)
/// * `None` - No intersection or intersection is behind the ray origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    // Handle near-zero directions by using large values
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() > 1e-10 { 1.0 / ray_dir.x } else { f32::MAX * ray_dir.x.signum() },
        if ray_dir.y.abs() > 1e-10 { 1.0 / ray_dir.y } else { f32::MAX * ray_dir.y.signum() },
        if ray_dir.z.abs() > 1e-10 { 1.0 / ray_dir.z } else { f32::MAX * ray_dir.z.signum() },
    );

    let t1 = (aabb_min - ray_origin) * inv_dir;
    let t2 = (aabb_max - ray_origin) * inv_dir;

    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 {
            Some(t_min)
        } else {
            // Ray starts inside the AABB
            Some(t_max)
        }
    } else {
        None
    }
}

/// Computes the outward normal of the AABB face closest to `point`.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = (aabb_max - aabb_min) * 0.5;
    let normalized = (point - center) / half_extents;
    let abs_normalized = normalized.abs();

    if abs_normalized.x >= abs_normalized.y && abs_normalized.x >= abs_normalized.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs_normalized.y >= abs_normalized.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

/// Ray against an oriented box. Returns the distance along the ray and the
/// world-space outward normal of the face that was hit.
pub fn ray_obb_intersect(ray_origin: Vec3, ray_dir: Vec3, obb: &Obb) -> Option<(f32, Vec3)> {
    let inv = obb.rotation.inverse();
    let local_origin = inv * (ray_origin - obb.center);
    let local_dir = inv * ray_dir;
    let t = ray_aabb_intersect(local_origin, local_dir, -obb.half_extents, obb.half_extents)?;
    let local_normal =
        aabb_surface_normal(local_origin + local_dir * t, -obb.half_extents, obb.half_extents);
    Some((t, obb.rotation * local_normal))
}

/// Möller–Trumbore ray/triangle intersection. Both faces are hit.
pub fn ray_triangle_intersect(ray_origin: Vec3, ray_dir: Vec3, tri: &[Vec3; 3]) -> Option<f32> {
    let edge1 = tri[1] - tri[0];
    let edge2 = tri[2] - tri[0];
    let p = ray_dir.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < 1e-8 {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray_origin - tri[0];
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = ray_dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}

// =============================================================================
// SEPARATING AXIS TESTS
// =============================================================================

fn project_points(points: &[Vec3], axis: Vec3) -> (f32, f32) {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for p in points {
        let d = p.dot(axis);
        lo = lo.min(d);
        hi = hi.max(d);
    }
    (lo, hi)
}

/// True if `axis` separates the box from the point set (touching separates).
fn separated_on_axis(obb: &Obb, points: &[Vec3], axis: Vec3) -> bool {
    if axis.length_squared() < DEGENERATE_AXIS_EPSILON {
        return false;
    }
    let c = obb.center.dot(axis);
    let r = obb.projected_radius(axis);
    let (lo, hi) = project_points(points, axis);
    hi <= c - r || lo >= c + r
}

/// True if the interiors of two oriented boxes overlap.
pub fn obb_obb_overlap(a: &Obb, b: &Obb) -> bool {
    let b_corners = b.corners();
    let a_axes = a.axes();
    let b_axes = b.axes();

    for axis in a_axes.iter().chain(b_axes.iter()) {
        if separated_on_axis(a, &b_corners, *axis) {
            return false;
        }
    }
    for ea in a_axes {
        for eb in b_axes {
            if separated_on_axis(a, &b_corners, ea.cross(eb)) {
                return false;
            }
        }
    }
    true
}

/// True if the interior of an oriented box intersects a triangle.
pub fn obb_triangle_overlap(obb: &Obb, tri: &[Vec3; 3]) -> bool {
    let axes = obb.axes();
    let edges = [tri[1] - tri[0], tri[2] - tri[1], tri[0] - tri[2]];

    for axis in axes {
        if separated_on_axis(obb, tri, axis) {
            return false;
        }
    }
    if separated_on_axis(obb, tri, edges[0].cross(edges[1])) {
        return false;
    }
    for axis in axes {
        for edge in edges {
            if separated_on_axis(obb, tri, axis.cross(edge)) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(center: Vec3) -> Obb {
        Obb::new(center, Vec3::splat(0.5), Quat::IDENTITY)
    }

    fn floor_triangles() -> [[Vec3; 3]; 2] {
        [
            [Vec3::new(-5.0, 0.0, -5.0), Vec3::new(-5.0, 0.0, 5.0), Vec3::new(5.0, 0.0, 5.0)],
            [Vec3::new(-5.0, 0.0, -5.0), Vec3::new(5.0, 0.0, 5.0), Vec3::new(5.0, 0.0, -5.0)],
        ]
    }

    #[test]
    fn test_ray_hits_aabb_from_front() {
        let t = ray_aabb_intersect(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::Z,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        )
        .unwrap();
        assert!((t - 4.0).abs() < 0.001, "Expected t=4.0, got t={}", t);
    }

    #[test]
    fn test_ray_starts_inside_aabb() {
        let t = ray_aabb_intersect(Vec3::ZERO, Vec3::Z, Vec3::splat(-1.0), Vec3::splat(1.0))
            .unwrap();
        assert!((t - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_ray_aabb_behind_origin() {
        let origin = Vec3::new(0.0, 0.0, 5.0);
        let result = ray_aabb_intersect(origin, Vec3::Z, Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!(result.is_none());
    }

    #[test]
    fn test_ray_obb_rotated_normal() {
        let obb = Obb::new(
            Vec3::ZERO,
            Vec3::new(1.0, 0.1, 1.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        );
        let (t, normal) = ray_obb_intersect(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, &obb).unwrap();
        assert!((t - 4.9).abs() < 1e-4);
        assert!((normal - Vec3::NEG_X).length() < 1e-4);
    }

    #[test]
    fn test_ray_triangle_hit_and_miss() {
        let tri = floor_triangles()[0];
        let t = ray_triangle_intersect(Vec3::new(-2.0, 3.0, 1.0), Vec3::NEG_Y, &tri).unwrap();
        assert!((t - 3.0).abs() < 1e-5);
        assert!(ray_triangle_intersect(Vec3::new(20.0, 3.0, 0.0), Vec3::NEG_Y, &tri).is_none());
        assert!(ray_triangle_intersect(Vec3::new(-2.0, 3.0, 1.0), Vec3::Y, &tri).is_none());
    }

    #[test]
    fn test_obb_resting_on_floor_is_free() {
        let obb = unit_box_at(Vec3::new(0.0, 0.5, 0.0));
        for tri in floor_triangles() {
            assert!(!obb_triangle_overlap(&obb, &tri));
        }
    }

    #[test]
    fn test_obb_penetrating_floor_overlaps() {
        let obb = unit_box_at(Vec3::new(0.0, 0.4, 0.0));
        assert!(floor_triangles().iter().any(|tri| obb_triangle_overlap(&obb, tri)));
    }

    #[test]
    fn test_obb_above_floor_is_free() {
        let obb = unit_box_at(Vec3::new(0.0, 0.52, 0.0));
        assert!(floor_triangles().iter().all(|tri| !obb_triangle_overlap(&obb, tri)));
    }

    #[test]
    fn test_obb_obb_separated_and_overlapping() {
        let a = unit_box_at(Vec3::ZERO);
        assert!(!obb_obb_overlap(&a, &unit_box_at(Vec3::new(1.5, 0.0, 0.0))));
        assert!(obb_obb_overlap(&a, &unit_box_at(Vec3::new(0.9, 0.0, 0.0))));
        // Touching faces do not overlap
        assert!(!obb_obb_overlap(&a, &unit_box_at(Vec3::new(1.0, 0.0, 0.0))));
    }

    #[test]
    fn test_obb_obb_rotated_corner() {
        // Diamond-rotated box reaches ~0.707 along X
        let a = unit_box_at(Vec3::ZERO);
        let b = Obb::new(
            Vec3::new(1.25, 0.0, 0.0),
            Vec3::splat(0.5),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_4),
        );
        assert!(!obb_obb_overlap(&a, &b));
        let c = Obb::new(
            Vec3::new(1.15, 0.0, 0.0),
            Vec3::splat(0.5),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_4),
        );
        assert!(obb_obb_overlap(&a, &c));
    }

    #[test]
    fn test_aabb_from_points_and_intersects() {
        let a = Aabb::from_points([Vec3::ZERO, Vec3::ONE]);
        assert_eq!(a.max, Vec3::ONE);
        assert!(a.intersects(&Aabb::new(Vec3::splat(0.5), Vec3::splat(2.0))));
        assert!(!a.intersects(&Aabb::new(Vec3::splat(1.0), Vec3::splat(2.0))));
        assert!(Aabb::empty().is_empty());
    }
}
