//! Collision world
//!
//! Owns every collider the placement and selection code can query: the
//! triangles of the live room scan, boxes for spawned objects, and meshes
//! produced by extrusion. Queries are synchronous and filtered by
//! [`CollisionLayers`].
//!
//! Colliders are addressed by [`ColliderHandle`]. Removing a collider
//! leaves its slot empty so outstanding handles never alias a different
//! collider.

use glam::{Quat, Vec3};

use super::collision::{
    Aabb, Obb, obb_obb_overlap, obb_triangle_overlap, ray_obb_intersect, ray_triangle_intersect,
};
use super::layers::CollisionLayers;

/// Stable identifier of a collider inside a [`CollisionWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderHandle(u32);

impl ColliderHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// TRIANGLE MESH
// =============================================================================

/// World-space triangle soup with a cached bounding box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    triangles: Vec<[Vec3; 3]>,
    aabb: Option<Aabb>,
}

impl TriMesh {
    pub fn from_triangles(triangles: Vec<[Vec3; 3]>) -> Self {
        let aabb = (!triangles.is_empty())
            .then(|| Aabb::from_points(triangles.iter().flat_map(|t| t.iter().copied())));
        Self { triangles, aabb }
    }

    /// Build from an indexed vertex list, transforming every vertex by
    /// `rotation`, `scale` and `translation` (scale applied first).
    ///
    /// Trailing indices that do not form a full triangle are ignored.
    pub fn from_indexed(
        positions: &[Vec3],
        indices: &[u32],
        translation: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) -> Self {
        let world: Vec<Vec3> = positions
            .iter()
            .map(|p| translation + rotation * (*p * scale))
            .collect();
        let triangles = indices
            .chunks_exact(3)
            .map(|tri| {
                [
                    world[tri[0] as usize],
                    world[tri[1] as usize],
                    world[tri[2] as usize],
                ]
            })
            .collect();
        Self::from_triangles(triangles)
    }

    pub fn triangles(&self) -> &[[Vec3; 3]] {
        &self.triangles
    }

    pub fn aabb(&self) -> Option<Aabb> {
        self.aabb
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    fn overlaps_obb(&self, obb: &Obb, obb_aabb: &Aabb) -> bool {
        if !self.aabb.is_some_and(|bounds| bounds.intersects(obb_aabb)) {
            return false;
        }
        self.triangles.iter().any(|tri| {
            Aabb::from_points(*tri).intersects(obb_aabb) && obb_triangle_overlap(obb, tri)
        })
    }

    fn raycast(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<(f32, Vec3)> {
        let bounds = self.aabb?;
        super::collision::ray_aabb_intersect(origin, dir, bounds.min, bounds.max)
            .filter(|t| *t <= max_distance)?;
        let mut best: Option<(f32, Vec3)> = None;
        for tri in &self.triangles {
            if let Some(t) = ray_triangle_intersect(origin, dir, tri) {
                if t <= max_distance && best.is_none_or(|(bt, _)| t < bt) {
                    let mut normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize_or_zero();
                    if normal.dot(dir) > 0.0 {
                        normal = -normal;
                    }
                    best = Some((t, normal));
                }
            }
        }
        best
    }
}

// =============================================================================
// COLLIDERS
// =============================================================================

/// Geometry of a collider.
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    Box(Obb),
    TriMesh(TriMesh),
}

/// A shape tagged with the categories it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub shape: ColliderShape,
    pub layers: CollisionLayers,
}

impl Collider {
    pub fn cuboid(obb: Obb, layers: CollisionLayers) -> Self {
        Self {
            shape: ColliderShape::Box(obb),
            layers,
        }
    }

    pub fn trimesh(mesh: TriMesh, layers: CollisionLayers) -> Self {
        Self {
            shape: ColliderShape::TriMesh(mesh),
            layers,
        }
    }

    fn overlaps_obb(&self, obb: &Obb, obb_aabb: &Aabb) -> bool {
        match &self.shape {
            ColliderShape::Box(other) => obb_obb_overlap(obb, other),
            ColliderShape::TriMesh(mesh) => mesh.overlaps_obb(obb, obb_aabb),
        }
    }

    fn raycast(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<(f32, Vec3)> {
        match &self.shape {
            ColliderShape::Box(obb) => {
                ray_obb_intersect(origin, dir, obb).filter(|(t, _)| *t <= max_distance)
            }
            ColliderShape::TriMesh(mesh) => mesh.raycast(origin, dir, max_distance),
        }
    }
}

/// Nearest ray hit against the collision world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub handle: ColliderHandle,
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
}

// =============================================================================
// QUERY TRAIT
// =============================================================================

/// Spatial occupancy test used by the placement engine.
pub trait CollisionQuery {
    /// Every collider in `mask` whose interior intersects the oriented box.
    fn overlap_box(
        &self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        mask: CollisionLayers,
    ) -> Vec<ColliderHandle>;

    /// True if the box intersects nothing in `mask`.
    fn is_box_free(
        &self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        mask: CollisionLayers,
    ) -> bool {
        self.overlap_box(center, half_extents, rotation, mask).is_empty()
    }
}

impl<T: CollisionQuery + ?Sized> CollisionQuery for &T {
    fn overlap_box(
        &self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        mask: CollisionLayers,
    ) -> Vec<ColliderHandle> {
        (**self).overlap_box(center, half_extents, rotation, mask)
    }
}

// =============================================================================
// WORLD
// =============================================================================

/// Flat collection of colliders with linear-scan queries.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    slots: Vec<Option<Collider>>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, collider: Collider) -> ColliderHandle {
        let handle = ColliderHandle(self.slots.len() as u32);
        self.slots.push(Some(collider));
        handle
    }

    /// Register a scanned room mesh on the static-scan layer.
    pub fn insert_scan_mesh(&mut self, positions: &[Vec3], indices: &[u32]) -> ColliderHandle {
        let mesh = TriMesh::from_indexed(positions, indices, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
        self.insert(Collider::trimesh(mesh, CollisionLayers::STATIC_SCAN))
    }

    pub fn remove(&mut self, handle: ColliderHandle) -> Option<Collider> {
        self.slots.get_mut(handle.index()).and_then(Option::take)
    }

    /// Drop every collider on any of the given layers (e.g. before a re-scan).
    pub fn clear_layers(&mut self, layers: CollisionLayers) {
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(|c| c.layers.intersects(layers)) {
                *slot = None;
            }
        }
    }

    pub fn get(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.slots.get(handle.index()).and_then(Option::as_ref)
    }

    /// Live collider behind `handle`, for in-place replacement. `None`
    /// once the collider has been removed.
    pub fn get_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.slots.get_mut(handle.index()).and_then(Option::as_mut)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColliderHandle, &Collider)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|c| (ColliderHandle(i as u32), c)))
    }

    /// Nearest hit along a ray against colliders in `mask`.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: CollisionLayers,
    ) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        self.iter()
            .filter(|(_, c)| c.layers.intersects(mask))
            .filter_map(|(handle, c)| {
                c.raycast(origin, dir, max_distance).map(|(t, normal)| RayHit {
                    handle,
                    point: origin + dir * t,
                    normal,
                    distance: t,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl CollisionQuery for CollisionWorld {
    fn overlap_box(
        &self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        mask: CollisionLayers,
    ) -> Vec<ColliderHandle> {
        let obb = Obb::new(center, half_extents, rotation);
        let obb_aabb = obb.aabb();
        self.iter()
            .filter(|(_, c)| c.layers.intersects(mask))
            .filter(|(_, c)| c.overlaps_obb(&obb, &obb_aabb))
            .map(|(handle, _)| handle)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_quad(y: f32, half: f32) -> (Vec<Vec3>, Vec<u32>) {
        (
            vec![
                Vec3::new(-half, y, -half),
                Vec3::new(-half, y, half),
                Vec3::new(half, y, half),
                Vec3::new(half, y, -half),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_box_above_scan_floor_is_free() {
        let mut world = CollisionWorld::new();
        let (p, i) = floor_quad(0.0, 5.0);
        world.insert_scan_mesh(&p, &i);

        let hits = world.overlap_box(
            Vec3::new(0.0, 0.52, 0.0),
            Vec3::splat(0.5),
            Quat::IDENTITY,
            CollisionLayers::STATIC_SCAN,
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn test_box_through_scan_floor_hits() {
        let mut world = CollisionWorld::new();
        let (p, i) = floor_quad(0.0, 5.0);
        let handle = world.insert_scan_mesh(&p, &i);

        let hits = world.overlap_box(
            Vec3::new(1.0, 0.2, 1.0),
            Vec3::splat(0.5),
            Quat::IDENTITY,
            CollisionLayers::STATIC_SCAN,
        );
        assert_eq!(hits, vec![handle]);
    }

    #[test]
    fn test_layer_mask_filters_colliders() {
        let mut world = CollisionWorld::new();
        let obstacle = Obb::new(Vec3::ZERO, Vec3::splat(0.5), Quat::IDENTITY);
        world.insert(Collider::cuboid(obstacle, CollisionLayers::OBJECTS));

        let small = Vec3::splat(0.2);
        assert!(world.is_box_free(Vec3::ZERO, small, Quat::IDENTITY, CollisionLayers::STATIC_SCAN));
        assert!(!world.is_box_free(
            Vec3::ZERO,
            Vec3::splat(0.2),
            Quat::IDENTITY,
            CollisionLayers::STATIC_SCAN | CollisionLayers::OBJECTS
        ));
    }

    #[test]
    fn test_remove_and_clear_layers() {
        let mut world = CollisionWorld::new();
        let a = world.insert(Collider::cuboid(
            Obb::new(Vec3::ZERO, Vec3::ONE, Quat::IDENTITY),
            CollisionLayers::OBJECTS,
        ));
        let (p, i) = floor_quad(0.0, 1.0);
        world.insert_scan_mesh(&p, &i);
        assert_eq!(world.len(), 2);

        assert!(world.remove(a).is_some());
        assert!(world.remove(a).is_none());
        world.clear_layers(CollisionLayers::STATIC_SCAN);
        assert!(world.is_empty());
    }

    #[test]
    fn test_raycast_returns_nearest() {
        let mut world = CollisionWorld::new();
        let (p, i) = floor_quad(0.0, 5.0);
        let floor = world.insert_scan_mesh(&p, &i);
        let (p, i) = floor_quad(1.0, 0.5);
        let table = world.insert_scan_mesh(&p, &i);

        let hit = world
            .raycast(Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_Y, 10.0, CollisionLayers::all())
            .unwrap();
        assert_eq!(hit.handle, table);
        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::Y).length() < 1e-5);

        let hit = world
            .raycast(Vec3::new(2.0, 3.0, 0.0), Vec3::NEG_Y, 10.0, CollisionLayers::all())
            .unwrap();
        assert_eq!(hit.handle, floor);

        let origin = Vec3::new(2.0, 3.0, 0.0);
        let short = world.raycast(origin, Vec3::NEG_Y, 2.0, CollisionLayers::all());
        assert!(short.is_none());
    }

    #[test]
    fn test_get_mut_replaces_in_place() {
        let mut world = CollisionWorld::new();
        let handle = world.insert(Collider::cuboid(
            Obb::new(Vec3::ZERO, Vec3::splat(0.5), Quat::IDENTITY),
            CollisionLayers::GENERATED,
        ));
        if let Some(collider) = world.get_mut(handle) {
            *collider = Collider::cuboid(
                Obb::new(Vec3::new(0.0, 5.0, 0.0), Vec3::splat(0.5), Quat::IDENTITY),
                CollisionLayers::GENERATED,
            );
        }
        let (mask, small) = (CollisionLayers::GENERATED, Vec3::splat(0.2));
        assert!(world.is_box_free(Vec3::ZERO, small, Quat::IDENTITY, mask));
        assert!(!world.is_box_free(Vec3::new(0.0, 5.0, 0.0), small, Quat::IDENTITY, mask));

        world.remove(handle);
        assert!(world.get_mut(handle).is_none());
    }
}
