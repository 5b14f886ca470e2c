//! Object Spawner
//!
//! Turns a plane-local spawn point into a world transform for a placed
//! object. Objects are authored with +Y up while the plane frame has +Z
//! pointing away from the surface, so the spawn rotation composes the
//! plane's corrected orientation with a fixed remap taking +Y to +Z.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::types::Transform;
use crate::world::{PlaneId, SurfacePlane};

/// Kind of object placed by level generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrefabKind {
    Factory,
    Tank,
}

/// A placed object and where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnedObject {
    pub kind: PrefabKind,
    pub plane: PlaneId,
    /// Plane-local spawn point
    pub local: Vec2,
    pub transform: Transform,
}

/// Rotation taking object-local +Y onto plane-local +Z.
pub fn up_to_forward() -> Quat {
    Quat::from_rotation_arc(Vec3::Y, Vec3::Z)
}

/// World transform of an object standing at `(local_x, local_y)` on the
/// plane.
///
/// No collision check is made here; the point is expected to come from a
/// placement search made against the same scan.
pub fn spawn_transform(plane: &SurfacePlane, local_x: f32, local_y: f32) -> Transform {
    let rotation = plane.corrected_orientation();
    Transform::from_position_rotation(
        plane.position + rotation * Vec3::new(local_x, local_y, 0.0),
        rotation * up_to_forward(),
    )
}

pub fn spawn(kind: PrefabKind, plane: &SurfacePlane, local_x: f32, local_y: f32) -> SpawnedObject {
    let transform = spawn_transform(plane, local_x, local_y);
    debug!(?kind, plane = plane.id.0, position = %transform.position, "spawned object");
    SpawnedObject {
        kind,
        plane: plane.id,
        local: Vec2::new(local_x, local_y),
        transform,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::SurfaceKind;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_up_to_forward_maps_y_to_z() {
        assert!((up_to_forward() * Vec3::Y - Vec3::Z).length() < EPS);
    }

    #[test]
    fn test_object_up_follows_corrected_normal_on_inverted_floor() {
        let plane = SurfacePlane::new(
            PlaneId(2),
            SurfaceKind::Floor,
            Vec3::new(0.0, 0.1, 0.0),
            Quat::from_rotation_x(FRAC_PI_2),
            Vec2::splat(1.0),
        );
        let transform = spawn_transform(&plane, 0.3, -0.2);
        assert!((transform.rotation * Vec3::Y - Vec3::Y).length() < EPS);
        // Spawn point lies on the plane
        assert!((transform.position.y - 0.1).abs() < EPS);
        assert!((plane.project_to_plane(transform.position) - Vec2::new(0.3, -0.2)).length() < EPS);
    }

    #[test]
    fn test_object_up_is_wall_normal() {
        let plane = SurfacePlane::new(
            PlaneId(3),
            SurfaceKind::Wall,
            Vec3::new(0.0, 1.0, -2.0),
            Quat::IDENTITY,
            Vec2::new(2.0, 1.0),
        );
        let spawned = spawn(PrefabKind::Tank, &plane, 0.0, 0.0);
        assert!((spawned.transform.rotation * Vec3::Y - Vec3::Z).length() < EPS);
        assert_eq!(spawned.transform.position, plane.position);
        assert_eq!(spawned.plane, PlaneId(3));
    }
}
