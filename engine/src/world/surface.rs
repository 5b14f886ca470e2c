//! Surface Model
//!
//! A detected planar region of the room: a pose plus a 2D extent.
//!
//! ## Plane-local frame
//! Local X/Y span the surface and local +Z is the plane's "forward" axis.
//! Surface detection does not guarantee that forward points away from the
//! physical surface: for a floor it may point down into it. Every piece of
//! placement math must therefore go through
//! [`SurfacePlane::corrected_orientation`], which flips the frame 180°
//! about local Y (negating local X and Z) whenever forward points below
//! the horizon.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Identifier assigned by the surface-detection subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlaneId(pub u32);

/// Category a detected plane was classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SurfaceKind {
    Floor,
    Table,
    Wall,
    Ceiling,
    #[default]
    Unknown,
}

/// 2D oriented bounding box of a plane, centered on the plane position and
/// aligned with its local X/Y axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneBounds {
    pub half_extents: Vec2,
}

impl PlaneBounds {
    pub fn new(half_extents: Vec2) -> Self {
        Self { half_extents }
    }

    pub fn area(&self) -> f32 {
        4.0 * self.half_extents.x * self.half_extents.y
    }

    pub fn contains(&self, local: Vec2) -> bool {
        local.abs().cmple(self.half_extents).all()
    }
}

/// Where a ray crossed a plane inside its bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneHit {
    pub distance: f32,
    pub point: Vec3,
    /// Hit point in the plane's corrected local frame.
    pub local: Vec2,
}

/// Immutable snapshot of one detected surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePlane {
    pub id: PlaneId,
    #[serde(default)]
    pub kind: SurfaceKind,
    pub position: Vec3,
    pub rotation: Quat,
    pub bounds: PlaneBounds,
}

impl SurfacePlane {
    pub fn new(
        id: PlaneId,
        kind: SurfaceKind,
        position: Vec3,
        rotation: Quat,
        half_extents: Vec2,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            rotation: rotation.normalize(),
            bounds: PlaneBounds::new(half_extents),
        }
    }

    /// Horizontal plane whose raw forward axis points straight up.
    pub fn horizontal(id: PlaneId, kind: SurfaceKind, position: Vec3, half_extents: Vec2) -> Self {
        Self::new(id, kind, position, Quat::from_rotation_x(-PI * 0.5), half_extents)
    }

    /// Raw (uncorrected) local +Z in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// True if the detected forward axis points below the horizon.
    pub fn is_inverted(&self) -> bool {
        self.forward().y < 0.0
    }

    /// Plane rotation with forward guaranteed not to point downward.
    pub fn corrected_orientation(&self) -> Quat {
        if self.is_inverted() {
            self.rotation * Quat::from_rotation_y(PI)
        } else {
            self.rotation
        }
    }

    /// Corrected local +Z in world space.
    pub fn normal(&self) -> Vec3 {
        self.corrected_orientation() * Vec3::Z
    }

    pub fn area(&self) -> f32 {
        self.bounds.area()
    }

    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.corrected_orientation() * local
    }

    pub fn world_to_local(&self, world: Vec3) -> Vec3 {
        self.corrected_orientation().inverse() * (world - self.position)
    }

    /// Projection of a world point onto the plane's local 2D axes.
    pub fn project_to_plane(&self, world: Vec3) -> Vec2 {
        self.world_to_local(world).truncate()
    }

    /// Intersect a ray with the bounded plane (either side).
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<PlaneHit> {
        let dir = direction.normalize_or_zero();
        let normal = self.normal();
        let denom = dir.dot(normal);
        if denom.abs() < 1e-6 {
            return None;
        }
        let distance = (self.position - origin).dot(normal) / denom;
        if !(0.0..=max_distance).contains(&distance) {
            return None;
        }
        let point = origin + dir * distance;
        let local = self.project_to_plane(point);
        self.bounds.contains(local).then_some(PlaneHit {
            distance,
            point,
            local,
        })
    }
}
