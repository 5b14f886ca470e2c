//! Generated Objects
//!
//! A scene object produced by the extrusion state machine: its transform,
//! mesh, collision geometry and render binding live and die together.
//! Whenever the mesh or transform changes the collider is rebuilt from
//! scratch and swapped into the [`CollisionWorld`] under the same handle,
//! so queries never see stale geometry.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::game::config::FloatingConfig;
use crate::game::types::{MeshData, Transform};
use crate::physics::{
    Aabb, Collider, ColliderHandle, CollisionLayers, CollisionWorld, TriMesh,
};

/// Opaque handle of a render material owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

/// World-space collision triangles of a generated object, registered on
/// the [`CollisionLayers::GENERATED`] layer.
#[derive(Debug, Default, PartialEq)]
pub struct MeshCollider {
    mesh: TriMesh,
    handle: Option<ColliderHandle>,
    rebuilds: u32,
}

impl MeshCollider {
    /// Replace the collision geometry with `mesh` placed at `transform`
    /// and publish it to `world`.
    pub fn rebuild(&mut self, mesh: &MeshData, transform: &Transform, world: &mut CollisionWorld) {
        self.mesh = TriMesh::from_indexed(
            &mesh.positions,
            &mesh.indices,
            transform.position,
            transform.rotation,
            transform.scale,
        );
        let collider = Collider::trimesh(self.mesh.clone(), CollisionLayers::GENERATED);
        match self.handle.and_then(|handle| world.get_mut(handle)) {
            Some(slot) => *slot = collider,
            None => self.handle = Some(world.insert(collider)),
        }
        self.rebuilds += 1;
    }

    /// Remove the collider from `world`.
    pub fn release(&mut self, world: &mut CollisionWorld) {
        if let Some(handle) = self.handle.take() {
            world.remove(handle);
        }
        self.mesh = TriMesh::default();
    }

    /// Handle in the collision world, once the collider has been built.
    pub fn handle(&self) -> Option<ColliderHandle> {
        self.handle
    }

    pub fn triangles(&self) -> &[[Vec3; 3]] {
        self.mesh.triangles()
    }

    pub fn aabb(&self) -> Option<Aabb> {
        self.mesh.aabb()
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }

    /// Number of times the geometry has been rebuilt.
    pub fn rebuild_count(&self) -> u32 {
        self.rebuilds
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshRenderer {
    pub material: MaterialId,
    pub enabled: bool,
}

/// Post-processing attached to a finished platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformBehavior {
    /// Bob up and down around `rest`.
    Floating {
        rest: Vec3,
        amplitude: f32,
        period: f32,
        start_time: f32,
    },
}

impl PlatformBehavior {
    pub fn floating(config: &FloatingConfig, rest: Vec3, start_time: f32) -> Self {
        PlatformBehavior::Floating {
            rest,
            amplitude: config.amplitude,
            period: config.period,
            start_time,
        }
    }

    /// Position the behavior wants the object at, at `time`.
    pub fn position_at(&self, time: f32) -> Vec3 {
        match *self {
            PlatformBehavior::Floating {
                rest,
                amplitude,
                period,
                start_time,
            } => {
                if period <= 0.0 {
                    return rest;
                }
                let phase = (time - start_time) / period * TAU;
                rest + Vec3::Y * (amplitude * phase.sin())
            }
        }
    }
}

/// Scene object built from a tile selection.
#[derive(Debug)]
pub struct GeneratedObject {
    name: String,
    transform: Transform,
    mesh: MeshData,
    collider: MeshCollider,
    renderer: MeshRenderer,
    behaviors: Vec<PlatformBehavior>,
}

impl GeneratedObject {
    pub fn new(name: impl Into<String>, material: MaterialId) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            mesh: MeshData::new(),
            collider: MeshCollider::default(),
            renderer: MeshRenderer {
                material,
                enabled: true,
            },
            behaviors: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn collider(&self) -> &MeshCollider {
        &self.collider
    }

    pub fn renderer(&self) -> &MeshRenderer {
        &self.renderer
    }

    pub fn behaviors(&self) -> &[PlatformBehavior] {
        &self.behaviors
    }

    pub fn set_material(&mut self, material: MaterialId) {
        self.renderer.material = material;
    }

    /// Replace the mesh and rebuild collision geometry.
    pub fn set_mesh(&mut self, mesh: MeshData, world: &mut CollisionWorld) {
        self.mesh = mesh;
        self.collider.rebuild(&self.mesh, &self.transform, world);
    }

    pub fn set_transform(&mut self, transform: Transform, world: &mut CollisionWorld) {
        self.transform = transform;
        self.collider.rebuild(&self.mesh, &self.transform, world);
    }

    /// Replace mesh and transform together with a single collider rebuild.
    pub fn set_mesh_and_transform(
        &mut self,
        mesh: MeshData,
        transform: Transform,
        world: &mut CollisionWorld,
    ) {
        self.mesh = mesh;
        self.transform = transform;
        self.collider.rebuild(&self.mesh, &self.transform, world);
    }

    pub fn attach(&mut self, behavior: PlatformBehavior) {
        self.behaviors.push(behavior);
    }

    /// Run attached behaviors.
    pub fn tick(&mut self, time: f32, world: &mut CollisionWorld) {
        let Some(position) = self.behaviors.last().map(|b| b.position_at(time)) else {
            return;
        };
        if position != self.transform.position {
            let transform = Transform {
                position,
                ..self.transform
            };
            self.set_transform(transform, world);
        }
    }

    /// Remove the object from the scene, taking its collider out of
    /// `world` along with the mesh and renderer.
    pub fn despawn(mut self, world: &mut CollisionWorld) {
        self.collider.release(world);
    }
}
