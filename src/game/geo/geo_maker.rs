//! Extrusion State Machine
//!
//! Drives one generated object at a time through
//! `Idle -> Select -> AnimatedExtrude -> Idle`:
//!
//! - `Select`: every update casts the player's ray into the selection and
//!   shows the selected region as a flat preview mesh on the plane.
//! - `AnimatedExtrude`: every update regenerates the solid at a depth
//!   interpolated linearly from zero to the target over the configured
//!   duration, rebuilding the collider each time.
//! - On completion any platform behavior is attached and the object is
//!   handed back to the caller; the machine returns to `Idle`.
//!
//! The active object's collider lives in the caller's [`CollisionWorld`]
//! from the first preview step on, so placement queries see the platform
//! while it grows.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::extruder::MeshExtruder;
use super::generated::{GeneratedObject, MaterialId, PlatformBehavior};
use super::selection::PlanarTileSelection;
use crate::game::config::ExtrudeConfig;
use crate::physics::CollisionWorld;
use crate::world::SurfaceSource;

/// What happens to a platform once extrusion finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlatformType {
    /// Stays where it was extruded
    #[default]
    Raised,
    /// Bobs in place
    Floating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoState {
    Idle,
    Select,
    AnimatedExtrude,
}

/// A pointing ray, usually from the player's head or controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub max_distance: f32,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3, max_distance: f32) -> Self {
        Self {
            origin,
            direction,
            max_distance,
        }
    }
}

/// Result of one [`GeoMaker::update`] step.
#[derive(Debug)]
pub enum GeoUpdate {
    Idle,
    Selecting {
        tiles: usize,
        /// A tile was added this step
        grew: bool,
    },
    Extruding {
        fraction: f32,
        depth: f32,
    },
    /// Extrusion completed; ownership of the object passes to the caller.
    Finished(GeneratedObject),
}

/// Callback run with the finished object before it is handed back.
pub type FinishCallback = Box<dyn FnOnce(&GeneratedObject)>;

struct ExtrudeRun {
    extruder: MeshExtruder,
    material: MaterialId,
    start_time: f32,
    depth: f32,
    duration: f32,
    on_finished: Option<FinishCallback>,
}

impl ExtrudeRun {
    /// Linear progress in `[0, 1]`; a non-positive duration completes at
    /// once.
    fn fraction(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// Tile selection and extrusion session for one player.
pub struct GeoMaker<S> {
    surfaces: S,
    config: ExtrudeConfig,
    state: GeoState,
    selection: PlanarTileSelection,
    platform_type: PlatformType,
    active: Option<GeneratedObject>,
    run: Option<ExtrudeRun>,
    objects_created: usize,
}

impl<S: SurfaceSource> GeoMaker<S> {
    pub fn new(surfaces: S, config: ExtrudeConfig) -> Self {
        let selection = PlanarTileSelection::new(config.tile_resolution, config.uv.selection);
        Self {
            surfaces,
            config,
            state: GeoState::Idle,
            selection,
            platform_type: PlatformType::default(),
            active: None,
            run: None,
            objects_created: 0,
        }
    }

    pub fn state(&self) -> GeoState {
        self.state
    }

    pub fn config(&self) -> &ExtrudeConfig {
        &self.config
    }

    pub fn selection(&self) -> &PlanarTileSelection {
        &self.selection
    }

    /// Object currently being selected or extruded.
    pub fn active(&self) -> Option<&GeneratedObject> {
        self.active.as_ref()
    }

    pub fn objects_created(&self) -> usize {
        self.objects_created
    }

    /// Begin a new selection. Ignored unless idle.
    ///
    /// # Returns
    /// true if a selection was started
    pub fn start_selection(&mut self, platform_type: PlatformType, material: MaterialId) -> bool {
        if self.state != GeoState::Idle {
            debug!(state = ?self.state, "start_selection ignored, session already active");
            return false;
        }
        let name = format!("Extruded-{}", self.objects_created);
        self.objects_created += 1;
        info!(%name, ?platform_type, "start selection");

        self.platform_type = platform_type;
        self.active = Some(GeneratedObject::new(name, material));
        self.selection.reset();
        self.state = GeoState::Select;
        true
    }

    /// Freeze the selection and start extruding it. Ignored unless
    /// selecting.
    ///
    /// # Arguments
    /// * `material` - Material for the extruded solid
    /// * `now` - Current time in seconds; extrusion runs from here
    /// * `on_finished` - Called with the finished object
    pub fn finish_selection(
        &mut self,
        material: MaterialId,
        now: f32,
        on_finished: impl FnOnce(&GeneratedObject) + 'static,
    ) -> bool {
        if self.state != GeoState::Select {
            debug!(state = ?self.state, "finish_selection ignored, not selecting");
            return false;
        }
        let extruder = MeshExtruder::from_selection(&self.selection);
        info!(
            boundary = extruder.boundary().len(),
            area = self.selection.area(),
            "finish selection"
        );
        self.run = Some(ExtrudeRun {
            extruder,
            material,
            start_time: now,
            depth: self.config.depth,
            duration: self.config.duration,
            on_finished: Some(Box::new(on_finished)),
        });
        self.state = GeoState::AnimatedExtrude;
        true
    }

    /// Advance one tick.
    ///
    /// # Arguments
    /// * `ray` - Pointing ray, used while selecting
    /// * `now` - Current time in seconds
    /// * `world` - Collision world holding the active object's collider
    pub fn update(&mut self, ray: &Ray, now: f32, world: &mut CollisionWorld) -> GeoUpdate {
        match self.state {
            GeoState::Idle => GeoUpdate::Idle,
            GeoState::Select => self.update_select(ray, world),
            GeoState::AnimatedExtrude => self.update_extrude(now, world),
        }
    }

    fn update_select(&mut self, ray: &Ray, world: &mut CollisionWorld) -> GeoUpdate {
        let grew = self
            .selection
            .raycast(&self.surfaces, ray.origin, ray.direction, ray.max_distance);
        let mesh = self.selection.generate_mesh_data();
        if let (Some(object), Some(pose)) = (self.active.as_mut(), self.selection.pose()) {
            if !mesh.is_empty() {
                object.set_mesh_and_transform(mesh, pose, world);
            }
        }
        GeoUpdate::Selecting {
            tiles: self.selection.tiles().len(),
            grew,
        }
    }

    fn update_extrude(&mut self, now: f32, world: &mut CollisionWorld) -> GeoUpdate {
        let (Some(run), Some(object)) = (self.run.as_ref(), self.active.as_mut()) else {
            self.state = GeoState::Idle;
            return GeoUpdate::Idle;
        };
        let fraction = run.fraction(now);
        let depth = run.depth * fraction;
        let mesh = run
            .extruder
            .extrude(self.config.style, depth, &self.config.uv, self.config.crown_height);
        object.set_mesh(mesh, world);
        object.set_material(run.material);

        if fraction < 1.0 {
            return GeoUpdate::Extruding { fraction, depth };
        }
        self.complete(now)
    }

    fn complete(&mut self, now: f32) -> GeoUpdate {
        self.state = GeoState::Idle;
        let run = self.run.take();
        let Some(mut object) = self.active.take() else {
            return GeoUpdate::Idle;
        };
        if self.platform_type == PlatformType::Floating {
            object.attach(PlatformBehavior::floating(
                &self.config.floating,
                object.transform().position,
                now,
            ));
        }
        info!(
            name = object.name(),
            triangles = object.mesh().triangle_count(),
            "extrusion finished"
        );
        if let Some(callback) = run.and_then(|r| r.on_finished) {
            callback(&object);
        }
        GeoUpdate::Finished(object)
    }

    /// Tear down the active session, releasing the object with its mesh,
    /// collider and renderer.
    ///
    /// # Returns
    /// true if there was an active object
    pub fn destroy_active(&mut self, world: &mut CollisionWorld) -> bool {
        let destroyed = match self.active.take() {
            Some(object) => {
                object.despawn(world);
                true
            }
            None => false,
        };
        self.run = None;
        self.selection.reset();
        self.state = GeoState::Idle;
        if destroyed {
            debug!("active generated object destroyed");
        }
        destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{CollisionLayers, CollisionQuery};
    use crate::world::{PlaneId, Playspace, SurfaceKind, SurfacePlane};
    use glam::{Quat, Vec2};
    use std::cell::Cell;
    use std::rc::Rc;

    fn playspace() -> Playspace {
        Playspace::from_planes(vec![SurfacePlane::horizontal(
            PlaneId(0),
            SurfaceKind::Table,
            Vec3::new(0.0, 0.7, 0.0),
            Vec2::new(0.5, 0.5),
        )])
    }

    fn down_at(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 1.5, z), Vec3::NEG_Y, 5.0)
    }

    #[test]
    fn test_start_selection_only_from_idle() {
        let space = playspace();
        let mut geo = GeoMaker::new(&space, ExtrudeConfig::default());
        assert!(geo.start_selection(PlatformType::Raised, MaterialId(1)));
        assert!(!geo.start_selection(PlatformType::Raised, MaterialId(1)));
        assert_eq!(geo.state(), GeoState::Select);
        assert_eq!(geo.objects_created(), 1);
        assert_eq!(geo.active().map(|o| o.name()), Some("Extruded-0"));
    }

    #[test]
    fn test_finish_outside_select_is_ignored() {
        let space = playspace();
        let mut geo = GeoMaker::new(&space, ExtrudeConfig::default());
        assert!(!geo.finish_selection(MaterialId(0), 0.0, |_| {}));
        assert_eq!(geo.state(), GeoState::Idle);
    }

    #[test]
    fn test_select_updates_preview_on_plane() {
        let space = playspace();
        let mut world = CollisionWorld::new();
        let mut geo = GeoMaker::new(&space, ExtrudeConfig::default());
        geo.start_selection(PlatformType::Raised, MaterialId(1));
        let step = geo.update(&down_at(0.0, 0.0), 0.0, &mut world);
        assert!(matches!(step, GeoUpdate::Selecting { tiles: 1, grew: true }));
        let object = geo.active().unwrap();
        assert_eq!(object.mesh().triangle_count(), 2);
        assert!((object.transform().position.y - 0.7).abs() < 1e-6);
        assert!(!object.collider().is_empty());
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_full_session_reaches_target_depth() {
        let space = playspace();
        let mut world = CollisionWorld::new();
        let mut geo = GeoMaker::new(&space, ExtrudeConfig::default());
        geo.start_selection(PlatformType::Floating, MaterialId(1));
        geo.update(&down_at(-0.2, -0.2), 0.0, &mut world);
        geo.update(&down_at(0.2, 0.2), 0.1, &mut world);

        let called = Rc::new(Cell::new(false));
        let flag = called.clone();
        assert!(geo.finish_selection(MaterialId(2), 1.0, move |_| flag.set(true)));

        let ray = down_at(0.0, 0.0);
        match geo.update(&ray, 2.0, &mut world) {
            GeoUpdate::Extruding { fraction, depth } => {
                assert!((fraction - 0.5).abs() < 1e-6);
                assert!((depth - 0.15).abs() < 1e-6);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(geo.active().unwrap().renderer().material, MaterialId(2));

        let finished = match geo.update(&ray, 3.5, &mut world) {
            GeoUpdate::Finished(object) => object,
            other => panic!("unexpected {other:?}"),
        };
        assert!(called.get());
        assert_eq!(geo.state(), GeoState::Idle);
        assert!(geo.active().is_none());
        assert_eq!(finished.behaviors().len(), 1);
        let top = finished.mesh().positions.iter().map(|p| p.z).fold(0.0, f32::max);
        assert!((top - 0.3).abs() < 1e-6);

        // Further updates after completion do nothing
        assert!(matches!(geo.update(&ray, 10.0, &mut world), GeoUpdate::Idle));
    }

    #[test]
    fn test_growing_platform_blocks_world_queries() {
        let space = playspace();
        let mut world = CollisionWorld::new();
        let mut geo = GeoMaker::new(&space, ExtrudeConfig::default());
        geo.start_selection(PlatformType::Raised, MaterialId(1));
        for (x, z) in [(-0.1, -0.1), (0.1, -0.1), (0.1, 0.1), (-0.1, 0.1)] {
            geo.update(&down_at(x, z), 0.0, &mut world);
        }
        geo.finish_selection(MaterialId(1), 0.0, |_| {});

        // Halfway through, the top cap sits 0.15 m above the table
        geo.update(&down_at(0.0, 0.0), 1.0, &mut world);
        let half = Vec3::splat(0.02);
        let mask = CollisionLayers::GENERATED;
        let hits = world.overlap_box(Vec3::new(0.0, 0.85, 0.0), half, Quat::IDENTITY, mask);
        assert_eq!(hits.len(), 1);
        assert_eq!(Some(hits[0]), geo.active().and_then(|o| o.collider().handle()));
        assert!(world.is_box_free(Vec3::new(0.0, 0.95, 0.0), half, Quat::IDENTITY, mask));

        // The cap has moved up by the next step
        geo.update(&down_at(0.0, 0.0), 2.0, &mut world);
        assert!(world.is_box_free(Vec3::new(0.0, 0.85, 0.0), half, Quat::IDENTITY, mask));
        assert!(!world.is_box_free(Vec3::new(0.0, 1.0, 0.0), half, Quat::IDENTITY, mask));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_destroy_active_returns_to_idle() {
        let space = playspace();
        let mut world = CollisionWorld::new();
        let mut geo = GeoMaker::new(&space, ExtrudeConfig::default());
        geo.start_selection(PlatformType::Raised, MaterialId(1));
        geo.update(&down_at(0.0, 0.0), 0.0, &mut world);
        geo.finish_selection(MaterialId(1), 0.0, |_| {});
        assert_eq!(world.len(), 1);
        assert!(geo.destroy_active(&mut world));
        assert!(world.is_empty());
        assert_eq!(geo.state(), GeoState::Idle);
        assert!(geo.selection().is_empty());
        assert!(!geo.destroy_active(&mut world));
        assert!(geo.start_selection(PlatformType::Raised, MaterialId(1)));
    }
}
