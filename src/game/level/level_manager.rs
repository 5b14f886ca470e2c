//! Level Manager
//!
//! Populates a scanned room: the factory goes on the largest floor at the
//! free spot nearest the player, tanks go on the tables. Surfaces and
//! collision come in through the constructor.

use glam::Vec3;
use tracing::{info, warn};

use super::placement::{find_nearest_to_world, find_spawn_points, free_footprints};
use super::spawner::{PrefabKind, SpawnedObject, spawn};
use crate::game::config::LevelConfig;
use crate::game::mission::{Mission, MissionEvent};
use crate::physics::{CollisionQuery, Obb};
use crate::world::{SurfaceKind, SurfaceSource};

/// Why level generation placed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The scan has no tables or no floors
    NoSurfaces,
}

/// Outcome of one [`LevelManager::generate_level`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelReport {
    pub skipped: Option<SkipReason>,
    /// Free factory spots found on the largest floor
    pub factory_candidates: usize,
    pub factory: Option<SpawnedObject>,
    pub tanks: Vec<SpawnedObject>,
}

impl LevelReport {
    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }
}

pub struct LevelManager<S, C> {
    surfaces: S,
    collision: C,
    config: LevelConfig,
    mission: Mission,
    spawned: Vec<SpawnedObject>,
}

impl<S: SurfaceSource, C: CollisionQuery> LevelManager<S, C> {
    pub fn new(surfaces: S, collision: C, config: LevelConfig) -> Self {
        Self {
            surfaces,
            collision,
            config,
            mission: Mission::default(),
            spawned: Vec::new(),
        }
    }

    pub fn with_mission(mut self, mission: Mission) -> Self {
        self.mission = mission;
        self
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn mission(&self) -> &Mission {
        &self.mission
    }

    /// Objects placed by the last `generate_level` call.
    pub fn spawned(&self) -> &[SpawnedObject] {
        &self.spawned
    }

    pub fn surfaces(&self) -> &S {
        &self.surfaces
    }

    pub fn collision(&self) -> &C {
        &self.collision
    }

    /// Place the factory and tanks for the current scan.
    ///
    /// Missing tables or floors, or a floor with no free factory spot, are
    /// normal outcomes: the report says what was skipped and nothing fails.
    ///
    /// # Arguments
    /// * `player_position` - World-space player position; the factory goes
    ///   to the free spot closest to it
    pub fn generate_level(&mut self, player_position: Vec3) -> LevelReport {
        self.spawned.clear();
        let tables = self.surfaces.surfaces(SurfaceKind::Table);
        let floors = self.surfaces.surfaces(SurfaceKind::Floor);
        info!(tables = tables.len(), floors = floors.len(), "generating level");

        let (Some(primary_table), Some(floor)) = (tables.first(), floors.first()) else {
            warn!(
                tables = tables.len(),
                floors = floors.len(),
                "level generation skipped, scan lacks tables or floors"
            );
            return LevelReport {
                skipped: Some(SkipReason::NoSurfaces),
                ..LevelReport::default()
            };
        };

        let mut report = LevelReport::default();

        let candidates = find_spawn_points(
            &self.collision,
            floor,
            self.config.factory_footprint,
            self.config.factory_step,
            self.config.factory_clearance,
            self.config.placement_mask,
        );
        report.factory_candidates = candidates.len();
        match find_nearest_to_world(floor, &candidates, player_position) {
            Some(spot) => report.factory = Some(spawn(PrefabKind::Factory, floor, spot.x, spot.y)),
            None => warn!(plane = floor.id.0, "no free spot for the factory"),
        }

        for offset in &self.config.primary_table_tanks {
            report.tanks.push(spawn(PrefabKind::Tank, primary_table, offset.x, offset.y));
        }
        let extra = self.config.extra_table_tank;
        for table in tables.iter().skip(1) {
            report.tanks.push(spawn(PrefabKind::Tank, table, extra.x, extra.y));
        }

        self.mission.set_enemy_count(report.tanks.len() as u32);
        self.spawned.extend(report.factory);
        self.spawned.extend(report.tanks.iter().copied());

        info!(
            factory = report.factory.is_some(),
            tanks = report.tanks.len(),
            "level generated"
        );
        report
    }

    /// Free factory-sized cells on the largest floor.
    pub fn preview_factory_footprints(&self) -> Vec<Obb> {
        let floors = self.surfaces.surfaces(SurfaceKind::Floor);
        let Some(floor) = floors.first() else {
            return Vec::new();
        };
        free_footprints(
            &self.collision,
            floor,
            self.config.factory_footprint,
            self.config.factory_clearance,
            self.config.placement_mask,
        )
    }

    pub fn notify_enemy_hit(&mut self, kind: PrefabKind) -> Option<MissionEvent> {
        self.mission.on_enemy_hit(kind)
    }

    pub fn notify_object_destroyed(&mut self, kind: PrefabKind) -> Option<MissionEvent> {
        self.mission.on_object_destroyed(kind)
    }

    pub fn tick(&mut self, time: f32) -> Option<MissionEvent> {
        self.mission.on_tick(time)
    }
}
