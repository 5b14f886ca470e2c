//! Room Demo - Headless placement and extrusion walkthrough
//!
//! Run with: `cargo run --bin room_demo -- [--config path.json]`
//!
//! Builds a synthetic scanned room (floor, two tables, a wall and a couch
//! blocking part of the floor), generates the level, then paints a patch
//! of the largest table and extrudes it into a platform. Set `RUST_LOG`
//! (e.g. `RUST_LOG=debug`) to see each step.

use std::f32::consts::FRAC_PI_2;
use std::path::PathBuf;

use clap::Parser;
use glam::{Quat, Vec2, Vec3};
use holoforge_engine::game::geo::{GeoMaker, GeoUpdate, MaterialId, PlatformType, Ray};
use holoforge_engine::game::level::{LevelManager, find_spawn_points};
use holoforge_engine::game::{ConfigError, GameConfig, PrefabKind};
use holoforge_engine::physics::{CollisionLayers, CollisionWorld};
use holoforge_engine::world::{PlaneId, Playspace, SurfaceKind, SurfacePlane};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "room_demo")]
#[command(about = "Place objects and extrude a platform in a synthetic room", long_about = None)]
struct Args {
    /// JSON config file; defaults are used for anything it leaves out
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Make the extruded platform float
    #[arg(long)]
    floating: bool,

    /// Simulation tick in seconds
    #[arg(long, default_value_t = 0.25)]
    tick: f32,
}

/// Axis-aligned box as 12 scan triangles.
fn push_box(positions: &mut Vec<Vec3>, indices: &mut Vec<u32>, min: Vec3, max: Vec3) {
    let base = positions.len() as u32;
    for i in 0..8 {
        positions.push(Vec3::new(
            if i & 1 == 0 { min.x } else { max.x },
            if i & 2 == 0 { min.y } else { max.y },
            if i & 4 == 0 { min.z } else { max.z },
        ));
    }
    const FACES: [[u32; 4]; 6] = [
        [0, 2, 3, 1],
        [4, 5, 7, 6],
        [0, 1, 5, 4],
        [2, 6, 7, 3],
        [0, 4, 6, 2],
        [1, 3, 7, 5],
    ];
    for [a, b, c, d] in FACES {
        indices.extend_from_slice(&[base + a, base + b, base + c, base + a, base + c, base + d]);
    }
}

fn synthetic_room() -> (Playspace, CollisionWorld) {
    let planes = vec![
        // Detected with forward pointing into the floor
        SurfacePlane::new(
            PlaneId(0),
            SurfaceKind::Unknown,
            Vec3::ZERO,
            Quat::from_rotation_x(FRAC_PI_2),
            Vec2::new(2.0, 1.5),
        ),
        SurfacePlane::horizontal(
            PlaneId(1),
            SurfaceKind::Unknown,
            Vec3::new(1.2, 0.72, -0.8),
            Vec2::new(0.6, 0.4),
        ),
        SurfacePlane::horizontal(
            PlaneId(2),
            SurfaceKind::Unknown,
            Vec3::new(-1.4, 0.45, 0.9),
            Vec2::new(0.25, 0.25),
        ),
        SurfacePlane::new(
            PlaneId(3),
            SurfaceKind::Unknown,
            Vec3::new(0.0, 1.2, -1.5),
            Quat::IDENTITY,
            Vec2::new(2.0, 1.2),
        ),
    ];
    let mut playspace = Playspace::new();
    playspace.replace_planes(planes);

    let mut positions = Vec::new();
    let mut indices = Vec::new();
    // Floor slab, couch, table tops
    let boxes = [
        (Vec3::new(-2.0, -0.05, -1.5), Vec3::new(2.0, 0.0, 1.5)),
        (Vec3::new(-2.0, 0.0, -1.5), Vec3::new(-0.4, 0.8, -0.6)),
        (Vec3::new(0.6, 0.68, -1.2), Vec3::new(1.8, 0.72, -0.4)),
        (Vec3::new(-1.65, 0.41, 0.65), Vec3::new(-1.15, 0.45, 1.15)),
    ];
    for (min, max) in boxes {
        push_box(&mut positions, &mut indices, min, max);
    }

    let mut world = CollisionWorld::new();
    world.insert_scan_mesh(&positions, &indices);
    (playspace, world)
}

fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if args.dump_config {
        println!("{}", config.to_json_string()?);
        return Ok(());
    }

    let (mut playspace, mut world) = synthetic_room();
    playspace.classify(&config.playspace);
    for plane in playspace.planes() {
        info!(id = plane.id.0, kind = ?plane.kind, area = plane.area(), "surface");
    }

    // Level generation
    let player = Vec3::new(1.5, 1.6, 1.2);
    {
        let mut level = LevelManager::new(&playspace, &world, config.level.clone());
        let report = level.generate_level(player);
        info!(
            skipped = ?report.skipped,
            candidates = report.factory_candidates,
            tanks = report.tanks.len(),
            "level report"
        );
        if let Some(factory) = report.factory {
            info!(position = %factory.transform.position, "factory placed");
        }
        if let Some(event) = level.notify_enemy_hit(PrefabKind::Tank) {
            info!(?event, "mission event");
        }
        if let Some(event) = level.notify_enemy_hit(PrefabKind::Tank) {
            info!(?event, "mission event");
        }
    }

    // Paint a strip across the largest table, then extrude it
    let platform_type = if args.floating {
        PlatformType::Floating
    } else {
        PlatformType::Raised
    };
    let mut geo = GeoMaker::new(&playspace, config.extrude.clone());
    geo.start_selection(platform_type, MaterialId(1));

    let ray_length = config.extrude.ray_length;
    let tick = args.tick.max(0.01);
    let mut now = 0.0;
    for step in 0..12 {
        let x = 0.8 + step as f32 * 0.07;
        let ray = Ray::new(Vec3::new(x, 1.8, -0.8 + 0.02 * step as f32), Vec3::NEG_Y, ray_length);
        geo.update(&ray, now, &mut world);
        now += tick;
    }
    geo.finish_selection(MaterialId(2), now, |object| {
        info!(name = object.name(), "platform ready");
    });

    let idle_ray = Ray::new(player, Vec3::NEG_Y, ray_length);
    let finished = loop {
        now += tick;
        match geo.update(&idle_ray, now, &mut world) {
            GeoUpdate::Extruding { fraction, depth } => info!(fraction, depth, "extruding"),
            GeoUpdate::Finished(object) => break Some(object),
            GeoUpdate::Idle => break None,
            GeoUpdate::Selecting { .. } => {}
        }
    };

    let Some(mut platform) = finished else {
        info!("no platform produced");
        return Ok(());
    };
    info!(
        name = platform.name(),
        triangles = platform.mesh().triangle_count(),
        vertices = platform.mesh().to_vertices().len(),
        "platform finished"
    );
    platform.tick(now + 1.0, &mut world);

    // The platform's collider is already in the world; it blocks placement
    // on the table when the mask includes generated geometry
    if let Some(table) = playspace.tables().first() {
        let size = Vec3::new(0.2, 0.2, 0.2);
        let step = Vec2::splat(0.1);
        let scan_mask = CollisionLayers::STATIC_SCAN;
        let full_mask = scan_mask | CollisionLayers::GENERATED;
        let scan_only = find_spawn_points(&world, table, size, step, 0.02, scan_mask);
        let with_generated = find_spawn_points(&world, table, size, step, 0.02, full_mask);
        info!(
            scan_only = scan_only.len(),
            with_generated = with_generated.len(),
            "table spawn points"
        );
    }
    Ok(())
}
