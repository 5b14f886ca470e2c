//! Spawn Point Placement
//!
//! Samples a regular grid over a plane's bounding box and keeps the points
//! where an object's footprint box is free of the room scan.
//!
//! Sizes are given object-local (Y up). On the plane the footprint is laid
//! out in plane-local coordinates, where X/Y span the surface and Z points
//! away from it, so size Y (height) maps to local Z.

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::physics::{CollisionLayers, CollisionQuery, Obb};
use crate::world::SurfacePlane;

/// Slack on the last grid step so that a span that is an exact multiple of
/// the step keeps its far edge despite float error.
const GRID_EPSILON: f32 = 1e-4;

/// Footprint half extents in plane-local axes.
pub fn footprint_half_extents(required_size: Vec3) -> Vec3 {
    Vec3::new(required_size.x, required_size.z, required_size.y) * 0.5
}

/// Oriented box occupied by a footprint standing at `local` on the plane,
/// lifted `clearance` above the surface.
pub fn footprint_box(
    plane: &SurfacePlane,
    local: Vec2,
    half_extents: Vec3,
    clearance: f32,
) -> Obb {
    let center = plane.local_to_world(local.extend(half_extents.z + clearance));
    Obb::new(center, half_extents, plane.corrected_orientation())
}

/// Number of grid samples covering `[0, span]` with the given step.
fn sample_count(span: f32, step: f32) -> usize {
    if span < 0.0 {
        0
    } else {
        (span / step + GRID_EPSILON).floor() as usize + 1
    }
}

/// Grid points over the plane bounds inset by `inset`, Y outer and X inner.
fn grid_points(plane: &SurfacePlane, inset: Vec2, step: Vec2) -> impl Iterator<Item = Vec2> {
    let start = -plane.bounds.half_extents + inset;
    let span = (plane.bounds.half_extents - inset) - start;
    let nx = sample_count(span.x, step.x);
    let ny = sample_count(span.y, step.y);
    (0..ny).flat_map(move |j| {
        (0..nx).map(move |i| start + Vec2::new(i as f32, j as f32) * step)
    })
}

/// Find every grid point on `plane` where an object of `required_size`
/// fits without touching the layers in `mask`.
///
/// # Arguments
/// * `query` - Collision backend
/// * `plane` - Surface to search
/// * `required_size` - Object size (width, height, depth), object-local Y up
/// * `step` - Grid spacing along plane-local X and Y
/// * `clearance` - Gap between surface and footprint bottom
/// * `mask` - Layers the footprint must not overlap
///
/// # Returns
/// Plane-local points of accepted footprints. Empty when the footprint does
/// not fit the plane or every spot is occupied; the order carries no
/// meaning.
pub fn find_spawn_points<Q: CollisionQuery + ?Sized>(
    query: &Q,
    plane: &SurfacePlane,
    required_size: Vec3,
    step: Vec2,
    clearance: f32,
    mask: CollisionLayers,
) -> Vec<Vec2> {
    assert!(step.x > 0.0 && step.y > 0.0, "spawn grid step must be positive, got {step}");

    let half_extents = footprint_half_extents(required_size);
    let rotation = plane.corrected_orientation();
    let mut tested = 0usize;
    let points: Vec<Vec2> = grid_points(plane, half_extents.truncate(), step)
        .filter(|&local| {
            tested += 1;
            let obb = footprint_box(plane, local, half_extents, clearance);
            query.is_box_free(obb.center, half_extents, rotation, mask)
        })
        .collect();

    debug!(
        plane = plane.id.0,
        tested,
        accepted = points.len(),
        "spawn point search"
    );
    points
}

/// Free cells of a grid stepped by the footprint itself, as boxes.
///
/// Used to preview which parts of a surface could host an object.
pub fn free_footprints<Q: CollisionQuery + ?Sized>(
    query: &Q,
    plane: &SurfacePlane,
    required_size: Vec3,
    clearance: f32,
    mask: CollisionLayers,
) -> Vec<Obb> {
    let half_extents = footprint_half_extents(required_size);
    let step = half_extents.truncate() * 2.0;
    assert!(
        step.x > 0.0 && step.y > 0.0,
        "footprint must have positive size, got {required_size}"
    );

    grid_points(plane, half_extents.truncate(), step)
        .map(|local| footprint_box(plane, local, half_extents, clearance))
        .filter(|obb| query.is_box_free(obb.center, obb.half_extents, obb.rotation, mask))
        .collect()
}

/// Candidate closest to `reference`; the first one wins ties.
pub fn find_nearest(candidates: &[Vec2], reference: Vec2) -> Option<Vec2> {
    candidates.iter().copied().min_by(|a, b| {
        a.distance_squared(reference)
            .total_cmp(&b.distance_squared(reference))
    })
}

/// Candidate closest to a world-space point projected onto the plane.
pub fn find_nearest_to_world(
    plane: &SurfacePlane,
    candidates: &[Vec2],
    world: Vec3,
) -> Option<Vec2> {
    find_nearest(candidates, plane.project_to_plane(world))
}
