//! Planar Tile Selection
//!
//! Grows a selected region on one detected plane from successive ray hits.
//! The plane is divided into square tiles; every ray that lands on the
//! locked plane marks the tile under the hit point. The region's boundary
//! is the convex hull of the selected tiles, in plane-local coordinates
//! (corrected frame), counter-clockwise seen from the plane's normal.

use std::collections::BTreeSet;

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::game::config::UvQuad;
use crate::game::types::{MeshData, Transform};
use crate::world::{PlaneHit, SurfacePlane, SurfaceSource};

/// Integer tile coordinate; tile `(i, j)` covers `[i, i+1) x [j, j+1)`
/// tile sizes from the plane origin.
pub type TileCoord = (i32, i32);

/// Selected region on a single plane.
#[derive(Debug, Clone)]
pub struct PlanarTileSelection {
    resolution: u32,
    uv: UvQuad,
    plane: Option<SurfacePlane>,
    tile_size: f32,
    tiles: BTreeSet<TileCoord>,
    boundary: Vec<Vec2>,
}

impl PlanarTileSelection {
    /// # Arguments
    /// * `resolution` - Tiles along the longer axis of whichever plane the
    ///   selection locks onto
    /// * `uv` - Texture region the preview mesh samples from
    pub fn new(resolution: u32, uv: UvQuad) -> Self {
        assert!(resolution > 0, "tile resolution must be positive");
        Self {
            resolution,
            uv,
            plane: None,
            tile_size: 0.0,
            tiles: BTreeSet::new(),
            boundary: Vec::new(),
        }
    }

    /// Forget the plane and every selected tile.
    pub fn reset(&mut self) {
        self.plane = None;
        self.tile_size = 0.0;
        self.tiles.clear();
        self.boundary.clear();
    }

    pub fn plane(&self) -> Option<&SurfacePlane> {
        self.plane.as_ref()
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn tiles(&self) -> &BTreeSet<TileCoord> {
        &self.tiles
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Convex boundary, counter-clockwise, plane-local. Empty until a tile
    /// is selected.
    pub fn boundary(&self) -> &[Vec2] {
        &self.boundary
    }

    /// Area of the boundary polygon in square meters.
    pub fn area(&self) -> f32 {
        polygon_area(&self.boundary)
    }

    /// Pose of the preview mesh: the locked plane's corrected frame.
    pub fn pose(&self) -> Option<Transform> {
        self.plane
            .as_ref()
            .map(|p| Transform::from_position_rotation(p.position, p.corrected_orientation()))
    }

    /// Cast a ray into the scene and mark the tile it lands on.
    ///
    /// Before the first hit the nearest plane along the ray is locked in;
    /// afterwards only hits on that plane count.
    ///
    /// # Returns
    /// true if a tile was newly added
    pub fn raycast<S: SurfaceSource + ?Sized>(
        &mut self,
        surfaces: &S,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> bool {
        if self.plane.is_none() {
            let nearest = surfaces
                .all_surfaces()
                .into_iter()
                .filter_map(|p| {
                    p.raycast(origin, direction, max_distance)
                        .map(|hit| (p, hit.distance))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1));
            match nearest {
                Some((plane, _)) => self.lock_plane(plane),
                None => return false,
            }
        }
        let hit = self
            .plane
            .as_ref()
            .and_then(|plane| plane.raycast(origin, direction, max_distance));
        hit.is_some_and(|hit| self.add_hit(&hit))
    }

    /// Lock onto `plane` and size tiles from its longer axis.
    pub fn lock_plane(&mut self, plane: SurfacePlane) {
        let longest = plane.bounds.half_extents.max_element() * 2.0;
        self.tile_size = longest / self.resolution as f32;
        debug!(plane = plane.id.0, tile_size = self.tile_size, "selection locked to plane");
        self.plane = Some(plane);
    }

    fn add_hit(&mut self, hit: &PlaneHit) -> bool {
        self.select_local(hit.local)
    }

    /// Mark the tile containing a plane-local point. Ignored until a plane
    /// is locked, and for points outside the locked plane's bounds.
    pub fn select_local(&mut self, local: Vec2) -> bool {
        let Some(plane) = self.plane.as_ref() else {
            return false;
        };
        if self.tile_size <= 0.0 || !plane.bounds.contains(local) {
            return false;
        }
        let tile = (local / self.tile_size).floor();
        let added = self.tiles.insert((tile.x as i32, tile.y as i32));
        if added {
            self.rebuild_boundary();
        }
        added
    }

    fn rebuild_boundary(&mut self) {
        let corners: BTreeSet<TileCoord> = self
            .tiles
            .iter()
            .flat_map(|&(i, j)| [(i, j), (i + 1, j), (i + 1, j + 1), (i, j + 1)])
            .collect();
        let hull = convex_hull(&corners.into_iter().collect::<Vec<_>>());
        self.boundary = hull
            .into_iter()
            .map(|(i, j)| Vec2::new(i as f32, j as f32) * self.tile_size)
            .collect();
    }

    /// Flat preview mesh of the boundary: a triangle fan at local z = 0,
    /// facing +Z, with UVs spread over the boundary's bounding rectangle.
    pub fn generate_mesh_data(&self) -> MeshData {
        let mut mesh = MeshData::new();
        if self.boundary.len() < 3 {
            return mesh;
        }
        let (min, max) = bounds_2d(&self.boundary);
        let size = (max - min).max(Vec2::splat(f32::EPSILON));
        for p in &self.boundary {
            let t = (*p - min) / size;
            mesh.push_vertex(p.extend(0.0), self.uv.sample(t.x, t.y));
        }
        for i in 1..self.boundary.len() as u32 - 1 {
            mesh.push_triangle(0, i, i + 1);
        }
        mesh.normals = vec![Vec3::Z; mesh.positions.len()];
        mesh
    }
}

// ============================================================================
// POLYGON HELPERS
// ============================================================================

fn cross(o: TileCoord, a: TileCoord, b: TileCoord) -> i64 {
    let (ox, oy) = (o.0 as i64, o.1 as i64);
    (a.0 as i64 - ox) * (b.1 as i64 - oy) - (a.1 as i64 - oy) * (b.0 as i64 - ox)
}

/// Monotone-chain hull of sorted, deduplicated lattice points.
/// Counter-clockwise, collinear points dropped.
fn convex_hull(points: &[TileCoord]) -> Vec<TileCoord> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut lower: Vec<TileCoord> = Vec::new();
    for &p in points {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<TileCoord> = Vec::new();
    for &p in points.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Signed shoelace area; positive for counter-clockwise polygons.
pub fn signed_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        sum += a.perp_dot(b);
    }
    sum * 0.5
}

pub fn polygon_area(polygon: &[Vec2]) -> f32 {
    signed_area(polygon).abs()
}

pub(crate) fn bounds_2d(points: &[Vec2]) -> (Vec2, Vec2) {
    points.iter().fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(lo, hi), p| (lo.min(*p), hi.max(*p)),
    )
}
