//! Playspace registry
//!
//! Holds the latest snapshot of detected surfaces. A re-scan replaces the
//! whole snapshot; planes are never mutated in place during a placement
//! pass.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::debug;

use super::surface::{SurfaceKind, SurfacePlane};

/// Provider of detected surfaces, injected into the level and geometry
/// systems.
pub trait SurfaceSource {
    /// Every plane in the current snapshot, in detection order.
    fn all_surfaces(&self) -> Vec<SurfacePlane>;

    /// Planes of one category, largest area first. Equal areas keep
    /// detection order.
    fn surfaces(&self, kind: SurfaceKind) -> Vec<SurfacePlane> {
        let mut planes: Vec<_> = self
            .all_surfaces()
            .into_iter()
            .filter(|p| p.kind == kind)
            .collect();
        sort_by_area_descending(&mut planes);
        planes
    }
}

impl<T: SurfaceSource + ?Sized> SurfaceSource for &T {
    fn all_surfaces(&self) -> Vec<SurfacePlane> {
        (**self).all_surfaces()
    }
}

impl<T: SurfaceSource + ?Sized> SurfaceSource for Rc<T> {
    fn all_surfaces(&self) -> Vec<SurfacePlane> {
        (**self).all_surfaces()
    }
}

/// Stable sort, largest area first.
pub fn sort_by_area_descending(planes: &mut [SurfacePlane]) {
    planes.sort_by(|a, b| b.area().total_cmp(&a.area()));
}

/// Thresholds for assigning [`SurfaceKind`] from pose alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyParams {
    /// Maximum tilt (degrees) for a plane to count as horizontal or vertical.
    pub tolerance_degrees: f32,
    /// Horizontal planes within this height of the lowest one are floors.
    pub floor_tolerance: f32,
    /// Horizontal planes at least this far above the floor are ceilings.
    pub ceiling_height: f32,
}

impl Default for ClassifyParams {
    fn default() -> Self {
        Self {
            tolerance_degrees: 10.0,
            floor_tolerance: 0.1,
            ceiling_height: 1.8,
        }
    }
}

/// Registry of the planes from the most recent scan.
#[derive(Debug, Clone, Default)]
pub struct Playspace {
    planes: Vec<SurfacePlane>,
    generation: u32,
}

impl Playspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_planes(planes: Vec<SurfacePlane>) -> Self {
        Self {
            planes,
            generation: 0,
        }
    }

    /// Swap in a new scan. Planes from the previous scan must not be used
    /// afterwards.
    pub fn replace_planes(&mut self, planes: Vec<SurfacePlane>) {
        self.generation += 1;
        debug!(
            generation = self.generation,
            count = planes.len(),
            "playspace re-scanned"
        );
        self.planes = planes;
    }

    pub fn planes(&self) -> &[SurfacePlane] {
        &self.planes
    }

    /// Number of completed re-scans.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn floors(&self) -> Vec<SurfacePlane> {
        self.surfaces(SurfaceKind::Floor)
    }

    pub fn tables(&self) -> Vec<SurfacePlane> {
        self.surfaces(SurfaceKind::Table)
    }

    /// Reassign every plane's kind from its corrected normal and height.
    ///
    /// Horizontal planes are split by height relative to the lowest
    /// horizontal plane; near-vertical planes are walls; anything tilted in
    /// between is `Unknown`.
    pub fn classify(&mut self, params: &ClassifyParams) {
        let tolerance = params.tolerance_degrees.to_radians();
        let horizontal_min = tolerance.cos();
        let vertical_max = tolerance.sin();

        let is_horizontal = |p: &SurfacePlane| p.normal().dot(Vec3::Y).abs() >= horizontal_min;
        let floor_y = self
            .planes
            .iter()
            .filter(|p| is_horizontal(*p))
            .map(|p| p.position.y)
            .fold(f32::INFINITY, f32::min);

        for plane in &mut self.planes {
            let up = plane.normal().dot(Vec3::Y).abs();
            plane.kind = if up >= horizontal_min {
                let height = plane.position.y - floor_y;
                if height <= params.floor_tolerance {
                    SurfaceKind::Floor
                } else if height >= params.ceiling_height {
                    SurfaceKind::Ceiling
                } else {
                    SurfaceKind::Table
                }
            } else if up <= vertical_max {
                SurfaceKind::Wall
            } else {
                SurfaceKind::Unknown
            };
        }
    }
}

impl SurfaceSource for Playspace {
    fn all_surfaces(&self) -> Vec<SurfacePlane> {
        self.planes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::surface::PlaneId;
    use glam::{Quat, Vec2};

    fn floor(id: u32, half: Vec2) -> SurfacePlane {
        SurfacePlane::horizontal(PlaneId(id), SurfaceKind::Floor, Vec3::ZERO, half)
    }

    #[test]
    fn test_descending_area_order() {
        // 5 m² then 10 m²
        let playspace = Playspace::from_planes(vec![
            floor(0, Vec2::new(1.25, 1.0)),
            floor(1, Vec2::new(2.5, 1.0)),
        ]);
        let areas: Vec<f32> = playspace.floors().iter().map(|p| p.area()).collect();
        assert_eq!(areas, vec![10.0, 5.0]);
    }

    #[test]
    fn test_equal_areas_keep_detection_order() {
        let playspace = Playspace::from_planes(vec![
            floor(7, Vec2::new(1.0, 2.0)),
            floor(3, Vec2::new(2.0, 1.0)),
            floor(5, Vec2::new(3.0, 3.0)),
        ]);
        let ids: Vec<u32> = playspace.floors().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![5, 7, 3]);
    }

    #[test]
    fn test_surfaces_filter_by_kind() {
        let mut planes = vec![floor(0, Vec2::ONE)];
        planes.push(SurfacePlane::horizontal(PlaneId(1), SurfaceKind::Table, Vec3::Y, Vec2::ONE));
        let playspace = Playspace::from_planes(planes);
        assert_eq!(playspace.tables().len(), 1);
        assert_eq!(playspace.floors().len(), 1);
        assert!(playspace.surfaces(SurfaceKind::Wall).is_empty());
    }

    #[test]
    fn test_replace_planes_bumps_generation() {
        let mut playspace = Playspace::from_planes(vec![floor(0, Vec2::ONE)]);
        playspace.replace_planes(Vec::new());
        assert_eq!(playspace.generation(), 1);
        assert!(playspace.floors().is_empty());
    }

    #[test]
    fn test_classify_by_height_and_normal() {
        let wall = SurfacePlane::new(
            PlaneId(3),
            SurfaceKind::Unknown,
            Vec3::new(0.0, 1.2, -2.0),
            Quat::IDENTITY,
            Vec2::new(2.0, 1.2),
        );
        let unknown = |id, position, half| {
            SurfacePlane::horizontal(PlaneId(id), SurfaceKind::Unknown, position, half)
        };
        let mut playspace = Playspace::from_planes(vec![
            unknown(0, Vec3::new(0.0, 0.02, 0.0), Vec2::splat(2.0)),
            unknown(1, Vec3::new(1.0, 0.75, 0.0), Vec2::splat(0.5)),
            unknown(2, Vec3::new(0.0, 2.5, 0.0), Vec2::splat(2.0)),
            wall,
        ]);
        playspace.classify(&ClassifyParams::default());
        let kinds: Vec<SurfaceKind> = playspace.planes().iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![SurfaceKind::Floor, SurfaceKind::Table, SurfaceKind::Ceiling, SurfaceKind::Wall]
        );
    }
}
