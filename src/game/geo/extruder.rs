//! Mesh Extruder
//!
//! Builds a closed solid from a 2D boundary: a top cap lifted to the
//! extrusion depth along local +Z, side walls down to z = 0 and, depending
//! on the style, a bottom cap. Each face category samples a fixed atlas
//! region; UVs are stretched over the boundary's bounding rectangle for
//! caps and over each wall quad for sides, so textures do not tile with
//! polygon size.
//!
//! Triangles wind counter-clockwise seen from outside. The boundary is
//! normalized to counter-clockwise on construction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::selection::{PlanarTileSelection, bounds_2d, signed_area};
use crate::game::config::{UvQuad, UvTables};
use crate::game::types::MeshData;

/// Which faces an extrusion produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtrudeStyle {
    /// Top cap and side walls
    Simple,
    /// Top cap, side walls and a bottom cap
    #[default]
    SimpleWithBottom,
    /// Top cap and side walls split into a crown band and a base band
    Capped,
}

/// Snapshot of a selection boundary, ready to extrude at any depth.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshExtruder {
    boundary: Vec<Vec2>,
}

impl MeshExtruder {
    pub fn new(mut boundary: Vec<Vec2>) -> Self {
        if signed_area(&boundary) < 0.0 {
            boundary.reverse();
        }
        Self { boundary }
    }

    pub fn from_selection(selection: &PlanarTileSelection) -> Self {
        Self::new(selection.boundary().to_vec())
    }

    pub fn boundary(&self) -> &[Vec2] {
        &self.boundary
    }

    /// Fewer than three boundary points extrude to an empty mesh.
    pub fn is_degenerate(&self) -> bool {
        self.boundary.len() < 3
    }

    /// Generate the solid at `depth`.
    ///
    /// # Arguments
    /// * `style` - Faces to emit
    /// * `depth` - Height of the top cap above the base (clamped at 0)
    /// * `uv` - Atlas regions per face category
    /// * `crown_height` - Crown band height for [`ExtrudeStyle::Capped`]
    ///
    /// # Returns
    /// Mesh with recomputed normals; empty for a degenerate boundary
    pub fn extrude(
        &self,
        style: ExtrudeStyle,
        depth: f32,
        uv: &UvTables,
        crown_height: f32,
    ) -> MeshData {
        let mut mesh = MeshData::new();
        if self.is_degenerate() {
            return mesh;
        }
        let depth = depth.max(0.0);

        match style {
            ExtrudeStyle::Simple => {
                self.push_cap(&mut mesh, depth, &uv.simple_top, false);
                self.push_walls(&mut mesh, 0.0, depth, &uv.simple_side);
            }
            ExtrudeStyle::SimpleWithBottom => {
                self.push_cap(&mut mesh, depth, &uv.simple_top, false);
                self.push_walls(&mut mesh, 0.0, depth, &uv.simple_side);
                self.push_cap(&mut mesh, 0.0, &uv.simple_top, true);
            }
            ExtrudeStyle::Capped => {
                let split = (depth - crown_height.max(0.0)).max(0.0);
                self.push_cap(&mut mesh, depth, &uv.capped_top, false);
                self.push_walls(&mut mesh, split, depth, &uv.capped_crown);
                if split > 0.0 {
                    self.push_walls(&mut mesh, 0.0, split, &uv.capped_base);
                }
            }
        }

        mesh.recalculate_normals();
        mesh
    }

    /// Fan-triangulated cap at height `z`, facing +Z (or -Z when
    /// `flip`).
    fn push_cap(&self, mesh: &mut MeshData, z: f32, uv: &UvQuad, flip: bool) {
        let (min, max) = bounds_2d(&self.boundary);
        let size = (max - min).max(Vec2::splat(f32::EPSILON));
        let base = mesh.vertex_count() as u32;
        for p in &self.boundary {
            let t = (*p - min) / size;
            mesh.push_vertex(p.extend(z), uv.sample(t.x, t.y));
        }
        for i in 1..self.boundary.len() as u32 - 1 {
            if flip {
                mesh.push_triangle(base, base + i + 1, base + i);
            } else {
                mesh.push_triangle(base, base + i, base + i + 1);
            }
        }
    }

    /// One outward-facing quad per boundary edge between heights `z0` and
    /// `z1`.
    fn push_walls(&self, mesh: &mut MeshData, z0: f32, z1: f32, uv: &UvQuad) {
        let n = self.boundary.len();
        for i in 0..n {
            let p0 = self.boundary[i];
            let p1 = self.boundary[(i + 1) % n];
            let b0 = mesh.push_vertex(p0.extend(z0), uv.bottom_left());
            mesh.push_vertex(p1.extend(z0), uv.bottom_right());
            mesh.push_vertex(p1.extend(z1), uv.top_right());
            mesh.push_vertex(p0.extend(z1), uv.top_left());
            mesh.push_triangle(b0, b0 + 1, b0 + 2);
            mesh.push_triangle(b0, b0 + 2, b0 + 3);
        }
    }
}

/// Highest local Z in a mesh; 0 for an empty mesh.
pub fn mesh_height(mesh: &MeshData) -> f32 {
    mesh.bounds().map_or(0.0, |bounds| bounds.max.z.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]
    }

    fn extrude(style: ExtrudeStyle, depth: f32) -> MeshData {
        MeshExtruder::new(square()).extrude(style, depth, &UvTables::default(), 0.05)
    }

    #[test]
    fn test_clockwise_boundary_is_reversed() {
        let mut cw = square();
        cw.reverse();
        let extruder = MeshExtruder::new(cw);
        assert!(signed_area(extruder.boundary()) > 0.0);
    }

    #[test]
    fn test_simple_with_bottom_counts() {
        let mesh = extrude(ExtrudeStyle::SimpleWithBottom, 0.3);
        // Two caps of 2 triangles, 4 walls of 2 triangles
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertex_count(), 4 + 16 + 4);
        assert_eq!(mesh.normals.len(), mesh.vertex_count());
        assert_eq!(mesh.uvs.len(), mesh.vertex_count());
    }

    #[test]
    fn test_simple_has_no_bottom() {
        let mesh = extrude(ExtrudeStyle::Simple, 0.3);
        assert_eq!(mesh.triangle_count(), 10);
        assert!(mesh.normals.iter().all(|n| n.z > -0.5));
    }

    #[test]
    fn test_faces_point_outward() {
        let mesh = extrude(ExtrudeStyle::SimpleWithBottom, 0.5);
        let center = Vec3::new(0.5, 0.5, 0.25);
        for [a, b, c] in mesh.triangles() {
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid - center) > 0.0);
        }
    }

    #[test]
    fn test_top_cap_at_depth() {
        let mesh = extrude(ExtrudeStyle::Simple, 0.3);
        assert!((mesh_height(&mesh) - 0.3).abs() < 1e-6);
        assert!((mesh.normals[0] - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_capped_splits_walls() {
        let mesh = extrude(ExtrudeStyle::Capped, 0.3);
        // Top cap, crown band, base band, no bottom
        assert_eq!(mesh.triangle_count(), 2 + 8 + 8);
        let crown = UvTables::default().capped_crown;
        assert!(mesh.uvs.contains(&crown.top_left()));
    }

    #[test]
    fn test_capped_shallower_than_crown_has_one_band() {
        let mesh = extrude(ExtrudeStyle::Capped, 0.03);
        assert_eq!(mesh.triangle_count(), 2 + 8);
    }

    #[test]
    fn test_degenerate_boundary_is_empty() {
        let extruder = MeshExtruder::new(vec![Vec2::ZERO, Vec2::X]);
        assert!(extruder.is_degenerate());
        let uv = UvTables::default();
        let mesh = extruder.extrude(ExtrudeStyle::SimpleWithBottom, 0.3, &uv, 0.05);
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
    }
}
