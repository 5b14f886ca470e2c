//! Extrusion Configuration
//!
//! Tile-selection resolution, extrusion animation timing and the texture
//! atlas regions each generated face samples from.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::game::geo::ExtrudeStyle;

// ============================================================================
// UV ATLAS REGIONS
// ============================================================================

/// Four UV corners of an atlas region, ordered top-left, top-right,
/// bottom-right, bottom-left.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UvQuad(pub [Vec2; 4]);

impl UvQuad {
    pub const TOP_LEFT: usize = 0;
    pub const TOP_RIGHT: usize = 1;
    pub const BOTTOM_RIGHT: usize = 2;
    pub const BOTTOM_LEFT: usize = 3;

    /// Region `[min, max]` of a texture, in pixels, shrunk by `inset`
    /// pixels on every side to keep samples away from neighbouring texels.
    ///
    /// # Arguments
    /// * `texture` - Texture size in pixels
    /// * `min` - Bottom-left pixel corner of the region
    /// * `max` - Top-right pixel corner of the region
    /// * `inset` - Pixels trimmed from each edge
    pub fn from_pixels(texture: Vec2, min: Vec2, max: Vec2, inset: f32) -> Self {
        let lo = (min + Vec2::splat(inset)) / texture;
        let hi = (max - Vec2::splat(inset)) / texture;
        Self([
            Vec2::new(lo.x, hi.y),
            Vec2::new(hi.x, hi.y),
            Vec2::new(hi.x, lo.y),
            Vec2::new(lo.x, lo.y),
        ])
    }

    pub fn top_left(&self) -> Vec2 {
        self.0[Self::TOP_LEFT]
    }

    pub fn top_right(&self) -> Vec2 {
        self.0[Self::TOP_RIGHT]
    }

    pub fn bottom_right(&self) -> Vec2 {
        self.0[Self::BOTTOM_RIGHT]
    }

    pub fn bottom_left(&self) -> Vec2 {
        self.0[Self::BOTTOM_LEFT]
    }

    /// Bilinear sample; `(0, 0)` is bottom-left and `(1, 1)` top-right.
    pub fn sample(&self, u: f32, v: f32) -> Vec2 {
        let bottom = self.bottom_left().lerp(self.bottom_right(), u);
        let top = self.top_left().lerp(self.top_right(), u);
        bottom.lerp(top, v)
    }
}

/// Atlas regions for every face category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UvTables {
    /// Selection preview texture
    pub selection: UvQuad,
    pub simple_top: UvQuad,
    pub simple_side: UvQuad,
    pub capped_top: UvQuad,
    pub capped_crown: UvQuad,
    pub capped_base: UvQuad,
}

impl Default for UvTables {
    /// 128px selection texture with a 3.5px inset; a 512x1024 atlas split
    /// into top (upper half) and side (lower half); a 512x1536 atlas split
    /// into top, crown and base thirds.
    fn default() -> Self {
        let selection = Vec2::splat(128.0);
        let simple = Vec2::new(512.0, 1024.0);
        let capped = Vec2::new(512.0, 1536.0);
        let px = Vec2::new;
        Self {
            selection: UvQuad::from_pixels(selection, Vec2::ZERO, selection, 3.5),
            simple_top: UvQuad::from_pixels(simple, px(0.0, 512.0), px(512.0, 1024.0), 0.5),
            simple_side: UvQuad::from_pixels(simple, Vec2::ZERO, px(512.0, 512.0), 0.5),
            capped_top: UvQuad::from_pixels(capped, px(0.0, 1024.0), px(512.0, 1536.0), 0.5),
            capped_crown: UvQuad::from_pixels(capped, px(0.0, 512.0), px(512.0, 1024.0), 0.5),
            capped_base: UvQuad::from_pixels(capped, Vec2::ZERO, px(512.0, 512.0), 0.5),
        }
    }
}

// ============================================================================
// EXTRUSION
// ============================================================================

/// Vertical bobbing applied to finished floating platforms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatingConfig {
    /// Peak displacement from rest (meters)
    pub amplitude: f32,
    /// Seconds per full bob cycle
    pub period: f32,
}

impl Default for FloatingConfig {
    fn default() -> Self {
        Self {
            amplitude: 0.05,
            period: 3.0,
        }
    }
}

/// Parameters for tile selection and the extrusion animation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtrudeConfig {
    /// Tiles along the longer axis of the selected plane
    pub tile_resolution: u32,
    /// Max length of the selection ray
    pub ray_length: f32,
    /// Final extrusion depth (meters)
    pub depth: f32,
    /// Seconds from zero to full depth
    pub duration: f32,
    pub style: ExtrudeStyle,
    /// Height of the crown band for [`ExtrudeStyle::Capped`]
    pub crown_height: f32,
    pub floating: FloatingConfig,
    pub uv: UvTables,
}

impl Default for ExtrudeConfig {
    fn default() -> Self {
        Self {
            tile_resolution: 70,
            ray_length: 10.0,
            depth: 0.3,
            duration: 2.0,
            style: ExtrudeStyle::SimpleWithBottom,
            crown_height: 0.05,
            floating: FloatingConfig::default(),
            uv: UvTables::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uv_quad_corner_order() {
        let quad = UvQuad::from_pixels(Vec2::splat(128.0), Vec2::ZERO, Vec2::splat(128.0), 3.5);
        assert_eq!(quad.top_left(), Vec2::new(3.5 / 128.0, 124.5 / 128.0));
        assert_eq!(quad.bottom_right(), Vec2::new(124.5 / 128.0, 3.5 / 128.0));
    }

    #[test]
    fn test_simple_atlas_halves() {
        let uv = UvTables::default();
        // Side region sits below the top region
        assert!(uv.simple_side.top_left().y < uv.simple_top.bottom_left().y);
        assert!((uv.simple_top.top_left().y - 1023.5 / 1024.0).abs() < 1e-6);
    }

    #[test]
    fn test_sample_corners() {
        let quad = UvTables::default().capped_crown;
        assert_eq!(quad.sample(0.0, 0.0), quad.bottom_left());
        assert!((quad.sample(1.0, 1.0) - quad.top_right()).length() < 1e-6);
        let mid = quad.sample(0.5, 0.5);
        assert!((mid.x - 0.5).abs() < 1e-6);
    }
}
