//! Collision layers
//!
//! A collider belongs to one or more named categories; a query carries a
//! mask and only sees colliders whose categories intersect it. Combining
//! categories with `|` is a logical OR over the underlying bits, so masks
//! built here are interchangeable with raw layer bitmasks.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// A set of collision categories.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct CollisionLayers: u32 {
        /// Triangles of the live room scan.
        const STATIC_SCAN = 1 << 0;
        /// Geometry produced by tile-selection extrusion.
        const GENERATED = 1 << 1;
        /// Spawned game objects (factories, tanks).
        const OBJECTS = 1 << 2;
    }
}

impl CollisionLayers {
    /// Category for a numbered layer (0..32).
    pub const fn layer(index: u32) -> Self {
        assert!(index < 32, "collision layer index out of range");
        Self::from_bits_retain(1 << index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_matches_bitmask_semantics() {
        let mask = CollisionLayers::STATIC_SCAN | CollisionLayers::OBJECTS;
        assert_eq!(mask.bits(), 0b101);
        assert!(mask.intersects(CollisionLayers::STATIC_SCAN));
        assert!(!mask.intersects(CollisionLayers::GENERATED));
        assert!(mask.contains(CollisionLayers::OBJECTS));
    }

    #[test]
    fn test_numbered_layer() {
        assert_eq!(CollisionLayers::layer(1), CollisionLayers::GENERATED);
        assert_eq!(
            CollisionLayers::from_bits_retain(0b11),
            CollisionLayers::STATIC_SCAN | CollisionLayers::GENERATED
        );
    }

    #[test]
    fn test_empty_sees_nothing() {
        assert!(!CollisionLayers::empty().intersects(CollisionLayers::all()));
        assert!(CollisionLayers::default().is_empty());
    }

    #[test]
    fn test_debug_lists_names() {
        let text = format!("{:?}", CollisionLayers::STATIC_SCAN | CollisionLayers::layer(8));
        assert!(text.contains("STATIC_SCAN"));
        assert!(text.contains("0x100"));
    }

    #[test]
    fn test_mask_round_trips_through_json() {
        let mask = CollisionLayers::STATIC_SCAN | CollisionLayers::GENERATED;
        let json = serde_json::to_string(&mask).unwrap();
        assert_eq!(serde_json::from_str::<CollisionLayers>(&json).unwrap(), mask);
    }
}
