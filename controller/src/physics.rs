//! Seams between the controller and a collision backend.
//!
//! The controller never owns collision geometry. It asks point-in-time questions
//! (`SpatialQuery`) and hands desired translations to a mover (`CharacterMover`),
//! both against whatever world snapshot the backend holds for the current tick.

use serde::{Deserialize, Serialize};

use crate::{
    capsule::CapsuleShape,
    math::{Quat, Vec3},
};

/// Bitmask of collision layers. Bit `n` set means layer `n` participates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: Self = Self(u32::MAX);
    pub const NONE: Self = Self(0);

    /// Mask containing only `layer` (0..32). Out-of-range layers yield `NONE`.
    pub const fn layer(layer: u32) -> Self {
        if layer < 32 { Self(1 << layer) } else { Self::NONE }
    }

    #[inline]
    pub const fn contains(&self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn union(self, other: LayerMask) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Overlap queries against solid geometry. Trigger volumes never count.
pub trait SpatialQuery {
    /// Does any solid collider on `layers` overlap the sphere?
    fn check_sphere(&self, center: Vec3, radius: f32, layers: LayerMask) -> bool;

    /// Does any solid collider on `layers` overlap the capsule spanning `a`..`b`?
    fn check_capsule(&self, a: Vec3, b: Vec3, radius: f32, layers: LayerMask) -> bool;
}

/// Result of a collision-aware body move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveOutcome {
    /// Translation actually applied after sliding along obstacles.
    pub translation: Vec3,
    /// Whether the mover ended the move supported by ground.
    pub grounded: bool,
}

/// Collision-aware body mover. Must slide along obstacles rather than tunnel.
pub trait CharacterMover {
    /// Move a capsule body whose feet are at `origin` by `desired` this tick.
    fn move_character(
        &self,
        capsule: &CapsuleShape,
        radius: f32,
        origin: Vec3,
        rotation: Quat,
        desired: Vec3,
        dt: f32,
    ) -> MoveOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_masks_combine() {
        let ground = LayerMask::layer(0);
        let props = LayerMask::layer(3);
        let both = ground.union(props);

        assert!(both.contains(ground));
        assert!(both.contains(props));
        assert!(!ground.contains(props));
        assert!(LayerMask::ALL.contains(props));
        assert!(!LayerMask::NONE.contains(LayerMask::ALL));
        assert_eq!(LayerMask::layer(40), LayerMask::NONE);
    }
}
