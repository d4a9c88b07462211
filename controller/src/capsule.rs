use serde::{Deserialize, Serialize};

use crate::math::{Vec3, up};

/// Y-aligned character capsule, positioned relative to the body origin at the feet.
///
/// `height` is the full height including both caps; `center_y` is the offset of the
/// capsule center above the origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapsuleShape {
    pub height: f32,
    pub center_y: f32,
}

/// Which of the two fixed capsule presets is applied to the body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CapsulePreset {
    #[default]
    Standing,
    Crouching,
}

impl CapsuleShape {
    pub const fn new(height: f32, center_y: f32) -> Self {
        Self { height, center_y }
    }

    /// Half length of the cylindrical section for a capsule of `radius`.
    #[inline]
    pub fn half_segment(&self, radius: f32) -> f32 {
        (self.height * 0.5 - radius).max(0.0)
    }

    /// World-space capsule center for a body at `origin`.
    #[inline]
    pub fn center(&self, origin: Vec3) -> Vec3 {
        origin + up() * self.center_y
    }

    /// World-space centers of the bottom and top cap spheres.
    pub fn segment(&self, origin: Vec3, radius: f32) -> (Vec3, Vec3) {
        let center = self.center(origin);
        let half = self.half_segment(radius);
        (center - up() * half, center + up() * half)
    }

    /// Highest point of the capsule above `origin`.
    #[inline]
    pub fn top(&self) -> f32 {
        self.center_y + self.height * 0.5
    }
}
