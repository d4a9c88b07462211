//! Ground and overhead sensing built on [`SpatialQuery`].
//!
//! Both sensors are pure: they read the collision world and return a flag.

use crate::{
    capsule::CapsuleShape,
    math::{Vec3, up},
    physics::{LayerMask, SpatialQuery},
    settings::{CapsuleSettings, GroundSensorSettings, ObstructionSettings},
};

/// Sphere probe just below the feet that reports walkable ground contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundSensor {
    pub offset: f32,
    pub radius: f32,
    pub layers: LayerMask,
}

impl GroundSensor {
    pub fn from_settings(settings: &GroundSensorSettings) -> Self {
        Self {
            offset: settings.offset,
            radius: settings.radius,
            layers: settings.layers,
        }
    }

    #[inline]
    pub fn probe_point(&self, origin: Vec3) -> Vec3 {
        origin + up() * self.offset
    }

    pub fn sense(&self, world: &impl SpatialQuery, origin: Vec3) -> bool {
        world.check_sphere(self.probe_point(origin), self.radius, self.layers)
    }
}

/// Overhead check run before switching to the standing capsule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstructionQuery {
    pub skin: f32,
    pub layers: LayerMask,
}

impl ObstructionQuery {
    pub fn from_settings(settings: &ObstructionSettings) -> Self {
        Self {
            skin: settings.skin,
            layers: settings.layers,
        }
    }

    /// Endpoints and radius of the capsule that must be free to stand up.
    ///
    /// This is the standing capsule shrunk by `skin` on every side, so the floor
    /// under the feet never reads as an obstacle.
    pub fn standing_span(&self, origin: Vec3, capsule: &CapsuleSettings) -> (Vec3, Vec3, f32) {
        let skin = self.skin.max(0.0);
        let radius = (capsule.radius - skin).max(0.01);
        let standing: &CapsuleShape = &capsule.standing;

        let bottom = origin + up() * (capsule.radius + skin);
        let (_, top) = standing.segment(origin, capsule.radius);
        let top = if top.y < bottom.y { bottom } else { top };

        (bottom, top, radius)
    }

    pub fn is_blocked(
        &self,
        world: &impl SpatialQuery,
        origin: Vec3,
        capsule: &CapsuleSettings,
    ) -> bool {
        let (a, b, radius) = self.standing_span(origin, capsule);
        world.check_capsule(a, b, radius, self.layers)
    }
}
