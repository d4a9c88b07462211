/*!
Tunable controller parameters.

Defaults come from `crate::constants`. The whole tree is serde-friendly so a
frontend can load it from a data file; call [`ControllerSettings::validate`]
after loading anything that did not come from `Default`.

Notes
- Distances are in meters, time in seconds, angles in degrees.
- Rates (`rotation_smoothing`, `speed_damping`) are per-second factors: the
  per-tick fraction is `rate * dt`, so they must be tuned for the tick rate.
*/

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    capsule::{CapsulePreset, CapsuleShape},
    constants::*,
    physics::LayerMask,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    pub locomotion: LocomotionSettings,
    pub ground: GroundSensorSettings,
    pub obstruction: ObstructionSettings,
    pub capsule: CapsuleSettings,
    pub kcc: KccSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionSettings {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub crouch_speed: f32,
    /// Facing slerp rate (per second).
    pub rotation_smoothing: f32,
    /// Speed damping rate (per second).
    pub speed_damping: f32,
    /// Upward velocity set by a jump (m/s).
    pub jump_force: f32,
    pub gravity_multiplier: f32,
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            walk_speed: DEFAULT_WALK_SPEED,
            sprint_speed: DEFAULT_SPRINT_SPEED,
            crouch_speed: DEFAULT_CROUCH_SPEED,
            rotation_smoothing: DEFAULT_ROTATION_SMOOTHING,
            speed_damping: DEFAULT_SPEED_DAMPING,
            jump_force: DEFAULT_JUMP_FORCE,
            gravity_multiplier: DEFAULT_GRAVITY_MULTIPLIER,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundSensorSettings {
    /// Vertical offset of the probe center from the feet. Must be negative.
    pub offset: f32,
    pub radius: f32,
    /// Layers that count as walkable ground.
    pub layers: LayerMask,
}

impl Default for GroundSensorSettings {
    fn default() -> Self {
        Self {
            offset: DEFAULT_GROUNDED_OFFSET,
            radius: DEFAULT_GROUND_CHECK_RADIUS,
            layers: LayerMask::ALL,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstructionSettings {
    /// Shrink applied to the stand-up capsule's radius and bottom.
    pub skin: f32,
    /// Layers that can block standing up.
    pub layers: LayerMask,
}

impl Default for ObstructionSettings {
    fn default() -> Self {
        Self {
            skin: DEFAULT_OBSTRUCTION_SKIN,
            layers: LayerMask::ALL,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsuleSettings {
    pub radius: f32,
    pub standing: CapsuleShape,
    pub crouching: CapsuleShape,
}

impl CapsuleSettings {
    pub fn shape(&self, preset: CapsulePreset) -> &CapsuleShape {
        match preset {
            CapsulePreset::Standing => &self.standing,
            CapsulePreset::Crouching => &self.crouching,
        }
    }
}

impl Default for CapsuleSettings {
    fn default() -> Self {
        Self {
            radius: DEFAULT_CAPSULE_RADIUS,
            standing: CapsuleShape::new(STANDING_CAPSULE_HEIGHT, STANDING_CAPSULE_CENTER_Y),
            crouching: CapsuleShape::new(CROUCHING_CAPSULE_HEIGHT, CROUCHING_CAPSULE_CENTER_Y),
        }
    }
}

/// Kinematic character controller (KCC) settings for the physical body mover.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KccSettings {
    /// Small gap preserved between the character and its surroundings (meters).
    /// Keep `offset` small but non-zero for numerical stability.
    pub offset: f32,
    /// Maximum climbable slope angle (degrees).
    pub max_slope_climb_deg: f32,
    /// Minimum slope angle (degrees) before automatic sliding starts.
    pub min_slope_slide_deg: f32,
    /// Autostep maximum height (meters). Zero disables autostep.
    pub autostep_max_height: f32,
    /// Autostep minimum width (meters).
    pub autostep_min_width: f32,
    /// Snap-to-ground distance (meters). Zero disables snapping.
    pub snap_to_ground: f32,
    /// Increase if the character gets stuck when sliding (small, meters).
    pub normal_nudge_factor: f32,
}

impl Default for KccSettings {
    fn default() -> Self {
        Self {
            offset: 0.01,
            max_slope_climb_deg: 45.0,
            min_slope_slide_deg: 30.0,
            autostep_max_height: 0.3,
            autostep_min_width: 0.2,
            snap_to_ground: 0.2,
            normal_nudge_factor: 1.0e-4,
        }
    }
}

/// Why a settings tree was rejected.
#[derive(Clone, Debug, PartialEq)]
pub enum SettingsError {
    NotFinite(&'static str),
    NotPositive(&'static str),
    GroundOffsetNotNegative(f32),
    CrouchNotShorter { standing: f32, crouching: f32 },
    RadiusTooLarge { preset: CapsulePreset, radius: f32 },
    SlopeOutOfRange(&'static str),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinite(field) => write!(f, "`{field}` must be finite"),
            Self::NotPositive(field) => write!(f, "`{field}` must be greater than zero"),
            Self::GroundOffsetNotNegative(v) => {
                write!(f, "ground probe offset must be negative, got {v}")
            }
            Self::CrouchNotShorter {
                standing,
                crouching,
            } => write!(
                f,
                "crouching capsule ({crouching} m) must be shorter than standing capsule ({standing} m)"
            ),
            Self::RadiusTooLarge { preset, radius } => write!(
                f,
                "capsule radius {radius} m does not fit the {preset:?} capsule"
            ),
            Self::SlopeOutOfRange(field) => write!(f, "`{field}` must be within 0..90 degrees"),
        }
    }
}

impl std::error::Error for SettingsError {}

impl ControllerSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        let l = &self.locomotion;
        let positive = [
            ("locomotion.walk_speed", l.walk_speed),
            ("locomotion.sprint_speed", l.sprint_speed),
            ("locomotion.crouch_speed", l.crouch_speed),
            ("locomotion.rotation_smoothing", l.rotation_smoothing),
            ("locomotion.speed_damping", l.speed_damping),
            ("locomotion.jump_force", l.jump_force),
            ("locomotion.gravity_multiplier", l.gravity_multiplier),
            ("ground.radius", self.ground.radius),
            ("capsule.radius", self.capsule.radius),
            ("capsule.standing.height", self.capsule.standing.height),
            ("capsule.crouching.height", self.capsule.crouching.height),
            ("kcc.offset", self.kcc.offset),
        ];
        for (field, value) in positive {
            if !value.is_finite() {
                return Err(SettingsError::NotFinite(field));
            }
            if value <= 0.0 {
                return Err(SettingsError::NotPositive(field));
            }
        }

        let finite = [
            ("ground.offset", self.ground.offset),
            ("obstruction.skin", self.obstruction.skin),
            ("capsule.standing.center_y", self.capsule.standing.center_y),
            ("capsule.crouching.center_y", self.capsule.crouching.center_y),
            ("kcc.autostep_max_height", self.kcc.autostep_max_height),
            ("kcc.autostep_min_width", self.kcc.autostep_min_width),
            ("kcc.snap_to_ground", self.kcc.snap_to_ground),
            ("kcc.normal_nudge_factor", self.kcc.normal_nudge_factor),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(SettingsError::NotFinite(field));
            }
        }

        if self.ground.offset >= 0.0 {
            return Err(SettingsError::GroundOffsetNotNegative(self.ground.offset));
        }

        let standing = self.capsule.standing.height;
        let crouching = self.capsule.crouching.height;
        if crouching >= standing {
            return Err(SettingsError::CrouchNotShorter {
                standing,
                crouching,
            });
        }

        let radius = self.capsule.radius;
        for preset in [CapsulePreset::Standing, CapsulePreset::Crouching] {
            if radius * 2.0 > self.capsule.shape(preset).height {
                return Err(SettingsError::RadiusTooLarge { preset, radius });
            }
        }

        for (field, deg) in [
            ("kcc.max_slope_climb_deg", self.kcc.max_slope_climb_deg),
            ("kcc.min_slope_slide_deg", self.kcc.min_slope_slide_deg),
        ] {
            if !(0.0..=90.0).contains(&deg) {
                return Err(SettingsError::SlopeOutOfRange(field));
            }
        }

        Ok(())
    }
}
