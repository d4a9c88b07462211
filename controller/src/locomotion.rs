//! Per-tick locomotion integration: target speed, speed damping, vertical
//! velocity, position delta and facing.
//!
//! Every function is pure over explicit inputs; `character` sequences them.

use crate::{
    constants::{FACING_EPS, GRAVITY_MPS2, GROUNDED_VERTICAL_VELOCITY, MOVE_INTENT_EPS},
    math::{Quat, Vec3, clamp01, lerp, planar_magnitude, slerp_towards, up, yaw_from_planar},
    settings::LocomotionSettings,
    stance::CharacterState,
};

/// Speed the character should approach this tick.
///
/// With no meaningful intent the target is zero. Otherwise sprint wins over crouch
/// (a character can hold both flags when a sprint could not stand it up), crouch
/// wins over walk.
pub fn target_speed(
    state: &CharacterState,
    intent_magnitude: f32,
    settings: &LocomotionSettings,
) -> f32 {
    if intent_magnitude <= MOVE_INTENT_EPS {
        return 0.0;
    }

    let mut target = settings.walk_speed;
    if state.is_crouching {
        target = settings.crouch_speed;
    }
    if state.is_sprinting {
        target = settings.sprint_speed;
    }
    target
}

/// Move `current` toward `target` by `clamp01(damping * dt)` of the gap.
///
/// Never overshoots: the fraction is clamped, so large `damping * dt` lands exactly
/// on the target instead of past it.
#[inline]
pub fn damp_speed(current: f32, target: f32, damping: f32, dt: f32) -> f32 {
    lerp(current, target, clamp01(damping * dt)).max(0.0)
}

/// Advance vertical velocity by one tick.
///
/// Grounded and not rising: pin to `GROUNDED_VERTICAL_VELOCITY` so the body keeps
/// pressing into slopes. Otherwise integrate scaled gravity.
#[inline]
pub fn integrate_vertical(
    vertical_velocity: f32,
    is_grounded: bool,
    gravity_multiplier: f32,
    dt: f32,
) -> f32 {
    if is_grounded && vertical_velocity < 0.0 {
        GROUNDED_VERTICAL_VELOCITY
    } else {
        vertical_velocity + GRAVITY_MPS2 * gravity_multiplier * dt
    }
}

/// Desired world-space translation for this tick, before collision.
#[inline]
pub fn position_delta(direction: &Vec3, speed: f32, vertical_velocity: f32, dt: f32) -> Vec3 {
    (direction * speed + up() * vertical_velocity) * dt
}

/// New facing after turning toward `direction` for one tick.
///
/// Returns `None` (keep the current facing) when the planar direction is too small
/// to define a heading.
pub fn facing(current: &Quat, direction: &Vec3, rotation_smoothing: f32, dt: f32) -> Option<Quat> {
    if planar_magnitude(direction) <= FACING_EPS {
        return None;
    }
    let target = yaw_from_planar(direction)?;
    Some(slerp_towards(current, &target, rotation_smoothing * dt))
}
