/// Gravitational acceleration along +Y in meters per second squared.
///
/// Negative: integrating it pulls the character down.
pub const GRAVITY_MPS2: f32 = -9.81;

/// Vertical velocity (m/s) the character is pinned to while grounded and not rising.
///
/// Slightly negative so the mover keeps pressing the capsule into sloped ground.
pub const GROUNDED_VERTICAL_VELOCITY: f32 = -2.0;

/// Upward velocity (m/s) above which an airborne character counts as jumping.
pub const JUMPING_VELOCITY_THRESHOLD: f32 = 0.1;

/// Minimum planar intent magnitude that selects a non-zero target speed.
pub const MOVE_INTENT_EPS: f32 = 0.01;

/// Minimum planar direction magnitude that rotates the character.
pub const FACING_EPS: f32 = 0.1;

/// Default walking speed (m/s).
pub const DEFAULT_WALK_SPEED: f32 = 3.0;

/// Default sprinting speed (m/s).
pub const DEFAULT_SPRINT_SPEED: f32 = 6.0;

/// Default crouched walking speed (m/s).
pub const DEFAULT_CROUCH_SPEED: f32 = 1.5;

/// Facing slerp rate (per second). The per-tick fraction is `rate * dt`.
pub const DEFAULT_ROTATION_SMOOTHING: f32 = 10.0;

/// Speed damping rate (per second). The per-tick fraction is `rate * dt`, clamped to 1.
pub const DEFAULT_SPEED_DAMPING: f32 = 10.0;

/// Initial upward velocity applied by a jump (m/s).
pub const DEFAULT_JUMP_FORCE: f32 = 7.0;

/// Scale applied to `GRAVITY_MPS2`.
pub const DEFAULT_GRAVITY_MULTIPLIER: f32 = 2.0;

/// Vertical offset of the ground probe from the body origin (meters).
///
/// Negative: the probe sits slightly below the feet to tolerate floating-point slack.
pub const DEFAULT_GROUNDED_OFFSET: f32 = -0.1;

/// Radius of the ground probe sphere (meters).
pub const DEFAULT_GROUND_CHECK_RADIUS: f32 = 0.1;

/// Radius of the character capsule (meters).
pub const DEFAULT_CAPSULE_RADIUS: f32 = 0.4;

/// Standing capsule: total height and center offset above the feet (meters).
pub const STANDING_CAPSULE_HEIGHT: f32 = 1.8;
pub const STANDING_CAPSULE_CENTER_Y: f32 = 0.9;

/// Crouching capsule: total height and center offset above the feet (meters).
pub const CROUCHING_CAPSULE_HEIGHT: f32 = 1.1;
pub const CROUCHING_CAPSULE_CENTER_Y: f32 = 0.55;

/// Shrink applied to the stand-up obstruction capsule (meters).
///
/// Keeps the floor under the feet and walls merely touching the body from
/// counting as obstacles.
pub const DEFAULT_OBSTRUCTION_SKIN: f32 = 0.05;
