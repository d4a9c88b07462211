//! Math aliases and small helpers shared by the controller modules.
//!
//! Conventions
//! - Units are meters and seconds.
//! - +Y is up. Forward is -Z and right is +X, matching Bevy.

use nalgebra as na;

pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// World up axis.
#[inline]
pub fn up() -> Vec3 {
    Vec3::y()
}

#[inline]
pub fn clamp01(x: f32) -> f32 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

/// Unclamped linear interpolation. Callers clamp `t` when they need to.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// XZ components of a world-space vector.
#[inline]
pub fn planar(v: &Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

#[inline]
pub fn planar_magnitude(v: &Vec3) -> f32 {
    planar(v).norm()
}

/// Yaw-only rotation (about +Y) whose forward axis (-Z) faces `dir` in the XZ plane.
///
/// Returns `None` if the planar direction is too small to normalize.
pub fn yaw_from_planar(dir: &Vec3) -> Option<Quat> {
    let xz = planar(dir);
    if xz.norm_squared() <= 1.0e-12 {
        return None;
    }

    // Rotating -Z by `yaw` about +Y gives (-sin(yaw), 0, -cos(yaw)).
    let yaw = (-xz.x).atan2(-xz.y);
    Some(Quat::from_axis_angle(&na::Vector3::y_axis(), yaw))
}

/// Spherical interpolation from `current` toward `target` by fraction `t` (clamped to [0,1]).
///
/// Falls back to `target` when the two rotations are antipodal and slerp is undefined.
pub fn slerp_towards(current: &Quat, target: &Quat, t: f32) -> Quat {
    let t = clamp01(t);
    current.try_slerp(target, t, 1.0e-6).unwrap_or(*target)
}
