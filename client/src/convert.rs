//! Bevy (glam) <-> controller (nalgebra) conversions.

use bevy::prelude::{Quat, Vec3};

#[inline]
pub fn to_na(v: Vec3) -> controller::Vec3 {
    controller::Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn from_na(v: &controller::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn quat_to_na(q: Quat) -> controller::Quat {
    controller::Quat::new_normalize(nalgebra::Quaternion::new(q.w, q.x, q.y, q.z))
}

#[inline]
pub fn quat_from_na(q: &controller::Quat) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}
