use crate::{
    input::MoveIntent,
    math::{Vec3, planar_magnitude},
};

/// Horizontal forward/right axes that map a 2D move intent to a world direction.
///
/// Both axes have a zero Y component and are either unit length or zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl Basis {
    /// World-aligned axes, used when no camera is available.
    pub fn world() -> Self {
        Self {
            forward: Vec3::new(0.0, 0.0, -1.0),
            right: Vec3::new(1.0, 0.0, 0.0),
        }
    }

    /// Build a basis from a view's forward and right axes.
    ///
    /// The vertical part of each axis is dropped before normalizing, so a pitched
    /// camera still yields horizontal movement. An axis with no horizontal part
    /// (e.g. looking straight down) becomes zero.
    pub fn from_view(view_forward: Vec3, view_right: Vec3) -> Self {
        Self {
            forward: flatten(view_forward),
            right: flatten(view_right),
        }
    }

    /// World-space move direction for `intent`, never longer than 1.
    ///
    /// Only normalized when the combination exceeds unit length, so partial analog
    /// input keeps its magnitude.
    pub fn desired_direction(&self, intent: MoveIntent) -> Vec3 {
        let desired = self.forward * intent.y() + self.right * intent.x();
        if desired.norm_squared() > 1.0 {
            desired.normalize()
        } else {
            desired
        }
    }
}

impl Default for Basis {
    fn default() -> Self {
        Self::world()
    }
}

fn flatten(v: Vec3) -> Vec3 {
    let flat = Vec3::new(v.x, 0.0, v.z);
    if !flat.iter().all(|c| c.is_finite()) || planar_magnitude(&flat) <= 1.0e-6 {
        return Vec3::zeros();
    }
    flat.normalize()
}
