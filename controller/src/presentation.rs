//! Outbound per-tick notifications for an animator and a collider shape.

use crate::capsule::CapsuleShape;

/// One-way sink for resolved character state. Nothing flows back into the controller.
pub trait PresentationSink {
    fn update_locomotion(&mut self, speed: f32, is_crouching: bool);
    fn update_grounded(&mut self, is_grounded: bool);
    fn update_jumped(&mut self, is_jumping: bool);
    /// Called once for every successful stance transition that changed the capsule.
    fn apply_capsule(&mut self, shape: &CapsuleShape);
}

/// No animator attached.
impl PresentationSink for () {
    fn update_locomotion(&mut self, _speed: f32, _is_crouching: bool) {}
    fn update_grounded(&mut self, _is_grounded: bool) {}
    fn update_jumped(&mut self, _is_jumping: bool) {}
    fn apply_capsule(&mut self, _shape: &CapsuleShape) {}
}

impl<S: PresentationSink + ?Sized> PresentationSink for &mut S {
    fn update_locomotion(&mut self, speed: f32, is_crouching: bool) {
        (**self).update_locomotion(speed, is_crouching);
    }
    fn update_grounded(&mut self, is_grounded: bool) {
        (**self).update_grounded(is_grounded);
    }
    fn update_jumped(&mut self, is_jumping: bool) {
        (**self).update_jumped(is_jumping);
    }
    fn apply_capsule(&mut self, shape: &CapsuleShape) {
        (**self).apply_capsule(shape);
    }
}

/// Animator parameter values as last written, keyed by the animator's names.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimatorParameters {
    pub current_speed: f32,
    pub is_crouching: bool,
    pub is_grounded: bool,
    pub is_jumping: bool,
    /// Last capsule relayed to the collider, if any transition happened yet.
    pub capsule: Option<CapsuleShape>,
    /// Number of capsule changes relayed so far.
    pub capsule_changes: u32,
}

impl AnimatorParameters {
    pub const CURRENT_SPEED: &'static str = "CurrentSpeed";
    pub const IS_CROUCHING: &'static str = "IsCrouching";
    pub const IS_GROUNDED: &'static str = "IsGrounded";
    pub const IS_JUMPING: &'static str = "IsJumping";

    /// Float parameter by animator name.
    pub fn float(&self, name: &str) -> Option<f32> {
        (name == Self::CURRENT_SPEED).then_some(self.current_speed)
    }

    /// Bool parameter by animator name.
    pub fn bool(&self, name: &str) -> Option<bool> {
        match name {
            Self::IS_CROUCHING => Some(self.is_crouching),
            Self::IS_GROUNDED => Some(self.is_grounded),
            Self::IS_JUMPING => Some(self.is_jumping),
            _ => None,
        }
    }
}

impl PresentationSink for AnimatorParameters {
    fn update_locomotion(&mut self, speed: f32, is_crouching: bool) {
        self.current_speed = speed;
        self.is_crouching = is_crouching;
    }

    fn update_grounded(&mut self, is_grounded: bool) {
        self.is_grounded = is_grounded;
    }

    fn update_jumped(&mut self, is_jumping: bool) {
        self.is_jumping = is_jumping;
    }

    fn apply_capsule(&mut self, shape: &CapsuleShape) {
        self.capsule = Some(*shape);
        self.capsule_changes += 1;
    }
}
