//! Stance state machine.
//!
//! Stance is stored as independent flags rather than one enum: a character can be
//! sprinting while still crouched when something overhead kept it from standing.
//! [`Stance`] is a derived, read-only classification for logging and presentation.

use crate::{capsule::CapsulePreset, constants::JUMPING_VELOCITY_THRESHOLD};

/// Mutable per-character movement state. Created at spawn, mutated once per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterState {
    /// Smoothed planar speed (m/s), always >= 0.
    pub current_speed: f32,
    /// Signed vertical velocity (m/s).
    pub vertical_velocity: f32,
    pub is_grounded: bool,
    pub is_crouching: bool,
    pub is_sprinting: bool,
    /// Derived every tick from grounded + vertical velocity; never set by events.
    pub is_jumping: bool,
}

impl Default for CharacterState {
    /// Spawn state: grounded, idle, standing.
    fn default() -> Self {
        Self {
            current_speed: 0.0,
            vertical_velocity: 0.0,
            is_grounded: true,
            is_crouching: false,
            is_sprinting: false,
            is_jumping: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stance {
    Idle,
    Walk,
    Sprint,
    Crouch,
    Rising,
    Falling,
}

impl Stance {
    /// Speed below which a grounded, uncrouched character reads as idle.
    pub const IDLE_SPEED: f32 = 0.05;

    pub fn classify(state: &CharacterState) -> Self {
        if !state.is_grounded {
            return if state.vertical_velocity > 0.0 {
                Stance::Rising
            } else {
                Stance::Falling
            };
        }
        if state.is_crouching {
            return Stance::Crouch;
        }
        if state.current_speed < Self::IDLE_SPEED {
            return Stance::Idle;
        }
        if state.is_sprinting {
            Stance::Sprint
        } else {
            Stance::Walk
        }
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self, Stance::Rising | Stance::Falling)
    }
}

/// Outcome of a discrete transition attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Flags may have changed; the capsule did not.
    Applied,
    /// Flags changed and the given capsule preset must be applied to the body.
    CapsuleChanged(CapsulePreset),
    /// Nothing changed.
    Rejected(RejectReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    Airborne,
    Obstructed,
}

/// Owner of [`CharacterState`] and the applied capsule preset.
///
/// Crouch flag and capsule preset only ever change together, so an observer can
/// never see a crouching flag with the standing capsule or the reverse.
#[derive(Clone, Debug, Default)]
pub struct StanceMachine {
    state: CharacterState,
    capsule: CapsulePreset,
}

impl StanceMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    #[inline]
    pub fn capsule(&self) -> CapsulePreset {
        self.capsule
    }

    #[inline]
    pub fn stance(&self) -> Stance {
        Stance::classify(&self.state)
    }

    /// Start a jump if grounded. No double jumps, no buffering.
    pub fn jump(&mut self, jump_force: f32) -> Transition {
        if !self.state.is_grounded {
            log::debug!("jump ignored: airborne");
            return Transition::Rejected(RejectReason::Airborne);
        }
        self.state.vertical_velocity = jump_force;
        log::debug!("jump: vertical velocity {jump_force}");
        Transition::Applied
    }

    /// Begin sprinting and try to stand up.
    ///
    /// The sprint flag is set even when standing up is obstructed, leaving the
    /// character sprinting while crouched. `obstructed` is only evaluated when
    /// the character is crouching.
    pub fn sprint_start(&mut self, obstructed: impl FnOnce() -> bool) -> Transition {
        self.state.is_sprinting = true;

        if !self.state.is_crouching {
            log::debug!("sprint started");
            return Transition::Applied;
        }

        if obstructed() {
            log::debug!("sprint started; still crouched, standing up is obstructed");
            return Transition::Applied;
        }

        self.set_crouching(false);
        log::debug!("sprint started; stood up");
        Transition::CapsuleChanged(CapsulePreset::Standing)
    }

    pub fn sprint_end(&mut self) -> Transition {
        self.state.is_sprinting = false;
        log::debug!("sprint ended");
        Transition::Applied
    }

    /// Flip between crouching and standing.
    ///
    /// Rejected outright when `obstructed` reports a blocker over the standing
    /// span, in either direction: a standing character boxed in overhead keeps
    /// its capsule too.
    pub fn crouch_toggle(&mut self, obstructed: impl FnOnce() -> bool) -> Transition {
        if obstructed() {
            log::debug!("crouch toggle rejected: obstructed");
            return Transition::Rejected(RejectReason::Obstructed);
        }

        if self.state.is_crouching {
            self.set_crouching(false);
            log::debug!("stood up");
            Transition::CapsuleChanged(CapsulePreset::Standing)
        } else {
            self.set_crouching(true);
            log::debug!("crouched");
            Transition::CapsuleChanged(CapsulePreset::Crouching)
        }
    }

    pub fn set_grounded(&mut self, grounded: bool) {
        if grounded != self.state.is_grounded {
            log::trace!("grounded -> {grounded}");
        }
        self.state.is_grounded = grounded;
    }

    pub fn set_current_speed(&mut self, speed: f32) {
        self.state.current_speed = speed.max(0.0);
    }

    pub fn set_vertical_velocity(&mut self, vertical_velocity: f32) {
        self.state.vertical_velocity = vertical_velocity;
    }

    /// Recompute `is_jumping` from this tick's grounded flag and vertical velocity.
    pub fn derive_airborne(&mut self) {
        self.state.is_jumping =
            !self.state.is_grounded && self.state.vertical_velocity > JUMPING_VELOCITY_THRESHOLD;
    }

    /// First broken invariant, if any.
    pub fn invariant_violation(&self) -> Option<&'static str> {
        let s = &self.state;
        if s.is_jumping && s.is_grounded {
            return Some("jumping while grounded");
        }
        if !(s.current_speed >= 0.0) {
            return Some("negative or NaN current speed");
        }
        let expected = if s.is_crouching {
            CapsulePreset::Crouching
        } else {
            CapsulePreset::Standing
        };
        if self.capsule != expected {
            return Some("capsule preset does not match crouch flag");
        }
        None
    }

    fn set_crouching(&mut self, crouching: bool) {
        self.state.is_crouching = crouching;
        self.capsule = if crouching {
            CapsulePreset::Crouching
        } else {
            CapsulePreset::Standing
        };
    }
}
