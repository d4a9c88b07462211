//! The player controller: one tick of input, locomotion, sensing and stance.

use crate::{
    basis::Basis,
    capsule::{CapsulePreset, CapsuleShape},
    input::{InputEvent, InputSource, Subscription},
    locomotion,
    math::{Quat, Vec3, planar_magnitude},
    physics::{CharacterMover, MoveOutcome, SpatialQuery},
    presentation::PresentationSink,
    sensors::{GroundSensor, ObstructionQuery},
    settings::ControllerSettings,
    stance::{CharacterState, Stance, StanceMachine, Transition},
};

/// Kinematic pose of the character. `position` is at the feet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterBody {
    pub position: Vec3,
    pub rotation: Quat,
}

impl CharacterBody {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::identity(),
        }
    }
}

impl Default for CharacterBody {
    fn default() -> Self {
        Self::at(Vec3::zeros())
    }
}

pub struct PlayerController<I: InputSource> {
    settings: ControllerSettings,
    input: I,
    subscription: Option<Subscription>,
    stance: StanceMachine,
    ground: GroundSensor,
    obstruction: ObstructionQuery,
    last_stance: Stance,
    last_move: Option<MoveOutcome>,
}

impl<I: InputSource> PlayerController<I> {
    /// Spawn a controller. It is active immediately and subscribed to `input`.
    pub fn new(settings: ControllerSettings, input: I) -> Self {
        let subscription = Some(input.subscribe());
        let ground = GroundSensor::from_settings(&settings.ground);
        let obstruction = ObstructionQuery::from_settings(&settings.obstruction);
        let stance = StanceMachine::new();
        let last_stance = stance.stance();

        Self {
            settings,
            input,
            subscription,
            stance,
            ground,
            obstruction,
            last_stance,
            last_move: None,
        }
    }

    pub fn activate(&mut self) {
        if self.subscription.is_none() {
            self.subscription = Some(self.input.subscribe());
            log::debug!("controller activated");
        }
    }

    /// Unsubscribe from input. Events published while inactive are never delivered.
    pub fn deactivate(&mut self) {
        if self.subscription.take().is_some() {
            log::debug!("controller deactivated");
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    #[inline]
    pub fn state(&self) -> &CharacterState {
        self.stance.state()
    }

    #[inline]
    pub fn stance(&self) -> Stance {
        self.stance.stance()
    }

    #[inline]
    pub fn capsule_preset(&self) -> CapsulePreset {
        self.stance.capsule()
    }

    #[inline]
    pub fn capsule_shape(&self) -> &CapsuleShape {
        self.settings.capsule.shape(self.stance.capsule())
    }

    #[inline]
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    #[inline]
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Outcome of the last collision-aware move, if any tick has run.
    #[inline]
    pub fn last_move(&self) -> Option<MoveOutcome> {
        self.last_move
    }

    /// Advance the character by `dt` seconds.
    ///
    /// `view` is the camera basis for this frame; `None` falls back to world axes.
    pub fn tick<W, S>(
        &mut self,
        dt: f32,
        view: Option<Basis>,
        world: &W,
        body: &mut CharacterBody,
        sink: &mut S,
    ) where
        W: SpatialQuery + CharacterMover,
        S: PresentationSink + ?Sized,
    {
        if !self.is_active() {
            return;
        }
        if !(dt.is_finite() && dt > 0.0) {
            // Events of a skipped tick are dropped, never carried into the next one.
            let dropped = self.subscription.as_ref().map_or(0, |s| s.drain().len());
            log::debug!("skipping tick with dt = {dt}, dropped {dropped} input events");
            return;
        }

        let events = self
            .subscription
            .as_ref()
            .map(Subscription::drain)
            .unwrap_or_default();
        for event in events {
            self.handle_event(event, world, body.position, sink);
        }

        let basis = view.unwrap_or_else(Basis::world);
        let direction = basis.desired_direction(self.input.move_axis());

        let loco = &self.settings.locomotion;
        let state = *self.stance.state();

        let delta = locomotion::position_delta(
            &direction,
            state.current_speed,
            state.vertical_velocity,
            dt,
        );
        let outcome = world.move_character(
            self.settings.capsule.shape(self.stance.capsule()),
            self.settings.capsule.radius,
            body.position,
            body.rotation,
            delta,
            dt,
        );
        body.position += outcome.translation;
        self.last_move = Some(outcome);

        if let Some(rotation) =
            locomotion::facing(&body.rotation, &direction, loco.rotation_smoothing, dt)
        {
            body.rotation = rotation;
        }

        let target = locomotion::target_speed(&state, planar_magnitude(&direction), loco);
        self.stance.set_current_speed(locomotion::damp_speed(
            state.current_speed,
            target,
            loco.speed_damping,
            dt,
        ));

        let grounded = self.ground.sense(world, body.position);
        self.stance.set_grounded(grounded);

        self.stance.set_vertical_velocity(locomotion::integrate_vertical(
            state.vertical_velocity,
            grounded,
            loco.gravity_multiplier,
            dt,
        ));
        self.stance.derive_airborne();

        let state = self.stance.state();
        sink.update_locomotion(state.current_speed, state.is_crouching);
        sink.update_grounded(state.is_grounded);
        sink.update_jumped(state.is_jumping);

        let stance = self.stance.stance();
        if stance != self.last_stance {
            log::debug!("stance {:?} -> {:?}", self.last_stance, stance);
            self.last_stance = stance;
        }

        debug_assert!(
            self.stance.invariant_violation().is_none(),
            "stance invariant broken: {:?} ({:?})",
            self.stance.invariant_violation(),
            self.stance.state()
        );
    }

    fn handle_event<W, S>(&mut self, event: InputEvent, world: &W, origin: Vec3, sink: &mut S)
    where
        W: SpatialQuery,
        S: PresentationSink + ?Sized,
    {
        let Self {
            settings,
            stance,
            obstruction,
            ..
        } = self;
        let blocked = || obstruction.is_blocked(world, origin, &settings.capsule);

        let transition = match event {
            InputEvent::Jump => stance.jump(settings.locomotion.jump_force),
            InputEvent::SprintStarted => stance.sprint_start(blocked),
            InputEvent::SprintCanceled => stance.sprint_end(),
            InputEvent::CrouchToggled => stance.crouch_toggle(blocked),
            InputEvent::Attack => {
                log::trace!("attack ignored");
                return;
            }
        };

        if let Transition::CapsuleChanged(preset) = transition {
            sink.apply_capsule(settings.capsule.shape(preset));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        input::{InputBus, MoveIntent},
        math::yaw_from_planar,
        physics::LayerMask,
        presentation::AnimatorParameters,
    };

    const DT: f32 = 1.0 / 60.0;

    /// Flat floor at y = 0 with an optional ceiling.
    struct Room {
        ceiling: Option<f32>,
    }

    impl Room {
        fn open() -> Self {
            Self { ceiling: None }
        }

        fn low_ceiling(height: f32) -> Self {
            Self {
                ceiling: Some(height),
            }
        }
    }

    impl SpatialQuery for Room {
        fn check_sphere(&self, center: Vec3, radius: f32, layers: LayerMask) -> bool {
            self.check_capsule(center, center, radius, layers)
        }

        fn check_capsule(&self, a: Vec3, b: Vec3, radius: f32, _layers: LayerMask) -> bool {
            let low = a.y.min(b.y) - radius;
            let high = a.y.max(b.y) + radius;
            low < 0.0 || self.ceiling.is_some_and(|c| high > c)
        }
    }

    impl CharacterMover for Room {
        fn move_character(
            &self,
            _capsule: &CapsuleShape,
            _radius: f32,
            origin: Vec3,
            _rotation: Quat,
            desired: Vec3,
            _dt: f32,
        ) -> MoveOutcome {
            let mut translation = desired;
            if origin.y + translation.y < 0.0 {
                translation.y = -origin.y;
            }
            MoveOutcome {
                translation,
                grounded: (origin.y + translation.y).abs() < 1.0e-4,
            }
        }
    }

    fn spawn() -> (InputBus, PlayerController<InputBus>) {
        let bus = InputBus::new();
        let controller = PlayerController::new(ControllerSettings::default(), bus.clone());
        (bus, controller)
    }

    fn run(
        controller: &mut PlayerController<InputBus>,
        world: &Room,
        body: &mut CharacterBody,
        sink: &mut AnimatorParameters,
        ticks: usize,
    ) {
        for _ in 0..ticks {
            controller.tick(DT, None, world, body, sink);
            let s = controller.state();
            assert!(!(s.is_grounded && s.is_jumping));
            assert_eq!(controller.stance.invariant_violation(), None);
        }
    }

    #[test]
    fn spawn_subscribes_and_deactivate_unsubscribes() {
        let (bus, mut controller) = spawn();
        assert!(controller.is_active());
        assert_eq!(bus.subscriber_count(), 1);

        controller.deactivate();
        assert!(!controller.is_active());
        assert_eq!(bus.subscriber_count(), 0);

        controller.activate();
        controller.activate();
        assert_eq!(bus.subscriber_count(), 1);

        drop(controller);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn events_published_while_inactive_are_dropped() {
        let (bus, mut controller) = spawn();
        let mut body = CharacterBody::default();
        let mut sink = AnimatorParameters::default();

        controller.deactivate();
        bus.publish(InputEvent::Jump);
        controller.tick(DT, None, &Room::open(), &mut body, &mut sink);
        assert_eq!(body, CharacterBody::default());

        controller.activate();
        controller.tick(DT, None, &Room::open(), &mut body, &mut sink);
        assert!(controller.state().vertical_velocity < 0.0);
        assert_eq!(body.position.y, 0.0);
    }

    #[test]
    fn non_positive_dt_is_a_no_op() {
        let (bus, mut controller) = spawn();
        let mut body = CharacterBody::default();
        let mut sink = AnimatorParameters::default();
        bus.set_move_axis(MoveIntent::new(0.0, 1.0));

        for dt in [0.0, -0.5, f32::NAN, f32::INFINITY] {
            controller.tick(dt, None, &Room::open(), &mut body, &mut sink);
        }
        assert_eq!(body, CharacterBody::default());
        assert_eq!(*controller.state(), CharacterState::default());
        assert!(controller.last_move().is_none());
    }

    #[test]
    fn events_of_a_skipped_tick_are_not_replayed() {
        let (bus, mut controller) = spawn();
        let mut body = CharacterBody::default();
        let mut sink = AnimatorParameters::default();

        bus.publish(InputEvent::Jump);
        bus.publish(InputEvent::CrouchToggled);
        controller.tick(0.0, None, &Room::open(), &mut body, &mut sink);

        controller.tick(DT, None, &Room::open(), &mut body, &mut sink);
        let s = controller.state();
        assert!(s.vertical_velocity <= 0.0);
        assert!(!s.is_jumping && !s.is_crouching);
        assert_eq!(body.position.y, 0.0);
        assert_eq!(sink.capsule_changes, 0);
    }

    #[test]
    fn walks_forward_along_world_axes_without_a_camera() {
        let (bus, mut controller) = spawn();
        let mut body = CharacterBody::default();
        let mut sink = AnimatorParameters::default();
        bus.set_move_axis(MoveIntent::new(0.0, 1.0));

        run(&mut controller, &Room::open(), &mut body, &mut sink, 120);

        assert!(body.position.z < -4.0, "moved {:?}", body.position);
        assert!(body.position.x.abs() < 1.0e-4);
        assert_eq!(body.position.y, 0.0);
        assert!((sink.current_speed - 3.0).abs() < 1.0e-3);
        assert!(sink.is_grounded);
        assert!(!sink.is_jumping);
        assert_eq!(controller.stance(), Stance::Walk);
    }

    #[test]
    fn movement_follows_the_camera_basis() {
        let (bus, mut controller) = spawn();
        let mut body = CharacterBody::default();
        let mut sink = AnimatorParameters::default();
        bus.set_move_axis(MoveIntent::new(0.0, 1.0));

        // Camera looking down +X, pitched downward.
        let view = Basis::from_view(Vec3::new(1.0, -0.5, 0.0), Vec3::new(0.0, 0.0, 1.0));
        for _ in 0..60 {
            controller.tick(DT, Some(view), &Room::open(), &mut body, &mut sink);
        }
        assert!(body.position.x > 0.5);
        assert!(body.position.z.abs() < 1.0e-4);
    }

    #[test]
    fn facing_turns_gradually_toward_movement() {
        let (bus, mut controller) = spawn();
        let mut body = CharacterBody::default();
        let mut sink = ();
        bus.set_move_axis(MoveIntent::new(1.0, 0.0));

        let target = yaw_from_planar(&Vec3::new(1.0, 0.0, 0.0)).unwrap();
        controller.tick(DT, None, &Room::open(), &mut body, &mut sink);
        let after_one = body.rotation.angle_to(&target);
        assert!(after_one > 0.1, "must not snap");

        for _ in 0..240 {
            controller.tick(DT, None, &Room::open(), &mut body, &mut sink);
        }
        assert!(body.rotation.angle_to(&target) < 1.0e-2);
    }

    #[test]
    fn idle_input_keeps_facing() {
        let (_bus, mut controller) = spawn();
        let start = yaw_from_planar(&Vec3::new(1.0, 0.0, 1.0)).unwrap();
        let mut body = CharacterBody {
            position: Vec3::zeros(),
            rotation: start,
        };
        controller.tick(DT, None, &Room::open(), &mut body, &mut ());
        assert_eq!(body.rotation, start);
    }

    #[test]
    fn sprint_reaches_target_in_one_tick_at_unit_damping_fraction() {
        let (bus, mut controller) = spawn();
        let mut body = CharacterBody::default();
        let mut sink = AnimatorParameters::default();
        bus.set_move_axis(MoveIntent::new(0.0, 1.0));
        bus.publish(InputEvent::SprintStarted);

        controller.tick(0.1, None, &Room::open(), &mut body, &mut sink);
        assert_eq!(controller.state().current_speed, 6.0);
        assert_eq!(sink.current_speed, 6.0);
    }

    #[test]
    fn jump_rises_then_lands() {
        let (bus, mut controller) = spawn();
        let mut body = CharacterBody::default();
        let mut sink = AnimatorParameters::default();
        let world = Room::open();

        bus.publish(InputEvent::Jump);
        run(&mut controller, &world, &mut body, &mut sink, 5);
        assert!(body.position.y > 0.3);
        assert!(controller.state().is_jumping);
        assert!(sink.is_jumping);
        assert!(!sink.is_grounded);

        // Mid-air jump does nothing.
        let vv = controller.state().vertical_velocity;
        bus.publish(InputEvent::Jump);
        controller.tick(DT, None, &world, &mut body, &mut sink);
        let expected = vv + crate::GRAVITY_MPS2 * 2.0 * DT;
        assert!((controller.state().vertical_velocity - expected).abs() < 1.0e-4);

        run(&mut controller, &world, &mut body, &mut sink, 120);
        assert_eq!(body.position.y, 0.0);
        assert!(sink.is_grounded);
        assert!(!sink.is_jumping);
        assert_eq!(
            controller.state().vertical_velocity,
            crate::GROUNDED_VERTICAL_VELOCITY
        );
    }

    #[test]
    fn crouch_relays_capsule_and_slows_down() {
        let (bus, mut controller) = spawn();
        let mut body = CharacterBody::default();
        let mut sink = AnimatorParameters::default();
        bus.set_move_axis(MoveIntent::new(0.0, 1.0));
        bus.publish(InputEvent::CrouchToggled);

        run(&mut controller, &Room::open(), &mut body, &mut sink, 120);

        assert!(sink.is_crouching);
        assert_eq!(sink.capsule, Some(*controller.capsule_shape()));
        assert_eq!(sink.capsule_changes, 1);
        assert_eq!(controller.capsule_preset(), CapsulePreset::Crouching);
        assert!((sink.current_speed - 1.5).abs() < 1.0e-3);
        assert_eq!(controller.stance(), Stance::Crouch);
    }

    #[test]
    fn cannot_stand_up_under_a_low_ceiling() {
        let (bus, mut controller) = spawn();
        let mut body = CharacterBody::default();
        let mut sink = AnimatorParameters::default();

        bus.publish(InputEvent::CrouchToggled);
        controller.tick(DT, None, &Room::open(), &mut body, &mut sink);
        assert!(controller.state().is_crouching);

        let tunnel = Room::low_ceiling(1.4);
        bus.publish(InputEvent::CrouchToggled);
        controller.tick(DT, None, &tunnel, &mut body, &mut sink);
        assert!(controller.state().is_crouching);
        assert_eq!(controller.capsule_preset(), CapsulePreset::Crouching);
        assert_eq!(sink.capsule_changes, 1);

        bus.publish(InputEvent::CrouchToggled);
        controller.tick(DT, None, &Room::open(), &mut body, &mut sink);
        assert!(!controller.state().is_crouching);
        assert_eq!(controller.capsule_preset(), CapsulePreset::Standing);
        assert_eq!(sink.capsule_changes, 2);
    }

    #[test]
    fn cannot_crouch_while_standing_under_a_low_ceiling() {
        let (bus, mut controller) = spawn();
        let mut body = CharacterBody::default();
        let mut sink = AnimatorParameters::default();

        bus.publish(InputEvent::CrouchToggled);
        controller.tick(DT, None, &Room::low_ceiling(1.4), &mut body, &mut sink);

        assert!(!controller.state().is_crouching);
        assert_eq!(controller.capsule_preset(), CapsulePreset::Standing);
        assert!(!sink.is_crouching);
        assert_eq!(sink.capsule_changes, 0);
        assert_eq!(sink.capsule, None);
    }

    #[test]
    fn sprinting_under_a_low_ceiling_stays_crouched_at_sprint_speed() {
        let (bus, mut controller) = spawn();
        let mut body = CharacterBody::default();
        let mut sink = AnimatorParameters::default();
        let tunnel = Room::low_ceiling(1.4);

        bus.publish(InputEvent::CrouchToggled);
        controller.tick(DT, None, &Room::open(), &mut body, &mut sink);
        assert!(controller.state().is_crouching);

        bus.set_move_axis(MoveIntent::new(0.0, 1.0));
        bus.publish(InputEvent::SprintStarted);
        run(&mut controller, &tunnel, &mut body, &mut sink, 120);

        let s = controller.state();
        assert!(s.is_sprinting);
        assert!(s.is_crouching);
        assert!((s.current_speed - 6.0).abs() < 1.0e-3);

        bus.publish(InputEvent::SprintCanceled);
        run(&mut controller, &tunnel, &mut body, &mut sink, 120);
        assert!(!controller.state().is_sprinting);
        assert!((controller.state().current_speed - 1.5).abs() < 1.0e-3);
    }

    #[test]
    fn attack_changes_nothing() {
        let (bus, mut controller) = spawn();
        let mut body = CharacterBody::default();
        let mut sink = AnimatorParameters::default();

        bus.publish(InputEvent::Attack);
        controller.tick(DT, None, &Room::open(), &mut body, &mut sink);

        let s = controller.state();
        assert!(!s.is_crouching && !s.is_sprinting && !s.is_jumping);
        assert_eq!(sink.capsule_changes, 0);
    }
}
