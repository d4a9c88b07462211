use bevy::prelude::*;
use controller::{InputBus, InputEvent, MoveIntent};
use leafwing_input_manager::prelude::*;

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    #[actionlike(DualAxis)]
    Move,
    #[actionlike(DualAxis)]
    Look,
    /// Hold to orbit the camera with the mouse.
    Orbit,
    Jump,
    Attack,
    Sprint,
    Crouch,
}

/// The input hub the player controller subscribes to.
#[derive(Resource, Clone, Default)]
pub struct PlayerInput(pub InputBus);

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublishInput;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<PlayerAction>::default());

    app.register_type::<PlayerAction>();

    app.insert_resource(default_input_map());
    app.insert_resource(ActionState::<PlayerAction>::default());
    app.init_resource::<PlayerInput>();

    app.add_systems(Update, publish_input.in_set(PublishInput));
}

fn default_input_map() -> InputMap<PlayerAction> {
    InputMap::default()
        .with_dual_axis(PlayerAction::Move, VirtualDPad::wasd())
        .with_dual_axis(PlayerAction::Move, GamepadStick::LEFT)
        .with_dual_axis(PlayerAction::Look, MouseMove::default())
        .with(PlayerAction::Orbit, MouseButton::Right)
        .with(PlayerAction::Jump, KeyCode::Space)
        .with(PlayerAction::Jump, GamepadButton::South)
        .with(PlayerAction::Attack, MouseButton::Left)
        .with(PlayerAction::Attack, GamepadButton::West)
        .with(PlayerAction::Sprint, KeyCode::ShiftLeft)
        .with(PlayerAction::Sprint, GamepadButton::LeftThumb)
        .with(PlayerAction::Crouch, KeyCode::KeyC)
        .with(PlayerAction::Crouch, GamepadButton::East)
}

/// Forward this frame's actions to the controller's input hub.
///
/// Buttons publish once per press (sprint also once per release), never per held frame.
fn publish_input(actions: Res<ActionState<PlayerAction>>, input: Res<PlayerInput>) {
    let bus = &input.0;

    let axis = actions.clamped_axis_pair(&PlayerAction::Move);
    bus.set_move_axis(MoveIntent::new(axis.x, axis.y));

    for (action, event) in [
        (PlayerAction::Jump, InputEvent::Jump),
        (PlayerAction::Attack, InputEvent::Attack),
        (PlayerAction::Sprint, InputEvent::SprintStarted),
        (PlayerAction::Crouch, InputEvent::CrouchToggled),
    ] {
        if actions.just_pressed(&action) {
            bus.publish(event);
        }
    }
    if actions.just_released(&PlayerAction::Sprint) {
        bus.publish(InputEvent::SprintCanceled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use controller::InputSource;

    fn app() -> App {
        let mut app = App::new();
        app.insert_resource(ActionState::<PlayerAction>::default());
        app.init_resource::<PlayerInput>();
        app.add_systems(Update, publish_input);
        app
    }

    #[test]
    fn sprint_press_and_release_publish_start_and_cancel() {
        let mut app = app();
        let subscription = app.world().resource::<PlayerInput>().0.subscribe();

        app.world_mut()
            .resource_mut::<ActionState<PlayerAction>>()
            .press(&PlayerAction::Sprint);
        app.update();
        assert_eq!(subscription.drain(), vec![InputEvent::SprintStarted]);

        app.world_mut()
            .resource_mut::<ActionState<PlayerAction>>()
            .release(&PlayerAction::Sprint);
        app.update();
        assert_eq!(subscription.drain(), vec![InputEvent::SprintCanceled]);
    }

    #[test]
    fn move_axis_is_forwarded() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<ActionState<PlayerAction>>()
            .set_axis_pair(&PlayerAction::Move, Vec2::new(0.0, 1.0));
        app.update();

        let axis = app.world().resource::<PlayerInput>().0.move_axis();
        assert_eq!(axis, MoveIntent::new(0.0, 1.0));
    }
}
