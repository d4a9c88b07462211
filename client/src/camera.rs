//! Third-person orbit camera following the player.

use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;

use crate::{input::PlayerAction, player::Player};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
    app.add_systems(Update, orbit);
    app.add_systems(PostUpdate, follow_player);
}

const CAMERA_DECAY_RATE: f32 = 24.0;
/// Point the camera looks at, above the player's feet.
const LOOK_AT_HEIGHT: f32 = 1.4;
const MOUSE_SENSITIVITY: f32 = 0.004;
const MIN_PITCH: f32 = -1.2;
const MAX_PITCH: f32 = 0.3;

#[derive(Component)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: -0.35,
            distance: 6.0,
        }
    }
}

impl OrbitCamera {
    fn offset(&self) -> Vec3 {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0) * Vec3::Z * self.distance
    }
}

fn add_camera(mut commands: Commands) {
    let orbit = OrbitCamera::default();
    let look_at = Vec3::Y * LOOK_AT_HEIGHT;

    commands.spawn((
        bevy::core_pipeline::tonemapping::Tonemapping::AcesFitted,
        Camera3d::default(),
        Transform::from_translation(look_at + orbit.offset()).looking_at(look_at, Vec3::Y),
        DistanceFog {
            color: Color::srgba(0.35, 0.48, 0.66, 1.0),
            directional_light_color: Color::srgba(1.0, 0.95, 0.85, 0.5),
            directional_light_exponent: 30.0,
            falloff: FogFalloff::from_visibility_colors(
                1000.0, // Fog distance
                Color::srgb(0.35, 0.5, 0.66),
                Color::srgb(0.8, 0.8, 0.7),
            ),
        },
        orbit,
    ));
}

/// Mouse look while the orbit button is held.
fn orbit(actions: Res<ActionState<PlayerAction>>, mut cameras: Query<&mut OrbitCamera>) {
    if !actions.pressed(&PlayerAction::Orbit) {
        return;
    }
    let look = actions.axis_pair(&PlayerAction::Look) * MOUSE_SENSITIVITY;

    for mut orbit in &mut cameras {
        orbit.yaw -= look.x;
        orbit.pitch = (orbit.pitch - look.y).clamp(MIN_PITCH, MAX_PITCH);
    }
}

fn follow_player(
    mut camera_query: Query<(&mut Transform, &OrbitCamera), With<Camera3d>>,
    player: Single<&Transform, (With<Player>, Without<Camera3d>)>,
    time: Res<Time>,
) {
    let Ok((mut cam_tf, orbit)) = camera_query.single_mut() else {
        return;
    };

    let look_at = player.translation + Vec3::Y * LOOK_AT_HEIGHT;
    let target = look_at + orbit.offset();
    cam_tf
        .translation
        .smooth_nudge(&target, CAMERA_DECAY_RATE, time.delta_secs());
    cam_tf.look_at(look_at, Vec3::Y);
}
