use bevy::prelude::*;
use controller::{AnimatorParameters, Basis, CharacterBody, InputBus, PlayerController};

use crate::{
    config::ControllerConfig,
    convert::{from_na, quat_from_na, quat_to_na, to_na},
    input::{PlayerInput, PublishInput},
    world::PhysicsWorld,
};

mod presentation;

/// Feet position of the player at startup.
const SPAWN_POINT: Vec3 = Vec3::new(0.0, 0.05, 10.0);

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_player);

    // Input is published first so this frame's presses reach this frame's tick.
    app.add_systems(
        Update,
        (tick_player.after(PublishInput), presentation::apply_capsule).chain(),
    );
}

#[derive(Component)]
pub struct Player;

/// The locomotion and stance controller driving this character.
#[derive(Component)]
pub struct CharacterController(pub PlayerController<InputBus>);

/// Animator parameters written by the controller every tick.
#[derive(Component, Default, Debug)]
pub struct Animator(pub AnimatorParameters);

fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<ControllerConfig>,
    input: Res<PlayerInput>,
) {
    let settings = config.0.clone();
    let capsule = settings.capsule.standing;
    let radius = settings.capsule.radius;
    let controller = PlayerController::new(settings, input.0.clone());

    let body_material = materials.add(Color::linear_rgb(0.2, 0.9, 0.8));
    let nose_material = materials.add(Color::linear_rgb(0.9, 0.2, 0.2));

    commands
        .spawn((
            Player,
            Name::new("Player"),
            CharacterController(controller),
            Animator::default(),
            Transform::from_translation(SPAWN_POINT),
            Visibility::default(),
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    presentation::PlayerVisual::default(),
                    Mesh3d(meshes.add(presentation::capsule_mesh(&capsule, radius))),
                    MeshMaterial3d(body_material),
                    Transform::from_xyz(0.0, capsule.center_y, 0.0),
                ))
                .with_children(|visual| {
                    // Marks the facing direction (-Z).
                    visual.spawn((
                        Mesh3d(meshes.add(Cuboid::new(0.15, 0.15, 0.3))),
                        MeshMaterial3d(nose_material),
                        Transform::from_xyz(0.0, 0.3, -radius),
                    ));
                });
        });

    info!("spawned player at {SPAWN_POINT}");
}

/// One controller tick per rendered frame.
fn tick_player(
    time: Res<Time>,
    physics: Res<PhysicsWorld>,
    camera: Query<&GlobalTransform, With<Camera3d>>,
    mut players: Query<
        (&mut Transform, &mut CharacterController, &mut Animator),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();

    // No camera: the controller falls back to world axes.
    let view = match camera.single() {
        Ok(gt) => Some(Basis::from_view(to_na(*gt.forward()), to_na(*gt.right()))),
        Err(_) => {
            warn_once!("no single camera found, moving along world axes");
            None
        }
    };

    for (mut transform, mut controller, mut animator) in &mut players {
        let mut body = CharacterBody {
            position: to_na(transform.translation),
            rotation: quat_to_na(transform.rotation),
        };

        controller
            .0
            .tick(dt, view, &physics.0, &mut body, &mut animator.0);

        transform.translation = from_na(&body.position);
        transform.rotation = quat_from_na(&body.rotation);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use controller::{
        ColliderShapeDef, ControllerSettings, MoveIntent, RapierQueryWorld, WorldStaticDef,
        settings::KccSettings,
    };

    use super::*;

    const TICKS: usize = 60;

    fn app() -> (App, InputBus) {
        let bus = InputBus::new();
        let ground = WorldStaticDef::solid(
            1,
            controller::Vec3::zeros(),
            ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        );

        let mut app = App::new();
        app.insert_resource(Time::<()>::default());
        app.insert_resource(PhysicsWorld(RapierQueryWorld::build(
            vec![ground],
            &KccSettings::default(),
        )));
        app.add_systems(Update, tick_player);
        app.world_mut().spawn((
            Player,
            CharacterController(PlayerController::new(
                ControllerSettings::default(),
                bus.clone(),
            )),
            Animator::default(),
            Transform::from_translation(SPAWN_POINT),
        ));
        (app, bus)
    }

    fn walk_forward(app: &mut App, bus: &InputBus) -> Vec3 {
        bus.set_move_axis(MoveIntent::new(0.0, 1.0));
        for _ in 0..TICKS {
            app.world_mut()
                .resource_mut::<Time>()
                .advance_by(Duration::from_secs_f32(1.0 / 60.0));
            app.update();
        }

        let mut players = app.world_mut().query_filtered::<&Transform, With<Player>>();
        players.single(app.world()).unwrap().translation
    }

    #[test]
    fn without_a_camera_forward_is_world_negative_z() {
        let (mut app, bus) = app();
        let end = walk_forward(&mut app, &bus);

        assert!(end.z < SPAWN_POINT.z - 1.0, "ended at {end}");
        assert!((end.x - SPAWN_POINT.x).abs() < 1.0e-3);
    }

    #[test]
    fn forward_follows_the_camera_heading() {
        let (mut app, bus) = app();
        app.world_mut().spawn((
            Camera3d::default(),
            GlobalTransform::from(Transform::default().looking_to(Vec3::X, Vec3::Y)),
        ));
        let end = walk_forward(&mut app, &bus);

        assert!(end.x > SPAWN_POINT.x + 1.0, "ended at {end}");
        assert!((end.z - SPAWN_POINT.z).abs() < 1.0e-3);
    }

    #[test]
    fn animator_receives_the_tick_results() {
        let (mut app, bus) = app();
        walk_forward(&mut app, &bus);

        let mut animators = app.world_mut().query::<&Animator>();
        let animator = animators.single(app.world()).unwrap();
        assert!(animator.0.is_grounded);
        assert!(!animator.0.is_jumping);
        assert!(animator.0.current_speed > 2.5);
    }
}
