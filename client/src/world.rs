//! Static level: collider definitions, their meshes, and the collision world.

use bevy::prelude::*;
use controller::{ColliderShapeDef, LayerMask, RapierQueryWorld, WorldStaticDef};

use crate::{
    config::ControllerConfig,
    convert::{from_na, quat_from_na, quat_to_na, to_na},
};

pub const GROUND_LAYER: LayerMask = LayerMask::layer(0);
pub const PROP_LAYER: LayerMask = LayerMask::layer(1);
pub const TRIGGER_LAYER: LayerMask = LayerMask::layer(2);

/// Visible size of the (infinite) ground plane.
const GROUND_SIZE: f32 = 50.0;

/// Collision world shared by every character.
#[derive(Resource)]
pub struct PhysicsWorld(pub RapierQueryWorld);

#[derive(Component)]
pub struct WorldStatic {
    pub id: u32,
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(PreStartup, build_physics_world);
    app.add_systems(Startup, setup);
}

fn build_physics_world(mut commands: Commands, config: Res<ControllerConfig>) {
    commands.insert_resource(PhysicsWorld(RapierQueryWorld::build(
        level_statics(),
        &config.0.kcc,
    )));
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ground_material = materials.add(StandardMaterial {
        base_color: Color::linear_rgb(0.2, 0.3, 0.25),
        perceptual_roughness: 1.0,
        metallic: 0.0,
        ..default()
    });
    let prop_material = materials.add(Color::srgb_u8(124, 144, 255));
    let trigger_material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 0.8, 0.2, 0.25),
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    for def in level_statics() {
        let material = if def.is_trigger {
            trigger_material.clone()
        } else if def.layers == GROUND_LAYER {
            ground_material.clone()
        } else {
            prop_material.clone()
        };

        commands.spawn((
            WorldStatic { id: def.id },
            Mesh3d(meshes.add(mesh_for(&def.shape))),
            MeshMaterial3d(material),
            Transform::from_translation(from_na(&def.translation))
                .with_rotation(quat_from_na(&def.rotation)),
        ));
    }

    // light
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        PointLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(0.0, 1.2, -8.0),
    ));
}

fn mesh_for(shape: &ColliderShapeDef) -> Mesh {
    match shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => Plane3d::default()
            .mesh()
            .size(GROUND_SIZE, GROUND_SIZE)
            .build()
            .translated_by(Vec3::Y * *offset_along_normal),
        ColliderShapeDef::Cuboid { half_extents } => {
            Cuboid::from_size(from_na(half_extents) * 2.0).into()
        }
        ColliderShapeDef::Sphere { radius } => Sphere::new(*radius).into(),
        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => Capsule3d::new(*radius, *half_height * 2.0).into(),
        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => Cylinder::new(*radius, *half_height * 2.0).into(),
    }
}

fn solid(id: u32, at: Vec3, shape: ColliderShapeDef) -> WorldStaticDef {
    WorldStaticDef::solid(id, to_na(at), shape).on_layers(PROP_LAYER)
}

fn cuboid(id: u32, at: Vec3, size: Vec3) -> WorldStaticDef {
    solid(
        id,
        at,
        ColliderShapeDef::Cuboid {
            half_extents: to_na(size * 0.5),
        },
    )
}

/// The demo level: open ground, a crouch-height tunnel, steps, a ramp, a few props,
/// and a trigger volume the character walks straight through.
pub fn level_statics() -> Vec<WorldStaticDef> {
    const TUNNEL_Z: f32 = -8.0;
    const TUNNEL_CEILING: f32 = 1.4;

    vec![
        WorldStaticDef::solid(
            1,
            to_na(Vec3::ZERO),
            ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        )
        .on_layers(GROUND_LAYER),
        // Tunnel: two walls and a roof whose underside is below standing height.
        cuboid(10, Vec3::new(-1.75, 0.7, TUNNEL_Z), Vec3::new(0.5, 1.4, 6.0)),
        cuboid(11, Vec3::new(1.75, 0.7, TUNNEL_Z), Vec3::new(0.5, 1.4, 6.0)),
        cuboid(
            12,
            Vec3::new(0.0, TUNNEL_CEILING + 0.25, TUNNEL_Z),
            Vec3::new(4.0, 0.5, 6.0),
        ),
        // Steps within autostep height, then one too tall.
        cuboid(20, Vec3::new(6.0, 0.1, 0.0), Vec3::new(1.0, 0.2, 2.0)),
        cuboid(21, Vec3::new(7.0, 0.2, 0.0), Vec3::new(1.0, 0.4, 2.0)),
        cuboid(22, Vec3::new(8.0, 0.4, 0.0), Vec3::new(1.0, 0.8, 2.0)),
        // Ramp.
        solid(
            30,
            Vec3::new(-6.0, 0.5, 2.0),
            ColliderShapeDef::Cuboid {
                half_extents: to_na(Vec3::new(1.5, 0.1, 3.0)),
            },
        )
        .with_rotation(quat_to_na(Quat::from_rotation_x(20f32.to_radians()))),
        // Props.
        cuboid(40, Vec3::new(5.0, 0.5, -4.0), Vec3::ONE),
        solid(
            41,
            Vec3::new(-4.0, 0.75, -3.0),
            ColliderShapeDef::CylinderY {
                radius: 0.5,
                half_height: 0.75,
            },
        ),
        solid(42, Vec3::new(3.0, 0.6, 5.0), ColliderShapeDef::Sphere { radius: 0.6 }),
        solid(
            43,
            Vec3::new(-3.0, 1.0, 6.0),
            ColliderShapeDef::CapsuleY {
                radius: 0.4,
                half_height: 0.6,
            },
        ),
        // Trigger volume: visible, never collides.
        cuboid(50, Vec3::new(0.0, 1.0, 4.0), Vec3::new(2.0, 2.0, 2.0))
            .on_layers(TRIGGER_LAYER)
            .trigger(),
    ]
}
