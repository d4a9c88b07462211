//! Debug/performance tooling for native dev builds.
//!
//! Compiled only with `dev_native`. Besides the perf overlay this draws the
//! ground probe and the facing arrow, plus the stand-up span while crouched.

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use controller::{GroundSensor, ObstructionQuery};
use iyes_perf_ui::prelude::*;

use crate::{
    convert::{from_na, to_na},
    player::{Animator, CharacterController, Player},
};

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        PerfUiPlugin,
    ));

    app.add_systems(Startup, spawn_perf_ui);
    app.add_systems(PostUpdate, (draw_player_facing, draw_sensors));
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
}

fn draw_player_facing(mut gizmos: Gizmos, q: Query<&GlobalTransform, With<Player>>) {
    for gt in &q {
        let (_, rot, start) = gt.to_scale_rotation_translation();

        // Compute forward from rotation; fallback if invalid/degenerate
        let mut dir = rot * Vec3::NEG_Z;
        if !dir.is_finite() || dir.length_squared() <= 1.0e-8 {
            dir = Vec3::NEG_Z;
        }

        // Draw arrow using start/end so we don't construct a Dir3 directly
        let start = start + Vec3::Y * 0.05;
        let end = start + dir.normalize() * 1.5;
        gizmos.arrow(start, end, Color::srgb(1.0, 1.0, 0.2));
    }
}

fn draw_sensors(
    mut gizmos: Gizmos,
    q: Query<(&Transform, &CharacterController, &Animator), With<Player>>,
) {
    for (transform, controller, animator) in &q {
        let settings = controller.0.settings();
        let origin = to_na(transform.translation);

        let probe = GroundSensor::from_settings(&settings.ground);
        let probe_color = if animator.0.is_grounded {
            Color::srgb(0.2, 1.0, 0.2)
        } else {
            Color::srgb(1.0, 0.2, 0.2)
        };
        gizmos.sphere(
            Isometry3d::from_translation(from_na(&probe.probe_point(origin))),
            probe.radius,
            probe_color,
        );

        if controller.0.state().is_crouching {
            let obstruction = ObstructionQuery::from_settings(&settings.obstruction);
            let (bottom, top, radius) = obstruction.standing_span(origin, &settings.capsule);
            let (bottom, top) = (from_na(&bottom), from_na(&top));
            gizmos.primitive_3d(
                &Capsule3d::new(radius, top.y - bottom.y),
                Isometry3d::from_translation((bottom + top) * 0.5),
                Color::srgba(1.0, 0.6, 0.1, 0.6),
            );
        }
    }
}
