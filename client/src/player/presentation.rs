use bevy::prelude::*;
use controller::CapsuleShape;

use super::{Animator, CharacterController};

/// Visible body of the player; tracks which capsule relay it has applied.
#[derive(Component, Default)]
pub struct PlayerVisual {
    applied_changes: u32,
}

pub fn capsule_mesh(shape: &CapsuleShape, radius: f32) -> Mesh {
    Capsule3d::new(radius, (shape.height - radius * 2.0).max(0.0)).into()
}

/// Reshape the visual body whenever the controller relayed a new capsule.
pub(super) fn apply_capsule(
    mut meshes: ResMut<Assets<Mesh>>,
    players: Query<(&Animator, &CharacterController, &Children)>,
    mut visuals: Query<(&mut PlayerVisual, &mut Mesh3d, &mut Transform)>,
) {
    for (animator, controller, children) in &players {
        let Some(shape) = animator.0.capsule else {
            continue;
        };
        let radius = controller.0.settings().capsule.radius;

        for child in children.iter() {
            let Ok((mut visual, mut mesh, mut transform)) = visuals.get_mut(child) else {
                continue;
            };
            if visual.applied_changes == animator.0.capsule_changes {
                continue;
            }

            mesh.0 = meshes.add(capsule_mesh(&shape, radius));
            transform.translation.y = shape.center_y;
            visual.applied_changes = animator.0.capsule_changes;
            debug!(
                "player capsule -> height {} center {}",
                shape.height, shape.center_y
            );
        }
    }
}
