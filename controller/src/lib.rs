pub mod basis;
pub mod capsule;
pub mod character;
pub mod constants;
pub mod input;
pub mod locomotion;
pub mod math;
pub mod physics;
pub mod presentation;
pub mod rapier_world;
pub mod sensors;
pub mod settings;
pub mod stance;

pub use basis::Basis;
pub use capsule::{CapsulePreset, CapsuleShape};
pub use character::{CharacterBody, PlayerController};
pub use constants::{
    FACING_EPS, GRAVITY_MPS2, GROUNDED_VERTICAL_VELOCITY, JUMPING_VELOCITY_THRESHOLD,
    MOVE_INTENT_EPS,
};
pub use input::{InputBus, InputEvent, InputSource, MoveIntent, Subscription};
pub use math::{Quat, Vec2, Vec3};
pub use physics::{CharacterMover, LayerMask, MoveOutcome, SpatialQuery};
pub use presentation::{AnimatorParameters, PresentationSink};
pub use rapier_world::{ColliderShapeDef, RapierQueryWorld, WorldStaticDef};
pub use sensors::{GroundSensor, ObstructionQuery};
pub use settings::{ControllerSettings, SettingsError};
pub use stance::{CharacterState, Stance, StanceMachine, Transition};
