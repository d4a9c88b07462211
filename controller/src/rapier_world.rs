//! Rapier-based collision backend for static level geometry.
//!
//! Builds an in-memory Rapier scene from a set of static collider definitions and
//! answers the controller's overlap queries and body moves against it.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Query-focused: supports overlap tests and the Rapier `KinematicCharacterController`.
//! - Immutable world: statics do not move after construction.

// Re-export Rapier so frontends can build extra queries without a direct dependency.
pub use rapier3d;

use rapier3d::{
    control::{CharacterAutostep, CharacterLength, KinematicCharacterController},
    na::{Point3, Translation3},
    prelude::*,
};

use crate::{
    capsule::CapsuleShape,
    math::{Quat, Vec3},
    physics::{CharacterMover, LayerMask, MoveOutcome, SpatialQuery},
    settings::KccSettings,
};

/// Definition of one immutable world collider.
///
/// Conventions
/// - Units are meters.
/// - Rotation is a unit quaternion.
/// - For planes, the normal is pose-derived: `normal = rotation * +Y`, and
///   `dist = dot(normal, translation) + offset_along_normal`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    pub translation: Vec3,
    pub rotation: Quat,
    pub shape: ColliderShapeDef,
    /// Layers this collider belongs to.
    pub layers: LayerMask,
    /// Trigger volumes are kept in the scene but ignored by every query and move.
    pub is_trigger: bool,
}

impl WorldStaticDef {
    /// Solid collider on every layer with identity rotation.
    pub fn solid(id: u32, translation: Vec3, shape: ColliderShapeDef) -> Self {
        Self {
            id,
            translation,
            rotation: Quat::identity(),
            shape,
            layers: LayerMask::ALL,
            is_trigger: false,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn on_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    pub fn trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space).
    ///
    /// In Rapier a plane is infinite. Any visible "size" is purely a rendering
    /// concern, not collision.
    Plane {
        /// Offset along the plane normal (meters).
        offset_along_normal: f32,
    },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vec3 },

    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Y-aligned cylinder (meters).
    CylinderY { radius: f32, half_height: f32 },
}

/// In-memory Rapier structures needed for overlap queries and the KCC.
pub struct RapierQueryWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    kcc: KinematicCharacterController,
}

impl RapierQueryWorld {
    /// Build a query world from a list of static collider definitions.
    ///
    /// Determinism
    /// - The input is sorted by `id` before insertion.
    /// - NaN or otherwise invalid values must be rejected by the caller.
    pub fn build(mut defs: Vec<WorldStaticDef>, kcc: &KccSettings) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        // Each static is a fixed rigid-body with one attached collider.
        for def in &defs {
            let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);

            let rb = RigidBodyBuilder::fixed().pose(iso).build();
            let rb_handle = bodies.insert(rb);

            colliders.insert_with_parent(collider_from_def(def), rb_handle, &mut bodies);
        }

        // Collision detection only (no dynamics): updates the broad-phase BVH and
        // the narrow-phase contact graph so queries can run.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        let mut collision_pipeline = CollisionPipeline::new();

        let hooks = ();
        let events = ();

        collision_pipeline.step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &hooks,
            &events,
        );

        log::info!(
            "built query world: {} static collider(s), {} trigger(s)",
            defs.len(),
            defs.iter().filter(|d| d.is_trigger).count()
        );

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
            kcc: character_controller(kcc),
        }
    }

    /// Borrowed `QueryPipeline` view over the statics.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    #[inline]
    pub fn kcc(&self) -> &KinematicCharacterController {
        &self.kcc
    }

    /// Replace the KCC configuration, e.g. after settings were reloaded.
    pub fn set_kcc(&mut self, settings: &KccSettings) {
        self.kcc = character_controller(settings);
    }

    fn overlaps(&self, pose: Isometry<Real>, shape: &dyn Shape, layers: LayerMask) -> bool {
        let pipeline = self.query_pipeline(solid_filter(layers));
        pipeline.intersect_shape(pose, shape).next().is_some()
    }
}

impl SpatialQuery for RapierQueryWorld {
    fn check_sphere(&self, center: Vec3, radius: f32, layers: LayerMask) -> bool {
        self.overlaps(
            Isometry::translation(center.x, center.y, center.z),
            &Ball::new(radius),
            layers,
        )
    }

    fn check_capsule(&self, a: Vec3, b: Vec3, radius: f32, layers: LayerMask) -> bool {
        let capsule = Capsule::new(Point3::from(a), Point3::from(b), radius);
        self.overlaps(Isometry::identity(), &capsule, layers)
    }
}

impl CharacterMover for RapierQueryWorld {
    fn move_character(
        &self,
        capsule: &CapsuleShape,
        radius: f32,
        origin: Vec3,
        rotation: Quat,
        desired: Vec3,
        dt: f32,
    ) -> MoveOutcome {
        let pipeline = self.query_pipeline(QueryFilter::only_fixed().exclude_sensors());
        let pose = Isometry::from_parts(Translation3::from(capsule.center(origin)), rotation);

        let correction = self.kcc.move_shape(
            dt,
            &pipeline,
            &Capsule::new_y(capsule.half_segment(radius), radius),
            &pose,
            desired,
            |_| {},
        );

        MoveOutcome {
            translation: correction.translation,
            grounded: correction.grounded,
        }
    }
}

/// Rapier KCC configured from settings. Degrees are converted to radians here.
fn character_controller(settings: &KccSettings) -> KinematicCharacterController {
    let autostep = (settings.autostep_max_height > 0.0).then(|| CharacterAutostep {
        max_height: CharacterLength::Absolute(settings.autostep_max_height),
        min_width: CharacterLength::Absolute(settings.autostep_min_width.max(0.0)),
        include_dynamic_bodies: false,
    });
    let snap_to_ground =
        (settings.snap_to_ground > 0.0).then(|| CharacterLength::Absolute(settings.snap_to_ground));

    KinematicCharacterController {
        offset: CharacterLength::Absolute(settings.offset),
        slide: true,
        autostep,
        max_slope_climb_angle: settings.max_slope_climb_deg.to_radians(),
        min_slope_slide_angle: settings.min_slope_slide_deg.to_radians(),
        snap_to_ground,
        normal_nudge_factor: settings.normal_nudge_factor,
        ..KinematicCharacterController::default()
    }
}

/// Solid colliders on any of `layers`. Sensors never match.
fn solid_filter<'a>(layers: LayerMask) -> QueryFilter<'a> {
    QueryFilter::default().exclude_sensors().groups(
        InteractionGroups::all()
            .with_memberships(Group::ALL)
            .with_filter(Group::from_bits_truncate(layers.0)),
    )
}

/// Build a Rapier collider from a `WorldStaticDef`.
///
/// The pose lives on the parent rigid-body, so the collider uses an identity local
/// transform (planes add their offset along the local normal).
fn collider_from_def(def: &WorldStaticDef) -> Collider {
    let builder = match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // Local +Y half-space shifted along its normal. The parent pose rotates the
            // normal to n = R * +Y and places it so that n . x = n . t + offset.
            ColliderBuilder::new(SharedShape::new(HalfSpace::new(Vector::y_axis())))
                .translation(Vector::y() * *offset_along_normal)
        }

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius),

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius),

        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius),
    };

    builder
        .sensor(def.is_trigger)
        .collision_groups(
            InteractionGroups::all().with_memberships(Group::from_bits_truncate(def.layers.0)),
        )
        .build()
}
