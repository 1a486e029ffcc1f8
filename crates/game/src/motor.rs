//! Reference character motor.
//!
//! [`SimpleMotor`] implements [`CharacterMotor`] over a shared
//! [`CollisionWorld`]. It integrates the proposed velocity directly and only
//! resolves the ground: a downward ray finds the floor, the character is kept
//! a small skin above it and the grounding report is rebuilt every step.
//! There is no sweep-and-slide against walls; a real host engine does that.

use std::sync::Arc;

use glam::{Quat, Vec3};
use kinetic_physics::{
    CapsuleDimensions, CharacterMotor, ColliderId, CollisionWorld, ContentFlags, GroundingStatus,
    TriggerInteraction,
};
use serde::{Deserialize, Serialize};

/// Gap kept between the capsule bottom and the ground.
pub const GROUND_SKIN: f32 = 0.01;

/// Tuning for the reference motor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorSettings {
    /// Steepest ground (degrees from up) the character can stand on.
    pub max_stable_slope_degrees: f32,

    /// How far below the skin the ground is still detected and snapped to.
    pub ground_probe_distance: f32,

    /// What the ground probe hits.
    pub ground_mask: ContentFlags,
}

impl Default for MotorSettings {
    fn default() -> Self {
        Self {
            max_stable_slope_degrees: 60.0,
            ground_probe_distance: 0.1,
            ground_mask: ContentFlags::MASK_PLAYER_SOLID,
        }
    }
}

/// Kinematic capsule driven by a character controller.
#[derive(Debug, Clone)]
pub struct SimpleMotor {
    world: Arc<CollisionWorld>,
    settings: MotorSettings,
    position: Vec3,
    rotation: Quat,
    velocity: Vec3,
    grounding: GroundingStatus,
    capsule: CapsuleDimensions,
    ground_solving: bool,
    unground_timer: f32,
}

impl SimpleMotor {
    /// Create a motor standing at `position`.
    pub fn new(world: Arc<CollisionWorld>, position: Vec3, rotation: Quat, capsule: CapsuleDimensions) -> Self {
        Self::with_settings(world, position, rotation, capsule, MotorSettings::default())
    }

    pub fn with_settings(
        world: Arc<CollisionWorld>,
        position: Vec3,
        rotation: Quat,
        capsule: CapsuleDimensions,
        settings: MotorSettings,
    ) -> Self {
        let mut motor = Self {
            world,
            settings,
            position,
            rotation,
            velocity: Vec3::ZERO,
            grounding: GroundingStatus::airborne(),
            capsule,
            ground_solving: true,
            unground_timer: 0.0,
        };
        motor.resolve_ground();
        motor
    }

    /// Move by `velocity` for one tick, end with `rotation` and probe the
    /// ground at the new position.
    pub fn step(&mut self, velocity: Vec3, rotation: Quat, delta_time: f32) {
        self.rotation = rotation.normalize();
        self.velocity = velocity;
        self.position += velocity * delta_time;
        self.unground_timer = (self.unground_timer - delta_time).max(0.0);
        self.resolve_ground();
    }

    /// Place the character and stop it.
    pub fn teleport(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation.normalize();
        self.velocity = Vec3::ZERO;
        self.unground_timer = 0.0;
        self.resolve_ground();
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn is_ground_solving(&self) -> bool {
        self.ground_solving
    }

    pub fn settings(&self) -> &MotorSettings {
        &self.settings
    }

    /// Rebuild the grounding report.
    ///
    /// The character is always pushed out of the ground. It is snapped down
    /// onto stable ground only while ground solving is on and no unground
    /// timer is running.
    fn resolve_ground(&mut self) {
        let up = self.rotation * Vec3::Y;
        // Start the ray inside the capsule so a deep step still finds the floor
        let origin_height = self.capsule.y_offset.max(self.capsule.radius);
        let origin = self.position + up * origin_height;
        let max_distance = origin_height + GROUND_SKIN + self.settings.ground_probe_distance;

        let hit = self
            .world
            .raycast(origin, -up, max_distance, self.settings.ground_mask);
        let Some(hit) = hit else {
            self.grounding = GroundingStatus::airborne();
            return;
        };

        let clearance = hit.distance - origin_height;
        if clearance < GROUND_SKIN {
            self.position += up * (GROUND_SKIN - clearance);
            self.remove_velocity_into(up);
        }

        let can_ground = self.ground_solving && self.unground_timer <= 0.0;
        if !can_ground {
            self.grounding = GroundingStatus::airborne();
            return;
        }

        let max_slope_cos = self.settings.max_stable_slope_degrees.to_radians().cos();
        if hit.normal.dot(up) >= max_slope_cos {
            if clearance > GROUND_SKIN {
                self.position -= up * (clearance - GROUND_SKIN);
            }
            self.remove_velocity_into(up);
            self.grounding = GroundingStatus::stable(hit.normal);
        } else {
            self.grounding = GroundingStatus::sliding(hit.normal);
        }
    }

    fn remove_velocity_into(&mut self, up: Vec3) {
        let along_up = self.velocity.dot(up);
        if along_up < 0.0 {
            self.velocity -= up * along_up;
        }
    }
}

impl CharacterMotor for SimpleMotor {
    fn character_up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    fn character_forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    fn transient_position(&self) -> Vec3 {
        self.position
    }

    fn set_transient_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn transient_rotation(&self) -> Quat {
        self.rotation
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn grounding_status(&self) -> GroundingStatus {
        self.grounding
    }

    fn capsule(&self) -> CapsuleDimensions {
        self.capsule
    }

    fn set_capsule_dimensions(&mut self, capsule: CapsuleDimensions) {
        self.capsule = capsule;
    }

    fn overlap(
        &self,
        position: Vec3,
        rotation: Quat,
        results: &mut Vec<ColliderId>,
        mask: ContentFlags,
        triggers: TriggerInteraction,
    ) -> usize {
        self.world
            .overlap_capsule(position, rotation, self.capsule, mask, triggers, results)
    }

    fn closest_point(&self, collider: ColliderId, point: Vec3) -> Option<Vec3> {
        self.world.closest_point(collider, point)
    }

    fn force_unground(&mut self, duration: f32) {
        self.unground_timer = self.unground_timer.max(duration);
    }

    fn set_ground_solving_activation(&mut self, active: bool) {
        self.ground_solving = active;
    }

    fn set_position_and_rotation(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation.normalize();
    }
}

// ============================================================================
// Tests
// ============================================================================
