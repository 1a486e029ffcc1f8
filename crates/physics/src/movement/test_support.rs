//! Scripted motor for controller tests.
//!
//! Tests set the grounding report, velocity and overlap results directly, then
//! drive the controller tick by tick. Water volumes are axis-aligned boxes so
//! closest-point queries are exact.

use glam::{Quat, Vec3};

use crate::collision::ContentFlags;
use crate::motor::{CapsuleDimensions, CharacterMotor, ColliderId, GroundingStatus, TriggerInteraction};

/// Axis-aligned water volume.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WaterBox {
    pub id: ColliderId,
    pub min: Vec3,
    pub max: Vec3,
}

#[derive(Debug, Clone)]
pub(crate) struct ScriptedMotor {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub grounding: GroundingStatus,
    pub capsule: CapsuleDimensions,
    pub ground_solving: bool,
    pub unground_time: f32,
    /// Returned by every overlap whose mask includes solids.
    pub solid_overlaps: Vec<ColliderId>,
    pub water: Vec<WaterBox>,
    /// Every capsule size that was set, in order.
    pub capsule_history: Vec<CapsuleDimensions>,
}

impl ScriptedMotor {
    pub fn airborne() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            grounding: GroundingStatus::airborne(),
            capsule: CapsuleDimensions::default(),
            ground_solving: true,
            unground_time: 0.0,
            solid_overlaps: Vec::new(),
            water: Vec::new(),
            capsule_history: Vec::new(),
        }
    }

    pub fn grounded() -> Self {
        Self {
            grounding: GroundingStatus::stable(Vec3::Y),
            ..Self::airborne()
        }
    }

    /// Add a water box and return its id.
    pub fn add_water(&mut self, min: Vec3, max: Vec3) -> ColliderId {
        let id = 100 + self.water.len() as ColliderId;
        self.water.push(WaterBox { id, min, max });
        id
    }

    fn capsule_bounds(&self, position: Vec3) -> (Vec3, Vec3) {
        let radius = Vec3::splat(self.capsule.radius);
        let bottom = position;
        let top = position + self.rotation * Vec3::new(0.0, self.capsule.height, 0.0);
        (bottom.min(top) - radius, bottom.max(top) + radius)
    }
}

impl CharacterMotor for ScriptedMotor {
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
        self.capsule_history.push(capsule);
    }

    fn overlap(
        &self,
        position: Vec3,
        _rotation: Quat,
        results: &mut Vec<ColliderId>,
        mask: ContentFlags,
        triggers: TriggerInteraction,
    ) -> usize {
        let before = results.len();
        if mask.intersects(ContentFlags::MASK_PLAYER_SOLID) {
            results.extend_from_slice(&self.solid_overlaps);
        }
        if mask.intersects(ContentFlags::WATER) && triggers == TriggerInteraction::Collide {
            let (low, high) = self.capsule_bounds(position);
            for water in &self.water {
                let overlaps = low.cmple(water.max).all() && high.cmpge(water.min).all();
                if overlaps {
                    results.push(water.id);
                }
            }
        }
        results.len() - before
    }

    fn closest_point(&self, collider: ColliderId, point: Vec3) -> Option<Vec3> {
        self.water
            .iter()
            .find(|water| water.id == collider)
            .map(|water| point.clamp(water.min, water.max))
    }

    fn force_unground(&mut self, duration: f32) {
        self.unground_time = duration;
    }

    fn set_ground_solving_activation(&mut self, active: bool) {
        self.ground_solving = active;
    }

    fn set_position_and_rotation(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation;
    }
}
