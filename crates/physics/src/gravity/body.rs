//! Gravity for free bodies (props, debris) that are not characters.

use glam::Vec3;

use super::GravityField;

/// Squared speed under which a body counts as resting.
const REST_SPEED_SQ: f32 = 1.0e-4;

/// Seconds a body must rest before gravity stops being applied.
const FLOAT_DELAY: f32 = 1.0;

/// Applies the aggregated field gravity to a body's velocity each fixed step.
///
/// With `float_to_sleep` set, a body that has been at rest for a second stops
/// receiving gravity so it can settle (and float in zero-g areas) instead of
/// jittering. Any movement restarts the countdown.
#[derive(Debug, Clone, Default)]
pub struct GravityBody {
    pub float_to_sleep: bool,
    float_delay: f32,
}

impl GravityBody {
    pub fn new(float_to_sleep: bool) -> Self {
        Self {
            float_to_sleep,
            float_delay: 0.0,
        }
    }

    /// Seconds the body has been resting.
    pub fn float_delay(&self) -> f32 {
        self.float_delay
    }

    /// Integrate one step of gravity into `velocity`.
    ///
    /// Returns `true` if gravity was applied.
    pub fn step(&mut self, field: &GravityField, position: Vec3, velocity: &mut Vec3, delta_time: f32) -> bool {
        if self.float_to_sleep {
            if velocity.length_squared() < REST_SPEED_SQ {
                self.float_delay += delta_time;
                if self.float_delay >= FLOAT_DELAY {
                    return false;
                }
            } else {
                self.float_delay = 0.0;
            }
        }

        *velocity += field.gravity_at(position) * delta_time;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gravity::UniformGravity;
    use std::sync::Arc;

    const DT: f32 = 0.1;

    fn earth() -> GravityField {
        let field = GravityField::new();
        field.register(Arc::new(UniformGravity::default())).unwrap();
        field
    }

    #[test]
    fn test_applies_gravity() {
        let field = earth();
        let mut body = GravityBody::new(false);
        let mut velocity = Vec3::ZERO;

        assert!(body.step(&field, Vec3::ZERO, &mut velocity, DT));
        assert!((velocity.y + 0.981).abs() < 1e-5);
    }

    #[test]
    fn test_floats_to_sleep_after_resting() {
        // Zero gravity so the body stays at rest
        let field = GravityField::new();
        let mut body = GravityBody::new(true);
        let mut velocity = Vec3::ZERO;

        for _ in 0..9 {
            assert!(body.step(&field, Vec3::ZERO, &mut velocity, DT));
        }
        // The tenth step lands on the one second boundary; past it gravity stops.
        body.step(&field, Vec3::ZERO, &mut velocity, DT);
        assert!(!body.step(&field, Vec3::ZERO, &mut velocity, DT));
    }

    #[test]
    fn test_movement_resets_float_delay() {
        let field = GravityField::new();
        let mut body = GravityBody::new(true);
        let mut velocity = Vec3::ZERO;

        for _ in 0..5 {
            body.step(&field, Vec3::ZERO, &mut velocity, DT);
        }
        assert!(body.float_delay() > 0.0);

        velocity = Vec3::X;
        body.step(&field, Vec3::ZERO, &mut velocity, DT);
        assert_eq!(body.float_delay(), 0.0);
    }
}
