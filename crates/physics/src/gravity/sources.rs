//! Built-in gravity sources.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::GravitySource;

/// Constant gravity everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformGravity {
    pub acceleration: Vec3,
}

impl UniformGravity {
    pub fn new(acceleration: Vec3) -> Self {
        Self { acceleration }
    }
}

impl Default for UniformGravity {
    /// Earth gravity along `-Y`.
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -9.81, 0.0))
    }
}

impl GravitySource for UniformGravity {
    fn gravity_at(&self, _position: Vec3) -> Vec3 {
        self.acceleration
    }
}

/// Pull toward a point with constant magnitude inside a spherical range.
///
/// Outside the range, and exactly at the center, the source contributes
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetGravity {
    pub center: Vec3,
    pub strength: f32,
    pub range: f32,
}

impl PlanetGravity {
    pub fn new(center: Vec3, strength: f32, range: f32) -> Self {
        Self {
            center,
            strength,
            range,
        }
    }
}

impl GravitySource for PlanetGravity {
    fn gravity_at(&self, position: Vec3) -> Vec3 {
        let offset = self.center - position;
        let distance_squared = offset.length_squared();
        if distance_squared > self.range * self.range {
            return Vec3::ZERO;
        }
        offset.normalize_or_zero() * self.strength
    }
}
