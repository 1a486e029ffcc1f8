//! Level geometry and spawn points.

use std::sync::Arc;

use glam::{Quat, Vec3};
use kinetic_physics::{ColliderId, CollisionWorld, ContentFlags};
use serde::{Deserialize, Serialize};

/// A game level containing collision geometry and spawn points.
#[derive(Debug, Clone)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Collision world shared with every motor in the level.
    pub collision: Arc<CollisionWorld>,

    /// Player spawn points.
    pub spawn_points: Vec<SpawnPoint>,
}

/// A spawn point for players.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Position in world space (feet).
    pub position: Vec3,

    /// Initial facing direction (yaw in radians, 0 faces +Z).
    pub facing: f32,
}

impl SpawnPoint {
    pub fn new(position: Vec3, facing: f32) -> Self {
        Self { position, facing }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.facing)
    }
}

/// Notable volumes of [`Level::test_pool`].
#[derive(Debug, Clone, Copy)]
pub struct PoolLayout {
    pub floor: ColliderId,
    /// Slab whose underside is at [`Level::CEILING_HEIGHT`], over z in 4..6.
    pub ceiling: ColliderId,
    /// Water 3 m deep over z in 10..20.
    pub pool: ColliderId,
}

impl Level {
    /// Height of the low ceiling's underside in the test pool.
    pub const CEILING_HEIGHT: f32 = 1.3;

    /// Depth of the water in the test pool.
    pub const POOL_DEPTH: f32 = 3.0;

    /// Create a level around existing geometry.
    pub fn new(id: &str, name: &str, collision: CollisionWorld) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            collision: Arc::new(collision),
            spawn_points: Vec::new(),
        }
    }

    /// Flat floor with a low ceiling and a water pool ahead of the spawn.
    ///
    /// ```text
    ///  z:  0        4  6        10            20
    ///      spawn    [slab]      [~~~~ pool ~~~~]
    /// ```
    pub fn test_pool() -> (Self, PoolLayout) {
        let mut world = CollisionWorld::new();

        let floor = world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );

        let slab_thickness = 0.5;
        let ceiling = world.add_box(
            Vec3::new(0.0, Self::CEILING_HEIGHT + slab_thickness / 2.0, 5.0),
            Vec3::new(3.0, slab_thickness / 2.0, 1.0),
            ContentFlags::SOLID,
        );

        let pool = world.add_box(
            Vec3::new(0.0, Self::POOL_DEPTH / 2.0, 15.0),
            Vec3::new(5.0, Self::POOL_DEPTH / 2.0, 5.0),
            ContentFlags::WATER,
        );

        let mut level = Self::new("test_pool", "Test Pool", world);
        level.spawn_points.push(SpawnPoint::new(Vec3::ZERO, 0.0));
        level
            .spawn_points
            .push(SpawnPoint::new(Vec3::new(-10.0, 0.0, 0.0), 0.0));

        (level, PoolLayout { floor, ceiling, pool })
    }

    /// Get a player spawn point.
    pub fn get_player_spawn(&self, index: usize) -> Option<&SpawnPoint> {
        self.spawn_points.get(index)
    }

    /// Get the number of player spawn points.
    pub fn player_spawn_count(&self) -> usize {
        self.spawn_points.len()
    }
}
