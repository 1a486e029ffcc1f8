//! Collision world containing the static volumes a motor probes.
//!
//! Volumes are stored as parry3d shapes with a world transform. The world is
//! immutable after construction and is shared between motors behind an `Arc`.

use glam::{Quat, Vec3};
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::na::{Quaternion, Translation3, UnitQuaternion};
use parry3d::query::{self, PointQuery, Ray, RayCast};
use parry3d::shape::SharedShape;

use super::flags::ContentFlags;
use crate::motor::{CapsuleDimensions, ColliderId, TriggerInteraction};

/// A volume in the world.
#[derive(Debug, Clone)]
pub struct CollisionBrush {
    /// Unique identifier for this brush.
    pub id: ColliderId,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Content flags (solid, water, trigger, etc.).
    pub contents: ContentFlags,
}

/// Result of a raycast against the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space impact point.
    pub point: Vec3,
    /// Surface normal at the impact point.
    pub normal: Vec3,
    /// Brush that was hit.
    pub brush: ColliderId,
    /// Contents of the brush that was hit.
    pub contents: ContentFlags,
}

/// The collision world containing all volumes.
///
/// # Thread Safety
///
/// The collision world is immutable after construction and can be safely
/// shared across threads for parallel queries.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: ColliderId,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            brushes: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `contents` - Content flags for collision filtering
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, contents: ContentFlags) -> ColliderId {
        self.add_oriented_box(center, half_extents, Quat::IDENTITY, contents)
    }

    /// Add a rotated box to the world (ramps, tilted platforms).
    pub fn add_oriented_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        contents: ContentFlags,
    ) -> ColliderId {
        let id = self.next_id;
        self.next_id += 1;

        self.brushes.push(CollisionBrush {
            id,
            shape: SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
            transform: to_isometry(center, rotation),
            contents,
        });

        id
    }

    /// Remove all collision geometry.
    pub fn clear(&mut self) {
        self.brushes.clear();
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Look up a brush by id.
    pub fn brush(&self, id: ColliderId) -> Option<&CollisionBrush> {
        self.brushes.iter().find(|brush| brush.id == id)
    }

    /// Cast a ray and return the closest hit.
    ///
    /// # Arguments
    ///
    /// * `origin` - Ray starting position
    /// * `direction` - Ray direction (will be normalized)
    /// * `max_distance` - Maximum trace distance
    /// * `mask` - Content flags to collide with
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: ContentFlags,
    ) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let ray = Ray::new(to_point(origin), Vector::new(dir.x, dir.y, dir.z));

        let mut closest: Option<(f32, &CollisionBrush)> = None;
        for brush in &self.brushes {
            if !mask.intersects(brush.contents) {
                continue;
            }
            if let Some(distance) = brush.shape.cast_ray(&brush.transform, &ray, max_distance, true) {
                if closest.map_or(true, |(best, _)| distance < best) {
                    closest = Some((distance, brush));
                }
            }
        }

        let (distance, brush) = closest?;
        let normal = brush
            .shape
            .cast_ray_and_get_normal(&brush.transform, &ray, distance + 0.01, true)
            .map(|intersection| {
                Vec3::new(intersection.normal.x, intersection.normal.y, intersection.normal.z)
            })
            .unwrap_or(-dir);

        Some(RayHit {
            distance,
            point: origin + dir * distance,
            normal,
            brush: brush.id,
            contents: brush.contents,
        })
    }

    /// Collect every brush overlapping a character capsule.
    ///
    /// The capsule's pivot is `position`; its center sits `y_offset` along
    /// the rotated local up axis. Results are appended to `results` in
    /// insertion order and the number of overlaps is returned.
    pub fn overlap_capsule(
        &self,
        position: Vec3,
        rotation: Quat,
        capsule: CapsuleDimensions,
        mask: ContentFlags,
        triggers: TriggerInteraction,
        results: &mut Vec<ColliderId>,
    ) -> usize {
        let shape = capsule_shape(capsule);
        let center = position + rotation * Vec3::new(0.0, capsule.y_offset, 0.0);
        let transform = to_isometry(center, rotation);

        let before = results.len();
        for brush in &self.brushes {
            if !mask.intersects(brush.contents) {
                continue;
            }
            if triggers == TriggerInteraction::Ignore && brush.contents.is_trigger_volume() {
                continue;
            }
            if let Ok(true) = query::intersection_test(
                &transform,
                shape.as_ref(),
                &brush.transform,
                brush.shape.as_ref(),
            ) {
                results.push(brush.id);
            }
        }
        results.len() - before
    }

    /// Closest point on a brush to `point`.
    ///
    /// A point inside the brush is its own closest point. Returns `None` for
    /// an unknown brush.
    pub fn closest_point(&self, id: ColliderId, point: Vec3) -> Option<Vec3> {
        let brush = self.brush(id)?;
        let projection = brush
            .shape
            .project_point(&brush.transform, &to_point(point), true);
        Some(Vec3::new(projection.point.x, projection.point.y, projection.point.z))
    }
}

// ============================================================================
// Private helpers
// ============================================================================

fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

fn to_isometry(center: Vec3, rotation: Quat) -> Isometry<Real> {
    let rotation = UnitQuaternion::from_quaternion(Quaternion::new(
        rotation.w, rotation.x, rotation.y, rotation.z,
    ));
    Isometry::from_parts(Translation3::new(center.x, center.y, center.z), rotation)
}

/// Parry capsules are defined by the half-height of the cylinder part.
fn capsule_shape(capsule: CapsuleDimensions) -> SharedShape {
    let cylinder_half_height = (capsule.height - 2.0 * capsule.radius).max(0.0) / 2.0;
    SharedShape::capsule_y(cylinder_half_height, capsule.radius)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn standing() -> CapsuleDimensions {
        CapsuleDimensions::new(0.4, 1.8, 0.9)
    }

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor at y=0
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );

        // Wall at x=10
        world.add_box(
            Vec3::new(10.0, 2.5, 0.0),
            Vec3::new(0.5, 2.5, 10.0),
            ContentFlags::SOLID,
        );

        world
    }

    #[test]
    fn test_raycast_hit() {
        let world = create_test_world();

        let hit = world
            .raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 100.0, ContentFlags::SOLID)
            .unwrap();

        // Should hit wall at approximately x=9.5
        assert!((hit.point.x - 9.5).abs() < 0.1);
        assert!((hit.normal - Vec3::NEG_X).length() < 1e-3);
        assert_eq!(hit.brush, 1);
    }

    #[test]
    fn test_raycast_miss() {
        let world = create_test_world();

        // Should not hit anything going -X
        let hit = world.raycast(Vec3::new(0.0, 1.0, 0.0), -Vec3::X, 100.0, ContentFlags::SOLID);
        assert!(hit.is_none());
    }

    #[test]
    fn test_raycast_ground_normal() {
        let world = create_test_world();

        let hit = world
            .raycast(Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_Y, 1.0, ContentFlags::SOLID)
            .unwrap();
        assert!((hit.distance - 0.5).abs() < 1e-3);
        assert!((hit.normal - Vec3::Y).length() < 1e-3);
    }

    #[test]
    fn test_content_mask_filtering() {
        let mut world = CollisionWorld::new();

        // Add solid wall
        world.add_box(
            Vec3::new(5.0, 1.0, 0.0),
            Vec3::new(0.5, 1.0, 5.0),
            ContentFlags::SOLID,
        );

        // Add trigger (non-solid)
        world.add_box(
            Vec3::new(3.0, 1.0, 0.0),
            Vec3::new(0.5, 1.0, 5.0),
            ContentFlags::TRIGGER,
        );

        // Raycast with SOLID mask should ignore trigger
        let hit = world
            .raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 100.0, ContentFlags::SOLID)
            .unwrap();

        // Should hit wall at x=4.5, not trigger at x=2.5
        assert!((hit.point.x - 4.5).abs() < 0.1);
    }

    #[test]
    fn test_overlap_capsule_under_ceiling() {
        let mut world = CollisionWorld::new();
        // Ceiling underside at y=1.3
        let ceiling = world.add_box(
            Vec3::new(0.0, 1.8, 0.0),
            Vec3::new(2.0, 0.5, 2.0),
            ContentFlags::SOLID,
        );

        let mut hits = Vec::new();
        let count = world.overlap_capsule(
            Vec3::new(0.0, 0.01, 0.0),
            Quat::IDENTITY,
            standing(),
            ContentFlags::MASK_PLAYER_SOLID,
            TriggerInteraction::Ignore,
            &mut hits,
        );
        assert_eq!(count, 1);
        assert_eq!(hits, vec![ceiling]);

        hits.clear();
        let crouched = CapsuleDimensions::new(0.4, 1.0, 0.5);
        let count = world.overlap_capsule(
            Vec3::new(0.0, 0.01, 0.0),
            Quat::IDENTITY,
            crouched,
            ContentFlags::MASK_PLAYER_SOLID,
            TriggerInteraction::Ignore,
            &mut hits,
        );
        assert_eq!(count, 0);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_overlap_trigger_interaction() {
        let mut world = CollisionWorld::new();
        let water = world.add_box(
            Vec3::new(0.0, 1.5, 0.0),
            Vec3::new(5.0, 1.5, 5.0),
            ContentFlags::WATER,
        );

        let mut hits = Vec::new();
        let ignored = world.overlap_capsule(
            Vec3::ZERO,
            Quat::IDENTITY,
            standing(),
            ContentFlags::WATER,
            TriggerInteraction::Ignore,
            &mut hits,
        );
        assert_eq!(ignored, 0);

        let collided = world.overlap_capsule(
            Vec3::ZERO,
            Quat::IDENTITY,
            standing(),
            ContentFlags::WATER,
            TriggerInteraction::Collide,
            &mut hits,
        );
        assert_eq!(collided, 1);
        assert_eq!(hits[0], water);
    }

    #[test]
    fn test_closest_point() {
        let mut world = CollisionWorld::new();
        let water = world.add_box(
            Vec3::new(0.0, 1.5, 0.0),
            Vec3::new(5.0, 1.5, 5.0),
            ContentFlags::WATER,
        );

        // Inside: the point is its own projection
        let inside = Vec3::new(1.0, 1.0, 1.0);
        let closest = world.closest_point(water, inside).unwrap();
        assert!(closest.distance_squared(inside) < 1e-8);

        // Above the surface: projected onto the top face
        let above = Vec3::new(1.0, 4.0, 1.0);
        let closest = world.closest_point(water, above).unwrap();
        assert!((closest - Vec3::new(1.0, 3.0, 1.0)).length() < 1e-4);

        assert!(world.closest_point(99, above).is_none());
    }
}
