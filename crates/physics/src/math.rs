//! Vector and rotation helpers for the movement code.
//!
//! Every helper accepts zero-length input and returns a finite value, so a
//! degenerate frame (no input, zero gravity, look vector parallel to up)
//! never pushes NaN into the motor.

use glam::{Mat3, Quat, Vec3};

/// Squared length below which a vector is treated as zero.
pub const EPSILON_SQ: f32 = 1.0e-12;

/// Blend factor of an exponential low-pass filter with the given sharpness.
///
/// `1 - exp(-sharpness * dt)` keeps the response independent of the tick
/// rate, unlike a fixed-step lerp.
#[inline]
pub fn smoothing_factor(sharpness: f32, delta_time: f32) -> f32 {
    1.0 - (-sharpness * delta_time).exp()
}

/// Remove the component of `vector` along `normal`.
///
/// `normal` does not need to be normalized. A zero normal leaves the vector
/// unchanged.
#[inline]
pub fn project_on_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    let length_squared = normal.length_squared();
    if length_squared < EPSILON_SQ {
        return vector;
    }
    vector - normal * (vector.dot(normal) / length_squared)
}

/// Component of `vector` along `axis`. A zero axis yields zero.
#[inline]
pub fn project_onto(vector: Vec3, axis: Vec3) -> Vec3 {
    let length_squared = axis.length_squared();
    if length_squared < EPSILON_SQ {
        return Vec3::ZERO;
    }
    axis * (vector.dot(axis) / length_squared)
}

/// Clamp the length of `vector` to `max_length`.
#[inline]
pub fn clamp_magnitude(vector: Vec3, max_length: f32) -> Vec3 {
    vector.clamp_length_max(max_length.max(0.0))
}

/// Spherically interpolate between two vectors.
///
/// The direction rotates along the great arc from `from` to `to` while the
/// length is interpolated linearly. Antiparallel inputs rotate around an
/// arbitrary perpendicular axis; zero-length inputs fall back to a lerp.
pub fn slerp_direction(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let from_length = from.length();
    let to_length = to.length();
    if from_length * from_length < EPSILON_SQ || to_length * to_length < EPSILON_SQ {
        return from.lerp(to, t);
    }

    let start = from / from_length;
    let end = to / to_length;
    let length = from_length + (to_length - from_length) * t;

    let cos_angle = start.dot(end).clamp(-1.0, 1.0);
    if cos_angle > 0.999_999 {
        // Nearly parallel: a normalized lerp is exact enough and avoids a zero axis.
        return start.lerp(end, t).normalize_or_zero() * length;
    }

    let axis = if cos_angle < -0.999_999 {
        start.any_orthonormal_vector()
    } else {
        start.cross(end).normalize()
    };
    let angle = cos_angle.acos();
    Quat::from_axis_angle(axis, angle * t) * start * length
}

/// Rotation whose `+Z` axis points along `forward` and whose `+Y` axis is as
/// close to `up` as possible.
///
/// Returns `None` when `forward` is zero. When `forward` is parallel to `up`
/// an arbitrary perpendicular right axis is chosen.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let forward = forward.normalize_or_zero();
    if forward == Vec3::ZERO {
        return None;
    }

    let mut right = up.cross(forward);
    if right.length_squared() < EPSILON_SQ {
        right = forward.any_orthonormal_vector();
    }
    let right = right.normalize();
    let up = forward.cross(right);

    Some(Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize())
}

/// Shortest rotation taking direction `from` onto direction `to`.
///
/// Identity when either vector is zero.
#[inline]
pub fn from_to_rotation(from: Vec3, to: Vec3) -> Quat {
    let from = from.normalize_or_zero();
    let to = to.normalize_or_zero();
    if from == Vec3::ZERO || to == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(from, to)
}
