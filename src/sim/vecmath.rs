//! Vector math helpers over [`glam::Vec2`]
//!
//! glam covers add/sub/scale/dot/length; these free functions supply the
//! handful of operations the simulation needs on top. Every function is
//! total: zero-length inputs produce zero vectors, never an error, so the
//! per-frame hot path needs no fallible math.

use glam::Vec2;

/// Rotate a vector 90 degrees counterclockwise.
///
/// Used consistently to derive wall normals from tangents; the whole crate
/// relies on this being one fixed rotation direction.
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Vector from point `a` to point `b`.
#[inline]
pub fn vfrom(a: Vec2, b: Vec2) -> Vec2 {
    b - a
}

/// Scale `v` to the given length, preserving direction.
///
/// A zero vector stays zero.
#[inline]
pub fn norm_to(v: Vec2, length: f32) -> Vec2 {
    v.normalize_or_zero() * length
}

/// Vector projection of `v` onto `onto`.
///
/// Returns zero if `onto` is the zero vector.
#[inline]
pub fn proj(v: Vec2, onto: Vec2) -> Vec2 {
    let dir = onto.normalize_or_zero();
    dir * v.dot(dir)
}

/// Rotate `v` by `angle` radians counterclockwise.
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Unit vector for a heading angle in radians (0 = +x axis).
#[inline]
pub fn heading_to_vector(heading: f32) -> Vec2 {
    Vec2::from_angle(heading)
}
