//! Static wall segments and circle-vs-segment collision
//!
//! Walls are immutable line segments. The collision test runs in a fixed
//! order: tunneling sweep first (fast bodies can cross a wall entirely
//! within one frame), then a cheap proximity reject, then endpoint caps so
//! corners behave like circular obstacles, then the general face case.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::SimError;
use super::body::Body;
use super::vecmath::{perp, proj, vfrom};
use crate::consts;

/// A static line-segment obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub p1: Vec2,
    pub p2: Vec2,
    /// `p2 - p1`; its magnitude encodes the segment length
    pub tangent: Vec2,
    /// Perpendicular to the tangent, not normalized
    pub normal: Vec2,
}

impl Wall {
    pub fn new(p1: Vec2, p2: Vec2) -> Result<Self, SimError> {
        let tangent = vfrom(p1, p2);
        if tangent.length_squared() == 0.0 {
            return Err(SimError::DegenerateWall(p1.x, p1.y));
        }
        Ok(Self {
            p1,
            p2,
            tangent,
            normal: perp(tangent),
        })
    }

    /// Collide a body against this wall, rebounding it if it is touching and
    /// approaching, or if it crossed the segment entirely this frame.
    pub fn collide_wall(&self, body: &mut Body, restitution: f32) {
        // A fast body can pass through the wall within one frame; sweep the
        // path it took and bounce it back if the sweep crosses the segment.
        if let Some(intersection) = intersect_segments(self.p1, self.p2, body.last_pos, body.pos) {
            body.pos = body.last_pos;
            body.rebound(self.normal, Some(intersection), restitution);
            return;
        }

        // Vectors to each endpoint of the segment.
        let v1 = vfrom(self.p1, body.pos);
        let v2 = vfrom(self.p2, body.pos);

        // Perpendicular offset from the wall line to the body.
        let v_dist = proj(v1, self.normal);

        let radius2 = body.radius * body.radius;
        if v_dist.length_squared() > radius2 {
            return;
        }

        // Off either end of the segment, the wall acts as a point obstacle
        // at the endpoint. The projection sign tells which side we are off.
        if v1.dot(self.tangent) < 0.0 {
            if v1.length_squared() > radius2 {
                return;
            }
            body.rebound(v1, Some(self.p1), restitution);
            return;
        }
        if v2.dot(self.tangent) > 0.0 {
            if v2.length_squared() > radius2 {
                return;
            }
            body.rebound(v2, Some(self.p2), restitution);
            return;
        }

        // Only collide while headed toward the wall, so a body resting
        // against it does not bounce every frame.
        if body.velocity.dot(v_dist) >= consts::EPSILON {
            return;
        }

        body.rebound(self.normal, Some(body.pos - v_dist), restitution);
    }
}

/// Are the points `a`, `b`, `c` listed in counterclockwise order?
#[inline]
pub fn counterclockwise(a: Vec2, b: Vec2, c: Vec2) -> bool {
    (c.x - a.x) * (b.y - a.y) < (b.x - a.x) * (c.y - a.y)
}

/// Intersection point of segments `ab` and `cd`, if they cross.
///
/// Orientation tests on the four point triples decide whether the segments
/// cross at all; only then is the line intersection computed.
pub fn intersect_segments(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Option<Vec2> {
    if counterclockwise(a, c, d) == counterclockwise(b, c, d) {
        return None;
    }
    if counterclockwise(a, b, c) == counterclockwise(a, b, d) {
        return None;
    }
    intersect_lines(a, b, c, d)
}

/// Intersection point of the infinite lines through `ab` and `cd`.
///
/// Parallel (or coincident) lines yield `None`.
fn intersect_lines(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Option<Vec2> {
    let r = b - a;
    let s = d - c;
    let denom = r.perp_dot(s);
    if denom == 0.0 {
        return None;
    }
    let t = (c - a).perp_dot(s) / denom;
    Some(a + r * t)
}
