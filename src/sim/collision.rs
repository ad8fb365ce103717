//! Pairwise elastic collision resolution
//!
//! Bodies are circles colliding along the line of centers only. The formulas
//! are the 1-D elastic collision equations applied to the normal velocity
//! components, with restitution folded into the combined mass term.

use super::body::Body;
use super::vecmath::{norm_to, perp, proj, vfrom};

/// Do the two bodies overlap?
#[inline]
pub fn intersects(a: &Body, b: &Body) -> bool {
    let distance2 = vfrom(a.pos, b.pos).length_squared();
    let reach = a.radius + b.radius;
    distance2 <= reach * reach
}

/// Restitution for a body pair: the bouncier body wins.
#[inline]
pub fn pair_restitution(a: &Body, b: &Body) -> f32 {
    a.restitution.max(b.restitution)
}

/// Resolve a collision between two bodies, if they are actually colliding.
///
/// Handles three cases: both immovable (no-op), exactly one immovable
/// (infinite-mass bounce of the movable body), and both movable (momentum
/// exchange along the line of centers). Pairs already separating are left
/// alone so a lingering overlap cannot re-trigger the bounce.
pub fn collide_bodies(p1: &mut Body, p2: &mut Body, restitution: f32) {
    if p1.immovable && p2.immovable {
        return;
    }
    if !intersects(p1, p2) {
        return;
    }
    if p1.immovable || p2.immovable {
        let (fixed, movable) = if p1.immovable { (p1, p2) } else { (p2, p1) };
        collide_immovable(fixed, movable, restitution);
        return;
    }

    // Vector spanning the centers, normal to the contact surface.
    let v_span = vfrom(p1.pos, p2.pos);
    let normal = v_span.normalize_or_zero();
    let tangent = perp(normal);
    let v1_tangent = proj(p1.velocity, tangent);
    let v2_tangent = proj(p2.velocity, tangent);

    let p1_initial = p1.velocity.dot(normal);
    let p2_initial = p2.velocity.dot(normal);

    // Already moving apart along the line of centers: nothing to resolve.
    if p1_initial - p2_initial < 0.0 {
        return;
    }

    // Elastic collision equations along the normal, restitution folded into
    // the combined mass term.
    let (m1, m2) = (p1.mass, p2.mass);
    let m1plusm2 = (m1 + m2) / restitution;
    let p1_final = p1_initial * (m1 - m2) / m1plusm2 + p2_initial * (2.0 * m2) / m1plusm2;
    let p2_final = p2_initial * (m2 - m1) / m1plusm2 + p1_initial * (2.0 * m1) / m1plusm2;

    // Tangential components are unchanged; recombine.
    p1.velocity = v1_tangent + normal * p1_final;
    p2.velocity = v2_tangent + normal * p2_final;

    // Push the faster body out so the pair sits at exact contact distance,
    // otherwise overlapping pairs stick together.
    let v_span = norm_to(v_span, p1.radius + p2.radius);
    if p1.velocity.length_squared() >= p2.velocity.length_squared() {
        p1.pos = p2.pos - v_span;
    } else {
        p2.pos = p1.pos + v_span;
    }
}

/// Bounce a movable body off an immovable one.
///
/// The immovable body acts as infinite mass: the movable body's normal
/// velocity component is negated and scaled by restitution, tangential
/// component untouched. No momentum transfers.
fn collide_immovable(fixed: &mut Body, movable: &mut Body, restitution: f32) {
    let v_span = vfrom(fixed.pos, movable.pos);
    let normal = v_span.normalize_or_zero();

    // Separating guard, same as the movable pair case with one side at rest.
    if movable.velocity.dot(normal) > 0.0 {
        return;
    }

    movable.rebound(normal, None, restitution);

    // Clear the overlap entirely so the next frame cannot bounce again while
    // still inside the bumper.
    let reach = fixed.radius + movable.radius;
    movable.pos = fixed.pos + norm_to(v_span, reach);
}
