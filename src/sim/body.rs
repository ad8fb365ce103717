//! Body model and per-frame physics integration
//!
//! Every simulated entity is a circular point-mass [`Body`]. Player-controlled
//! vehicles are bodies with an attached [`ControlState`]; bumpers are bodies
//! with the `immovable` flag set. Composition instead of a class hierarchy
//! keeps non-player bodies free of control fields.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::SimError;
use super::control::ControlState;
use super::vecmath::{norm_to, perp, proj, vfrom};
use crate::consts;

/// A circular rigid body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Entity id, assigned by the world on load
    pub id: u32,
    pub pos: Vec2,
    /// Position at the start of the last integration step, for tunneling checks
    pub last_pos: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
    pub radius: f32,
    /// Per-body bounciness; a colliding pair uses the max of the two
    pub restitution: f32,
    /// Immovable bodies never change velocity, only bounce the other party
    pub immovable: bool,
    /// Speed lost per second
    pub drag_rate: f32,
    /// Hard clamp on speed, applied after force integration
    pub max_speed: f32,
    /// Present only on player-controlled bodies
    pub control: Option<ControlState>,
}

impl Body {
    fn validated(
        pos: Vec2,
        velocity: Vec2,
        mass: f32,
        radius: Option<f32>,
    ) -> Result<Self, SimError> {
        if !(mass > 0.0) || !mass.is_finite() {
            return Err(SimError::NonPositiveMass(mass));
        }
        let radius = radius.unwrap_or_else(|| mass.sqrt());
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(SimError::NonPositiveRadius(radius));
        }
        Ok(Self {
            id: 0,
            pos,
            last_pos: pos,
            velocity,
            mass,
            radius,
            restitution: consts::RESTITUTION_PARTICLE,
            immovable: false,
            drag_rate: consts::DRAG_RATE,
            max_speed: consts::MAX_SPEED,
            control: None,
        })
    }

    /// A free-moving particle. Radius defaults to the square root of the mass.
    pub fn particle(
        pos: Vec2,
        velocity: Vec2,
        mass: f32,
        radius: Option<f32>,
    ) -> Result<Self, SimError> {
        Self::validated(pos, velocity, mass, radius)
    }

    /// A static bumper: immovable, extra bouncy.
    pub fn bumper(pos: Vec2, radius: f32) -> Result<Self, SimError> {
        let mut body = Self::validated(pos, Vec2::ZERO, 1.0, Some(radius))?;
        body.immovable = true;
        body.restitution = consts::RESTITUTION_BUMPER;
        Ok(body)
    }

    /// A player-controlled vehicle.
    pub fn player(
        pos: Vec2,
        velocity: Vec2,
        mass: f32,
        radius: Option<f32>,
        heading: f32,
        health: f32,
    ) -> Result<Self, SimError> {
        let mut body = Self::validated(pos, velocity, mass, radius)?;
        if !(health > 0.0) {
            return Err(SimError::NonPositiveHealth(health));
        }
        body.control = Some(ControlState::new(heading, mass, health));
        Ok(body)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        self.control.is_some()
    }

    /// Facing direction, for players only
    pub fn direction(&self) -> Option<Vec2> {
        self.control.as_ref().map(|c| c.direction)
    }

    pub fn damage(&self) -> Option<f32> {
        self.control.as_ref().map(|c| c.damage)
    }

    pub fn health(&self) -> Option<f32> {
        self.control.as_ref().map(|c| c.health)
    }

    pub fn dead(&self) -> bool {
        self.control.as_ref().is_some_and(|c| c.dead)
    }

    /// Advance one frame: apply the summed frame force, then drag, then the
    /// speed clamp, then integrate position.
    ///
    /// The order is deliberate. A boost can exceed `max_speed` within the
    /// force application, but the clamp catches it before integration, so
    /// top speed is consistent across all gameplay paths.
    pub fn update(&mut self, elapsed_seconds: f32, force: Option<Vec2>) {
        if let Some(force) = force {
            self.velocity += force * (elapsed_seconds / self.mass);
        }

        // Drag reduces speed toward zero but never reverses direction.
        let speed = self.velocity.length();
        if speed > 0.0 {
            let drag = self.drag_rate * elapsed_seconds;
            if drag >= speed {
                self.velocity = Vec2::ZERO;
            } else {
                self.velocity *= (speed - drag) / speed;
            }
        }

        let speed = self.velocity.length();
        if speed > self.max_speed {
            self.velocity *= self.max_speed / speed;
        }

        self.last_pos = self.pos;
        self.pos += self.velocity * elapsed_seconds;
    }

    /// Bounce off a surface with the given contact normal.
    ///
    /// The tangential velocity component is kept, the normal component is
    /// negated and scaled by `restitution`. If a contact point is supplied
    /// and the body overlaps it, the body is pushed out to exactly `radius`
    /// away. Players accumulate damage from the momentum change.
    pub fn rebound(&mut self, normal: Vec2, point: Option<Vec2>, restitution: f32) {
        let v_initial = self.velocity;

        let tangent = perp(normal);
        let v_tangent = proj(self.velocity, tangent);
        let v_normal = proj(self.velocity, normal);
        self.velocity = v_tangent - v_normal * restitution;

        if let Some(point) = point {
            let v = vfrom(point, self.pos);
            if v.length_squared() < self.radius * self.radius {
                self.pos = point + norm_to(v, self.radius);
            }
        }

        if let Some(control) = self.control.as_mut() {
            let v_diff = self.velocity - v_initial;
            control.damage += v_diff.length() * self.mass;
        }
    }
}
