//! Player control state machine
//!
//! Turns raw per-frame input into heading changes and a single summed force
//! vector for the body integrator. The up axis thrusts, the down axis
//! brakes, the lateral axis turns with a ramp-up period. Holding the brake
//! while slow charges a boost that fires on release, trading steering and
//! bounciness for a burst of speed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::vecmath::{heading_to_vector, norm_to, perp, vfrom};
use crate::consts;

/// One frame's worth of control input for a player.
///
/// Axes are already debounced to -1/0/+1 by the input collaborator; the
/// core never polls devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// -1 left, +1 right
    pub x_axis: i8,
    /// +1 thrust, -1 brake
    pub y_axis: i8,
}

/// Control and damage state attached to player bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlState {
    /// Facing angle in radians
    pub heading: f32,
    /// Unit vector derived from `heading`, recomputed every frame
    pub direction: Vec2,

    pub turn_direction: i8,
    /// Seconds spent continuously turning; drives the turn-rate ramp
    pub turning_time: f32,
    pub do_thrust: bool,
    pub do_brake: bool,
    pub boost_charge_time: f32,
    pub boost_time_remaining: f32,
    pub boost_heavy_time_remaining: f32,

    pub damage: f32,
    pub health: f32,
    pub dead: bool,

    /// Mass without the boost-heavy modifier
    pub original_mass: f32,

    /// Latest input snapshot, replaced each frame by the caller
    pub input: PlayerInput,
}

impl ControlState {
    pub fn new(heading: f32, mass: f32, health: f32) -> Self {
        Self {
            heading,
            direction: heading_to_vector(heading),
            turn_direction: 0,
            turning_time: 0.0,
            do_thrust: false,
            do_brake: false,
            boost_charge_time: 0.0,
            boost_time_remaining: 0.0,
            boost_heavy_time_remaining: 0.0,
            damage: 0.0,
            health,
            dead: false,
            original_mass: mass,
            input: PlayerInput::default(),
        }
    }

    /// Update the timed control state from the current input snapshot.
    ///
    /// `speed` is the body's current speed, needed for boost charging.
    fn update_state(&mut self, speed: f32, elapsed_seconds: f32) {
        let prev_do_brake = self.do_brake;

        // Turning: the ramp timer resets the instant the stick centers.
        self.turn_direction = self.input.x_axis.signum();
        if self.turn_direction == 0 {
            self.turning_time = 0.0;
        } else {
            self.turning_time += elapsed_seconds;
        }

        // Thrust and brake are mutually exclusive.
        match self.input.y_axis.signum() {
            1 => {
                self.do_thrust = true;
                self.do_brake = false;
            }
            -1 => {
                self.do_thrust = false;
                self.do_brake = true;
            }
            _ => {
                self.do_thrust = false;
                self.do_brake = false;
            }
        }

        // Releasing a fully charged brake fires the boost.
        if prev_do_brake && !self.do_brake && self.boost_charge_time >= consts::PLAYER_BOOST_READY_TIME
        {
            self.boost_time_remaining = consts::PLAYER_BOOST_TIME;
            self.boost_heavy_time_remaining = consts::PLAYER_BOOST_HEAVY_TIME;
            log::debug!("boost fired");
        }

        // Time out boost windows, floored at zero.
        self.boost_time_remaining = (self.boost_time_remaining - elapsed_seconds).max(0.0);
        self.boost_heavy_time_remaining =
            (self.boost_heavy_time_remaining - elapsed_seconds).max(0.0);

        // Charge the boost by holding the brake while nearly stopped.
        if self.do_brake && speed < consts::PLAYER_MINIMUM_BRAKE_SPEED {
            self.boost_charge_time =
                (self.boost_charge_time + elapsed_seconds).min(consts::PLAYER_BOOST_READY_TIME);
        } else {
            self.boost_charge_time = 0.0;
        }
    }

    /// Turn rate for the current ramp position
    fn turn_rate(&self) -> f32 {
        if self.turning_time >= consts::PLAYER_START_TURN_TIME {
            consts::PLAYER_TURN_RATE
        } else {
            interpolate(
                consts::PLAYER_START_TURN_RATE,
                consts::PLAYER_TURN_RATE,
                self.turning_time / consts::PLAYER_START_TURN_TIME,
            )
        }
    }
}

/// Linear interpolation from `low` to `high` by `amount` in [0, 1]
#[inline]
fn interpolate(low: f32, high: f32, amount: f32) -> f32 {
    low + (high - low) * amount
}

/// Look up a value from a speed-keyed curve.
///
/// The first entry whose bound exceeds `key` wins; a `None` bound is the
/// catch-all. Falls back to the last entry's value if no bound matches.
pub fn curve_value(key: f32, curve: &[(Option<f32>, f32)]) -> f32 {
    for &(bound, value) in curve {
        match bound {
            Some(bound) if key >= bound => continue,
            _ => return value,
        }
    }
    curve.last().map_or(0.0, |&(_, value)| value)
}

/// Run one frame of the control state machine for a player body and return
/// the summed control force. Non-player bodies get no force.
///
/// Also applies the boost-heavy mass and restitution modulation to the body.
pub fn steering_force(body: &mut Body, elapsed_seconds: f32) -> Option<Vec2> {
    let speed = body.velocity.length();
    let velocity = body.velocity;
    let control = body.control.as_mut()?;

    control.update_state(speed, elapsed_seconds);

    // Integrate heading and refresh the facing vector.
    let turn_rate = control.turn_rate();
    control.heading += f32::from(control.turn_direction) * turn_rate * elapsed_seconds;
    control.direction = heading_to_vector(control.heading);

    let mut force = Vec2::ZERO;

    if control.do_thrust {
        // Thrust tapers off as the player picks up speed.
        let thrust = curve_value(speed, consts::PLAYER_THRUST_CURVE);
        force += control.direction * thrust;
    }
    if control.do_brake && speed >= consts::PLAYER_MINIMUM_BRAKE_SPEED {
        // Braking always opposes the current velocity.
        force += norm_to(velocity, -consts::PLAYER_BRAKING_STRENGTH);
    }

    if control.boost_time_remaining > 0.0 {
        force += control.direction * consts::PLAYER_BOOST_STRENGTH;
    }
    // Get heavy while boosting.
    if control.boost_heavy_time_remaining > 0.0 {
        body.mass = control.original_mass * consts::PLAYER_BOOST_HEAVY_MULTIPLIER;
        body.restitution = consts::PLAYER_BOOST_RESTITUTION;
    } else {
        body.mass = control.original_mass;
        body.restitution = consts::RESTITUTION_PARTICLE;
    }

    // The rudder only acts while the player is driving, not coasting.
    if velocity != Vec2::ZERO && (control.do_thrust || control.turn_direction != 0) {
        force += rudder_force(velocity, speed, control.direction);
    }

    Some(force)
}

/// Corrective force pulling the velocity vector toward the facing direction.
///
/// Strongest when velocity and facing are perpendicular; vanishes when they
/// are aligned or opposed.
fn rudder_force(velocity: Vec2, speed: f32, direction: Vec2) -> Vec2 {
    let target_velocity = norm_to(direction, speed);
    let force = vfrom(velocity, target_velocity);
    if force == Vec2::ZERO {
        return Vec2::ZERO;
    }

    let v_perp = perp(velocity).normalize_or_zero();
    let angle_multiplier = v_perp.dot(direction).abs();
    let strength = (speed * consts::PLAYER_RUDDER_STRENGTH)
        .min(consts::PLAYER_MAX_RUDDER_STRENGTH)
        * angle_multiplier;
    if strength == 0.0 {
        return Vec2::ZERO;
    }

    norm_to(force, strength)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn player() -> Body {
        Body::player(Vec2::ZERO, Vec2::ZERO, 1.0, Some(1.0), 0.0, 500.0).unwrap()
    }

    fn set_input(body: &mut Body, x_axis: i8, y_axis: i8) {
        body.control.as_mut().unwrap().input = PlayerInput { x_axis, y_axis };
    }

    #[test]
    fn test_curve_value_lookup() {
        let curve = consts::PLAYER_THRUST_CURVE;
        assert_eq!(curve_value(0.0, curve), 55.0);
        assert_eq!(curve_value(4.9, curve), 55.0);
        assert_eq!(curve_value(5.0, curve), 45.0);
        assert_eq!(curve_value(15.0, curve), 10.0);
        // Catch-all for anything past the last bound
        assert_eq!(curve_value(500.0, curve), 0.1);
    }

    #[test]
    fn test_thrust_and_brake_mutually_exclusive() {
        let mut body = player();
        set_input(&mut body, 0, 1);
        steering_force(&mut body, 0.01);
        let control = body.control.as_ref().unwrap();
        assert!(control.do_thrust && !control.do_brake);

        set_input(&mut body, 0, -1);
        steering_force(&mut body, 0.01);
        let control = body.control.as_ref().unwrap();
        assert!(!control.do_thrust && control.do_brake);

        set_input(&mut body, 0, 0);
        steering_force(&mut body, 0.01);
        let control = body.control.as_ref().unwrap();
        assert!(!control.do_thrust && !control.do_brake);
    }

    #[test]
    fn test_turning_ramp_increases_then_holds_full_rate() {
        let mut body = player();
        set_input(&mut body, 1, 0);

        let dt = 0.05;
        let mut deltas = Vec::new();
        let mut last_heading = 0.0;
        for _ in 0..10 {
            steering_force(&mut body, dt);
            let heading = body.control.as_ref().unwrap().heading;
            deltas.push(heading - last_heading);
            last_heading = heading;
        }

        // Strictly increasing through the ramp
        for pair in deltas[..5].windows(2) {
            assert!(pair[1] > pair[0]);
        }
        // At and past the ramp duration: exactly the full rate
        let full = consts::PLAYER_TURN_RATE * dt;
        for &delta in &deltas[4..] {
            assert!((delta - full).abs() < 1e-4);
        }
        // Never exceeds the full rate
        for &delta in &deltas {
            assert!(delta <= full + 1e-4);
        }
    }

    #[test]
    fn test_turning_time_resets_when_input_centers() {
        let mut body = player();
        set_input(&mut body, -1, 0);
        steering_force(&mut body, 0.1);
        assert!(body.control.as_ref().unwrap().turning_time > 0.0);

        set_input(&mut body, 0, 0);
        steering_force(&mut body, 0.1);
        assert_eq!(body.control.as_ref().unwrap().turning_time, 0.0);
    }

    #[test]
    fn test_thrust_force_points_along_heading() {
        let mut body = Body::player(Vec2::ZERO, Vec2::ZERO, 1.0, Some(1.0), FRAC_PI_2, 500.0).unwrap();
        set_input(&mut body, 0, 1);
        let force = steering_force(&mut body, 0.01).unwrap();
        // Facing +y at rest: full low-speed thrust straight up
        assert!((force - Vec2::new(0.0, 55.0)).length() < 1e-3);
    }

    #[test]
    fn test_brake_opposes_velocity_above_minimum_speed() {
        let mut body = player();
        body.velocity = Vec2::new(10.0, 0.0);
        set_input(&mut body, 0, -1);
        let force = steering_force(&mut body, 0.01).unwrap();
        assert!((force - Vec2::new(-consts::PLAYER_BRAKING_STRENGTH, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_brake_below_minimum_speed_applies_no_force() {
        let mut body = player();
        body.velocity = Vec2::new(0.05, 0.0);
        set_input(&mut body, 0, -1);
        let force = steering_force(&mut body, 0.01).unwrap();
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_boost_charges_and_fires_on_brake_release() {
        let mut body = player();
        set_input(&mut body, 0, -1);
        // Hold the brake at rest until fully charged
        for _ in 0..5 {
            steering_force(&mut body, 0.1);
        }
        let charge = body.control.as_ref().unwrap().boost_charge_time;
        assert!((charge - consts::PLAYER_BOOST_READY_TIME).abs() < 1e-5);

        // Release: boost fires, heavy window opens
        set_input(&mut body, 0, 0);
        let force = steering_force(&mut body, 0.01).unwrap();
        let control = body.control.as_ref().unwrap();
        assert!(control.boost_time_remaining > 0.0);
        assert!(control.boost_heavy_time_remaining > 0.0);
        assert!((force - Vec2::new(consts::PLAYER_BOOST_STRENGTH, 0.0)).length() < 1e-2);
        // Heavy window modulates mass and restitution
        assert_eq!(body.mass, consts::PLAYER_BOOST_HEAVY_MULTIPLIER);
        assert_eq!(body.restitution, consts::PLAYER_BOOST_RESTITUTION);
    }

    #[test]
    fn test_boost_heavy_window_expires_and_restores_body() {
        let mut body = player();
        set_input(&mut body, 0, -1);
        for _ in 0..5 {
            steering_force(&mut body, 0.1);
        }
        set_input(&mut body, 0, 0);
        steering_force(&mut body, 0.01);
        assert!(body.mass > 1.0);

        // Run out the heavy window
        for _ in 0..10 {
            steering_force(&mut body, 0.1);
        }
        assert_eq!(body.mass, 1.0);
        assert_eq!(body.restitution, consts::RESTITUTION_PARTICLE);
        assert_eq!(body.control.as_ref().unwrap().boost_heavy_time_remaining, 0.0);
    }

    #[test]
    fn test_interrupted_charge_resets() {
        let mut body = player();
        set_input(&mut body, 0, -1);
        steering_force(&mut body, 0.2);
        assert!(body.control.as_ref().unwrap().boost_charge_time > 0.0);

        // Release before fully charged: no boost, charge dropped
        set_input(&mut body, 0, 0);
        steering_force(&mut body, 0.01);
        let control = body.control.as_ref().unwrap();
        assert_eq!(control.boost_time_remaining, 0.0);
        assert_eq!(control.boost_charge_time, 0.0);
    }

    #[test]
    fn test_rudder_pulls_velocity_toward_facing() {
        // Moving +x, facing +y, thrusting: the rudder must push the velocity
        // vector up toward the facing direction.
        let mut body = Body::player(
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            1.0,
            Some(1.0),
            FRAC_PI_2,
            500.0,
        )
        .unwrap();
        set_input(&mut body, 0, 1);
        let force = steering_force(&mut body, 0.001).unwrap();
        // Subtract the thrust contribution (straight up) - the remainder is
        // the rudder, which must also have a positive y component and a
        // negative x component (dragging velocity off the x axis).
        let thrust = curve_value(10.0, consts::PLAYER_THRUST_CURVE);
        let rudder = force - body.control.as_ref().unwrap().direction * thrust;
        assert!(rudder.y > 0.0);
        assert!(rudder.x < 0.0);
        // Perpendicular case: full strength, capped at the max
        assert!((rudder.length() - consts::PLAYER_MAX_RUDDER_STRENGTH).abs() < 1e-3);
    }

    #[test]
    fn test_rudder_inactive_while_coasting() {
        let mut body = Body::player(
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            1.0,
            Some(1.0),
            FRAC_PI_2,
            500.0,
        )
        .unwrap();
        set_input(&mut body, 0, 0);
        let force = steering_force(&mut body, 0.001).unwrap();
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_rudder_vanishes_when_aligned_or_reversed() {
        // Facing where we are going: nothing to correct.
        let mut body =
            Body::player(Vec2::ZERO, Vec2::new(10.0, 0.0), 1.0, Some(1.0), 0.0, 500.0).unwrap();
        set_input(&mut body, 0, 1);
        let force = steering_force(&mut body, 0.001).unwrap();
        let thrust = curve_value(10.0, consts::PLAYER_THRUST_CURVE);
        let rudder = force - body.control.as_ref().unwrap().direction * thrust;
        assert!(rudder.length() < 1e-4);

        // Facing exactly backwards: the sine factor kills the rudder.
        let mut body = Body::player(
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            1.0,
            Some(1.0),
            std::f32::consts::PI,
            500.0,
        )
        .unwrap();
        set_input(&mut body, 0, 1);
        let force = steering_force(&mut body, 0.001).unwrap();
        let thrust = curve_value(10.0, consts::PLAYER_THRUST_CURVE);
        let rudder = force - body.control.as_ref().unwrap().direction * thrust;
        assert!(rudder.length() < 1e-3);
    }

    #[test]
    fn test_non_player_gets_no_force() {
        let mut body = Body::particle(Vec2::ZERO, Vec2::new(5.0, 0.0), 1.0, None).unwrap();
        assert!(steering_force(&mut body, 0.01).is_none());
    }
}
