//! Bumper Arena - a top-down arena vehicle-combat simulation
//!
//! Core modules:
//! - `sim`: Deterministic physics simulation (bodies, collisions, player control)
//! - `level`: Level definition records and built-in demo arenas
//!
//! The crate is the simulation layer only. Rendering, input polling and the
//! frame loop are external collaborators: they feed per-frame elapsed time
//! and input snapshots in, and read body state back out for display.

pub mod level;
pub mod sim;

pub use level::{EntityDef, Level};
pub use sim::{Body, PlayerInput, SimError, Wall, World};

/// Simulation tuning constants
pub mod consts {
    use std::f32::consts::TAU;

    /// Tolerance for "moving toward the wall" checks
    pub const EPSILON: f32 = 1e-10;

    /// Hard clamp on body speed (units / second)
    pub const MAX_SPEED: f32 = 100.0;
    /// Speed lost every second, applied before the clamp
    pub const DRAG_RATE: f32 = 0.5;

    /// Collision restitution per surface class
    pub const RESTITUTION_WALL: f32 = 0.6;
    pub const RESTITUTION_PARTICLE: f32 = 1.0;
    pub const RESTITUTION_BUMPER: f32 = 1.2;

    /// Rudder strength scales with speed, capped at the maximum
    pub const PLAYER_RUDDER_STRENGTH: f32 = 3.0;
    pub const PLAYER_MAX_RUDDER_STRENGTH: f32 = 30.0;

    /// Turn rate ramps from the start rate to the full rate over the
    /// start-turn time (rates in radians / second)
    pub const PLAYER_START_TURN_RATE: f32 = 0.1 * TAU;
    pub const PLAYER_TURN_RATE: f32 = 1.0 * TAU;
    pub const PLAYER_START_TURN_TIME: f32 = 0.25;

    pub const PLAYER_BRAKING_STRENGTH: f32 = 20.0;
    pub const PLAYER_MINIMUM_BRAKE_SPEED: f32 = 0.1;

    /// Thrust strength varies with current speed. First entry whose bound
    /// exceeds the speed wins; `None` is the catch-all.
    pub const PLAYER_THRUST_CURVE: &[(Option<f32>, f32)] = &[
        (Some(5.0), 55.0),
        (Some(7.0), 45.0),
        (Some(12.0), 35.0),
        (Some(20.0), 10.0),
        (Some(30.0), 5.0),
        (None, 0.1),
    ];

    /// Boost: hold the brake while slow to charge, release to fire
    pub const PLAYER_BOOST_READY_TIME: f32 = 0.4;
    pub const PLAYER_BOOST_TIME: f32 = 0.075;
    pub const PLAYER_BOOST_STRENGTH: f32 = 1200.0;
    pub const PLAYER_BOOST_HEAVY_TIME: f32 = 0.5;
    pub const PLAYER_BOOST_HEAVY_MULTIPLIER: f32 = 6.0;
    pub const PLAYER_BOOST_RESTITUTION: f32 = 1.3;

    /// Cumulative damage a player can take before being wrecked
    pub const PLAYER_HEALTH: f32 = 500.0;
}
