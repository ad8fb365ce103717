//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must be pure and deterministic:
//! - Elapsed time is supplied by the caller, never read from a clock
//! - A step runs to completion with no suspension points; the world owns its
//!   collections exclusively while it runs
//! - Fixed per-frame order: control update, body-pair collisions, wall
//!   collisions, integration, death check
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod control;
pub mod vecmath;
pub mod wall;
pub mod world;

pub use body::Body;
pub use collision::{collide_bodies, intersects, pair_restitution};
pub use control::{ControlState, PlayerInput, curve_value};
pub use wall::{Wall, intersect_segments};
pub use world::World;

use thiserror::Error;

/// Construction- and boundary-time validation errors.
///
/// The per-frame hot path never produces these; numerical degeneracies
/// during a step fall back to zero vectors instead (see [`vecmath`]).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("body mass must be positive, got {0}")]
    NonPositiveMass(f32),
    #[error("body radius must be positive, got {0}")]
    NonPositiveRadius(f32),
    #[error("wall segment has zero length at ({0}, {1})")]
    DegenerateWall(f32, f32),
    #[error("player health must be positive, got {0}")]
    NonPositiveHealth(f32),
    #[error("elapsed time must be finite and non-negative, got {0}")]
    InvalidElapsed(f32),
}
