//! Level definitions
//!
//! A level is an ordered list of construction records, pure data loaded once
//! at startup. The built-in arenas mirror the game's stock layouts; external
//! loaders can supply the same records as JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::consts;

/// One entity construction record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityDef {
    Player {
        pos: Vec2,
        #[serde(default)]
        velocity: Vec2,
        mass: f32,
        #[serde(default)]
        radius: Option<f32>,
        #[serde(default)]
        heading: f32,
        #[serde(default = "default_health")]
        health: f32,
    },
    Particle {
        pos: Vec2,
        #[serde(default)]
        velocity: Vec2,
        mass: f32,
        #[serde(default)]
        radius: Option<f32>,
    },
    Bumper {
        pos: Vec2,
        radius: f32,
    },
    Wall {
        p1: Vec2,
        p2: Vec2,
    },
}

fn default_health() -> f32 {
    consts::PLAYER_HEALTH
}

/// An ordered list of entity records
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Level {
    pub entities: Vec<EntityDef>,
}

/// Two-player arena: a walled square with cut corners, a heavy center
/// bumper and a scattering of loose particles.
pub fn arena() -> Level {
    let mut entities = vec![
        EntityDef::Player {
            pos: Vec2::new(6.0, 6.0),
            velocity: Vec2::ZERO,
            mass: 1.0,
            radius: Some(1.0),
            heading: PI * -3.0 / 4.0,
            health: consts::PLAYER_HEALTH,
        },
        EntityDef::Player {
            pos: Vec2::new(-6.0, -6.0),
            velocity: Vec2::ZERO,
            mass: 1.0,
            radius: Some(1.0),
            heading: PI / 4.0,
            health: consts::PLAYER_HEALTH,
        },
        EntityDef::Bumper {
            pos: Vec2::ZERO,
            radius: 3.0,
        },
    ];
    for (x, y, mass) in [
        (5.0, -5.0, 5.0),
        (-5.0, 5.0, 5.0),
        (10.0, -10.0, 2.0),
        (-10.0, 10.0, 2.0),
        (15.0, -15.0, 0.5),
        (-15.0, 15.0, 0.5),
    ] {
        entities.push(EntityDef::Particle {
            pos: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            mass,
            radius: None,
        });
    }
    for (p1, p2) in [
        ((-20.0, -20.0), (-20.0, 20.0)),
        ((-20.0, 20.0), (20.0, 20.0)),
        ((20.0, 20.0), (20.0, -20.0)),
        ((20.0, -20.0), (-20.0, -20.0)),
        ((-12.0, -8.0), (-8.0, -12.0)),
        ((12.0, 8.0), (8.0, 12.0)),
    ] {
        entities.push(EntityDef::Wall {
            p1: Vec2::new(p1.0, p1.1),
            p2: Vec2::new(p2.0, p2.1),
        });
    }
    Level { entities }
}

/// Single-player scramble: one vehicle loose in an irregular arena with
/// drifting debris.
pub fn scramble() -> Level {
    let mut entities = vec![
        EntityDef::Player {
            pos: Vec2::new(2.0, 2.0),
            velocity: Vec2::ZERO,
            mass: 1.0,
            radius: Some(1.0),
            heading: 0.0,
            health: consts::PLAYER_HEALTH,
        },
        EntityDef::Particle {
            pos: Vec2::new(0.0, 3.0),
            velocity: Vec2::new(-1.0, 3.0),
            mass: 1.0,
            radius: None,
        },
        EntityDef::Particle {
            pos: Vec2::new(-5.0, 0.0),
            velocity: Vec2::new(-1.0, 2.0),
            mass: 0.25,
            radius: None,
        },
        EntityDef::Particle {
            pos: Vec2::new(3.0, -3.0),
            velocity: Vec2::new(0.0, -3.0),
            mass: 5.0,
            radius: None,
        },
    ];
    for (p1, p2) in [
        ((-3.0, -3.0), (-6.0, 3.0)),
        ((6.0, 3.0), (6.0, -3.0)),
        ((0.0, 8.0), (-15.0, 12.0)),
        ((-15.0, 12.0), (-12.0, -7.0)),
        ((-12.0, -7.0), (2.0, -11.0)),
        ((2.0, -11.0), (14.0, -10.0)),
        ((14.0, -10.0), (17.0, 2.0)),
        ((17.0, 2.0), (15.0, 13.0)),
        ((15.0, 13.0), (0.0, 8.0)),
    ] {
        entities.push(EntityDef::Wall {
            p1: Vec2::new(p1.0, p1.1),
            p2: Vec2::new(p2.0, p2.1),
        });
    }
    Level { entities }
}
