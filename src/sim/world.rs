//! World stepper: owns the body and wall collections and runs the frame
//!
//! Per-frame order is fixed and load-bearing: control update, body-pair
//! collisions, wall collisions, integration, death check. A body can be
//! shoved by a pair collision and then corrected by a wall in the same
//! frame, never the reverse.

use glam::Vec2;

use super::body::Body;
use super::collision::{collide_bodies, pair_restitution};
use super::control::{PlayerInput, steering_force};
use super::wall::Wall;
use super::SimError;
use crate::consts;
use crate::level::{EntityDef, Level};

/// The simulation world
#[derive(Debug, Clone, Default)]
pub struct World {
    bodies: Vec<Body>,
    walls: Vec<Wall>,
    /// Ids of players removed after exceeding their health
    wrecked: Vec<u32>,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a world from a level definition, validating every record.
    pub fn load(level: &Level) -> Result<Self, SimError> {
        let mut world = Self::new();
        for def in &level.entities {
            match *def {
                EntityDef::Player {
                    pos,
                    velocity,
                    mass,
                    radius,
                    heading,
                    health,
                } => {
                    world.add_body(Body::player(pos, velocity, mass, radius, heading, health)?);
                }
                EntityDef::Particle {
                    pos,
                    velocity,
                    mass,
                    radius,
                } => {
                    world.add_body(Body::particle(pos, velocity, mass, radius)?);
                }
                EntityDef::Bumper { pos, radius } => {
                    world.add_body(Body::bumper(pos, radius)?);
                }
                EntityDef::Wall { p1, p2 } => world.walls.push(Wall::new(p1, p2)?),
            }
        }
        log::info!(
            "loaded level: {} bodies ({} players), {} walls",
            world.bodies.len(),
            world.players().count(),
            world.walls.len(),
        );
        Ok(world)
    }

    /// Add a body, assigning it the next entity id.
    pub fn add_body(&mut self, mut body: Body) -> u32 {
        self.next_id += 1;
        body.id = self.next_id;
        let id = body.id;
        self.bodies.push(body);
        id
    }

    pub fn add_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn body(&self, id: u32) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    /// The player sub-view of the body collection
    pub fn players(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| b.is_player())
    }

    /// Players removed from the live collections after being wrecked
    pub fn wrecked_players(&self) -> &[u32] {
        &self.wrecked
    }

    /// Store this frame's input snapshot for a player body.
    pub fn set_player_input(&mut self, id: u32, input: PlayerInput) {
        if let Some(control) = self
            .bodies
            .iter_mut()
            .find(|b| b.id == id)
            .and_then(|b| b.control.as_mut())
        {
            control.input = input;
        }
    }

    /// Advance the simulation by exactly `elapsed_seconds`, no sub-stepping.
    ///
    /// Negative or non-finite elapsed time is a caller bug and is rejected
    /// here rather than deep inside the physics math.
    pub fn step(&mut self, elapsed_seconds: f32) -> Result<(), SimError> {
        if !elapsed_seconds.is_finite() || elapsed_seconds < 0.0 {
            return Err(SimError::InvalidElapsed(elapsed_seconds));
        }

        // Control state first: each player's input becomes one summed force,
        // applied later at integration time.
        let forces: Vec<Option<Vec2>> = self
            .bodies
            .iter_mut()
            .map(|body| steering_force(body, elapsed_seconds))
            .collect();

        // Every unordered body pair. O(n^2) is fine at arena body counts.
        for i in 1..self.bodies.len() {
            let (earlier, rest) = self.bodies.split_at_mut(i);
            let b = &mut rest[0];
            for a in earlier {
                let restitution = pair_restitution(a, b);
                collide_bodies(a, b, restitution);
            }
        }

        // Walls after pairs, never before.
        for wall in &self.walls {
            for body in &mut self.bodies {
                wall.collide_wall(body, consts::RESTITUTION_WALL);
            }
        }

        for (body, force) in self.bodies.iter_mut().zip(forces) {
            body.update(elapsed_seconds, force);
        }

        self.reap_wrecked();
        Ok(())
    }

    /// Mark players whose damage exceeded their health and drop them from
    /// the live collections.
    fn reap_wrecked(&mut self) {
        for body in &mut self.bodies {
            if let Some(control) = body.control.as_mut()
                && !control.dead
                && control.damage > control.health
            {
                control.dead = true;
                log::info!(
                    "player {} wrecked (damage {:.1} > health {:.1})",
                    body.id,
                    control.damage,
                    control.health
                );
            }
        }
        let wrecked = &mut self.wrecked;
        self.bodies.retain(|b| {
            if b.dead() {
                wrecked.push(b.id);
                false
            } else {
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level;

    fn world_with(bodies: Vec<Body>, walls: Vec<Wall>) -> World {
        let mut world = World::new();
        for body in bodies {
            world.add_body(body);
        }
        for wall in walls {
            world.add_wall(wall);
        }
        world
    }

    #[test]
    fn test_negative_elapsed_rejected() {
        let mut world = World::new();
        assert!(matches!(
            world.step(-0.016),
            Err(SimError::InvalidElapsed(_))
        ));
        assert!(matches!(
            world.step(f32::NAN),
            Err(SimError::InvalidElapsed(_))
        ));
        assert!(world.step(0.0).is_ok());
    }

    #[test]
    fn test_load_demo_level() {
        let world = World::load(&level::arena()).unwrap();
        assert_eq!(world.players().count(), 2);
        assert!(world.bodies().len() > world.players().count());
        assert!(!world.walls().is_empty());
    }

    #[test]
    fn test_load_rejects_bad_records() {
        let level = Level {
            entities: vec![EntityDef::Particle {
                pos: Vec2::ZERO,
                velocity: Vec2::ZERO,
                mass: -1.0,
                radius: None,
            }],
        };
        assert!(matches!(
            World::load(&level),
            Err(SimError::NonPositiveMass(_))
        ));
    }

    #[test]
    fn test_step_moves_bodies() {
        let mut body = Body::particle(Vec2::ZERO, Vec2::new(10.0, 0.0), 1.0, Some(1.0)).unwrap();
        body.drag_rate = 0.0;
        let mut world = world_with(vec![body], vec![]);
        world.step(0.5).unwrap();
        assert!((world.bodies()[0].pos - Vec2::new(5.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_pair_collision_uses_max_restitution() {
        // A dead-bounce particle hitting a lively one still gets the lively
        // restitution: head-on equal masses swap velocities at r = 1.
        let mut a = Body::particle(Vec2::new(-1.0, 0.0), Vec2::new(20.0, 0.0), 1.0, Some(1.0))
            .unwrap();
        a.restitution = 0.1;
        a.drag_rate = 0.0;
        let mut b = Body::particle(Vec2::new(1.0, 0.0), Vec2::ZERO, 1.0, Some(1.0)).unwrap();
        b.restitution = 1.0;
        b.drag_rate = 0.0;
        let mut world = world_with(vec![a, b], vec![]);
        world.step(0.001).unwrap();
        let b_after = world.bodies()[1].velocity;
        assert!((b_after.x - 20.0).abs() < 0.1);
    }

    #[test]
    fn test_pairs_resolve_before_walls() {
        // The overlapping pair is pushed apart first; the wall then catches
        // the pushed body in the same step. If walls ran first the body
        // would end the frame inside the wall's reach but unmirrored.
        let wall = Wall::new(Vec2::new(2.4, -5.0), Vec2::new(2.4, 5.0)).unwrap();
        let mut a = Body::particle(Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0), 1.0, Some(1.0))
            .unwrap();
        a.drag_rate = 0.0;
        let mut b = Body::particle(Vec2::new(1.5, 0.0), Vec2::new(1.0, 0.0), 1.0, Some(1.0))
            .unwrap();
        b.drag_rate = 0.0;
        let mut world = world_with(vec![a, b], vec![wall]);
        world.step(0.001).unwrap();

        // Pair collision moved b to exact contact (x = 2.0), inside the
        // wall's radius reach; the wall then reflected its velocity.
        let b_after = &world.bodies()[1];
        assert!(b_after.velocity.x < 0.0);
    }

    #[test]
    fn test_player_death_removes_body_and_reports_id() {
        let mut player =
            Body::player(Vec2::ZERO, Vec2::ZERO, 1.0, Some(1.0), 0.0, 500.0).unwrap();
        player.control.as_mut().unwrap().damage = 600.0;
        let mut world = World::new();
        let id = world.add_body(player);
        world.add_body(Body::particle(Vec2::new(10.0, 0.0), Vec2::ZERO, 1.0, None).unwrap());

        world.step(0.016).unwrap();
        assert_eq!(world.wrecked_players(), &[id]);
        assert!(world.body(id).is_none());
        assert_eq!(world.players().count(), 0);
        // The non-player body survives
        assert_eq!(world.bodies().len(), 1);
    }

    #[test]
    fn test_set_player_input_reaches_control_state() {
        let player = Body::player(Vec2::ZERO, Vec2::ZERO, 1.0, Some(1.0), 0.0, 500.0).unwrap();
        let mut world = World::new();
        let id = world.add_body(player);
        world.set_player_input(id, PlayerInput { x_axis: 0, y_axis: 1 });
        world.step(0.1).unwrap();
        // Thrust from rest moves the player along its heading (+x)
        assert!(world.body(id).unwrap().velocity.x > 0.0);
    }

    #[test]
    fn test_level_roundtrips_through_json() {
        let json = serde_json::to_string(&level::arena()).unwrap();
        let parsed: Level = serde_json::from_str(&json).unwrap();
        let world = World::load(&parsed).unwrap();
        assert_eq!(world.bodies().len(), World::load(&level::arena()).unwrap().bodies().len());
    }
}
