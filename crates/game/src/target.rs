//! Shootable targets: dummies, crates and barrels.

use cluckstorm_physics::movement::{slide_move, TouchList};
use cluckstorm_physics::{ColliderId, CollisionQueries, ContentFlags, MovementConfig, QueryFilter, TraceShape};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::damage::{Health, RigidBody};

/// Horizontal speed lost per second while resting on the ground.
const GROUND_FRICTION: f32 = 4.0;

/// Velocity below which a grounded target comes to rest.
const REST_SPEED: f32 = 0.05;

/// Placement for a target in a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpawn {
    pub name: String,
    /// Bottom-center of the box.
    pub position: Vec3,
    pub half_extents: Vec3,
    pub health: f32,
    pub mass: f32,
    /// Whether explosions can move it.
    pub dynamic: bool,
}

impl TargetSpawn {
    pub fn dummy(name: &str, position: Vec3) -> Self {
        Self {
            name: name.to_string(),
            position,
            half_extents: Vec3::new(0.4, 0.9, 0.4),
            health: 100.0,
            mass: 80.0,
            dynamic: false,
        }
    }

    pub fn crate_box(name: &str, position: Vec3) -> Self {
        Self {
            name: name.to_string(),
            position,
            half_extents: Vec3::splat(0.5),
            health: 50.0,
            mass: 10.0,
            dynamic: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub collider: ColliderId,
    pub half_extents: Vec3,
    pub health: Health,
    /// Body position is the box center.
    pub body: RigidBody,
}

impl Target {
    pub fn new(spawn: &TargetSpawn, collider: ColliderId) -> Self {
        let center = spawn.position + Vec3::Y * spawn.half_extents.y;
        let mut body = RigidBody::new(center, spawn.mass);
        body.dynamic = spawn.dynamic;
        Self {
            name: spawn.name.clone(),
            collider,
            half_extents: spawn.half_extents,
            health: Health::new(spawn.health),
            body,
        }
    }

    /// Bottom-center of the box.
    pub fn feet(&self) -> Vec3 {
        self.body.position - Vec3::Y * self.half_extents.y
    }

    /// Fall and slide under gravity. Static targets never move.
    ///
    /// Returns true if the target moved.
    pub fn step(&mut self, world: &dyn CollisionQueries, gravity: f32, dt: f32, config: &MovementConfig) -> bool {
        if !self.body.dynamic {
            return false;
        }

        let shape = TraceShape::Box {
            half_extents: self.half_extents,
        };
        let filter = QueryFilter::new(ContentFlags::MASK_PLAYER_SOLID).excluding(self.collider);
        let mut feet = self.feet();

        let below = world.trace(feet, feet - Vec3::Y * 0.05, shape, &filter);
        let grounded = below.hit_something() && self.body.velocity.y <= 0.0;
        if grounded {
            self.body.velocity.y = 0.0;
            let damping = (1.0 - GROUND_FRICTION * dt).max(0.0);
            self.body.velocity.x *= damping;
            self.body.velocity.z *= damping;
            if self.body.velocity.length() < REST_SPEED {
                self.body.velocity = Vec3::ZERO;
                return false;
            }
        } else {
            self.body.velocity.y -= gravity * dt;
        }

        let start = feet;
        let mut touched = TouchList::default();
        slide_move(world, &mut feet, &mut self.body.velocity, shape, &filter, dt, config, &mut touched);
        self.body.position = feet + Vec3::Y * self.half_extents.y;
        feet != start
    }
}
