//! Ballistic projectiles.
//!
//! Live projectiles fall under gravity and sweep their path each fixed tick.
//! They explode on the first non-trigger collider that isn't their owner,
//! or when their lifetime runs out. Instances come from and go back to a
//! [`ResourcePool`].

use cluckstorm_physics::{ColliderId, CollisionQueries, ContentFlags, QueryFilter};
use glam::{Quat, Vec3};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::explosion::Explosion;
use crate::pool::{PoolError, PoolItem, Poolable, Pose, PrototypeKey, ResourcePool};

/// Prototype used by the egg launcher.
pub const EGG: PrototypeKey = PrototypeKey(1);

/// Default projectile gravity.
pub const PROJECTILE_GRAVITY: f32 = 9.81;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub prototype: PrototypeKey,
    pub position: Vec3,
    pub velocity: Vec3,
    /// +Z points along the velocity.
    pub orientation: Quat,
    pub damage: f32,
    pub explosion_radius: f32,
    /// Simulation time at launch (seconds).
    pub spawn_time: f64,
    pub lifetime: f32,
    pub owner: Option<ColliderId>,
    pub active: bool,
}

impl Projectile {
    pub fn prototype(prototype: PrototypeKey) -> Self {
        Self {
            prototype,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            damage: 0.0,
            explosion_radius: 0.0,
            spawn_time: 0.0,
            lifetime: 10.0,
            owner: None,
            active: false,
        }
    }

    pub fn age(&self, now: f64) -> f64 {
        now - self.spawn_time
    }

    pub fn expired(&self, now: f64) -> bool {
        self.age(now) > f64::from(self.lifetime)
    }
}

impl Poolable for Projectile {
    fn activate(&mut self, pose: Pose) {
        self.position = pose.position;
        self.orientation = pose.rotation;
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.velocity = Vec3::ZERO;
        self.owner = None;
        self.active = false;
    }
}

/// Launch parameters for one projectile.
#[derive(Debug, Clone, Copy)]
pub struct Launch {
    pub prototype: PrototypeKey,
    pub origin: Vec3,
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    pub explosion_radius: f32,
    pub lifetime: f32,
    pub owner: Option<ColliderId>,
}

/// Owns every live projectile and the pool they come from.
#[derive(Debug)]
pub struct ProjectileSystem {
    pool: ResourcePool<Projectile>,
    active: Vec<Projectile>,
    gravity: f32,
}

impl ProjectileSystem {
    pub fn new(pool: ResourcePool<Projectile>, gravity: f32) -> Self {
        Self {
            pool,
            active: Vec::new(),
            gravity,
        }
    }

    /// A system with a single egg pool.
    pub fn with_egg_pool(initial_size: usize, can_expand: bool, gravity: f32) -> Self {
        let mut item = PoolItem::new(EGG, Projectile::prototype(EGG)).with_size(initial_size);
        item.can_expand = can_expand;
        Self::new(ResourcePool::from_items([item]), gravity)
    }

    /// Spawn a projectile. Fails if its pool can't supply an instance.
    pub fn launch(&mut self, launch: Launch, now: f64) -> Result<(), PoolError> {
        let direction = launch.direction.normalize_or_zero();
        let mut projectile = self
            .pool
            .acquire(launch.prototype, Pose::facing(launch.origin, direction))?;

        projectile.prototype = launch.prototype;
        projectile.velocity = direction * launch.speed;
        projectile.damage = launch.damage;
        projectile.explosion_radius = launch.explosion_radius.max(0.0);
        projectile.spawn_time = now;
        projectile.lifetime = launch.lifetime;
        projectile.owner = launch.owner;

        debug!("Launched {} at {:?}", launch.prototype, launch.origin);
        self.active.push(projectile);
        Ok(())
    }

    /// Advance every projectile, pushing the ones that blew up.
    pub fn step(&mut self, world: &dyn CollisionQueries, dt: f32, now: f64, explosions: &mut Vec<Explosion>) {
        let mut index = 0;
        while index < self.active.len() {
            let projectile = &mut self.active[index];
            match advance(projectile, world, self.gravity, dt, now) {
                Some(explosion) => {
                    explosions.push(explosion);
                    let spent = self.active.swap_remove(index);
                    self.pool.release(spent.prototype, spent);
                }
                None => index += 1,
            }
        }
    }

    pub fn active(&self) -> &[Projectile] {
        &self.active
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn pool(&self) -> &ResourcePool<Projectile> {
        &self.pool
    }

    /// Return every live projectile to its pool without exploding.
    pub fn clear(&mut self) {
        if !self.active.is_empty() {
            warn!("Clearing {} live projectiles", self.active.len());
        }
        for projectile in self.active.drain(..) {
            self.pool.release(projectile.prototype, projectile);
        }
    }
}

/// Integrate one projectile, returning its explosion if it went off.
fn advance(projectile: &mut Projectile, world: &dyn CollisionQueries, gravity: f32, dt: f32, now: f64) -> Option<Explosion> {
    projectile.velocity.y -= gravity * dt;

    let displacement = projectile.velocity * dt;
    let distance = displacement.length();
    let filter = QueryFilter::new(ContentFlags::MASK_SHOT).excluding_opt(projectile.owner);

    if distance > 0.0 {
        if let Some(hit) = world.raycast(projectile.position, displacement, distance, &filter) {
            projectile.position = hit.point;
            return Some(Explosion::from_projectile(projectile, Some(hit.collider)));
        }
        projectile.position += displacement;
        projectile.orientation = Quat::from_rotation_arc(Vec3::Z, displacement / distance);
    }

    if projectile.expired(now) {
        return Some(Explosion::from_projectile(projectile, None));
    }
    None
}
