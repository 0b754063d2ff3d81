//! Area damage and knockback.

use cluckstorm_physics::{ColliderId, CollisionQueries, ContentFlags, QueryFilter};
use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::damage::TargetLookup;
use crate::projectile::Projectile;

/// Default knockback impulse per point of damage.
pub const KNOCKBACK_COEFFICIENT: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub position: Vec3,
    pub radius: f32,
    pub damage: f32,
    /// Collider the projectile hit, if it went off on contact.
    pub struck: Option<ColliderId>,
    pub owner: Option<ColliderId>,
}

impl Explosion {
    pub fn from_projectile(projectile: &Projectile, struck: Option<ColliderId>) -> Self {
        Self {
            position: projectile.position,
            radius: projectile.explosion_radius,
            damage: projectile.damage,
            struck,
            owner: projectile.owner,
        }
    }
}

/// Outcome of resolving one explosion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplosionReport {
    /// Colliders inside the blast.
    pub affected: u32,
    pub damaged: u32,
    pub pushed: u32,
    pub killed: u32,
}

/// Applies explosion damage with no distance falloff, plus knockback.
#[derive(Debug)]
pub struct ExplosionResolver {
    knockback_coefficient: f32,
    scratch: Vec<ColliderId>,
    damaged: Vec<ColliderId>,
}

impl Default for ExplosionResolver {
    fn default() -> Self {
        Self::new(KNOCKBACK_COEFFICIENT)
    }
}

impl ExplosionResolver {
    pub fn new(knockback_coefficient: f32) -> Self {
        Self {
            knockback_coefficient,
            scratch: Vec::with_capacity(16),
            damaged: Vec::with_capacity(16),
        }
    }

    /// Colliders that took damage in the last [`resolve`](Self::resolve).
    pub fn last_damaged(&self) -> &[ColliderId] {
        &self.damaged
    }

    /// Resolve an explosion against everything in its radius.
    ///
    /// The collider the projectile struck always counts, even with a zero
    /// radius. Colliders killed by the blast are appended to `killed`.
    pub fn resolve(
        &mut self,
        explosion: &Explosion,
        world: &dyn CollisionQueries,
        targets: &mut dyn TargetLookup,
        killed: &mut Vec<ColliderId>,
    ) -> ExplosionReport {
        let filter = QueryFilter::new(ContentFlags::MASK_EXPLOSION);
        if explosion.radius > 0.0 {
            world.overlap_sphere(explosion.position, explosion.radius, &filter, &mut self.scratch);
        } else {
            self.scratch.clear();
        }
        if let Some(struck) = explosion.struck {
            if !self.scratch.contains(&struck) {
                self.scratch.push(struck);
            }
        }

        let mut report = ExplosionReport {
            affected: self.scratch.len() as u32,
            ..Default::default()
        };
        self.damaged.clear();

        for &collider in &self.scratch {
            if let Some(target) = targets.damageable(collider) {
                report.damaged += 1;
                self.damaged.push(collider);
                if target.take_damage(explosion.damage) {
                    report.killed += 1;
                    killed.push(collider);
                }
            }

            if let Some(body) = targets.physics_body(collider) {
                let offset = body.center() - explosion.position;
                let direction = if offset.length_squared() > 1e-8 {
                    offset.normalize()
                } else {
                    Vec3::Y
                };
                body.apply_impulse(direction * explosion.damage * self.knockback_coefficient);
                report.pushed += 1;
            }
        }

        debug!(
            "Explosion at {:?} r={:.1}: {} affected, {} damaged, {} killed",
            explosion.position, explosion.radius, report.affected, report.damaged, report.killed
        );
        report
    }
}
