//! Pooled impact effects for hitscan hits.

use cluckstorm_physics::Surface;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::pool::{PoolItem, Poolable, Pose, PrototypeKey, ResourcePool};

/// Prototype for bullet impacts.
pub const BULLET_IMPACT: PrototypeKey = PrototypeKey(100);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactEffect {
    pub position: Vec3,
    /// +Z points along the surface normal.
    pub orientation: Quat,
    pub surface: Surface,
    pub lifetime: f32,
    pub remaining: f32,
}

impl ImpactEffect {
    pub fn new(lifetime: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            surface: Surface::Unknown,
            lifetime,
            remaining: 0.0,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }
}

impl Poolable for ImpactEffect {
    fn activate(&mut self, pose: Pose) {
        self.position = pose.position;
        self.orientation = pose.rotation;
        self.remaining = self.lifetime;
    }

    fn deactivate(&mut self) {
        self.remaining = 0.0;
    }
}

/// Live impact effects.
#[derive(Debug)]
pub struct ImpactEffects {
    key: PrototypeKey,
    pool: ResourcePool<ImpactEffect>,
    active: Vec<ImpactEffect>,
}

impl ImpactEffects {
    pub fn new(key: PrototypeKey, pool: ResourcePool<ImpactEffect>) -> Self {
        Self {
            key,
            pool,
            active: Vec::new(),
        }
    }

    /// Effects from a single bullet impact pool.
    pub fn with_pool(initial_size: usize, can_expand: bool, lifetime: f32) -> Self {
        let mut item = PoolItem::new(BULLET_IMPACT, ImpactEffect::new(lifetime)).with_size(initial_size);
        item.can_expand = can_expand;
        Self::new(BULLET_IMPACT, ResourcePool::from_items([item]))
    }

    /// Place an effect. Returns false if the pool had nothing to give.
    pub fn spawn(&mut self, point: Vec3, normal: Vec3, surface: Surface) -> bool {
        match self.pool.acquire(self.key, Pose::facing(point, normal)) {
            Ok(mut effect) => {
                effect.surface = surface;
                self.active.push(effect);
                true
            }
            Err(_) => false,
        }
    }

    /// Age effects and return the expired ones to the pool.
    pub fn tick(&mut self, dt: f32) {
        let mut index = 0;
        while index < self.active.len() {
            self.active[index].remaining -= dt;
            if self.active[index].remaining <= 0.0 {
                let expired = self.active.swap_remove(index);
                self.pool.release(self.key, expired);
            } else {
                index += 1;
            }
        }
    }

    pub fn active(&self) -> &[ImpactEffect] {
        &self.active
    }

    pub fn available(&self) -> usize {
        self.pool.available(self.key)
    }
}
