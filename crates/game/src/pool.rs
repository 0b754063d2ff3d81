//! Reuse pools for transient simulation objects.
//!
//! Each prototype gets a queue of inactive instances built up front. Taking
//! an instance out with [`ResourcePool::acquire`] moves it out of the queue,
//! so an instance is either held by the caller or queued, never both.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use glam::{Quat, Vec3};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies a prototype (the template instances are cloned from).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrototypeKey(pub u32);

impl fmt::Display for PrototypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prototype#{}", self.0)
    }
}

/// Where an acquired instance is placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Pose at `position` with +Z turned toward `direction`.
    pub fn facing(position: Vec3, direction: Vec3) -> Self {
        let forward = direction.normalize_or_zero();
        let rotation = if forward == Vec3::ZERO {
            Quat::IDENTITY
        } else {
            Quat::from_rotation_arc(Vec3::Z, forward)
        };
        Self::new(position, rotation)
    }
}

/// Lifecycle hooks for pooled instances.
pub trait Poolable {
    /// Called when the instance leaves the pool.
    fn activate(&mut self, pose: Pose);

    /// Called when the instance goes back into the pool.
    fn deactivate(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("pool for {0} is empty and cannot expand")]
    Exhausted(PrototypeKey),

    #[error("no pool registered for {0}")]
    UnknownPrototype(PrototypeKey),
}

/// Setup entry for one prototype.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolItem<T> {
    pub key: PrototypeKey,
    /// Template to clone instances from. `None` is reported and skipped.
    pub prototype: Option<T>,
    pub initial_size: usize,
    pub can_expand: bool,
}

impl<T> PoolItem<T> {
    pub fn new(key: PrototypeKey, prototype: T) -> Self {
        Self {
            key,
            prototype: Some(prototype),
            initial_size: 10,
            can_expand: true,
        }
    }

    pub fn with_size(mut self, initial_size: usize) -> Self {
        self.initial_size = initial_size;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.can_expand = false;
        self
    }
}

#[derive(Debug)]
struct PoolEntry<T> {
    prototype: T,
    inactive: VecDeque<T>,
    can_expand: bool,
    created: usize,
}

/// Pools keyed by prototype.
#[derive(Debug)]
pub struct ResourcePool<T> {
    entries: HashMap<PrototypeKey, PoolEntry<T>>,
}

impl<T> Default for ResourcePool<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Poolable + Clone> ResourcePool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build pools from setup entries, skipping the invalid ones.
    pub fn from_items(items: impl IntoIterator<Item = PoolItem<T>>) -> Self {
        let mut pool = Self::new();
        for item in items {
            pool.register(item);
        }
        pool
    }

    /// Register a prototype and pre-build its instances.
    ///
    /// Returns false if the item has no prototype. Registering a key twice
    /// replaces the earlier pool.
    pub fn register(&mut self, item: PoolItem<T>) -> bool {
        let Some(prototype) = item.prototype else {
            error!("Pool item {} has no prototype, skipping", item.key);
            return false;
        };

        let mut inactive = VecDeque::with_capacity(item.initial_size);
        for _ in 0..item.initial_size {
            let mut instance = prototype.clone();
            instance.deactivate();
            inactive.push_back(instance);
        }

        debug!(
            "Pool {} ready with {} instances (expand: {})",
            item.key, item.initial_size, item.can_expand
        );

        self.entries.insert(
            item.key,
            PoolEntry {
                prototype,
                inactive,
                can_expand: item.can_expand,
                created: item.initial_size,
            },
        );
        true
    }

    /// Take an instance out of the pool and place it at `pose`.
    pub fn acquire(&mut self, key: PrototypeKey, pose: Pose) -> Result<T, PoolError> {
        let Some(entry) = self.entries.get_mut(&key) else {
            warn!("Acquire from unknown {}", key);
            return Err(PoolError::UnknownPrototype(key));
        };

        let mut instance = match entry.inactive.pop_front() {
            Some(instance) => instance,
            None if entry.can_expand => {
                entry.created += 1;
                debug!("Pool {} grew to {}", key, entry.created);
                entry.prototype.clone()
            }
            None => {
                warn!("Pool {} is empty and cannot expand", key);
                return Err(PoolError::Exhausted(key));
            }
        };

        instance.activate(pose);
        Ok(instance)
    }

    /// Put an instance back.
    ///
    /// An instance of an unknown prototype is logged and dropped, and so is
    /// one that would leave more instances queued than were ever built.
    pub fn release(&mut self, key: PrototypeKey, mut instance: T) {
        let Some(entry) = self.entries.get_mut(&key) else {
            warn!("Release to unknown {}, discarding instance", key);
            return;
        };
        if entry.inactive.len() >= entry.created {
            warn!("Pool {} is already full, discarding released instance", key);
            return;
        }
        instance.deactivate();
        entry.inactive.push_back(instance);
    }

    pub fn contains(&self, key: PrototypeKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Inactive instances waiting in a pool.
    pub fn available(&self, key: PrototypeKey) -> usize {
        self.entries.get(&key).map_or(0, |entry| entry.inactive.len())
    }

    /// Instances ever built for a pool.
    pub fn created(&self, key: PrototypeKey) -> usize {
        self.entries.get(&key).map_or(0, |entry| entry.created)
    }

    /// Drop every pool and its queued instances.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
