//! Cluckstorm Game Logic
//!
//! This crate contains the combat simulation built on top of
//! `cluckstorm-physics`:
//!
//! - Input sampling into movement commands and fire/reload intents
//! - Weapons (hitscan and projectile) with ammo, cooldown and reload
//! - Pooled projectiles, explosions and impact effects
//! - Players, targets, weapon pickups, levels and the fixed-step game loop
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         Simulation                            │
//! │  ┌─────────┐   ┌────────────┐   ┌──────────────────────────┐  │
//! │  │ Input   │──►│ Locomotion │──►│ Motion solver            │  │
//! │  │ sampler │   │ (frame)    │   │ (fixed, consumes recoil) │  │
//! │  └────┬────┘   └────────────┘   └──────────────────────────┘  │
//! │       │ fire                               ▲ recoil           │
//! │       ▼                                    │                  │
//! │  ┌─────────┐   ┌────────────┐   ┌──────────┴───────────────┐  │
//! │  │ Weapon  │──►│ Projectile │──►│ Explosion resolver       │  │
//! │  │         │   │ system     │   │ (damage + knockback)     │  │
//! │  └─────────┘   └────────────┘   └──────────────────────────┘  │
//! │         ResourcePool: projectiles, impact effects             │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here looks at concrete target types. Weapons and explosions go
//! through the [`Damageable`] and [`PhysicsBody`] capabilities.

pub mod config;
pub mod damage;
pub mod effects;
pub mod events;
pub mod explosion;
pub mod footsteps;
pub mod game_loop;
pub mod input;
pub mod level;
pub mod pickup;
pub mod player;
pub mod pool;
pub mod projectile;
pub mod simulation;
pub mod target;
pub mod weapon;

// Re-export main types
pub use config::{ConfigError, SimulationConfig};
pub use damage::{Damageable, Health, PhysicsBody, PhysicsModifier, TargetLookup};
pub use events::SimEvent;
pub use explosion::{Explosion, ExplosionResolver};
pub use game_loop::GameLoop;
pub use input::{InputFrame, InputSampler, Intent};
pub use level::Level;
pub use pickup::{nearest_pickup, WeaponPickup};
pub use player::{EntityId, Player};
pub use pool::{PoolError, PoolItem, Poolable, Pose, PrototypeKey, ResourcePool};
pub use projectile::{Projectile, ProjectileSystem};
pub use simulation::Simulation;
pub use target::{Target, TargetSpawn};
pub use weapon::{Ammo, FireMode, ShotOutcome, Weapon, WeaponConfig, WeaponKind};

// Re-export physics types for convenience
pub use cluckstorm_physics::{
    ColliderId, CollisionQueries, CollisionWorld, ContentFlags, MovementConfig, MovementState, PlayerController,
    RecoilAccumulator,
};
