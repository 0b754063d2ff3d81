//! Simulation configuration and loading.

use std::fs;
use std::path::{Path, PathBuf};

use cluckstorm_physics::MovementConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::damage::PhysicsModifier;
use crate::explosion::KNOCKBACK_COEFFICIENT;
use crate::footsteps::FootstepConfig;
use crate::input::InputModes;
use crate::projectile::PROJECTILE_GRAVITY;
use crate::weapon::{Ammo, WeaponConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Size policy for one pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolSize {
    pub initial_size: usize,
    pub can_expand: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub projectiles: PoolSize,
    pub impacts: PoolSize,
    /// Seconds an impact effect stays alive.
    pub impact_lifetime: f32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            projectiles: PoolSize {
                initial_size: 10,
                can_expand: true,
            },
            impacts: PoolSize {
                initial_size: 32,
                can_expand: false,
            },
            impact_lifetime: 2.0,
        }
    }
}

/// Game simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed simulation ticks per second.
    pub tick_rate: u32,

    /// Longest frame the game loop will catch up on (seconds).
    pub max_frame_time: f32,

    pub movement: MovementConfig,

    pub mouse_sensitivity: f32,

    pub input: InputModes,

    pub footsteps: FootstepConfig,

    pub projectile_gravity: f32,

    /// Explosion impulse per point of damage.
    pub knockback_coefficient: f32,

    /// Weapons every player spawns with, in slot order.
    pub loadout: Vec<WeaponConfig>,

    pub pools: PoolConfig,

    pub player_health: f32,

    pub player_modifier: PhysicsModifier,

    /// Landing speed that costs no health.
    pub safe_fall_speed: f32,

    pub fall_damage_per_speed: f32,

    /// How far from the feet a pickup can be collected.
    pub interaction_range: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            max_frame_time: 0.25,
            movement: MovementConfig::default(),
            mouse_sensitivity: 2.0,
            input: InputModes::default(),
            footsteps: FootstepConfig::default(),
            projectile_gravity: PROJECTILE_GRAVITY,
            knockback_coefficient: KNOCKBACK_COEFFICIENT,
            loadout: vec![WeaponConfig::glock18(), WeaponConfig::egg_launcher()],
            pools: PoolConfig::default(),
            player_health: 100.0,
            player_modifier: PhysicsModifier::default(),
            safe_fall_speed: 12.0,
            fall_damage_per_speed: 5.0,
            interaction_range: 2.0,
        }
    }
}

impl SimulationConfig {
    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return invalid("tick_rate must be positive");
        }
        if self.max_frame_time <= 0.0 {
            return invalid("max_frame_time must be positive");
        }
        if self.mouse_sensitivity < 0.0 {
            return invalid("mouse_sensitivity must not be negative");
        }

        let movement = &self.movement;
        if movement.player_radius <= 0.0 || movement.standing_height <= 0.0 || movement.crouched_height <= 0.0 {
            return invalid("player dimensions must be positive");
        }
        if movement.crouched_height > movement.standing_height {
            return invalid("crouched_height exceeds standing_height");
        }
        if movement.gravity < 0.0 || movement.jump_height < 0.0 {
            return invalid("gravity and jump_height must not be negative");
        }
        if movement.transition_speed <= 0.0 {
            return invalid("transition_speed must be positive");
        }

        for weapon in &self.loadout {
            if weapon.fire_rate <= 0.0 {
                return invalid(format!("{}: fire_rate must be positive", weapon.name));
            }
            if weapon.magazine == Ammo::Finite(0) {
                return invalid(format!("{}: magazine must hold at least one round", weapon.name));
            }
            if weapon.reload_time < 0.0 || weapon.damage < 0.0 {
                return invalid(format!("{}: reload_time and damage must not be negative", weapon.name));
            }
        }

        if self.projectile_gravity < 0.0 || self.knockback_coefficient < 0.0 {
            return invalid("projectile_gravity and knockback_coefficient must not be negative");
        }
        if self.player_health <= 0.0 {
            return invalid("player_health must be positive");
        }
        if self.player_modifier.mass <= 0.0 {
            return invalid("player_modifier.mass must be positive");
        }
        if self.interaction_range < 0.0 {
            return invalid("interaction_range must not be negative");
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(message.into()))
}
