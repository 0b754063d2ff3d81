//! Weapon configuration.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::pool::PrototypeKey;
use crate::projectile::EGG;

/// A round count that may be unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ammo {
    Finite(u32),
    Unbounded,
}

impl Ammo {
    pub fn is_empty(self) -> bool {
        matches!(self, Self::Finite(0))
    }

    /// Finite count, if bounded.
    pub fn count(self) -> Option<u32> {
        match self {
            Self::Finite(count) => Some(count),
            Self::Unbounded => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FireMode {
    /// One shot per trigger press.
    #[default]
    SemiAuto,
    /// Fires every tick the trigger is held.
    FullAuto,
}

/// How a shot is resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Instant ray test.
    Hitscan { max_range: f32 },
    /// A pooled ballistic projectile.
    Projectile {
        prototype: PrototypeKey,
        muzzle_speed: f32,
        explosion_radius: f32,
        lifetime: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub name: String,
    pub damage: f32,
    /// Shots per second.
    pub fire_rate: f32,
    pub magazine: Ammo,
    /// Seconds.
    pub reload_time: f32,
    /// Only the magnitude is used. The push always points against the aim.
    pub recoil: Vec3,
    /// Camera kick per shot in radians (x = yaw, y = pitch).
    pub camera_kick: Vec2,
    pub fire_mode: FireMode,
    pub kind: WeaponKind,
}

impl WeaponConfig {
    /// Automatic hitscan pistol with a bottomless magazine.
    pub fn glock18() -> Self {
        Self {
            name: "Glock 18".to_string(),
            damage: 15.0,
            fire_rate: 12.5,
            magazine: Ammo::Unbounded,
            reload_time: 0.0,
            recoil: Vec3::new(0.0, 5.0, 10.0),
            camera_kick: Vec2::new(0.0, 0.01),
            fire_mode: FireMode::FullAuto,
            kind: WeaponKind::Hitscan { max_range: 1000.0 },
        }
    }

    /// Semi-automatic egg launcher with heavy recoil and explosive eggs.
    pub fn egg_launcher() -> Self {
        Self {
            name: "Egg Launcher".to_string(),
            damage: 30.0,
            fire_rate: 2.0,
            magazine: Ammo::Finite(24),
            reload_time: 3.0,
            recoil: Vec3::new(0.0, 15.0, 25.0),
            camera_kick: Vec2::new(0.0, 0.05),
            fire_mode: FireMode::SemiAuto,
            kind: WeaponKind::Projectile {
                prototype: EGG,
                muzzle_speed: 20.0,
                explosion_radius: 5.0,
                lifetime: 10.0,
            },
        }
    }

    /// Seconds between shots.
    pub fn cooldown(&self) -> f32 {
        if self.fire_rate > 0.0 {
            1.0 / self.fire_rate
        } else {
            f32::INFINITY
        }
    }

    pub fn recoil_magnitude(&self) -> f32 {
        self.recoil.length()
    }

    pub fn is_hitscan(&self) -> bool {
        matches!(self.kind, WeaponKind::Hitscan { .. })
    }
}
