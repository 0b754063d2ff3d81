//! Damage and physics capabilities.
//!
//! Weapons and explosions never look at concrete entity types. They resolve
//! a collider to these capabilities through a [`TargetLookup`].

use cluckstorm_physics::ColliderId;
use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

/// Something that can take damage.
pub trait Damageable {
    /// Apply `amount` of damage. Returns true if this damage was fatal.
    fn take_damage(&mut self, amount: f32) -> bool;

    fn is_alive(&self) -> bool;
}

/// Something that can be pushed around.
pub trait PhysicsBody {
    /// Apply an instantaneous impulse.
    fn apply_impulse(&mut self, impulse: Vec3);

    /// Center of mass in world space.
    fn center(&self) -> Vec3;
}

/// Resolves colliders to capabilities.
pub trait TargetLookup {
    fn damageable(&mut self, collider: ColliderId) -> Option<&mut dyn Damageable>;

    fn physics_body(&mut self, collider: ColliderId) -> Option<&mut dyn PhysicsBody>;
}

/// Hit points with a fixed maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
    dead: bool,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            dead: max <= 0.0,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Heal up to the maximum. The dead stay dead.
    pub fn heal(&mut self, amount: f32) {
        if self.dead {
            return;
        }
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }

    /// Bring back to full health.
    pub fn revive(&mut self) {
        self.current = self.max;
        self.dead = self.max <= 0.0;
    }
}

impl Damageable for Health {
    fn take_damage(&mut self, amount: f32) -> bool {
        if self.dead || amount <= 0.0 {
            return false;
        }
        self.current -= amount;
        if self.current <= 0.0 {
            self.current = 0.0;
            self.dead = true;
            debug!("Health depleted");
            return true;
        }
        false
    }

    fn is_alive(&self) -> bool {
        !self.dead
    }
}

/// Per-character physical multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsModifier {
    /// Divides incoming impulses.
    pub mass: f32,
    /// Scales weapon recoil.
    pub recoil_force: f32,
    /// Scales carried momentum from knockback.
    pub momentum: f32,
    /// Scales fall damage.
    pub fall_damage: f32,
    /// Scales look input.
    pub control_sensitivity: f32,
}

impl Default for PhysicsModifier {
    fn default() -> Self {
        Self {
            mass: 1.0,
            recoil_force: 1.0,
            momentum: 1.0,
            fall_damage: 1.0,
            control_sensitivity: 1.0,
        }
    }
}

impl PhysicsModifier {
    /// Velocity change caused by `impulse`.
    pub fn velocity_change(&self, impulse: Vec3) -> Vec3 {
        if self.mass > 0.0 {
            impulse * (self.momentum / self.mass)
        } else {
            Vec3::ZERO
        }
    }
}

/// Fall damage for a landing speed.
///
/// Landing slower than `safe_speed` is free; every m/s beyond costs
/// `damage_per_speed`, scaled by the modifier.
pub fn fall_damage(landing_speed: f32, safe_speed: f32, damage_per_speed: f32, modifier: &PhysicsModifier) -> f32 {
    ((landing_speed - safe_speed).max(0.0) * damage_per_speed * modifier.fall_damage).max(0.0)
}

/// A simple rigid body for props and dummies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    /// Whether gravity and integration apply.
    pub dynamic: bool,
}

impl RigidBody {
    pub fn new(position: Vec3, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            mass: mass.max(0.001),
            dynamic: true,
        }
    }

    pub fn fixed(position: Vec3) -> Self {
        Self {
            dynamic: false,
            ..Self::new(position, 1.0)
        }
    }
}

impl PhysicsBody for RigidBody {
    fn apply_impulse(&mut self, impulse: Vec3) {
        if self.dynamic {
            self.velocity += impulse / self.mass;
        }
    }

    fn center(&self) -> Vec3 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_and_death() {
        let mut health = Health::new(100.0);
        assert!(!health.take_damage(15.0));
        assert_eq!(health.current(), 85.0);

        assert!(health.take_damage(90.0));
        assert!(!health.is_alive());
        assert_eq!(health.current(), 0.0);

        // Ignored once dead
        assert!(!health.take_damage(10.0));
        health.heal(50.0);
        assert_eq!(health.current(), 0.0);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut health = Health::new(100.0);
        health.take_damage(30.0);
        health.heal(50.0);
        assert_eq!(health.current(), 100.0);
    }

    #[test]
    fn test_velocity_change_respects_mass() {
        let heavy = PhysicsModifier {
            mass: 2.0,
            ..Default::default()
        };
        assert_eq!(heavy.velocity_change(Vec3::new(4.0, 0.0, 0.0)), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_rigid_body_impulse() {
        let mut body = RigidBody::new(Vec3::ZERO, 4.0);
        body.apply_impulse(Vec3::new(0.0, 8.0, 0.0));
        assert_eq!(body.velocity, Vec3::new(0.0, 2.0, 0.0));

        let mut anchored = RigidBody::fixed(Vec3::ZERO);
        anchored.apply_impulse(Vec3::X);
        assert_eq!(anchored.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_fall_damage() {
        let modifier = PhysicsModifier::default();
        assert_eq!(fall_damage(8.0, 10.0, 5.0, &modifier), 0.0);
        assert_eq!(fall_damage(14.0, 10.0, 5.0, &modifier), 20.0);
    }
}
