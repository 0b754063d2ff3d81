//! Player entity and state.

use cluckstorm_physics::{ColliderId, MoveCommand, MovementState, PlayerController};
use glam::Vec3;
use log::debug;

use crate::config::SimulationConfig;
use crate::damage::{fall_damage, Damageable, Health, PhysicsBody, PhysicsModifier};
use crate::footsteps::FootstepScheduler;
use crate::input::InputSampler;
use crate::weapon::{Weapon, WeaponConfig};

/// Unique identifier for entities.
pub type EntityId = u32;

/// A player in the game.
#[derive(Debug, Clone)]
pub struct Player {
    /// Unique player ID.
    pub id: EntityId,

    /// Player name/handle.
    pub name: String,

    /// Movement, camera and recoil.
    pub controller: PlayerController,

    pub health: Health,

    pub modifier: PhysicsModifier,

    /// Weapons by slot.
    pub weapons: Vec<Weapon>,

    /// Index into `weapons`.
    pub active_slot: usize,

    pub footsteps: FootstepScheduler,

    pub input: InputSampler,

    /// Movement intent from the latest frame, replayed by each fixed tick.
    pub command: MoveCommand,

    /// A jump press waiting for the next fixed tick.
    pub pending_jump: bool,

    /// Deaths this session.
    pub deaths: u32,
}

impl Player {
    /// Create a new player at the given spawn position.
    pub fn new(id: EntityId, name: String, spawn_position: Vec3, config: &SimulationConfig) -> Self {
        Self {
            id,
            name,
            controller: PlayerController::new(config.movement.clone(), spawn_position),
            health: Health::new(config.player_health),
            modifier: config.player_modifier.clone(),
            weapons: config.loadout.iter().cloned().map(Weapon::new).collect(),
            active_slot: 0,
            footsteps: FootstepScheduler::new(config.footsteps.clone()),
            input: InputSampler::new(config.input, config.mouse_sensitivity),
            command: MoveCommand::default(),
            pending_jump: false,
            deaths: 0,
        }
    }

    /// Get the player's current position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.controller.position()
    }

    /// Get the player's eye position (for camera and muzzle).
    #[inline]
    pub fn eye_position(&self) -> Vec3 {
        self.controller.eye_position()
    }

    /// Get the direction the player is looking.
    #[inline]
    pub fn aim_direction(&self) -> Vec3 {
        self.controller.aim_direction()
    }

    #[inline]
    pub fn collider(&self) -> Option<ColliderId> {
        self.controller.collider()
    }

    #[inline]
    pub fn movement_state(&self) -> MovementState {
        self.controller.current_movement_state()
    }

    pub fn active_weapon(&self) -> Option<&Weapon> {
        self.weapons.get(self.active_slot)
    }

    /// Switch to a loadout slot. Returns false if the slot is empty or already active.
    pub fn select_slot(&mut self, slot: usize) -> bool {
        if slot >= self.weapons.len() || slot == self.active_slot {
            return false;
        }
        debug!("Player {} switched to {}", self.id, self.weapons[slot].name());
        self.active_slot = slot;
        true
    }

    /// Take a weapon and make it active. Returns its slot.
    ///
    /// A weapon already carried under the same name is replaced, which
    /// refills it.
    pub fn pick_up(&mut self, config: WeaponConfig) -> usize {
        let slot = match self.weapons.iter().position(|w| w.name() == config.name) {
            Some(slot) => {
                self.weapons[slot] = Weapon::new(config);
                slot
            }
            None => {
                self.weapons.push(Weapon::new(config));
                self.weapons.len() - 1
            }
        };
        debug!("Player {} picked up {}", self.id, self.weapons[slot].name());
        self.active_slot = slot;
        slot
    }

    /// Apply fall damage for a landing. Returns the damage dealt.
    pub fn land(&mut self, landing_speed: f32, safe_speed: f32, damage_per_speed: f32) -> f32 {
        let damage = fall_damage(landing_speed, safe_speed, damage_per_speed, &self.modifier);
        if damage > 0.0 {
            self.take_damage(damage);
        }
        damage
    }

    /// Respawn the player at a new position with fresh weapons.
    pub fn respawn(&mut self, position: Vec3) {
        self.health.revive();
        self.controller.teleport(position);
        self.controller.recoil_mut().consume();
        for weapon in &mut self.weapons {
            *weapon = Weapon::new(weapon.config().clone());
        }
        self.pending_jump = false;
        self.command = MoveCommand::default();
    }
}

impl Damageable for Player {
    fn take_damage(&mut self, amount: f32) -> bool {
        let fatal = self.health.take_damage(amount);
        if fatal {
            self.deaths += 1;
            debug!("Player {} died", self.id);
        }
        fatal
    }

    fn is_alive(&self) -> bool {
        self.health.is_alive()
    }
}

impl PhysicsBody for Player {
    fn apply_impulse(&mut self, impulse: Vec3) {
        let delta = self.modifier.velocity_change(impulse);
        self.controller.apply_recoil(delta);
    }

    fn center(&self) -> Vec3 {
        self.position() + Vec3::Y * (self.controller.body().height * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(1, "Test".to_string(), Vec3::ZERO, &SimulationConfig::default())
    }

    #[test]
    fn test_player_creation() {
        let player = player();
        assert!(player.is_alive());
        assert_eq!(player.health.current(), 100.0);
        assert_eq!(player.active_weapon().map(Weapon::name), Some("Glock 18"));
    }

    #[test]
    fn test_death_and_respawn() {
        let mut player = player();

        assert!(player.take_damage(150.0));
        assert!(!player.is_alive());
        assert_eq!(player.deaths, 1);

        player.respawn(Vec3::new(10.0, 0.0, 10.0));
        assert!(player.is_alive());
        assert_eq!(player.health.current(), 100.0);
        assert_eq!(player.position(), Vec3::new(10.0, 0.0, 10.0));
    }

    #[test]
    fn test_slot_selection() {
        let mut player = player();
        assert!(player.select_slot(1));
        assert!(!player.select_slot(1));
        assert!(!player.select_slot(5));
        assert_eq!(player.active_weapon().map(Weapon::name), Some("Egg Launcher"));
    }

    #[test]
    fn test_pick_up_adds_or_refills() {
        let mut player = player();
        let magazine = WeaponConfig::egg_launcher().magazine;

        assert_eq!(player.pick_up(WeaponConfig::glock18()), 0);
        assert_eq!(player.weapons.len(), 2);

        let heavy = WeaponConfig {
            name: "Heavy Eggs".to_string(),
            ..WeaponConfig::egg_launcher()
        };
        assert_eq!(player.pick_up(heavy), 2);
        assert_eq!(player.active_weapon().map(Weapon::name), Some("Heavy Eggs"));

        assert_eq!(player.pick_up(WeaponConfig::egg_launcher()), 1);
        assert_eq!(player.active_slot, 1);
        assert_eq!(player.weapons.len(), 3);
        assert_eq!(player.weapons[1].state().ammo(), magazine);
    }

    #[test]
    fn test_impulse_scaled_by_mass() {
        let mut player = player();
        player.modifier.mass = 2.0;

        player.apply_impulse(Vec3::new(0.0, 60.0, 0.0));
        assert_eq!(player.controller.recoil_mut().pending(), Vec3::new(0.0, 30.0, 0.0));
    }

    #[test]
    fn test_fall_damage_on_landing() {
        let mut player = player();
        assert_eq!(player.land(10.0, 12.0, 5.0), 0.0);
        assert_eq!(player.land(16.0, 12.0, 5.0), 20.0);
        assert_eq!(player.health.current(), 80.0);
    }
}
