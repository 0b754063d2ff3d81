//! Per-weapon ammo, cooldown and reload state.

use serde::{Deserialize, Serialize};

use super::config::{Ammo, WeaponConfig};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReloadState {
    Idle,
    Reloading { remaining: f32 },
}

/// Coarse phase of a weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponPhase {
    Idle,
    Cooldown,
    Reloading,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponState {
    ammo: Ammo,
    magazine: Ammo,
    cooldown_remaining: f32,
    reload: ReloadState,
}

impl WeaponState {
    /// Full magazine, ready to fire.
    pub fn new(config: &WeaponConfig) -> Self {
        Self {
            ammo: config.magazine,
            magazine: config.magazine,
            cooldown_remaining: 0.0,
            reload: ReloadState::Idle,
        }
    }

    pub fn ammo(&self) -> Ammo {
        self.ammo
    }

    pub fn magazine(&self) -> Ammo {
        self.magazine
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    pub fn reload_state(&self) -> ReloadState {
        self.reload
    }

    pub fn phase(&self) -> WeaponPhase {
        if matches!(self.reload, ReloadState::Reloading { .. }) {
            WeaponPhase::Reloading
        } else if self.cooldown_remaining > 0.0 {
            WeaponPhase::Cooldown
        } else {
            WeaponPhase::Idle
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.phase() == WeaponPhase::Reloading
    }

    pub fn can_fire(&self) -> bool {
        self.phase() == WeaponPhase::Idle && !self.ammo.is_empty()
    }

    fn magazine_full(&self) -> bool {
        match (self.ammo, self.magazine) {
            (Ammo::Finite(ammo), Ammo::Finite(size)) => ammo >= size,
            _ => true,
        }
    }

    pub fn can_reload(&self) -> bool {
        !self.is_reloading() && !self.magazine_full()
    }

    /// Spend one round and start the cooldown. Caller checks [`can_fire`](Self::can_fire).
    pub(crate) fn consume_round(&mut self, cooldown: f32) {
        if let Ammo::Finite(count) = self.ammo {
            self.ammo = Ammo::Finite(count.saturating_sub(1));
        }
        self.cooldown_remaining = cooldown.max(0.0);
    }

    /// Start a reload. Returns false when there is nothing to do.
    pub fn begin_reload(&mut self, reload_time: f32) -> bool {
        if !self.can_reload() {
            return false;
        }
        self.reload = ReloadState::Reloading {
            remaining: reload_time.max(0.0),
        };
        true
    }

    /// Run timers down. Returns true when a reload finished this tick.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);

        let ReloadState::Reloading { remaining } = self.reload else {
            return false;
        };
        let remaining = remaining - dt;
        if remaining > 0.0 {
            self.reload = ReloadState::Reloading { remaining };
            return false;
        }
        self.ammo = self.magazine;
        self.reload = ReloadState::Idle;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases() {
        let config = WeaponConfig::egg_launcher();
        let mut state = WeaponState::new(&config);
        assert_eq!(state.phase(), WeaponPhase::Idle);

        state.consume_round(config.cooldown());
        assert_eq!(state.phase(), WeaponPhase::Cooldown);
        assert_eq!(state.ammo(), Ammo::Finite(23));

        state.tick(config.cooldown());
        assert_eq!(state.phase(), WeaponPhase::Idle);

        assert!(state.begin_reload(config.reload_time));
        assert_eq!(state.phase(), WeaponPhase::Reloading);
        assert!(!state.can_fire());
    }

    #[test]
    fn test_reload_refills_after_timer() {
        let config = WeaponConfig::egg_launcher();
        let mut state = WeaponState::new(&config);
        state.consume_round(0.0);
        state.begin_reload(3.0);

        assert!(!state.tick(1.0));
        assert!(!state.tick(1.0));
        assert!(state.tick(1.0));
        assert_eq!(state.ammo(), Ammo::Finite(24));
        assert_eq!(state.reload_state(), ReloadState::Idle);
    }

    #[test]
    fn test_no_reload_when_full_or_unbounded() {
        let mut eggs = WeaponState::new(&WeaponConfig::egg_launcher());
        assert!(!eggs.begin_reload(3.0));

        let mut glock = WeaponState::new(&WeaponConfig::glock18());
        glock.consume_round(0.0);
        assert!(!glock.begin_reload(0.0));
        assert_eq!(glock.ammo(), Ammo::Unbounded);
    }
}
