//! Jump gating.
//!
//! A jump fires on the press edge when the body may jump and the cooldown
//! has run out. With `jump_buffer_ms` set, a press that arrives too early is
//! held for that long and fires on the first tick jumping becomes possible.

use serde::{Deserialize, Serialize};

use super::config::MovementConfig;

fn seconds(ms: u32) -> f32 {
    ms as f32 / 1000.0
}

/// Driven once per fixed tick by the motion solver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JumpState {
    /// Seconds until another jump is allowed.
    cooldown: f32,
    /// Seconds a buffered press has left, if one is waiting.
    buffered: Option<f32>,
    was_held: bool,
}

impl JumpState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the body should jump this tick.
    ///
    /// `can_jump` is the caller's precondition (grounded, state allows it).
    pub fn update(&mut self, held: bool, can_jump: bool, config: &MovementConfig, dt: f32) -> bool {
        let pressed = held && !self.was_held;
        self.was_held = held;

        self.cooldown = (self.cooldown - dt).max(0.0);
        self.buffered = self.buffered.map(|left| left - dt).filter(|&left| left > 0.0);

        let ready = can_jump && self.cooldown <= 0.0;
        if pressed && !ready && config.jump_buffer_ms > 0 {
            self.buffered = Some(seconds(config.jump_buffer_ms));
        }

        if !ready || !(pressed || self.buffered.is_some()) {
            return false;
        }
        self.cooldown = seconds(config.jump_cooldown_ms);
        self.buffered = None;
        true
    }

    pub fn is_buffered(&self) -> bool {
        self.buffered.is_some()
    }

    pub fn on_cooldown(&self) -> bool {
        self.cooldown > 0.0
    }

    /// Seconds left on the cooldown.
    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown
    }

    /// Forget the held button, so the next held tick counts as a new press.
    pub fn release(&mut self) {
        self.was_held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.016;

    fn config(buffer_ms: u32) -> MovementConfig {
        MovementConfig {
            jump_cooldown_ms: 100,
            jump_buffer_ms: buffer_ms,
            ..Default::default()
        }
    }

    #[test]
    fn test_press_jumps_once() {
        let config = config(0);
        let mut jump = JumpState::new();

        assert!(jump.update(true, true, &config, DT));
        assert!(jump.on_cooldown());
        // Holding the button never repeats
        for _ in 0..20 {
            assert!(!jump.update(true, true, &config, DT));
        }
    }

    #[test]
    fn test_unbuffered_airborne_press_is_lost() {
        let config = config(0);
        let mut jump = JumpState::new();

        assert!(!jump.update(true, false, &config, DT));
        assert!(!jump.is_buffered());
        assert!(!jump.update(false, true, &config, DT));
    }

    #[test]
    fn test_cooldown() {
        let config = config(0);
        let mut jump = JumpState::new();
        assert!(jump.update(true, true, &config, DT));
        jump.update(false, true, &config, DT);
        assert!(!jump.update(true, true, &config, DT));

        for _ in 0..7 {
            jump.update(false, true, &config, DT);
        }
        assert!(!jump.on_cooldown());
        assert!(jump.update(true, true, &config, DT));
    }

    #[test]
    fn test_buffer_fires_on_landing() {
        let config = config(200);
        let mut jump = JumpState::new();

        assert!(!jump.update(true, false, &config, DT));
        assert!(jump.is_buffered());
        assert!(!jump.update(true, false, &config, DT));
        assert!(jump.update(true, true, &config, DT));
        assert!(!jump.is_buffered());
    }

    #[test]
    fn test_release_turns_next_hold_into_a_press() {
        let config = config(500);

        let mut held = JumpState::new();
        assert!(held.update(true, true, &config, DT));
        assert!(!held.update(true, true, &config, DT));
        assert!(!held.is_buffered());

        // Same inputs, but the button was let go in between
        let mut released = JumpState::new();
        assert!(released.update(true, true, &config, DT));
        released.release();
        assert!(!released.update(true, true, &config, DT));
        assert!(released.is_buffered());
    }

    #[test]
    fn test_buffer_expires() {
        let config = config(50);
        let mut jump = JumpState::new();

        jump.update(true, false, &config, DT);
        for _ in 0..4 {
            jump.update(false, false, &config, DT);
        }
        assert!(!jump.is_buffered());
        assert!(!jump.update(false, true, &config, DT));
    }
}
