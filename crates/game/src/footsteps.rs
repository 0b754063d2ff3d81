//! Footstep scheduling.
//!
//! Ticked from the fixed step. Tracks the next time a step may sound and
//! emits [`Footstep`]s; playing them is up to the audio collaborator.

use cluckstorm_physics::{MotionBody, MovementState, Surface, SurfaceFlags};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Seconds between steps per movement state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootstepConfig {
    pub walk_interval: f32,
    pub sprint_interval: f32,
    pub crouch_interval: f32,
    /// Horizontal speed below which the body counts as standing still.
    pub moving_threshold: f32,
}

impl Default for FootstepConfig {
    fn default() -> Self {
        Self {
            walk_interval: 0.5,
            sprint_interval: 0.3,
            crouch_interval: 0.7,
            moving_threshold: 0.1,
        }
    }
}

impl FootstepConfig {
    fn interval(&self, state: MovementState) -> f32 {
        match state {
            MovementState::Sprinting => self.sprint_interval,
            MovementState::Crouching => self.crouch_interval,
            _ => self.walk_interval,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footstep {
    pub surface: Surface,
    pub position: Vec3,
}

#[derive(Debug, Clone, Default)]
pub struct FootstepScheduler {
    config: FootstepConfig,
    next_step_at: f64,
}

impl FootstepScheduler {
    pub fn new(config: FootstepConfig) -> Self {
        Self {
            config,
            next_step_at: 0.0,
        }
    }

    pub fn next_step_at(&self) -> f64 {
        self.next_step_at
    }

    /// Emit a step if one is due at `now`.
    pub fn tick(&mut self, now: f64, body: &MotionBody, state: MovementState) -> Option<Footstep> {
        if !body.grounded
            || state == MovementState::Sliding
            || body.horizontal_speed() <= self.config.moving_threshold
            || body.ground_surface.contains(SurfaceFlags::NO_STEPS)
        {
            return None;
        }
        let surface = body.ground_surface.material();
        if surface == Surface::Unknown || now < self.next_step_at {
            return None;
        }

        self.next_step_at = now + f64::from(self.config.interval(state));
        Some(Footstep {
            surface,
            position: body.position,
        })
    }
}
