//! Sprint stamina budget.

use serde::{Deserialize, Serialize};

/// Seconds of sprint left, drained while sprinting and refilled otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stamina {
    remaining: f32,
    capacity: f32,
}

impl Stamina {
    pub fn new(capacity: f32) -> Self {
        let capacity = capacity.max(0.0);
        Self {
            remaining: capacity,
            capacity,
        }
    }

    /// Drain by `dt`. Returns true when the budget just ran out.
    pub fn drain(&mut self, dt: f32) -> bool {
        let was_available = self.remaining > 0.0;
        self.remaining = (self.remaining - dt).max(0.0);
        was_available && self.remaining <= 0.0
    }

    pub fn regenerate(&mut self, dt: f32, rate: f32) {
        self.remaining = (self.remaining + dt * rate).min(self.capacity);
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Remaining stamina in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.capacity > 0.0 {
            self.remaining / self.capacity
        } else {
            0.0
        }
    }
}
