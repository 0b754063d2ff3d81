//! Recoil accumulation.
//!
//! Weapons queue recoil events whenever they fire. The motion solver drains
//! the summed impulse once per fixed tick and adds it to the body velocity;
//! the camera drains the accumulated kick once per frame.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// One recoil event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoilImpulse {
    pub direction: Vec3,
    pub magnitude: f32,
    /// Per-character scale from the physics modifier.
    pub multiplier: f32,
}

impl RecoilImpulse {
    pub fn vector(&self) -> Vec3 {
        self.direction * self.magnitude * self.multiplier
    }
}

/// Sums recoil events between consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecoilAccumulator {
    pending: Vec3,
    events: u32,
    camera_kick: Vec2,
}

impl RecoilAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a recoil event of `direction * magnitude * multiplier`.
    pub fn queue(&mut self, direction: Vec3, magnitude: f32, multiplier: f32) {
        let impulse = RecoilImpulse {
            direction,
            magnitude,
            multiplier,
        };
        self.pending += impulse.vector();
        self.events += 1;
    }

    /// Inject a raw velocity impulse from outside weapon fire.
    pub fn apply(&mut self, impulse: Vec3) {
        self.pending += impulse;
        self.events += 1;
    }

    /// Add a camera kick (radians, x = yaw, y = pitch).
    pub fn kick_camera(&mut self, kick: Vec2) {
        self.camera_kick += kick;
    }

    /// Take the summed impulse and reset.
    pub fn consume(&mut self) -> Vec3 {
        self.events = 0;
        std::mem::take(&mut self.pending)
    }

    /// Take the accumulated camera kick and reset.
    pub fn consume_camera_kick(&mut self) -> Vec2 {
        std::mem::take(&mut self.camera_kick)
    }

    /// Impulse waiting for the next consume.
    pub fn pending(&self) -> Vec3 {
        self.pending
    }

    /// Number of events queued since the last consume.
    pub fn pending_events(&self) -> u32 {
        self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events == 0
    }
}
