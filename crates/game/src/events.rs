//! Events recorded by the simulation for audio, UI and network collaborators.

use cluckstorm_physics::{ColliderId, MovementState, Surface};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::player::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Landed {
        player: EntityId,
        speed: f32,
    },
    Jumped {
        player: EntityId,
    },
    Footstep {
        player: EntityId,
        surface: Surface,
        position: Vec3,
    },
    StateChanged {
        player: EntityId,
        from: MovementState,
        to: MovementState,
    },
    SlideStarted {
        player: EntityId,
    },
    SlideEnded {
        player: EntityId,
    },
    ShotFired {
        player: EntityId,
        weapon: String,
        hit: Option<ColliderId>,
    },
    /// A projectile shot found its pool empty.
    ShotSkipped {
        player: EntityId,
        weapon: String,
    },
    ReloadStarted {
        player: EntityId,
        weapon: String,
    },
    ReloadFinished {
        player: EntityId,
        weapon: String,
    },
    WeaponSwitched {
        player: EntityId,
        slot: usize,
    },
    /// A weapon was collected from the level and made active.
    WeaponPickedUp {
        player: EntityId,
        weapon: String,
        slot: usize,
    },
    ProjectileExploded {
        position: Vec3,
        affected: u32,
    },
    TargetKilled {
        collider: ColliderId,
    },
    PlayerDamaged {
        player: EntityId,
        amount: f32,
    },
    PlayerKilled {
        player: EntityId,
    },
}
