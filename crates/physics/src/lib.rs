//! Cluckstorm Physics
//!
//! Deterministic first-person locomotion for the Cluckstorm simulation.
//!
//! # Architecture
//!
//! - **Collision**: the [`CollisionQueries`] contract plus a parry3d-backed
//!   [`CollisionWorld`] implementing it
//! - **Movement**: locomotion state machine and fixed-step motion solver
//! - **Recoil**: per-tick accumulation of weapon impulses and camera kick
//!
//! Nothing here allocates per tick or blocks. Triggers never take part in
//! contacts, sweeps or overlaps.

pub mod collision;
pub mod movement;
pub mod recoil;

// Re-export commonly used types
pub use collision::{
    ColliderId, CollisionQueries, CollisionWorld, ContentFlags, QueryFilter, QueryHit, Surface, SurfaceFlags,
    TraceResult, TraceShape,
};
pub use movement::{
    CommandButtons, LocomotionOutput, MotionBody, MoveCommand, MovementConfig, MovementState, PlayerController,
    StepReport, Touch, TouchList,
};
pub use recoil::{RecoilAccumulator, RecoilImpulse};
