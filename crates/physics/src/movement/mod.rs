//! Character locomotion.
//!
//! Movement is split across two rates:
//!
//! - The variable (frame) tick runs the [`LocomotionStateMachine`]: state
//!   transitions, target speed, crouch height and FOV blending
//! - The fixed tick runs the [`PhysicsMotionSolver`]: ground check,
//!   horizontal velocity, recoil, jump, gravity and collision sliding
//!
//! # Design
//!
//! [`PlayerController`] owns one character's state and wires the two halves
//! together. Everything talks to the world through
//! [`CollisionQueries`](crate::collision::CollisionQueries), so the same
//! inputs always produce the same outputs against the same geometry.

mod camera;
mod config;
mod controller;
mod jump;
mod locomotion;
mod slide_move;
mod solver;
mod stamina;
mod state;

pub use camera::CameraState;
pub use config::{AirControl, GroundCheck, MovementConfig};
pub use controller::PlayerController;
pub use jump::JumpState;
pub use locomotion::{on_downhill_slope, LocomotionInput, LocomotionOutput, LocomotionStateMachine};
pub use slide_move::{clip_velocity, slide_move, step_slide_move, Touch, TouchList, MAX_TOUCH};
pub use solver::{accelerate, check_ground, PhysicsMotionSolver, SolverInput, StepReport};
pub use stamina::Stamina;
pub use state::{CommandButtons, MotionBody, MoveCommand, MovementState};
