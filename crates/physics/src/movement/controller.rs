//! Player controller.
//!
//! Owns one character's body, locomotion state, solver, recoil and camera.
//! The simulation drives it with [`PlayerController::tick_variable`] once
//! per frame and [`PlayerController::tick_fixed`] once per fixed step.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{ColliderId, CollisionQueries, ContentFlags, QueryFilter};
use crate::recoil::RecoilAccumulator;

use super::camera::CameraState;
use super::config::MovementConfig;
use super::jump::JumpState;
use super::locomotion::{LocomotionInput, LocomotionOutput, LocomotionStateMachine};
use super::slide_move::TouchList;
use super::solver::{PhysicsMotionSolver, SolverInput, StepReport};
use super::state::{MotionBody, MoveCommand, MovementState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerController {
    config: MovementConfig,
    body: MotionBody,
    locomotion: LocomotionStateMachine,
    solver: PhysicsMotionSolver,
    recoil: RecoilAccumulator,
    camera: CameraState,
    /// The body's own collider, skipped by every movement query.
    collider: Option<ColliderId>,
    last_output: LocomotionOutput,
    /// Colliders run into on the last fixed tick.
    touched: TouchList,
}

impl PlayerController {
    pub fn new(config: MovementConfig, spawn: Vec3) -> Self {
        let body = MotionBody::new(spawn, config.player_radius, config.standing_height);
        let locomotion = LocomotionStateMachine::new(&config);
        let camera = CameraState::new(&config);
        let last_output = LocomotionOutput {
            state: MovementState::Idle,
            previous: MovementState::Idle,
            target_speed: 0.0,
            height: config.standing_height,
            goal_fov: config.fov_default,
            blend: 0.0,
        };

        Self {
            config,
            body,
            locomotion,
            solver: PhysicsMotionSolver::new(),
            recoil: RecoilAccumulator::new(),
            camera,
            collider: None,
            last_output,
            touched: TouchList::default(),
        }
    }

    pub fn set_collider(&mut self, collider: ColliderId) {
        self.collider = Some(collider);
    }

    pub fn collider(&self) -> Option<ColliderId> {
        self.collider
    }

    /// Movement query filter, excluding this body's own collider.
    pub fn filter(&self) -> QueryFilter {
        QueryFilter::new(ContentFlags::MASK_PLAYER_SOLID).excluding_opt(self.collider)
    }

    /// Frame tick: look, state transitions and blending.
    pub fn tick_variable(&mut self, cmd: &MoveCommand, world: &dyn CollisionQueries, dt: f32) -> LocomotionOutput {
        let look = cmd.look_delta + self.recoil.consume_camera_kick();
        self.camera.apply_look(&mut self.body, look, &self.config);

        let input = self.locomotion_input(cmd);
        let filter = self.filter();
        let output = self
            .locomotion
            .update(&self.body, &input, world, &filter, &self.config, dt);

        self.body.height = output.height;
        self.camera.blend_fov(output.goal_fov, output.blend);
        let bobbing = input.has_move_input && self.body.grounded && output.state != MovementState::Sliding;
        self.camera.update_head_bob(bobbing, &self.config, dt);
        self.last_output = output;
        output
    }

    /// Fixed tick: physics integration using the last resolved state.
    pub fn tick_fixed(&mut self, cmd: &MoveCommand, world: &dyn CollisionQueries, dt: f32) -> StepReport {
        let input = SolverInput {
            wish_direction: self.body.wish_direction(cmd.clamped_move()),
            jump: cmd.buttons.jump(),
        };
        let filter = self.filter();
        let mut report = self.solver.step(
            &mut self.body,
            &input,
            &self.last_output,
            &mut self.recoil,
            world,
            &filter,
            &self.config,
            dt,
        );
        report.entered = report.touched.without(&self.touched);
        self.touched = report.touched;
        report
    }

    /// Treat the jump button as released, so the next held tick is a new press.
    pub fn release_jump(&mut self) {
        self.solver.release_jump();
    }

    pub fn jump_state(&self) -> &JumpState {
        self.solver.jump_state()
    }

    /// Colliders run into on the last fixed tick.
    pub fn touched(&self) -> &TouchList {
        &self.touched
    }

    fn locomotion_input(&self, cmd: &MoveCommand) -> LocomotionInput {
        LocomotionInput {
            has_move_input: cmd.has_move_input(),
            wish_direction: self.body.wish_direction(cmd.clamped_move()),
            sprint: cmd.buttons.sprint(),
            crouch: cmd.buttons.crouch(),
            zoom: cmd.buttons.zoom(),
        }
    }

    /// Inject an impulse, applied on the next fixed tick.
    pub fn apply_recoil(&mut self, impulse: Vec3) {
        self.recoil.apply(impulse);
    }

    pub fn recoil_mut(&mut self) -> &mut RecoilAccumulator {
        &mut self.recoil
    }

    pub fn velocity(&self) -> Vec3 {
        self.body.velocity
    }

    pub fn is_grounded(&self) -> bool {
        self.body.grounded
    }

    pub fn current_movement_state(&self) -> MovementState {
        self.locomotion.state()
    }

    pub fn target_speed(&self) -> f32 {
        self.locomotion.target_speed()
    }

    pub fn stamina_fraction(&self) -> f32 {
        self.locomotion.stamina_fraction()
    }

    pub fn body(&self) -> &MotionBody {
        &self.body
    }

    pub fn locomotion(&self) -> &LocomotionStateMachine {
        &self.locomotion
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn eye_position(&self) -> Vec3 {
        self.camera.eye_position(&self.body, &self.config)
    }

    pub fn aim_direction(&self) -> Vec3 {
        self.camera.view_direction(&self.body)
    }

    /// Move the body without integrating, clearing its velocity and contacts.
    pub fn teleport(&mut self, position: Vec3) {
        self.body.position = position;
        self.body.velocity = Vec3::ZERO;
        self.body.grounded = false;
        self.touched = TouchList::default();
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.body.yaw = yaw;
    }
}
