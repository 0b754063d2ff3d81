//! Fixed-tick motion integration.
//!
//! Each tick runs in a fixed order:
//!
//! 1. Ground check
//! 2. Horizontal velocity from the resolved state and target speed
//! 3. Pending recoil impulse
//! 4. Jump impulse
//! 5. Gravity, then collision-aware position integration

use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionQueries, QueryFilter, QueryHit};
use crate::recoil::RecoilAccumulator;

use super::config::{AirControl, GroundCheck, MovementConfig};
use super::jump::JumpState;
use super::locomotion::LocomotionOutput;
use super::slide_move::{slide_move, step_slide_move, TouchList};
use super::state::{MotionBody, MovementState};

/// Intent consumed by the solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolverInput {
    /// World-space wish direction, zero when there is no input.
    pub wish_direction: Vec3,
    /// Jump held this tick. Edges are detected internally.
    pub jump: bool,
}

/// What happened during one fixed tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub landed: bool,
    pub jumped: bool,
    pub left_ground: bool,
    /// Downward speed at the moment of landing.
    pub landing_speed: f32,
    /// Recoil impulse added this tick.
    pub recoil: Vec3,
    /// Colliders the body ran into while moving.
    pub touched: TouchList,
    /// The part of `touched` that wasn't touched on the previous tick.
    pub entered: TouchList,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhysicsMotionSolver {
    jump: JumpState,
    /// Downward speed before the last airborne move.
    fall_speed: f32,
}

impl PhysicsMotionSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jump_state(&self) -> &JumpState {
        &self.jump
    }

    /// Treat the jump button as released before the next step.
    pub fn release_jump(&mut self) {
        self.jump.release();
    }

    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        body: &mut MotionBody,
        input: &SolverInput,
        locomotion: &LocomotionOutput,
        recoil: &mut RecoilAccumulator,
        world: &dyn CollisionQueries,
        filter: &QueryFilter,
        config: &MovementConfig,
        dt: f32,
    ) -> StepReport {
        let mut report = StepReport::default();

        // 1. Ground
        let was_grounded = body.grounded;
        let ground = check_ground(body, world, filter, config);
        body.grounded = ground.is_some();
        body.ground_normal = ground.map(|hit| hit.normal);
        body.ground_surface = ground.map(|hit| hit.surface).unwrap_or_default();

        if body.grounded && !was_grounded {
            report.landed = true;
            report.landing_speed = self.fall_speed;
            debug!("Landed at {:.2} m/s", self.fall_speed);
        } else if !body.grounded && was_grounded {
            report.left_ground = true;
        }

        // 2. Horizontal velocity
        let horizontal = horizontal_velocity(body, input, locomotion, config, dt);
        body.velocity.x = horizontal.x;
        body.velocity.z = horizontal.z;

        // 3. Recoil
        report.recoil = recoil.consume();
        body.velocity += report.recoil;

        // 4. Jump
        let can_jump = body.grounded && locomotion.state.can_jump();
        if self.jump.update(input.jump, can_jump, config, dt) {
            body.velocity.y = body.velocity.y.max(0.0) + config.jump_impulse();
            body.grounded = false;
            report.jumped = true;
            debug!("Jump, vertical speed {:.2}", body.velocity.y);
        }

        // 5. Gravity and integration
        if body.grounded {
            body.velocity.y = body.velocity.y.max(0.0);
        } else {
            body.velocity.y -= config.gravity * dt;
            self.fall_speed = (-body.velocity.y).max(0.0);
        }

        let shape = body.shape();
        let mut position = body.position;
        let mut velocity = body.velocity;
        if body.grounded {
            step_slide_move(world, &mut position, &mut velocity, shape, filter, dt, config, &mut report.touched);
            if velocity.y <= 0.0 {
                snap_to_ground(world, &mut position, body, filter, config);
            }
        } else {
            slide_move(world, &mut position, &mut velocity, shape, filter, dt, config, &mut report.touched);
        }
        body.position = position;
        body.velocity = velocity;

        report
    }
}

/// Probe beneath the body for walkable ground.
///
/// Never reports ground while the body is rising faster than
/// `max_grounded_rise_speed`.
pub fn check_ground(
    body: &MotionBody,
    world: &dyn CollisionQueries,
    filter: &QueryFilter,
    config: &MovementConfig,
) -> Option<QueryHit> {
    if body.velocity.y > config.max_grounded_rise_speed {
        return None;
    }

    let radius = config.ground_check_radius;
    let hit = match config.ground_check {
        GroundCheck::Sphere => world.sphere_contact(body.position, radius, filter),
        GroundCheck::Ray => world.raycast(body.position + Vec3::Y * radius, Vec3::NEG_Y, radius * 2.0, filter),
    }?;

    (hit.normal.y >= config.min_ground_normal).then_some(hit)
}

fn horizontal_velocity(
    body: &MotionBody,
    input: &SolverInput,
    locomotion: &LocomotionOutput,
    config: &MovementConfig,
    dt: f32,
) -> Vec3 {
    let carried = body.horizontal_velocity();
    let wish = input.wish_direction.with_y(0.0).normalize_or_zero();
    let target = locomotion.target_speed;

    match locomotion.state {
        MovementState::Sliding if body.grounded => {
            let direction = if wish != Vec3::ZERO {
                wish
            } else if carried.length_squared() > 1e-6 {
                carried.normalize()
            } else {
                body.forward()
            };
            let blend = (config.slide_velocity_blend * dt).clamp(0.0, 1.0);
            carried.lerp(direction * target, blend)
        }
        // Airborne slides keep their momentum
        MovementState::Sliding => apply_drag(carried, config.air_drag, dt),
        _ if !body.grounded || locomotion.state == MovementState::Airborne => {
            air_velocity(carried, wish, target, config, dt)
        }
        _ => wish * target,
    }
}

fn air_velocity(carried: Vec3, wish: Vec3, target: f32, config: &MovementConfig, dt: f32) -> Vec3 {
    let damped = apply_drag(carried, config.air_drag, dt);
    let wish_speed = target * config.air_control_factor;

    match config.air_control {
        AirControl::Additive => accelerate(damped, wish, wish_speed, config.air_acceleration, dt),
        AirControl::Replace if wish != Vec3::ZERO => wish * wish_speed,
        AirControl::Replace => damped,
    }
}

/// Accelerate toward `wish_dir`, adding at most what is missing to reach
/// `wish_speed` along it.
pub fn accelerate(velocity: Vec3, wish_dir: Vec3, wish_speed: f32, accel: f32, dt: f32) -> Vec3 {
    let current_speed = velocity.dot(wish_dir);
    let add_speed = wish_speed - current_speed;
    if add_speed <= 0.0 {
        return velocity;
    }

    let accel_speed = (accel * wish_speed * dt).min(add_speed);
    velocity + wish_dir * accel_speed
}

fn apply_drag(velocity: Vec3, drag: f32, dt: f32) -> Vec3 {
    velocity * (1.0 - drag * dt).clamp(0.0, 1.0)
}

fn snap_to_ground(
    world: &dyn CollisionQueries,
    position: &mut Vec3,
    body: &MotionBody,
    filter: &QueryFilter,
    config: &MovementConfig,
) {
    let reach = config.step_height.max(config.ground_check_radius);
    let trace = world.trace(*position, *position - Vec3::Y * reach, body.shape(), filter);
    if trace.hit_something() && !trace.all_solid {
        *position = trace.end_position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionWorld, ContentFlags};

    const DT: f32 = 1.0 / 60.0;

    fn filter() -> QueryFilter {
        QueryFilter::new(ContentFlags::MASK_PLAYER_SOLID)
    }

    fn flat_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(100.0, 0.5, 100.0), ContentFlags::SOLID);
        world
    }

    fn output(state: MovementState, target_speed: f32) -> LocomotionOutput {
        LocomotionOutput {
            state,
            previous: state,
            target_speed,
            height: 1.8,
            goal_fov: 75.0,
            blend: 0.1,
        }
    }

    #[test]
    fn test_ground_check_policies() {
        let world = flat_world();
        let body = MotionBody::new(Vec3::new(0.0, 0.05, 0.0), 0.4, 1.8);

        let sphere = MovementConfig::default();
        assert!(check_ground(&body, &world, &filter(), &sphere).is_some());

        let ray = MovementConfig {
            ground_check: GroundCheck::Ray,
            ..Default::default()
        };
        assert!(check_ground(&body, &world, &filter(), &ray).is_some());

        let high = MotionBody::new(Vec3::new(0.0, 2.0, 0.0), 0.4, 1.8);
        assert!(check_ground(&high, &world, &filter(), &sphere).is_none());
        assert!(check_ground(&high, &world, &filter(), &ray).is_none());
    }

    #[test]
    fn test_ground_check_ignores_triggers() {
        let mut world = CollisionWorld::new();
        world.add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(10.0, 0.5, 10.0), ContentFlags::TRIGGER);
        let body = MotionBody::new(Vec3::new(0.0, 0.05, 0.0), 0.4, 1.8);
        assert!(check_ground(&body, &world, &filter(), &MovementConfig::default()).is_none());
    }

    #[test]
    fn test_walk_overwrites_horizontal_velocity() {
        let world = flat_world();
        let config = MovementConfig::default();
        let mut body = MotionBody::new(Vec3::new(0.0, 0.05, 0.0), 0.4, 1.8);
        body.velocity = Vec3::new(0.0, 0.0, 20.0);
        let mut solver = PhysicsMotionSolver::new();
        let mut recoil = RecoilAccumulator::new();
        let input = SolverInput {
            wish_direction: Vec3::X,
            jump: false,
        };

        solver.step(&mut body, &input, &output(MovementState::Walking, 4.0), &mut recoil, &world, &filter(), &config, DT);

        assert!(body.grounded);
        assert!((body.velocity.x - 4.0).abs() < 1e-3);
        assert!(body.velocity.z.abs() < 1e-3);
    }

    #[test]
    fn test_jump_impulse() {
        let world = flat_world();
        let config = MovementConfig::default();
        let mut body = MotionBody::new(Vec3::new(0.0, 0.05, 0.0), 0.4, 1.8);
        let mut solver = PhysicsMotionSolver::new();
        let mut recoil = RecoilAccumulator::new();
        let input = SolverInput {
            wish_direction: Vec3::ZERO,
            jump: true,
        };

        let report = solver.step(&mut body, &input, &output(MovementState::Idle, 0.0), &mut recoil, &world, &filter(), &config, DT);

        assert!(report.jumped);
        assert!(!body.grounded);
        let expected = config.jump_impulse() - config.gravity * DT;
        assert!((body.velocity.y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_no_jump_while_crouching_or_airborne() {
        let world = flat_world();
        let config = MovementConfig::default();
        let mut solver = PhysicsMotionSolver::new();
        let mut recoil = RecoilAccumulator::new();
        let input = SolverInput {
            wish_direction: Vec3::ZERO,
            jump: true,
        };

        let mut crouched = MotionBody::new(Vec3::new(0.0, 0.05, 0.0), 0.4, 1.0);
        let report = solver.step(&mut crouched, &input, &output(MovementState::Crouching, 0.0), &mut recoil, &world, &filter(), &config, DT);
        assert!(!report.jumped);

        let mut solver = PhysicsMotionSolver::new();
        let mut falling = MotionBody::new(Vec3::new(0.0, 5.0, 0.0), 0.4, 1.8);
        let report = solver.step(&mut falling, &input, &output(MovementState::Airborne, 0.0), &mut recoil, &world, &filter(), &config, DT);
        assert!(!report.jumped);
        assert!(falling.velocity.y < 0.0);
    }

    #[test]
    fn test_recoil_consumed_in_same_tick() {
        let world = CollisionWorld::new();
        let config = MovementConfig::default();
        let mut body = MotionBody::new(Vec3::new(0.0, 10.0, 0.0), 0.4, 1.8);
        let mut solver = PhysicsMotionSolver::new();
        let mut recoil = RecoilAccumulator::new();
        recoil.queue(Vec3::NEG_X, 6.0, 0.5);

        let report = solver.step(&mut body, &SolverInput::default(), &output(MovementState::Airborne, 0.0), &mut recoil, &world, &filter(), &config, DT);

        assert!((report.recoil - Vec3::new(-3.0, 0.0, 0.0)).length() < 1e-5);
        assert!(body.velocity.x < -2.9);
        assert!(recoil.is_empty());
    }

    #[test]
    fn test_fall_and_land() {
        let world = flat_world();
        let config = MovementConfig::default();
        let mut body = MotionBody::new(Vec3::new(0.0, 2.0, 0.0), 0.4, 1.8);
        let mut solver = PhysicsMotionSolver::new();
        let mut recoil = RecoilAccumulator::new();

        let mut landed = None;
        for tick in 0..120 {
            let report = solver.step(&mut body, &SolverInput::default(), &output(MovementState::Airborne, 0.0), &mut recoil, &world, &filter(), &config, DT);
            if report.landed {
                landed = Some((tick, report.landing_speed));
                break;
            }
        }

        let (_, speed) = landed.expect("body should land");
        assert!(speed > 3.0);
        assert!(body.position.y >= -0.01 && body.position.y < 0.25);
    }

    #[test]
    fn test_air_control_policies() {
        let config = MovementConfig::default();
        let carried = Vec3::new(5.0, 0.0, 0.0);

        let additive = air_velocity(carried, Vec3::Z, 6.0, &config, DT);
        assert!(additive.x > 4.9);
        assert!(additive.z > 0.0);

        let replace = MovementConfig {
            air_control: AirControl::Replace,
            ..Default::default()
        };
        let replaced = air_velocity(carried, Vec3::Z, 6.0, &replace, DT);
        assert!(replaced.x.abs() < 1e-5);
        assert!((replaced.z - 6.0 * replace.air_control_factor).abs() < 1e-5);
    }

    #[test]
    fn test_grounded_slide_blends_velocity() {
        let world = flat_world();
        let config = MovementConfig::default();
        let mut body = MotionBody::new(Vec3::new(0.0, 0.05, 0.0), 0.4, 1.0);
        body.velocity = Vec3::new(7.0, 0.0, 0.0);
        let mut solver = PhysicsMotionSolver::new();
        let mut recoil = RecoilAccumulator::new();

        solver.step(&mut body, &SolverInput::default(), &output(MovementState::Sliding, 9.0), &mut recoil, &world, &filter(), &config, DT);

        assert!(body.velocity.x > 7.0 && body.velocity.x < 9.0);
    }
}
