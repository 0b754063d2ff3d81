//! Locomotion state machine.
//!
//! Runs on the variable tick. Picks the movement state, blends the target
//! speed and collider height toward the state's goals, counts down slides
//! and reports the goal field of view. The physics solver consumes the
//! resulting [`LocomotionOutput`] on the fixed tick.

use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionQueries, QueryFilter};

use super::config::MovementConfig;
use super::stamina::Stamina;
use super::state::{MotionBody, MovementState};

/// Intent flags read by the state machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocomotionInput {
    pub has_move_input: bool,
    /// World-space wish direction, zero when there is no input.
    pub wish_direction: Vec3,
    pub sprint: bool,
    pub crouch: bool,
    pub zoom: bool,
}

/// What the state machine resolved this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocomotionOutput {
    pub state: MovementState,
    pub previous: MovementState,
    pub target_speed: f32,
    pub height: f32,
    pub goal_fov: f32,
    /// Blend factor used this tick, shared with camera blending.
    pub blend: f32,
}

impl LocomotionOutput {
    pub fn changed(&self) -> bool {
        self.state != self.previous
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocomotionStateMachine {
    state: MovementState,
    target_speed: f32,
    height: f32,

    /// Seconds of slide left.
    slide_remaining: f32,
    /// Seconds until the next slope check.
    slope_check_in: f32,
    on_slope: bool,

    /// Sprint intent ignored until the sprint input is released.
    sprint_suppressed: bool,
    stamina: Stamina,
}

impl LocomotionStateMachine {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            state: MovementState::Idle,
            target_speed: 0.0,
            height: config.standing_height,
            slide_remaining: 0.0,
            slope_check_in: 0.0,
            on_slope: false,
            sprint_suppressed: false,
            stamina: Stamina::new(config.sprint_duration),
        }
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn slide_remaining(&self) -> f32 {
        self.slide_remaining
    }

    pub fn on_slope(&self) -> bool {
        self.on_slope
    }

    pub fn stamina_fraction(&self) -> f32 {
        self.stamina.fraction()
    }

    /// Force the target speed, e.g. when spawning with momentum.
    pub fn set_target_speed(&mut self, speed: f32) {
        self.target_speed = speed.max(0.0);
    }

    pub fn update(
        &mut self,
        body: &MotionBody,
        input: &LocomotionInput,
        world: &dyn CollisionQueries,
        filter: &QueryFilter,
        config: &MovementConfig,
        dt: f32,
    ) -> LocomotionOutput {
        let previous = self.state;
        let blend = (dt * config.transition_speed).clamp(0.0, 1.0);

        if !input.sprint {
            self.sprint_suppressed = false;
        }
        let sprint = input.sprint && !self.sprint_suppressed;
        let crouch = input.crouch;

        self.state = self.next_state(body.grounded, input.has_move_input, sprint, crouch, config);

        if self.state == MovementState::Sliding {
            self.update_slide(previous, body, input, world, filter, config, dt);
        }

        self.update_stamina(body, config, dt);

        let goal = config.goal_speed(self.state, self.target_speed);
        self.target_speed += (goal - self.target_speed) * blend;

        self.update_height(body, crouch, world, filter, config, blend);

        if self.state != previous {
            debug!(
                "Movement state {} -> {} (target speed {:.2})",
                previous, self.state, self.target_speed
            );
        }

        LocomotionOutput {
            state: self.state,
            previous,
            target_speed: self.target_speed,
            height: self.height,
            goal_fov: self.goal_fov(body, input, config),
            blend,
        }
    }

    fn next_state(
        &mut self,
        grounded: bool,
        moving: bool,
        sprint: bool,
        crouch: bool,
        config: &MovementConfig,
    ) -> MovementState {
        use MovementState::*;

        let slide_ready = sprint && crouch && self.state != Sliding && self.target_speed > config.slide_entry_speed();
        if slide_ready {
            self.slide_remaining = config.slide_duration;
            self.slope_check_in = 0.0;
            self.on_slope = false;
            return Sliding;
        }

        // A slide only ends through its own countdown
        if self.state == Sliding {
            return Sliding;
        }

        if !grounded {
            return Airborne;
        }

        match (sprint, crouch) {
            (true, false) => Sprinting,
            (false, true) => Crouching,
            (false, false) if moving => Walking,
            (false, false) => Idle,
            // Both held but too slow to slide: keep the current ground state
            (true, true) => match self.state {
                Walking | Sprinting | Crouching | Idle => self.state,
                Sliding | Airborne => Crouching,
            },
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn update_slide(
        &mut self,
        previous: MovementState,
        body: &MotionBody,
        input: &LocomotionInput,
        world: &dyn CollisionQueries,
        filter: &QueryFilter,
        config: &MovementConfig,
        dt: f32,
    ) {
        self.slope_check_in -= dt;
        if self.slope_check_in <= 0.0 {
            self.slope_check_in = config.slope_check_interval;
            let move_direction = if input.has_move_input {
                input.wish_direction
            } else {
                body.horizontal_velocity().normalize_or_zero()
            };
            self.on_slope = on_downhill_slope(body, move_direction, world, filter, config);
        }

        // The countdown starts on the tick after entry
        if previous != MovementState::Sliding {
            return;
        }

        if !self.on_slope && body.grounded {
            self.slide_remaining = (self.slide_remaining - dt).max(0.0);
        }

        if self.slide_remaining <= 0.0 {
            self.state = MovementState::Crouching;
            self.sprint_suppressed = true;
            self.on_slope = false;
        }
    }

    fn update_stamina(&mut self, body: &MotionBody, config: &MovementConfig, dt: f32) {
        if config.unlimited_sprint {
            return;
        }
        let sprinting = self.state == MovementState::Sprinting && body.horizontal_speed() > config.moving_threshold;
        if sprinting {
            if self.stamina.drain(dt) {
                debug!("Out of stamina");
                self.sprint_suppressed = true;
            }
        } else {
            self.stamina.regenerate(dt, config.stamina_regen_rate);
        }
    }

    fn update_height(
        &mut self,
        body: &MotionBody,
        crouch: bool,
        world: &dyn CollisionQueries,
        filter: &QueryFilter,
        config: &MovementConfig,
        blend: f32,
    ) {
        let low = self.state.is_low() || (self.state == MovementState::Airborne && crouch);
        let mut target = if low {
            config.crouched_height
        } else {
            config.standing_height
        };

        if target > self.height {
            // Probe the full remaining rise
            let head = body.position + Vec3::Y * self.height;
            let reach = target - self.height + config.ceiling_check_distance;
            if let Some(hit) = world.raycast(head, Vec3::Y, reach, filter) {
                let clearance = self.height + hit.distance - config.ceiling_clearance;
                target = clearance.max(config.crouched_height).min(target);
            }
        }

        self.height += (target - self.height) * blend;
    }

    fn goal_fov(&self, body: &MotionBody, input: &LocomotionInput, config: &MovementConfig) -> f32 {
        if input.zoom {
            config.fov_zoom
        } else if self.state == MovementState::Sprinting && body.horizontal_speed() > config.moving_threshold {
            config.fov_sprint
        } else {
            config.fov_default
        }
    }
}

/// Height above the feet the slope ray starts from.
const SLOPE_RAY_LIFT: f32 = 0.05;

/// Check whether the body stands on a slope that sustains a slide.
///
/// The ray starts just above the feet and reaches `slope_check_margin`
/// below them. The surface must be tilted, no steeper than the friction
/// limit, and `move_direction` must point downhill.
pub fn on_downhill_slope(
    body: &MotionBody,
    move_direction: Vec3,
    world: &dyn CollisionQueries,
    filter: &QueryFilter,
    config: &MovementConfig,
) -> bool {
    let origin = body.position + Vec3::Y * SLOPE_RAY_LIFT;
    let reach = SLOPE_RAY_LIFT + config.slope_check_margin;
    let Some(hit) = world.raycast(origin, Vec3::NEG_Y, reach, filter) else {
        return false;
    };

    let angle = hit.normal.dot(Vec3::Y).clamp(-1.0, 1.0).acos().to_degrees();
    if angle <= 0.01 || angle > config.max_slide_slope_deg() {
        return false;
    }

    let downhill = (Vec3::NEG_Y - hit.normal * Vec3::NEG_Y.dot(hit.normal)).normalize_or_zero();
    move_direction.dot(downhill) > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionWorld, ContentFlags};
    use glam::Quat;

    fn filter() -> QueryFilter {
        QueryFilter::new(ContentFlags::MASK_PLAYER_SOLID)
    }

    fn flat_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0), ContentFlags::SOLID);
        world
    }

    fn grounded_body() -> MotionBody {
        let mut body = MotionBody::new(Vec3::new(0.0, 0.0, 0.0), 0.4, 1.8);
        body.grounded = true;
        body
    }

    fn input(sprint: bool, crouch: bool) -> LocomotionInput {
        LocomotionInput {
            has_move_input: true,
            wish_direction: Vec3::X,
            sprint,
            crouch,
            zoom: false,
        }
    }

    #[test]
    fn test_priority_without_slide() {
        let config = MovementConfig::default();
        let world = flat_world();
        let body = grounded_body();
        let mut machine = LocomotionStateMachine::new(&config);

        let out = machine.update(&body, &input(true, false), &world, &filter(), &config, 0.016);
        assert_eq!(out.state, MovementState::Sprinting);

        let out = machine.update(&body, &input(false, true), &world, &filter(), &config, 0.016);
        assert_eq!(out.state, MovementState::Crouching);

        let out = machine.update(&body, &input(false, false), &world, &filter(), &config, 0.016);
        assert_eq!(out.state, MovementState::Walking);

        let idle = LocomotionInput::default();
        let out = machine.update(&body, &idle, &world, &filter(), &config, 0.016);
        assert_eq!(out.state, MovementState::Idle);
    }

    #[test]
    fn test_airborne_when_not_grounded() {
        let config = MovementConfig::default();
        let world = CollisionWorld::new();
        let body = MotionBody::new(Vec3::new(0.0, 5.0, 0.0), 0.4, 1.8);
        let mut machine = LocomotionStateMachine::new(&config);

        let out = machine.update(&body, &input(true, false), &world, &filter(), &config, 0.016);
        assert_eq!(out.state, MovementState::Airborne);
    }

    #[test]
    fn test_speed_blends_instead_of_snapping() {
        let config = MovementConfig::default();
        let world = flat_world();
        let body = grounded_body();
        let mut machine = LocomotionStateMachine::new(&config);

        let out = machine.update(&body, &input(true, false), &world, &filter(), &config, 0.05);
        let expected = config.sprint_speed * (0.05 * config.transition_speed);
        assert!((out.target_speed - expected).abs() < 1e-4);
        assert!(out.target_speed < config.sprint_speed);
    }

    #[test]
    fn test_slow_crouch_sprint_does_not_slide() {
        let config = MovementConfig::default();
        let world = flat_world();
        let body = grounded_body();
        let mut machine = LocomotionStateMachine::new(&config);

        let out = machine.update(&body, &input(true, true), &world, &filter(), &config, 0.016);
        assert_ne!(out.state, MovementState::Sliding);
    }

    #[test]
    fn test_slide_entry_and_countdown() {
        let config = MovementConfig {
            slide_duration: 2.0,
            ..Default::default()
        };
        let world = flat_world();
        let body = grounded_body();
        let mut machine = LocomotionStateMachine::new(&config);
        machine.set_target_speed(config.sprint_speed);

        let out = machine.update(&body, &input(true, true), &world, &filter(), &config, 0.5);
        assert_eq!(out.state, MovementState::Sliding);
        assert_eq!(machine.slide_remaining(), 2.0);

        let mut last = machine.slide_remaining();
        for tick in 1..=4 {
            let out = machine.update(&body, &input(true, true), &world, &filter(), &config, 0.5);
            assert!(machine.slide_remaining() <= last);
            last = machine.slide_remaining();
            if tick < 4 {
                assert_eq!(out.state, MovementState::Sliding, "tick {tick}");
            } else {
                assert_eq!(out.state, MovementState::Crouching);
            }
        }

        // Sprint stays cancelled until released, so no instant re-slide
        let out = machine.update(&body, &input(true, true), &world, &filter(), &config, 0.5);
        assert_eq!(out.state, MovementState::Crouching);
    }

    #[test]
    fn test_airborne_slide_holds_countdown_then_exits() {
        let config = MovementConfig::default();
        let world = flat_world();
        let grounded = grounded_body();
        let airborne = MotionBody::new(Vec3::new(0.0, 3.0, 0.0), 0.4, 1.8);
        let mut machine = LocomotionStateMachine::new(&config);
        machine.set_target_speed(config.sprint_speed);

        machine.update(&grounded, &input(true, true), &world, &filter(), &config, 0.5);
        machine.update(&grounded, &input(true, true), &world, &filter(), &config, 0.5);
        assert_eq!(machine.slide_remaining(), 0.5);

        // Off the ground the slide neither ends nor counts down
        for _ in 0..10 {
            let out = machine.update(&airborne, &input(true, true), &world, &filter(), &config, 0.5);
            assert_eq!(out.state, MovementState::Sliding);
        }
        assert_eq!(machine.slide_remaining(), 0.5);

        let out = machine.update(&grounded, &input(true, true), &world, &filter(), &config, 0.5);
        assert_eq!(out.state, MovementState::Crouching);

        // Once the slide is over, leaving the ground is plain airborne
        let out = machine.update(&airborne, &input(true, true), &world, &filter(), &config, 0.5);
        assert_eq!(out.previous, MovementState::Crouching);
        assert_eq!(out.state, MovementState::Airborne);
    }

    #[test]
    fn test_slide_ignores_released_inputs() {
        let config = MovementConfig::default();
        let world = flat_world();
        let body = grounded_body();
        let mut machine = LocomotionStateMachine::new(&config);
        machine.set_target_speed(config.sprint_speed);

        machine.update(&body, &input(true, true), &world, &filter(), &config, 0.1);
        let out = machine.update(&body, &LocomotionInput::default(), &world, &filter(), &config, 0.1);
        assert_eq!(out.state, MovementState::Sliding);
    }

    #[test]
    fn test_slope_qualification() {
        let config = MovementConfig::default();
        let mut world = CollisionWorld::new();
        // 20 degree ramp descending toward +X
        let tilt = Quat::from_rotation_z(-20f32.to_radians());
        world.add_oriented_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 0.5, 20.0), tilt, ContentFlags::SOLID);

        let body = MotionBody::new(Vec3::new(0.0, 0.05, 0.0), 0.4, 1.0);
        assert!(on_downhill_slope(&body, Vec3::X, &world, &filter(), &config));
        assert!(!on_downhill_slope(&body, Vec3::NEG_X, &world, &filter(), &config));

        // Too steep for the friction limit
        let mut steep = CollisionWorld::new();
        let tilt = Quat::from_rotation_z(-45f32.to_radians());
        steep.add_oriented_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 0.5, 20.0), tilt, ContentFlags::SOLID);
        assert!(!on_downhill_slope(&body, Vec3::X, &steep, &filter(), &config));

        // Flat ground never qualifies
        let flat = flat_world();
        assert!(!on_downhill_slope(&body, Vec3::X, &flat, &filter(), &config));
    }

    #[test]
    fn test_slope_is_read_under_the_feet() {
        let config = MovementConfig::default();
        let mut world = flat_world();
        // A tilted board at knee height, above the flat floor the body stands on
        let tilt = Quat::from_rotation_z(-20f32.to_radians());
        world.add_oriented_box(Vec3::new(0.0, 0.5, 0.0), Vec3::new(1.0, 0.02, 1.0), tilt, ContentFlags::SOLID);

        let body = MotionBody::new(Vec3::new(0.0, 0.05, 0.0), 0.4, 1.8);
        assert!(!on_downhill_slope(&body, Vec3::X, &world, &filter(), &config));
    }

    #[test]
    fn test_slide_pauses_on_slope() {
        let config = MovementConfig::default();
        let mut world = CollisionWorld::new();
        let tilt = Quat::from_rotation_z(-20f32.to_radians());
        world.add_oriented_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 0.5, 20.0), tilt, ContentFlags::SOLID);

        let mut body = MotionBody::new(Vec3::new(0.0, 0.05, 0.0), 0.4, 1.8);
        body.grounded = true;
        let mut machine = LocomotionStateMachine::new(&config);
        machine.set_target_speed(config.sprint_speed);

        machine.update(&body, &input(true, true), &world, &filter(), &config, 0.1);
        for _ in 0..30 {
            let out = machine.update(&body, &input(true, true), &world, &filter(), &config, 0.1);
            assert_eq!(out.state, MovementState::Sliding);
        }
        assert_eq!(machine.slide_remaining(), config.slide_duration);
    }

    #[test]
    fn test_crouch_height_blends_and_respects_ceiling() {
        let config = MovementConfig::default();
        let mut world = flat_world();
        let body = grounded_body();
        let mut machine = LocomotionStateMachine::new(&config);

        for _ in 0..60 {
            machine.update(&body, &input(false, true), &world, &filter(), &config, 0.05);
        }
        assert!((machine.height() - config.crouched_height).abs() < 0.01);

        // Ceiling 1.3 above the feet blocks standing up fully
        world.add_box(Vec3::new(0.0, 1.8, 0.0), Vec3::new(5.0, 0.5, 5.0), ContentFlags::SOLID);
        for _ in 0..60 {
            machine.update(&body, &input(false, false), &world, &filter(), &config, 0.05);
        }
        assert!(machine.height() < 1.3);
        assert!(machine.height() >= config.crouched_height - 1e-4);
    }

    #[test]
    fn test_goal_fov() {
        let config = MovementConfig::default();
        let world = flat_world();
        let mut body = grounded_body();
        body.velocity = Vec3::new(5.0, 0.0, 0.0);
        let mut machine = LocomotionStateMachine::new(&config);

        let out = machine.update(&body, &input(true, false), &world, &filter(), &config, 0.016);
        assert_eq!(out.goal_fov, config.fov_sprint);

        let zoomed = LocomotionInput {
            zoom: true,
            ..input(false, false)
        };
        let out = machine.update(&body, &zoomed, &world, &filter(), &config, 0.016);
        assert_eq!(out.goal_fov, config.fov_zoom);
    }

    #[test]
    fn test_stamina_cancels_sprint() {
        let config = MovementConfig {
            sprint_duration: 0.5,
            ..Default::default()
        };
        let world = flat_world();
        let mut body = grounded_body();
        body.velocity = Vec3::new(5.0, 0.0, 0.0);
        let mut machine = LocomotionStateMachine::new(&config);

        let mut states = Vec::new();
        for _ in 0..10 {
            states.push(machine.update(&body, &input(true, false), &world, &filter(), &config, 0.1).state);
        }
        assert_eq!(states[0], MovementState::Sprinting);
        assert_eq!(*states.last().unwrap(), MovementState::Walking);
    }
}
