//! Movement configuration constants.
//!
//! All movement parameters are grouped here for easy tuning. Values use
//! metric units (meters, seconds, degrees for angles) unless noted.

use serde::{Deserialize, Serialize};

/// How the ground check is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroundCheck {
    /// Sphere of `ground_check_radius` centered on the feet.
    #[default]
    Sphere,
    /// Ray cast down from `ground_check_radius` above the feet.
    Ray,
}

/// How movement input affects velocity while airborne.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AirControl {
    /// Accelerate the carried horizontal velocity toward the wish direction.
    #[default]
    Additive,
    /// Overwrite horizontal velocity with the scaled wish velocity.
    Replace,
}

/// Configuration for player movement physics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // ========================================================================
    // Player Dimensions
    // ========================================================================
    /// Collision radius.
    pub player_radius: f32,

    /// Standing collider height.
    pub standing_height: f32,

    /// Crouched collider height.
    pub crouched_height: f32,

    /// Eye height when standing, measured from the feet.
    pub eye_height_standing: f32,

    // ========================================================================
    // State Speeds
    // ========================================================================
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub crouch_speed: f32,
    pub slide_speed: f32,

    /// Blend rate for speed, height and FOV (per second).
    pub transition_speed: f32,

    /// Extra speed above half of sprint speed required to start a slide.
    pub slide_entry_margin: f32,

    // ========================================================================
    // Sliding
    // ========================================================================
    /// Slide countdown in seconds.
    pub slide_duration: f32,

    /// Seconds between slope checks while sliding.
    pub slope_check_interval: f32,

    /// How far below the feet the slope check reaches.
    pub slope_check_margin: f32,

    /// Static friction of walkable surfaces.
    ///
    /// Slopes steeper than `atan(static_friction)` don't sustain a slide.
    pub surface_static_friction: f32,

    /// How fast carried velocity blends toward the slide velocity (per second).
    pub slide_velocity_blend: f32,

    // ========================================================================
    // Sprint Stamina
    // ========================================================================
    /// Sprint budget in seconds.
    pub sprint_duration: f32,

    /// Stamina regained per second while not sprinting.
    pub stamina_regen_rate: f32,

    pub unlimited_sprint: bool,

    // ========================================================================
    // Physics
    // ========================================================================
    /// Gravity acceleration magnitude.
    pub gravity: f32,

    /// Height reached by a jump.
    pub jump_height: f32,

    /// Minimum time between jumps (ms).
    pub jump_cooldown_ms: u32,

    /// How long a jump pressed while unable to jump stays buffered (ms).
    /// Zero disables buffering.
    pub jump_buffer_ms: u32,

    pub ground_check: GroundCheck,

    /// Ground check radius (sphere) or reach (ray).
    pub ground_check_radius: f32,

    /// Upward speed above which the body is never considered grounded.
    pub max_grounded_rise_speed: f32,

    pub air_control: AirControl,

    /// Fraction of the target speed available in the air.
    pub air_control_factor: f32,

    /// Air acceleration for [`AirControl::Additive`].
    pub air_acceleration: f32,

    /// Damping of carried horizontal velocity while off the ground.
    pub air_drag: f32,

    /// Ground normals with a smaller Y than this are too steep to stand on.
    pub min_ground_normal: f32,

    /// Horizontal speed above which the body counts as moving.
    pub moving_threshold: f32,

    // ========================================================================
    // Crouch Clearance
    // ========================================================================
    /// How far above the head to look when standing up.
    pub ceiling_check_distance: f32,

    /// Gap kept between the head and a ceiling.
    pub ceiling_clearance: f32,

    // ========================================================================
    // Camera
    // ========================================================================
    pub fov_default: f32,
    pub fov_sprint: f32,
    pub fov_zoom: f32,
    pub pitch_min_deg: f32,
    pub pitch_max_deg: f32,

    /// Sway the eye while walking on the ground.
    pub head_bob: bool,

    /// Vertical sway in meters. Side-to-side sway is twice this.
    pub head_bob_amplitude: f32,

    /// Vertical sway rate in radians per second. Side-to-side runs at half.
    pub head_bob_frequency: f32,

    /// How fast the eye settles back once bobbing stops (per second).
    pub head_bob_return_speed: f32,

    // ========================================================================
    // Pushing
    // ========================================================================
    /// Shove dynamic bodies the player walks into.
    pub can_push: bool,

    /// Horizontal impulse given to a body on first contact.
    pub push_strength: f32,

    // ========================================================================
    // Collision
    // ========================================================================
    /// Maximum step height the body can climb.
    pub step_height: f32,

    /// Maximum collision iterations per move.
    pub max_clip_planes: usize,

    /// Overbounce factor for velocity clipping.
    pub overbounce: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            player_radius: 0.4,
            standing_height: 1.8,
            crouched_height: 1.0,
            eye_height_standing: 1.6,

            walk_speed: 4.5,
            sprint_speed: 7.0,
            crouch_speed: 2.0,
            slide_speed: 9.0,
            transition_speed: 8.0,
            slide_entry_margin: 1.0,

            slide_duration: 1.0,
            slope_check_interval: 0.2,
            slope_check_margin: 0.3,
            surface_static_friction: 0.6, // ~31 degrees
            slide_velocity_blend: 4.0,

            sprint_duration: 8.0,
            stamina_regen_rate: 1.0,
            unlimited_sprint: false,

            gravity: 9.81,
            jump_height: 1.0,
            jump_cooldown_ms: 100,
            jump_buffer_ms: 0,
            ground_check: GroundCheck::Sphere,
            ground_check_radius: 0.2,
            max_grounded_rise_speed: 0.1,
            air_control: AirControl::Additive,
            air_control_factor: 0.3,
            air_acceleration: 10.0,
            air_drag: 0.5,
            min_ground_normal: 0.7,
            moving_threshold: 0.1,

            ceiling_check_distance: 0.2,
            ceiling_clearance: 0.1,

            fov_default: 75.0,
            fov_sprint: 85.0,
            fov_zoom: 30.0,
            pitch_min_deg: -85.0,
            pitch_max_deg: 85.0,
            head_bob: true,
            head_bob_amplitude: 0.01,
            head_bob_frequency: 18.5,
            head_bob_return_speed: 1.0,

            can_push: true,
            push_strength: 11.0,

            step_height: 0.4,
            max_clip_planes: 5,
            overbounce: 1.001,
        }
    }
}

impl MovementConfig {
    /// A faster, floatier preset.
    pub fn arcade() -> Self {
        Self {
            walk_speed: 6.0,
            sprint_speed: 10.0,
            crouch_speed: 3.0,
            slide_speed: 13.0,
            slide_duration: 1.4,
            jump_height: 1.4,
            air_control_factor: 0.6,
            unlimited_sprint: true,
            ..Default::default()
        }
    }

    /// Slow, heavy movement with strong air drag.
    pub fn tactical() -> Self {
        Self {
            walk_speed: 2.0,
            sprint_speed: 4.0,
            crouch_speed: 1.0,
            slide_speed: 5.5,
            sprint_duration: 5.0,
            air_drag: 2.0,
            air_control_factor: 0.3,
            jump_height: 0.8,
            ..Default::default()
        }
    }

    /// Goal speed for a movement state.
    ///
    /// Airborne has no goal of its own and keeps whatever speed it carried.
    pub fn goal_speed(&self, state: super::MovementState, current: f32) -> f32 {
        use super::MovementState::*;
        match state {
            Idle | Walking => self.walk_speed,
            Sprinting => self.sprint_speed,
            Crouching => self.crouch_speed,
            Sliding => self.slide_speed,
            Airborne => current,
        }
    }

    /// Speed the target speed must exceed to enter a slide.
    pub fn slide_entry_speed(&self) -> f32 {
        self.sprint_speed * 0.5 + self.slide_entry_margin
    }

    /// Steepest slope (degrees) that still sustains a slide.
    pub fn max_slide_slope_deg(&self) -> f32 {
        self.surface_static_friction.max(0.0).atan().to_degrees()
    }

    /// Instantaneous vertical speed that reaches `jump_height`.
    pub fn jump_impulse(&self) -> f32 {
        (2.0 * self.gravity.abs() * self.jump_height.max(0.0)).sqrt()
    }
}
