//! First-person camera state driven by movement.
//!
//! The camera owns pitch, field of view and head bob. Yaw lives on the body
//! since it steers movement. Eye height follows the collider height.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::config::MovementConfig;
use super::state::MotionBody;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraState {
    /// Pitch in radians, positive looks up.
    pub pitch: f32,
    /// Current vertical field of view in degrees.
    pub fov: f32,
    /// Eye sway, x = toward body right, y = up.
    bob_offset: Vec2,
    bob_time: f32,
}

impl CameraState {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            pitch: 0.0,
            fov: config.fov_default,
            bob_offset: Vec2::ZERO,
            bob_time: 0.0,
        }
    }

    /// Apply a look delta (radians) to the body yaw and camera pitch.
    pub fn apply_look(&mut self, body: &mut MotionBody, delta: Vec2, config: &MovementConfig) {
        body.yaw = (body.yaw + delta.x).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + delta.y).clamp(
            config.pitch_min_deg.to_radians(),
            config.pitch_max_deg.to_radians(),
        );
    }

    /// Blend the field of view toward `goal`.
    pub fn blend_fov(&mut self, goal: f32, blend: f32) {
        self.fov += (goal - self.fov) * blend.clamp(0.0, 1.0);
    }

    /// Advance the head bob by `dt`.
    ///
    /// While `bobbing` the eye traces a figure eight; otherwise it eases
    /// back to rest at `head_bob_return_speed`.
    pub fn update_head_bob(&mut self, bobbing: bool, config: &MovementConfig, dt: f32) {
        if config.head_bob && bobbing {
            self.bob_time += dt;
            let phase = self.bob_time * config.head_bob_frequency;
            let amplitude = config.head_bob_amplitude;
            self.bob_offset = Vec2::new((phase * 0.5).sin() * amplitude * 2.0, phase.sin() * amplitude);
        } else {
            self.bob_time = 0.0;
            let settle = (config.head_bob_return_speed * dt).clamp(0.0, 1.0);
            self.bob_offset = self.bob_offset.lerp(Vec2::ZERO, settle);
        }
    }

    pub fn bob_offset(&self) -> Vec2 {
        self.bob_offset
    }

    /// Eye height above the feet for a collider height.
    pub fn eye_height(height: f32, config: &MovementConfig) -> f32 {
        if config.standing_height > 0.0 {
            height * (config.eye_height_standing / config.standing_height)
        } else {
            height
        }
    }

    pub fn eye_position(&self, body: &MotionBody, config: &MovementConfig) -> Vec3 {
        body.position
            + Vec3::Y * (Self::eye_height(body.height, config) + self.bob_offset.y)
            + body.right() * self.bob_offset.x
    }

    /// Unit view direction from body yaw and camera pitch.
    pub fn view_direction(&self, body: &MotionBody) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(
            body.yaw.cos() * cos_pitch,
            sin_pitch,
            body.yaw.sin() * cos_pitch,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_is_clamped() {
        let config = MovementConfig::default();
        let mut body = MotionBody::new(Vec3::ZERO, 0.4, 1.8);
        let mut camera = CameraState::new(&config);

        camera.apply_look(&mut body, Vec2::new(0.0, 10.0), &config);
        assert!((camera.pitch - config.pitch_max_deg.to_radians()).abs() < 1e-5);
    }

    #[test]
    fn test_view_direction_level() {
        let config = MovementConfig::default();
        let body = MotionBody::new(Vec3::ZERO, 0.4, 1.8);
        let camera = CameraState::new(&config);
        assert!((camera.view_direction(&body) - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_eye_drops_with_height() {
        let config = MovementConfig::default();
        let standing = CameraState::eye_height(config.standing_height, &config);
        let crouched = CameraState::eye_height(config.crouched_height, &config);
        assert!((standing - config.eye_height_standing).abs() < 1e-5);
        assert!(crouched < standing);
    }

    #[test]
    fn test_head_bob_sways_then_settles() {
        let config = MovementConfig::default();
        let body = MotionBody::new(Vec3::ZERO, 0.4, 1.8);
        let mut camera = CameraState::new(&config);
        let rest = camera.eye_position(&body, &config);

        for _ in 0..10 {
            camera.update_head_bob(true, &config, 0.01);
        }
        let swayed = camera.bob_offset().length();
        assert!(swayed > 0.005);
        assert!(swayed <= config.head_bob_amplitude * 2.5);
        assert!((camera.eye_position(&body, &config) - rest).length() > 0.005);

        for _ in 0..10 {
            camera.update_head_bob(false, &config, 0.1);
        }
        assert!(camera.bob_offset().length() < swayed * 0.5);
    }

    #[test]
    fn test_head_bob_can_be_disabled() {
        let config = MovementConfig {
            head_bob: false,
            ..Default::default()
        };
        let mut camera = CameraState::new(&config);
        for _ in 0..10 {
            camera.update_head_bob(true, &config, 0.01);
        }
        assert_eq!(camera.bob_offset(), Vec2::ZERO);
    }

    #[test]
    fn test_fov_blend() {
        let config = MovementConfig::default();
        let mut camera = CameraState::new(&config);
        camera.blend_fov(95.0, 0.5);
        assert!((camera.fov - 85.0).abs() < 1e-4);
    }
}
