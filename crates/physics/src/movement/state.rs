//! Movement state and per-tick commands.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::{SurfaceFlags, TraceShape};

/// Discrete locomotion state of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MovementState {
    #[default]
    Idle,
    Walking,
    Sprinting,
    Crouching,
    Sliding,
    Airborne,
}

impl MovementState {
    /// States that use the crouched collider height.
    pub fn is_low(self) -> bool {
        matches!(self, Self::Crouching | Self::Sliding)
    }

    /// States from which a jump may start.
    pub fn can_jump(self) -> bool {
        !self.is_low()
    }
}

impl std::fmt::Display for MovementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Walking => "walking",
            Self::Sprinting => "sprinting",
            Self::Crouching => "crouching",
            Self::Sliding => "sliding",
            Self::Airborne => "airborne",
        };
        f.write_str(name)
    }
}

/// Button flags for a movement command.
///
/// These are resolved intents: hold/toggle handling has already happened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandButtons(pub u16);

impl CommandButtons {
    pub const NONE: Self = Self(0);
    pub const JUMP: Self = Self(1 << 0);
    pub const CROUCH: Self = Self(1 << 1);
    pub const SPRINT: Self = Self(1 << 2);
    pub const ZOOM: Self = Self(1 << 3);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub fn set(&mut self, flag: Self, enabled: bool) {
        if enabled {
            self.0 |= flag.0;
        } else {
            self.0 &= !flag.0;
        }
    }

    #[inline]
    pub fn jump(self) -> bool {
        self.contains(Self::JUMP)
    }

    #[inline]
    pub fn crouch(self) -> bool {
        self.contains(Self::CROUCH)
    }

    #[inline]
    pub fn sprint(self) -> bool {
        self.contains(Self::SPRINT)
    }

    #[inline]
    pub fn zoom(self) -> bool {
        self.contains(Self::ZOOM)
    }
}

impl std::ops::BitOr for CommandButtons {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Movement intent for one tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MoveCommand {
    /// Planar movement, x = strafe right, y = forward. Length at most 1.
    pub move_input: Vec2,
    /// Look delta in radians, x = yaw right, y = pitch up.
    pub look_delta: Vec2,
    pub buttons: CommandButtons,
}

impl MoveCommand {
    /// Movement input clamped to unit length.
    pub fn clamped_move(&self) -> Vec2 {
        self.move_input.clamp_length_max(1.0)
    }

    pub fn has_move_input(&self) -> bool {
        self.move_input.length_squared() > 1e-4
    }
}

/// Physical state of a character body.
///
/// The position is the bottom-center of the collider (the feet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionBody {
    pub position: Vec3,
    pub velocity: Vec3,

    /// Facing angle around +Y in radians.
    pub yaw: f32,

    /// Current collider height.
    pub height: f32,

    pub radius: f32,

    pub grounded: bool,

    /// Normal of the ground contact, if grounded.
    pub ground_normal: Option<Vec3>,

    /// Surface of the ground contact.
    pub ground_surface: SurfaceFlags,
}

impl MotionBody {
    pub fn new(position: Vec3, radius: f32, height: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            height,
            radius,
            grounded: false,
            ground_normal: None,
            ground_surface: SurfaceFlags::NONE,
        }
    }

    /// Forward direction on the ground plane.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    /// Right direction on the ground plane.
    pub fn right(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// World-space direction for planar movement input.
    pub fn wish_direction(&self, move_input: Vec2) -> Vec3 {
        (self.forward() * move_input.y + self.right() * move_input.x).normalize_or_zero()
    }

    pub fn horizontal_velocity(&self) -> Vec3 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z)
    }

    pub fn horizontal_speed(&self) -> f32 {
        self.horizontal_velocity().length()
    }

    /// Collision shape at the current height.
    pub fn shape(&self) -> TraceShape {
        TraceShape::Capsule {
            radius: self.radius,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_buttons() {
        let mut buttons = CommandButtons::JUMP | CommandButtons::SPRINT;
        assert!(buttons.jump());
        assert!(buttons.sprint());
        assert!(!buttons.crouch());

        buttons.set(CommandButtons::SPRINT, false);
        buttons.set(CommandButtons::ZOOM, true);
        assert!(!buttons.sprint());
        assert!(buttons.zoom());
    }

    #[test]
    fn test_wish_direction_follows_yaw() {
        let mut body = MotionBody::new(Vec3::ZERO, 0.4, 1.8);
        let forward = body.wish_direction(Vec2::new(0.0, 1.0));
        assert!((forward - Vec3::X).length() < 1e-5);

        body.yaw = std::f32::consts::FRAC_PI_2;
        let forward = body.wish_direction(Vec2::new(0.0, 1.0));
        assert!((forward - Vec3::Z).length() < 1e-5);

        let strafe = body.wish_direction(Vec2::new(1.0, 0.0));
        assert!((strafe - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_low_states() {
        assert!(MovementState::Sliding.is_low());
        assert!(MovementState::Crouching.is_low());
        assert!(!MovementState::Airborne.is_low());
        assert!(MovementState::Walking.can_jump());
        assert!(!MovementState::Crouching.can_jump());
    }
}
