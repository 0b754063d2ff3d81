//! Player input handling.
//!
//! This module turns raw per-frame input into an [`Intent`]: press edges,
//! hold-or-toggle resolution and a [`MoveCommand`] for the physics system.

use cluckstorm_physics::{CommandButtons, MoveCommand};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Raw player input for a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Movement axes, x = right, y = forward.
    pub move_axis: Vec2,
    /// Mouse delta this frame (pixels, +y down).
    pub mouse_delta: Vec2,
    pub sprint: bool,
    pub crouch: bool,
    pub jump: bool,
    pub fire: bool,
    pub reload: bool,
    pub zoom: bool,
    pub interact: bool,
    /// Loadout slot requested this frame.
    pub select_slot: Option<usize>,
}

/// How a button maps to its held state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonMode {
    /// Active while the button is down.
    #[default]
    Hold,
    /// Each press flips the state.
    Toggle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputModes {
    pub sprint: ButtonMode,
    pub crouch: ButtonMode,
    pub zoom: ButtonMode,
}

/// Resolved intent for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Intent {
    pub command: MoveCommand,
    pub fire_held: bool,
    pub fire_pressed: bool,
    pub jump_pressed: bool,
    pub reload_pressed: bool,
    pub interact_pressed: bool,
    pub select_slot: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default)]
struct ToggleButton {
    mode: ButtonMode,
    down: bool,
    latched: bool,
}

impl ToggleButton {
    fn new(mode: ButtonMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    fn update(&mut self, down: bool) -> bool {
        let pressed = down && !self.down;
        self.down = down;
        match self.mode {
            ButtonMode::Hold => down,
            ButtonMode::Toggle => {
                if pressed {
                    self.latched = !self.latched;
                }
                self.latched
            }
        }
    }

    fn release(&mut self) {
        self.latched = false;
    }
}

/// Samples raw frames into intents. Keeps the previous frame for edges.
#[derive(Debug, Clone)]
pub struct InputSampler {
    mouse_sensitivity: f32,
    previous: InputFrame,
    sprint: ToggleButton,
    crouch: ToggleButton,
    zoom: ToggleButton,
}

impl InputSampler {
    pub fn new(modes: InputModes, mouse_sensitivity: f32) -> Self {
        Self {
            mouse_sensitivity,
            previous: InputFrame::default(),
            sprint: ToggleButton::new(modes.sprint),
            crouch: ToggleButton::new(modes.crouch),
            zoom: ToggleButton::new(modes.zoom),
        }
    }

    /// Resolve one frame.
    ///
    /// `control_sensitivity` is the character's look multiplier.
    pub fn sample(&mut self, frame: &InputFrame, control_sensitivity: f32) -> Intent {
        let zoom = self.zoom.update(frame.zoom);
        let crouch = self.crouch.update(frame.crouch);
        let mut sprint = self.sprint.update(frame.sprint);
        if zoom {
            sprint = false;
            self.sprint.release();
        }

        let jump_pressed = frame.jump && !self.previous.jump;

        let mut buttons = CommandButtons::NONE;
        buttons.set(CommandButtons::SPRINT, sprint);
        buttons.set(CommandButtons::CROUCH, crouch);
        buttons.set(CommandButtons::ZOOM, zoom);
        buttons.set(CommandButtons::JUMP, jump_pressed);

        // Mouse pixels to radians. Screen +y is down, pitch +y is up.
        let radians = self.mouse_sensitivity * control_sensitivity * 0.001;
        let look_delta = Vec2::new(frame.mouse_delta.x, -frame.mouse_delta.y) * radians;

        let intent = Intent {
            command: MoveCommand {
                move_input: frame.move_axis.clamp_length_max(1.0),
                look_delta,
                buttons,
            },
            fire_held: frame.fire,
            fire_pressed: frame.fire && !self.previous.fire,
            jump_pressed,
            reload_pressed: frame.reload && !self.previous.reload,
            interact_pressed: frame.interact && !self.previous.interact,
            select_slot: frame.select_slot,
        };
        self.previous = *frame;
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let mut sampler = InputSampler::new(InputModes::default(), 1.0);
        let frame = InputFrame {
            fire: true,
            jump: true,
            ..Default::default()
        };

        let first = sampler.sample(&frame, 1.0);
        assert!(first.fire_pressed && first.fire_held && first.jump_pressed);
        assert!(first.command.buttons.jump());

        let second = sampler.sample(&frame, 1.0);
        assert!(!second.fire_pressed && second.fire_held && !second.jump_pressed);
        assert!(!second.command.buttons.jump());
    }

    #[test]
    fn test_toggle_crouch() {
        let modes = InputModes {
            crouch: ButtonMode::Toggle,
            ..Default::default()
        };
        let mut sampler = InputSampler::new(modes, 1.0);
        let down = InputFrame {
            crouch: true,
            ..Default::default()
        };
        let up = InputFrame::default();

        assert!(sampler.sample(&down, 1.0).command.buttons.crouch());
        assert!(sampler.sample(&up, 1.0).command.buttons.crouch());
        assert!(!sampler.sample(&down, 1.0).command.buttons.crouch());
    }

    #[test]
    fn test_zoom_suppresses_sprint() {
        let mut sampler = InputSampler::new(InputModes::default(), 1.0);
        let frame = InputFrame {
            sprint: true,
            zoom: true,
            ..Default::default()
        };

        let buttons = sampler.sample(&frame, 1.0).command.buttons;
        assert!(buttons.zoom());
        assert!(!buttons.sprint());
    }

    #[test]
    fn test_look_scaling_and_move_clamp() {
        let mut sampler = InputSampler::new(InputModes::default(), 2.0);
        let frame = InputFrame {
            move_axis: Vec2::new(1.0, 1.0),
            mouse_delta: Vec2::new(100.0, 50.0),
            ..Default::default()
        };

        let cmd = sampler.sample(&frame, 0.5).command;
        assert!((cmd.move_input.length() - 1.0).abs() < 1e-5);
        assert!((cmd.look_delta.x - 0.1).abs() < 1e-6);
        assert!((cmd.look_delta.y + 0.05).abs() < 1e-6);
    }
}
