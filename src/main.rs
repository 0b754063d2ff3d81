//! Cluckstorm - Headless Driver
//!
//! Runs a scripted session in the test arena and logs what happened.
//! Pass a JSON config path as the first argument to override the defaults.

use anyhow::{Context, Result};
use cluckstorm_game::{GameLoop, InputFrame, Level, SimEvent, Simulation, SimulationConfig};
use glam::Vec2;
use log::info;

/// One stretch of identical input.
struct Phase {
    label: &'static str,
    seconds: f32,
    input: InputFrame,
    /// Release every button on odd frames, for semi-automatic weapons.
    pulse: bool,
}

impl Phase {
    fn new(label: &'static str, seconds: f32, input: InputFrame) -> Self {
        Self {
            label,
            seconds,
            input,
            pulse: false,
        }
    }

    fn pulsed(mut self) -> Self {
        self.pulse = true;
        self
    }
}

fn script() -> Vec<Phase> {
    let strafe = Vec2::new(1.0, 0.0);
    vec![
        Phase::new("settle", 0.5, InputFrame::default()),
        Phase::new(
            "glock",
            1.0,
            InputFrame {
                fire: true,
                ..Default::default()
            },
        ),
        Phase::new(
            "switch",
            0.1,
            InputFrame {
                select_slot: Some(1),
                ..Default::default()
            },
        ),
        Phase::new(
            "eggs",
            2.0,
            InputFrame {
                fire: true,
                ..Default::default()
            },
        )
        .pulsed(),
        Phase::new(
            "reload",
            3.5,
            InputFrame {
                reload: true,
                ..Default::default()
            },
        ),
        Phase::new(
            "restock",
            0.1,
            InputFrame {
                interact: true,
                ..Default::default()
            },
        ),
        Phase::new(
            "walk",
            1.0,
            InputFrame {
                move_axis: strafe,
                ..Default::default()
            },
        ),
        Phase::new(
            "sprint",
            1.0,
            InputFrame {
                move_axis: strafe,
                sprint: true,
                ..Default::default()
            },
        ),
        Phase::new(
            "slide",
            1.5,
            InputFrame {
                move_axis: strafe,
                sprint: true,
                crouch: true,
                ..Default::default()
            },
        ),
        Phase::new(
            "jump",
            1.0,
            InputFrame {
                move_axis: strafe,
                jump: true,
                ..Default::default()
            },
        )
        .pulsed(),
        Phase::new("rest", 1.0, InputFrame::default()),
    ]
}

fn load_config() -> Result<SimulationConfig> {
    match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_json_file(&path).with_context(|| format!("loading config from {path}")),
        None => Ok(SimulationConfig::default()),
    }
}

fn log_event(event: &SimEvent) {
    match event {
        SimEvent::Footstep { .. } => log::trace!("{:?}", event),
        SimEvent::WeaponPickedUp { weapon, slot, .. } => info!("Picked up {} into slot {}", weapon, slot),
        _ => info!("{:?}", event),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config = load_config()?;
    config.validate().context("invalid simulation config")?;

    let mut simulation = Simulation::new(config, Level::test_arena());
    let player_id = simulation.add_player("Player1");
    let mut game = GameLoop::new(simulation);
    let frame_dt = game.simulation().delta_time();

    for phase in script() {
        let frames = (phase.seconds / frame_dt).round() as u32;
        info!("== {} ({} frames)", phase.label, frames);

        for frame in 0..frames {
            let input = if phase.pulse && frame % 2 == 1 {
                InputFrame {
                    move_axis: phase.input.move_axis,
                    ..Default::default()
                }
            } else {
                phase.input
            };
            game.advance(frame_dt, &[input]);

            for event in game.simulation_mut().drain_events() {
                log_event(&event);
            }
        }

        let sim = game.simulation();
        let player = sim
            .get_player(player_id)
            .context("scripted player disappeared")?;
        info!(
            "   state {} at {:.2?}, health {:.0}, weapon {}, targets left {}",
            player.movement_state(),
            player.position(),
            player.health.current(),
            player.active_weapon().map_or("none", |w| w.name()),
            sim.targets.len()
        );
    }

    let sim = game.simulation();
    info!(
        "Finished after {} ticks ({:.2}s simulated), {} projectiles in flight",
        sim.frame,
        sim.time,
        sim.projectiles().active_count()
    );
    Ok(())
}
