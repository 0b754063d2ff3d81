//! Fixed-step game loop driver.

use log::warn;

use crate::input::InputFrame;
use crate::simulation::Simulation;

/// Drives a [`Simulation`] from variable frame times.
///
/// Each [`advance`](GameLoop::advance) runs one variable tick and as many
/// fixed ticks as the accumulated time allows.
#[derive(Debug)]
pub struct GameLoop {
    simulation: Simulation,
    accumulator: f32,
}

impl GameLoop {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            simulation,
            accumulator: 0.0,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    /// Advance by one frame. Returns the number of fixed ticks run.
    pub fn advance(&mut self, frame_dt: f32, inputs: &[InputFrame]) -> u32 {
        let max_frame = self.simulation.config.max_frame_time;
        let frame_dt = if frame_dt > max_frame {
            warn!("Frame took {:.3}s, clamping to {:.3}s", frame_dt, max_frame);
            max_frame
        } else {
            frame_dt.max(0.0)
        };

        self.simulation.tick_variable(inputs, frame_dt);

        let fixed_dt = self.simulation.delta_time();
        self.accumulator += frame_dt;
        let mut ticks = 0;
        while self.accumulator >= fixed_dt {
            self.simulation.tick_fixed(fixed_dt);
            self.accumulator -= fixed_dt;
            ticks += 1;
        }
        ticks
    }
}
