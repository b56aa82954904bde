pub mod channel;
pub mod gate;
pub mod step;

use std::fmt::Write;

use crate::board::Board;
use crate::clock::{ClockArbiter, ClockResult};
use crate::config::Config;
use crate::display::Display;
use crate::knob::KnobReading;
use crate::uart::{SoftUart, TxQueue};
use crate::wiring::{CHANNEL_COUNT, STEPS_KNOB};

use channel::Channel;
use step::StepEngine;

/// What one loop iteration did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub tick: bool,
    pub step: usize,
    pub num_steps: u8,
    pub shown: u8,
    pub gates: [bool; CHANNEL_COUNT],
}

/// All state of the control loop. Owned by whoever drives the loop and
/// handed the board once per iteration.
pub struct Sequencer {
    clock: ClockArbiter,
    engine: StepEngine,
    display: Display,
    trace_tx: Option<TxQueue>,
    iteration: u64,
    trace: bool,
}

impl Sequencer {
    pub fn power_on<B: Board>(board: &mut B, config: &Config) -> Sequencer {
        if config.banner {
            let mut uart = SoftUart::new(&mut *board, config.bit_delay);
            if write!(uart, "pattern-seq {}\r\n", env!("CARGO_PKG_VERSION")).is_err() {
                println!("[UART] failed to send startup banner");
            }
        }

        let num_steps = KnobReading::read(board, STEPS_KNOB).num_steps();
        let clock = ClockArbiter::new(board, config.tempo_refresh);
        println!(
            "[SEQ] power on: {} steps, {:?} clock, tick {} iterations",
            num_steps,
            clock.source(),
            clock.delay()
        );

        Sequencer {
            clock,
            engine: StepEngine::new(num_steps),
            display: Display::new(num_steps, config.display_hold),
            trace_tx: if config.serial_trace {
                Some(TxQueue::new(config.trace_bit_period))
            } else {
                None
            },
            iteration: 0,
            trace: config.trace,
        }
    }

    /// Run one iteration: clock, recording, gates, tick, display.
    pub fn step<B: Board>(&mut self, board: &mut B) -> StepReport {
        let result = self.clock.poll(board, self.iteration);

        self.engine.record(board);
        let num_steps = self.engine.sample_steps(board);

        let gates = gate::drive(
            board,
            self.engine.channels(),
            self.engine.count(),
            self.clock.cycles_since_tick(),
            self.clock.delay(),
        );

        let tick = self.engine.apply(result);
        self.clock.advance(result);
        if tick && self.trace {
            println!(
                "[STEP] step {:02}/{:02} ({} iterations per step)",
                self.engine.count(),
                num_steps,
                self.clock.delay()
            );
        }

        let changed = self.display.update(num_steps, self.engine.count());
        self.display.render(board);
        if changed {
            if self.trace {
                println!("[STEP] step count now {}", num_steps);
            }
            if let Some(tx) = self.trace_tx.as_mut() {
                tx.push_str(&format!("steps={}\r\n", num_steps));
            }
        }

        if let Some(tx) = self.trace_tx.as_mut() {
            tx.tick(board);
        }

        self.iteration += 1;

        StepReport {
            tick: result == ClockResult::Tick,
            step: self.engine.count(),
            num_steps,
            shown: self.display.value(),
            gates,
        }
    }

    #[cfg(any(test, feature = "panel"))]
    pub fn run<B: Board>(&mut self, board: &mut B, iterations: u64) -> usize {
        let mut ticks = 0;
        for _ in 0..iterations {
            if self.step(board).tick {
                ticks += 1;
            }
        }
        ticks
    }

    pub fn count(&self) -> usize {
        self.engine.count()
    }

    pub fn num_steps(&self) -> u8 {
        self.engine.num_steps()
    }

    pub fn channel(&self, index: usize) -> &Channel {
        &self.engine.channels()[index]
    }

    pub fn clock(&self) -> &ClockArbiter {
        &self.clock
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn trace_queue(&self) -> Option<&TxQueue> {
        self.trace_tx.as_ref()
    }

    #[cfg(test)]
    pub fn engine_mut(&mut self) -> &mut StepEngine {
        &mut self.engine
    }
}
