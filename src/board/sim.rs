use crate::board::{Board, Direction, Knob, Pin};
use crate::buttons::Buttons;
use crate::display::LedLines;
use crate::wiring::{CHANNEL_COUNT, KNOB_COUNT, LED_COUNT};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const ADC_MAX: u16 = 4095;

/// A sequencer board simulated in memory. Buttons are wired active-low
/// against pull-ups, so a pressed button reads low.
pub struct SimBoard {
    knobs: [u16; KNOB_COUNT],
    held: Buttons,
    gates: [bool; CHANNEL_COUNT],
    leds: LedLines,
    clock_direction: Direction,
    clock_out: bool,
    tx: bool,
    tx_log: Vec<(u64, bool)>,
    elapsed: u64,
    noise: u16,
    rng: StdRng,
    ignored_clock_writes: usize,
}

impl SimBoard {
    pub fn new() -> Self {
        SimBoard::with_noise(0, 0)
    }

    /// ADC reads jitter by up to `noise` counts either way.
    pub fn with_noise(noise: u16, seed: u64) -> Self {
        SimBoard {
            knobs: [0; KNOB_COUNT],
            held: Buttons::empty(),
            gates: [false; CHANNEL_COUNT],
            leds: LedLines::empty(),
            clock_direction: Direction::Input,
            clock_out: false,
            tx: true,
            tx_log: Vec::new(),
            elapsed: 0,
            noise,
            rng: StdRng::seed_from_u64(seed),
            ignored_clock_writes: 0,
        }
    }

    pub fn set_knob(&mut self, knob: Knob, value: u16) {
        match self.knobs.get_mut(knob.0 as usize) {
            Some(k) => *k = value.min(ADC_MAX),
            None => println!("[BOARD] no knob at ADC input {}", knob.0),
        }
    }

    pub fn knob(&self, knob: Knob) -> u16 {
        self.knobs.get(knob.0 as usize).copied().unwrap_or(0)
    }

    /// Replace the set of held controls. `ClockSelect` is a latching switch and
    /// `Pulse` is the level on the external clock jack.
    pub fn apply(&mut self, held: Buttons) {
        self.held = held;
    }

    #[cfg(any(test, feature = "panel"))]
    pub fn held(&self) -> Buttons {
        self.held
    }

    #[cfg(any(test, feature = "panel"))]
    pub fn set_button(&mut self, button: Buttons, pressed: bool) {
        self.held.set(button, pressed);
    }

    pub fn gate(&self, channel: usize) -> bool {
        self.gates.get(channel).copied().unwrap_or(false)
    }

    pub fn led_lines(&self) -> LedLines {
        self.leds
    }

    #[cfg(any(test, feature = "panel"))]
    pub fn clock_direction(&self) -> Direction {
        self.clock_direction
    }

    /// Level currently driven on the clock line by the board itself.
    #[cfg(any(test, feature = "panel"))]
    pub fn clock_out(&self) -> bool {
        self.clock_direction == Direction::Output && self.clock_out
    }

    pub fn ignored_clock_writes(&self) -> usize {
        self.ignored_clock_writes
    }

    /// Every write to the serial line, stamped with the spin time it happened at.
    #[cfg(test)]
    pub fn tx_log(&self) -> &[(u64, bool)] {
        &self.tx_log
    }

    #[cfg(test)]
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    fn sample(&mut self, value: u16) -> u16 {
        if self.noise == 0 {
            return value;
        }
        let noise = self.noise as i32;
        let jitter = self.rng.random_range(-noise..=noise);
        (value as i32 + jitter).clamp(0, ADC_MAX as i32) as u16
    }
}

impl Default for SimBoard {
    fn default() -> Self {
        SimBoard::new()
    }
}

impl Board for SimBoard {
    fn read_analog(&mut self, knob: Knob) -> u16 {
        let value = self.knob(knob);
        self.sample(value)
    }

    fn read_digital(&mut self, pin: Pin) -> bool {
        match pin {
            Pin::Record(channel) if (channel as usize) < CHANNEL_COUNT => {
                !self.held.contains(Buttons::record(channel as usize))
            }
            Pin::Clear => !self.held.contains(Buttons::Clear),
            Pin::ClockSelect => self.held.contains(Buttons::ClockSelect),
            Pin::Clock => match self.clock_direction {
                Direction::Input => self.held.contains(Buttons::Pulse),
                Direction::Output => self.clock_out,
            },
            Pin::Gate(channel) => self.gate(channel as usize),
            Pin::Led(line) if line < LED_COUNT => self.leds.line(line),
            Pin::SerialTx => self.tx,
            _ => {
                println!("[BOARD] read from unknown pin {:?}", pin);
                false
            }
        }
    }

    fn write_digital(&mut self, pin: Pin, level: bool) {
        match pin {
            Pin::Gate(channel) if (channel as usize) < CHANNEL_COUNT => {
                self.gates[channel as usize] = level;
            }
            Pin::Led(line) if line < LED_COUNT => self.leds.set_line(line, level),
            Pin::Clock => match self.clock_direction {
                Direction::Output => self.clock_out = level,
                Direction::Input => {
                    self.ignored_clock_writes += 1;
                    println!("[BOARD] ignoring write to clock line while it is an input");
                }
            },
            Pin::SerialTx => {
                self.tx = level;
                self.tx_log.push((self.elapsed, level));
            }
            _ => println!("[BOARD] ignoring write to {:?}", pin),
        }
    }

    fn set_direction(&mut self, pin: Pin, direction: Direction) {
        match pin {
            Pin::Clock => {
                self.clock_direction = direction;
                if direction == Direction::Input {
                    self.clock_out = false;
                }
            }
            _ => println!("[BOARD] {:?} has a fixed direction", pin),
        }
    }

    fn spin(&mut self, units: u32) {
        self.elapsed += units as u64;
    }
}
