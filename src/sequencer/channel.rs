use crate::board::{Knob, Pin};
use crate::wiring::ChannelWiring;

pub const MAX_STEPS: usize = 32;

pub struct Channel {
    pub duty: Knob,
    pub gate: Pin,
    allow_fill: bool,
    pressed_now: bool,
    pressed_prev: bool,
    sequence: [bool; MAX_STEPS],
}

impl Channel {
    pub fn new(wiring: &ChannelWiring) -> Channel {
        Channel {
            duty: wiring.duty,
            gate: wiring.gate,
            allow_fill: wiring.allow_fill,
            pressed_now: false,
            pressed_prev: false,
            sequence: [false; MAX_STEPS],
        }
    }

    /// Apply this iteration's button state to `step`. Clear wins over
    /// recording. Fill channels write every iteration the button is held,
    /// the others only on the press edge.
    pub fn record(&mut self, pressed: bool, clear: bool, step: usize) {
        self.pressed_now = pressed;

        if self.pressed_now {
            if clear {
                self.sequence[step] = false;
            } else if self.allow_fill || !self.pressed_prev {
                self.sequence[step] = true;
            }
        }

        self.pressed_prev = self.pressed_now;
    }

    pub fn is_active(&self, step: usize) -> bool {
        step < MAX_STEPS && self.sequence[step]
    }

    #[cfg(test)]
    pub fn allow_fill(&self) -> bool {
        self.allow_fill
    }

    #[cfg(test)]
    pub fn sequence(&self) -> &[bool; MAX_STEPS] {
        &self.sequence
    }

    #[cfg(test)]
    pub fn set_step(&mut self, step: usize, value: bool) {
        self.sequence[step] = value;
    }
}
