use crate::board::{Knob, Pin};

pub const CHANNEL_COUNT: usize = 4;
pub const KNOB_COUNT: usize = 6;
pub const LED_COUNT: u8 = 5;

pub const TEMPO_KNOB: Knob = Knob(0);
pub const STEPS_KNOB: Knob = Knob(1);

pub struct ChannelWiring {
    pub button: Pin,
    pub duty: Knob,
    pub gate: Pin,
    pub allow_fill: bool,
}

// Duty knobs sit on ADC2..ADC5, gates on port B bits 4..1.
pub const CHANNELS: [ChannelWiring; CHANNEL_COUNT] = [
    ChannelWiring {
        button: Pin::Record(0),
        duty: Knob(2),
        gate: Pin::Gate(0),
        allow_fill: true,
    },
    ChannelWiring {
        button: Pin::Record(1),
        duty: Knob(3),
        gate: Pin::Gate(1),
        allow_fill: false,
    },
    ChannelWiring {
        button: Pin::Record(2),
        duty: Knob(4),
        gate: Pin::Gate(2),
        allow_fill: false,
    },
    ChannelWiring {
        button: Pin::Record(3),
        duty: Knob(5),
        gate: Pin::Gate(3),
        allow_fill: false,
    },
];

/// LED line driven by each bit of the displayed value. The board routes the
/// count bits to port D in reverse order.
pub const LED_LINE_FOR_BIT: [u8; LED_COUNT as usize] = [4, 3, 2, 1, 0];
