use bitfield::bitfield;

use crate::board::{Board, Knob};

bitfield! {
    /// A 12-bit ADC sample.
    #[derive(Copy, Clone, PartialEq)]
    pub struct KnobReading(u16);
    impl Debug;
    pub value,  _: 11, 0;
    pub coarse, _: 11, 7;
}

const ADC_MASK: u16 = 0x0FFF;

// delay = 4096 + 128 - tempo, so the fastest tick is 129 iterations long
const TEMPO_OFFSET: u32 = 4096 + 128;

impl KnobReading {
    pub fn new(raw: u16) -> KnobReading {
        KnobReading(raw & ADC_MASK)
    }

    pub fn read<B: Board>(board: &mut B, knob: Knob) -> KnobReading {
        KnobReading::new(board.read_analog(knob))
    }

    /// Tick length in loop iterations for a tempo knob reading.
    pub fn delay(&self) -> u32 {
        TEMPO_OFFSET - self.value() as u32
    }

    /// Step count for a step-count knob reading, always within 1..=32.
    pub fn num_steps(&self) -> u8 {
        self.coarse() as u8 + 1
    }
}
