use bitflags::bitflags;

use crate::board::{Board, Pin};
use crate::wiring::CHANNELS;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Buttons: u8 {
        const Record0     = 0b0000_0001;
        const Record1     = 0b0000_0010;
        const Record2     = 0b0000_0100;
        const Record3     = 0b0000_1000;
        const Clear       = 0b0001_0000;
        const ClockSelect = 0b0010_0000;
        const Pulse       = 0b0100_0000;
    }
}

impl Buttons {
    pub fn record(channel: usize) -> Buttons {
        match channel {
            0 => Buttons::Record0,
            1 => Buttons::Record1,
            2 => Buttons::Record2,
            3 => Buttons::Record3,
            _ => Buttons::empty(),
        }
    }

    /// Sample the record and clear buttons. Both are active-low.
    pub fn poll<B: Board>(board: &mut B) -> Buttons {
        let mut buttons = Buttons::empty();
        for (channel, wiring) in CHANNELS.iter().enumerate() {
            let pressed = !board.read_digital(wiring.button);
            buttons.set(Buttons::record(channel), pressed);
        }
        buttons.set(Buttons::Clear, !board.read_digital(Pin::Clear));
        buttons
    }

    pub fn is_recording(&self, channel: usize) -> bool {
        let button = Buttons::record(channel);
        !button.is_empty() && self.contains(button)
    }

    pub fn clear_held(&self) -> bool {
        self.contains(Buttons::Clear)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::sim::SimBoard;
    use crate::board::{Direction, Knob};

    /// Board with every input released, remembering which pins were read.
    struct ReadLog {
        reads: Vec<Pin>,
    }

    impl Board for ReadLog {
        fn read_analog(&mut self, _knob: Knob) -> u16 {
            0
        }

        fn read_digital(&mut self, pin: Pin) -> bool {
            self.reads.push(pin);
            true
        }

        fn write_digital(&mut self, _pin: Pin, _level: bool) {}

        fn set_direction(&mut self, _pin: Pin, _direction: Direction) {}

        fn spin(&mut self, _units: u32) {}
    }

    #[test]
    fn test_poll_reads_wired_button_pins() {
        let mut board = ReadLog { reads: Vec::new() };
        let buttons = Buttons::poll(&mut board);
        assert!(buttons.is_empty());

        let mut expected: Vec<Pin> = CHANNELS.iter().map(|wiring| wiring.button).collect();
        expected.push(Pin::Clear);
        assert_eq!(board.reads, expected);
    }

    #[test]
    fn test_poll_reads_held_buttons() {
        let mut board = SimBoard::new();
        board.apply(Buttons::Record1 | Buttons::Record3 | Buttons::Clear | Buttons::Pulse);

        let buttons = Buttons::poll(&mut board);
        assert!(!buttons.is_recording(0));
        assert!(buttons.is_recording(1));
        assert!(!buttons.is_recording(2));
        assert!(buttons.is_recording(3));
        assert!(buttons.clear_held());
        assert!(!buttons.contains(Buttons::Pulse));
    }

    #[test]
    fn test_unknown_channel_never_records() {
        let all = Buttons::all();
        assert!(!all.is_recording(4));
        assert!(!all.is_recording(17));
    }
}
