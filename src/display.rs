use bitflags::bitflags;

use crate::board::{Board, Pin};
use crate::wiring::{LED_COUNT, LED_LINE_FOR_BIT};

pub const DISPLAY_HOLD: u32 = 2000;

const VALUE_MASK: u8 = 0b0001_1111;

bitflags! {
    /// Physical LED lines, after the board's bit permutation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LedLines: u8 {
        const Line0 = 0b0000_0001;
        const Line1 = 0b0000_0010;
        const Line2 = 0b0000_0100;
        const Line3 = 0b0000_1000;
        const Line4 = 0b0001_0000;
    }
}

impl LedLines {
    pub fn encode(value: u8) -> LedLines {
        let value = value & VALUE_MASK;
        let mut lines = LedLines::empty();
        for (bit, &line) in LED_LINE_FOR_BIT.iter().enumerate() {
            lines.set_line(line, value >> bit & 1 == 1);
        }
        lines
    }

    #[cfg(test)]
    pub fn decode(&self) -> u8 {
        LED_LINE_FOR_BIT
            .iter()
            .enumerate()
            .filter(|(_, &line)| self.line(line))
            .fold(0, |value, (bit, _)| value | 1 << bit)
    }

    pub fn line(&self, line: u8) -> bool {
        line < LED_COUNT && self.bits() >> line & 1 == 1
    }

    pub fn set_line(&mut self, line: u8, lit: bool) {
        if line < LED_COUNT {
            self.set(LedLines::from_bits_truncate(1 << line), lit);
        }
    }

    pub fn write<B: Board>(&self, board: &mut B) {
        for line in 0..LED_COUNT {
            board.write_digital(Pin::Led(line), self.line(line));
        }
    }
}

/// Shows the step count for a while after it changes, the current step
/// otherwise.
pub struct Display {
    shown_steps: u8,
    countdown: u32,
    hold: u32,
    value: u8,
}

impl Display {
    pub fn new(num_steps: u8, hold: u32) -> Display {
        Display {
            shown_steps: num_steps,
            countdown: 0,
            hold,
            value: 0,
        }
    }

    /// Pick the value for this iteration. Returns true when the step count
    /// has just changed.
    pub fn update(&mut self, num_steps: u8, count: usize) -> bool {
        let changed = num_steps != self.shown_steps;
        if changed {
            self.shown_steps = num_steps;
            self.countdown = self.hold;
        }

        if self.countdown > 0 {
            self.countdown -= 1;
            self.value = num_steps;
        } else {
            self.value = count as u8;
        }
        changed
    }

    pub fn render<B: Board>(&self, board: &mut B) {
        LedLines::encode(self.value).write(board);
    }

    pub fn value(&self) -> u8 {
        self.value
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::sim::SimBoard;

    #[test]
    fn test_encode_reverses_bits() {
        assert_eq!(LedLines::encode(0b00001), LedLines::Line4);
        assert_eq!(LedLines::encode(0b00010), LedLines::Line3);
        assert_eq!(LedLines::encode(0b00100), LedLines::Line2);
        assert_eq!(LedLines::encode(0b01000), LedLines::Line1);
        assert_eq!(LedLines::encode(0b10000), LedLines::Line0);
        assert_eq!(LedLines::encode(0b00110), LedLines::Line3 | LedLines::Line2);
    }

    #[test]
    fn test_encode_is_a_bijection() {
        let mut seen = [false; 32];
        for value in 0..32u8 {
            let lines = LedLines::encode(value);
            assert!(!seen[lines.bits() as usize]);
            seen[lines.bits() as usize] = true;
            assert_eq!(lines.decode(), value);
        }
    }

    #[test]
    fn test_thirty_two_drops_the_sixth_bit() {
        assert_eq!(LedLines::encode(32), LedLines::empty());
    }

    #[test]
    fn test_holds_step_count_after_change() {
        let mut display = Display::new(8, DISPLAY_HOLD);
        assert!(!display.update(8, 3));
        assert_eq!(display.value(), 3);

        assert!(display.update(12, 3));
        let mut shown = 0;
        while display.value() == 12 {
            shown += 1;
            // the step moves on underneath the hold
            assert!(!display.update(12, 5));
        }
        assert_eq!(shown, DISPLAY_HOLD);
        assert_eq!(display.value(), 5);
    }

    #[test]
    fn test_render_writes_led_lines() {
        let mut board = SimBoard::new();
        let mut display = Display::new(4, DISPLAY_HOLD);
        display.update(4, 5);
        display.render(&mut board);
        assert_eq!(board.led_lines(), LedLines::Line4 | LedLines::Line2);
        assert_eq!(board.led_lines().decode(), 5);
    }
}
