use std::collections::VecDeque;
use std::fmt;

use crate::board::{Board, Pin};

/// Busy-wait length of one bit, hand-tuned for 300 baud on the board.
pub const BAUD_300_BIT_DELAY: u32 = 2222;

pub const TX_QUEUE_CAPACITY: usize = 64;

const FRAME_BITS: usize = 10;

/// 8N1: start bit low, data LSB first, stop bit high.
pub fn frame_bits(byte: u8) -> [bool; FRAME_BITS] {
    let mut bits = [true; FRAME_BITS];
    bits[0] = false;
    for i in 0..8 {
        bits[i + 1] = byte >> i & 1 == 1;
    }
    bits
}

/// Bit-banged transmitter that blocks for the whole frame. Startup only:
/// while it spins the control loop is not running.
pub struct SoftUart<'a, B: Board> {
    board: &'a mut B,
    bit_delay: u32,
}

impl<'a, B: Board> SoftUart<'a, B> {
    pub fn new(board: &'a mut B, bit_delay: u32) -> Self {
        // line idles high
        board.write_digital(Pin::SerialTx, true);
        SoftUart { board, bit_delay }
    }

    pub fn write_byte(&mut self, byte: u8) {
        for bit in frame_bits(byte).iter() {
            self.board.write_digital(Pin::SerialTx, *bit);
            self.board.spin(self.bit_delay);
        }
    }
}

impl<B: Board> fmt::Write for SoftUart<'_, B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}

/// Transmitter for use inside the loop. `tick` is called once per iteration
/// and shifts out at most one bit every `bit_period` iterations.
pub struct TxQueue {
    bytes: VecDeque<u8>,
    frame: Option<([bool; FRAME_BITS], usize)>,
    bit_period: u32,
    wait: u32,
    dropped: usize,
}

impl TxQueue {
    pub fn new(bit_period: u32) -> TxQueue {
        TxQueue {
            bytes: VecDeque::with_capacity(TX_QUEUE_CAPACITY),
            frame: None,
            bit_period: bit_period.max(1),
            wait: 0,
            dropped: 0,
        }
    }

    pub fn push(&mut self, byte: u8) -> bool {
        if self.bytes.len() >= TX_QUEUE_CAPACITY {
            self.dropped += 1;
            return false;
        }
        self.bytes.push_back(byte);
        true
    }

    /// Queue a whole message, or drop all of it when it does not fit.
    pub fn push_str(&mut self, s: &str) -> bool {
        if self.bytes.len() + s.len() > TX_QUEUE_CAPACITY {
            self.dropped += s.len();
            return false;
        }
        self.bytes.extend(s.bytes());
        true
    }

    pub fn tick<B: Board>(&mut self, board: &mut B) {
        if self.wait > 0 {
            self.wait -= 1;
            return;
        }

        if self.frame.is_none() {
            match self.bytes.pop_front() {
                Some(byte) => self.frame = Some((frame_bits(byte), 0)),
                None => return,
            }
        }

        if let Some((bits, index)) = self.frame.as_mut() {
            board.write_digital(Pin::SerialTx, bits[*index]);
            *index += 1;
            if *index == FRAME_BITS {
                self.frame = None;
            }
            self.wait = self.bit_period - 1;
        }
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.frame.is_none() && self.bytes.is_empty()
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.bytes.len()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
