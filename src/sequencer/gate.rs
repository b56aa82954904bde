use crate::board::Board;
use crate::knob::KnobReading;
use crate::sequencer::channel::Channel;
use crate::wiring::CHANNEL_COUNT;

/// Gate width in loop iterations for a duty knob reading and tick length.
/// Never zero, so an active step always produces a pulse.
pub fn threshold(duty: KnobReading, delay: u32) -> u32 {
    let width = duty.value() as u32 * delay / 4096;
    if width == 0 {
        1
    } else {
        width
    }
}

pub fn gate_level(active: bool, cycles_since_tick: u32, threshold: u32) -> bool {
    active && cycles_since_tick < threshold
}

/// Drive every channel's gate output for this iteration.
pub fn drive<B: Board>(
    board: &mut B,
    channels: &[Channel; CHANNEL_COUNT],
    step: usize,
    cycles_since_tick: u32,
    delay: u32,
) -> [bool; CHANNEL_COUNT] {
    let mut levels = [false; CHANNEL_COUNT];
    for (level, channel) in levels.iter_mut().zip(channels.iter()) {
        let width = threshold(KnobReading::read(board, channel.duty), delay);
        *level = gate_level(channel.is_active(step), cycles_since_tick, width);
        board.write_digital(channel.gate, *level);
    }
    levels
}
