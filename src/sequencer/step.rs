use crate::board::Board;
use crate::buttons::Buttons;
use crate::clock::ClockResult;
use crate::knob::KnobReading;
use crate::sequencer::channel::Channel;
use crate::wiring::{CHANNELS, CHANNEL_COUNT, STEPS_KNOB};

pub struct StepEngine {
    count: usize,
    num_steps: u8,
    channels: [Channel; CHANNEL_COUNT],
}

impl StepEngine {
    pub fn new(num_steps: u8) -> StepEngine {
        StepEngine {
            count: 0,
            num_steps: num_steps.max(1),
            channels: [
                Channel::new(&CHANNELS[0]),
                Channel::new(&CHANNELS[1]),
                Channel::new(&CHANNELS[2]),
                Channel::new(&CHANNELS[3]),
            ],
        }
    }

    /// Record or clear the current step from the held buttons.
    pub fn record<B: Board>(&mut self, board: &mut B) {
        let buttons = Buttons::poll(board);
        let clear = buttons.clear_held();
        for (i, channel) in self.channels.iter_mut().enumerate() {
            channel.record(buttons.is_recording(i), clear, self.count);
        }
    }

    /// Re-sample the step-count knob. The new count only bounds `count` at
    /// the next tick.
    pub fn sample_steps<B: Board>(&mut self, board: &mut B) -> u8 {
        self.num_steps = KnobReading::read(board, STEPS_KNOB).num_steps();
        self.num_steps
    }

    /// Advance on a tick. Returns true when the step index moved.
    pub fn apply(&mut self, result: ClockResult) -> bool {
        match result {
            ClockResult::Tick => {
                self.count += 1;
                if self.count >= self.num_steps as usize {
                    self.count = 0;
                }
                true
            }
            ClockResult::None => false,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn num_steps(&self) -> u8 {
        self.num_steps
    }

    pub fn channels(&self) -> &[Channel; CHANNEL_COUNT] {
        &self.channels
    }

    #[cfg(test)]
    pub fn channels_mut(&mut self) -> &mut [Channel; CHANNEL_COUNT] {
        &mut self.channels
    }

    #[cfg(test)]
    pub fn set_num_steps(&mut self, num_steps: u8) {
        self.num_steps = num_steps;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_count_wraps_for_every_step_count() {
        for num_steps in 1..=32u8 {
            let mut engine = StepEngine::new(num_steps);
            let mut visited = Vec::new();
            for _ in 0..(num_steps as usize * 3) {
                visited.push(engine.count());
                assert!(engine.apply(ClockResult::Tick));
                assert!(engine.count() < num_steps as usize);
            }
            let expected: Vec<usize> = (0..num_steps as usize * 3)
                .map(|i| i % num_steps as usize)
                .collect();
            assert_eq!(visited, expected);
        }
    }

    #[test]
    fn test_no_tick_keeps_count() {
        let mut engine = StepEngine::new(8);
        engine.apply(ClockResult::Tick);
        assert!(!engine.apply(ClockResult::None));
        assert_eq!(engine.count(), 1);
    }

    #[test]
    fn test_shrinking_step_count_returns_to_zero_on_next_tick() {
        let mut engine = StepEngine::new(16);
        for _ in 0..12 {
            engine.apply(ClockResult::Tick);
        }
        assert_eq!(engine.count(), 12);

        engine.set_num_steps(4);
        // not clamped mid-step
        assert_eq!(engine.count(), 12);
        engine.apply(ClockResult::Tick);
        assert_eq!(engine.count(), 0);
        engine.apply(ClockResult::Tick);
        assert_eq!(engine.count(), 1);
    }
}
