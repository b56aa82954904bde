use crate::board::{Board, Direction, Pin};
use crate::knob::KnobReading;
use crate::wiring::TEMPO_KNOB;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClockSource {
    Internal,
    External,
}

impl ClockSource {
    fn read<B: Board>(board: &mut B) -> ClockSource {
        if board.read_digital(Pin::ClockSelect) {
            ClockSource::External
        } else {
            ClockSource::Internal
        }
    }

    fn direction(&self) -> Direction {
        match self {
            ClockSource::Internal => Direction::Output,
            ClockSource::External => Direction::Input,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClockResult {
    None,
    Tick,
}

/// Decides where tick boundaries fall and drives the clock line when the
/// board is the clock master.
pub struct ClockArbiter {
    source: ClockSource,
    prev_pulse: bool,
    delay: u32,
    cycles_since_tick: u32,
    tempo_refresh: u32,
}

impl ClockArbiter {
    pub fn new<B: Board>(board: &mut B, tempo_refresh: u32) -> ClockArbiter {
        let source = ClockSource::read(board);
        board.set_direction(Pin::Clock, source.direction());
        let prev_pulse = source == ClockSource::External && board.read_digital(Pin::Clock);

        ClockArbiter {
            source,
            prev_pulse,
            delay: KnobReading::read(board, TEMPO_KNOB).delay(),
            cycles_since_tick: 0,
            tempo_refresh: tempo_refresh.max(1),
        }
    }

    /// Decide whether this iteration is a tick boundary. The counters are not
    /// touched here; `advance` applies the result once the gates are computed.
    pub fn poll<B: Board>(&mut self, board: &mut B, iteration: u64) -> ClockResult {
        let source = ClockSource::read(board);
        if source != self.source {
            self.switch_source(board, source);
        }

        let result = match self.source {
            ClockSource::External => {
                self.delay = KnobReading::read(board, TEMPO_KNOB).delay();
                let pulse = board.read_digital(Pin::Clock);
                let rising = pulse && !self.prev_pulse;
                self.prev_pulse = pulse;
                if rising {
                    ClockResult::Tick
                } else {
                    ClockResult::None
                }
            }

            ClockSource::Internal => {
                if iteration % self.tempo_refresh as u64 == 0 {
                    self.delay = KnobReading::read(board, TEMPO_KNOB).delay();
                }
                if self.cycles_since_tick >= self.delay {
                    ClockResult::Tick
                } else {
                    ClockResult::None
                }
            }
        };

        if self.source == ClockSource::Internal {
            board.write_digital(Pin::Clock, self.cycles_since_tick < self.delay / 2);
        }

        result
    }

    pub fn advance(&mut self, result: ClockResult) {
        match result {
            ClockResult::Tick => self.cycles_since_tick = 0,
            ClockResult::None => {
                self.cycles_since_tick = self.cycles_since_tick.saturating_add(1)
            }
        }
    }

    fn switch_source<B: Board>(&mut self, board: &mut B, source: ClockSource) {
        board.set_direction(Pin::Clock, source.direction());
        if source == ClockSource::External {
            // a line that is already high is not an edge
            self.prev_pulse = board.read_digital(Pin::Clock);
        }
        self.source = source;
        println!("[CLOCK] clock source switched to {:?}", source);
    }

    pub fn source(&self) -> ClockSource {
        self.source
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn cycles_since_tick(&self) -> u32 {
        self.cycles_since_tick
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::sim::SimBoard;
    use crate::buttons::Buttons;

    fn internal_board(tempo: u16) -> SimBoard {
        let mut board = SimBoard::new();
        board.set_knob(TEMPO_KNOB, tempo);
        board
    }

    fn run_until_tick(clock: &mut ClockArbiter, board: &mut SimBoard, iteration: &mut u64) -> u32 {
        let mut iterations = 0;
        loop {
            let result = clock.poll(board, *iteration);
            clock.advance(result);
            *iteration += 1;
            iterations += 1;
            if result == ClockResult::Tick {
                return iterations;
            }
        }
    }

    #[test]
    fn test_internal_tick_period() {
        // 4224 - 4000 = 224
        let mut board = internal_board(4000);
        let mut clock = ClockArbiter::new(&mut board, 512);
        assert_eq!(clock.delay(), 224);

        let mut iteration = 0;
        // the first tick fires once cycles reaches the delay
        assert_eq!(run_until_tick(&mut clock, &mut board, &mut iteration), 225);
        assert_eq!(clock.cycles_since_tick(), 0);
        assert_eq!(run_until_tick(&mut clock, &mut board, &mut iteration), 225);
    }

    #[test]
    fn test_clock_out_square_wave() {
        let mut board = internal_board(4000);
        let mut clock = ClockArbiter::new(&mut board, 1);
        assert_eq!(board.clock_direction(), Direction::Output);

        let mut high = 0;
        let mut low = 0;
        for iteration in 0..225 {
            let result = clock.poll(&mut board, iteration);
            if board.clock_out() {
                high += 1;
            } else {
                low += 1;
            }
            clock.advance(result);
        }
        assert_eq!(high, 112);
        assert_eq!(low, 113);
    }

    #[test]
    fn test_tempo_refresh_is_throttled() {
        let mut board = internal_board(4000);
        let mut clock = ClockArbiter::new(&mut board, 512);

        board.set_knob(TEMPO_KNOB, 1000);
        for iteration in 1..512 {
            let result = clock.poll(&mut board, iteration);
            clock.advance(result);
            assert_eq!(clock.delay(), 224);
        }
        clock.poll(&mut board, 512);
        assert_eq!(clock.delay(), 3224);
    }

    #[test]
    fn test_external_ticks_on_rising_edges_only() {
        let mut board = SimBoard::new();
        board.apply(Buttons::ClockSelect);
        let mut clock = ClockArbiter::new(&mut board, 512);
        assert_eq!(clock.source(), ClockSource::External);
        assert_eq!(board.clock_direction(), Direction::Input);

        let levels = [false, true, true, true, false, false, true, false, true];
        let mut ticks = Vec::new();
        for (iteration, &level) in levels.iter().enumerate() {
            board.set_button(Buttons::Pulse, level);
            let result = clock.poll(&mut board, iteration as u64);
            clock.advance(result);
            ticks.push(result == ClockResult::Tick);
        }
        assert_eq!(
            ticks,
            vec![false, true, false, false, false, false, true, false, true]
        );
        assert_eq!(board.ignored_clock_writes(), 0);
    }

    #[test]
    fn test_external_mode_ignores_delay_for_ticks() {
        let mut board = SimBoard::new();
        board.set_knob(TEMPO_KNOB, 4095);
        board.apply(Buttons::ClockSelect);
        let mut clock = ClockArbiter::new(&mut board, 512);

        for iteration in 0..5000 {
            let result = clock.poll(&mut board, iteration);
            assert_eq!(result, ClockResult::None);
            clock.advance(result);
        }
        assert_eq!(clock.cycles_since_tick(), 5000);
        assert_eq!(clock.delay(), 129);
    }

    #[test]
    fn test_switch_to_external_releases_clock_line() {
        let mut board = internal_board(4000);
        let mut clock = ClockArbiter::new(&mut board, 512);
        let result = clock.poll(&mut board, 0);
        clock.advance(result);
        assert!(board.clock_out());

        // the jack is already high when the switch flips
        board.apply(Buttons::ClockSelect | Buttons::Pulse);
        let result = clock.poll(&mut board, 1);
        assert_eq!(clock.source(), ClockSource::External);
        assert_eq!(board.clock_direction(), Direction::Input);
        assert_eq!(result, ClockResult::None);
        assert!(!board.clock_out());
        assert_eq!(board.ignored_clock_writes(), 0);
    }

    #[test]
    fn test_switch_back_to_internal_drives_line() {
        let mut board = SimBoard::new();
        board.apply(Buttons::ClockSelect);
        let mut clock = ClockArbiter::new(&mut board, 512);
        clock.poll(&mut board, 0);

        board.apply(Buttons::empty());
        clock.poll(&mut board, 1);
        assert_eq!(clock.source(), ClockSource::Internal);
        assert_eq!(board.clock_direction(), Direction::Output);
        assert!(board.clock_out());
    }
}
