use crate::board::sim::SimBoard;
use crate::buttons::Buttons;
use crate::config::Config;
use crate::display::LedLines;
use crate::sequencer::{Sequencer, StepReport};
use crate::wiring::{CHANNELS, CHANNEL_COUNT, LED_COUNT, STEPS_KNOB, TEMPO_KNOB};

// delay 4224 - 3600 = 624 iterations per step, 16 steps
const DEMO_TEMPO: u16 = 3600;
const DEMO_STEPS: u16 = 15 << 7;
const DEMO_STEP_LENGTH: u64 = 625;
const PRESS_LENGTH: u64 = 40;

/// A change to the held controls at a given iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub at: u64,
    pub held: Buttons,
}

fn press(cues: &mut Vec<Cue>, step: u64, held: Buttons) {
    let at = step * DEMO_STEP_LENGTH + 10;
    cues.push(Cue { at, held });
    cues.push(Cue {
        at: at + PRESS_LENGTH,
        held: Buttons::empty(),
    });
}

/// A short performance: a four-on-the-floor on channel 1, offbeats on
/// channel 2, a held fill on channel 0 in the second bar, then one offbeat
/// erased in the third bar.
pub fn demo_cues() -> Vec<Cue> {
    let mut cues = Vec::new();
    for beat in 0..4 {
        press(&mut cues, beat * 4, Buttons::Record1);
        press(&mut cues, beat * 4 + 2, Buttons::Record2);
    }

    let fill_start = 16 + 12;
    cues.push(Cue {
        at: fill_start * DEMO_STEP_LENGTH + 10,
        held: Buttons::Record0,
    });
    cues.push(Cue {
        at: (fill_start + 3) * DEMO_STEP_LENGTH - 10,
        held: Buttons::empty(),
    });

    press(&mut cues, 32 + 6, Buttons::Clear | Buttons::Record2);
    cues.sort_by_key(|cue| cue.at);
    cues
}

/// Counts rising edges on each gate output.
#[derive(Debug, Default)]
struct PulseCounter {
    levels: [bool; CHANNEL_COUNT],
    counts: [usize; CHANNEL_COUNT],
}

impl PulseCounter {
    fn update(&mut self, report: &StepReport) {
        for (channel, &level) in report.gates.iter().enumerate() {
            if level && !self.levels[channel] {
                self.counts[channel] += 1;
            }
            self.levels[channel] = level;
        }
    }
}

fn led_pattern(lines: LedLines) -> String {
    (0..LED_COUNT)
        .map(|line| if lines.line(line) { 'o' } else { '.' })
        .collect()
}

pub fn format_line(seq: &Sequencer, board: &SimBoard, report: &StepReport) -> String {
    let hits: Vec<&str> = (0..CHANNEL_COUNT)
        .map(|channel| {
            if seq.channel(channel).is_active(report.step) {
                "x"
            } else {
                "."
            }
        })
        .collect();

    format!(
        "[SEQ] {:02}/{:02} | {} ({:2}) | {}",
        report.step,
        report.num_steps,
        led_pattern(board.led_lines()),
        report.shown,
        hits.join(" ")
    )
}

pub fn run(config: &Config) {
    let mut board = SimBoard::with_noise(config.noise, config.seed);
    board.set_knob(TEMPO_KNOB, DEMO_TEMPO);
    board.set_knob(STEPS_KNOB, DEMO_STEPS);
    for (i, wiring) in CHANNELS.iter().enumerate() {
        board.set_knob(wiring.duty, 1024 + 768 * i as u16);
    }

    let mut seq = Sequencer::power_on(&mut board, config);
    let cues = demo_cues();
    let mut next_cue = cues.iter().peekable();
    let mut ticks = 0;
    let mut pulses = PulseCounter::default();

    for iteration in 0..config.iterations {
        while let Some(cue) = next_cue.next_if(|cue| cue.at <= iteration) {
            board.apply(cue.held);
        }

        let report = seq.step(&mut board);
        pulses.update(&report);
        if report.tick {
            ticks += 1;
            println!("{}", format_line(&seq, &board, &report));
        }
    }

    println!(
        "[SEQ] ran {} iterations, {} steps played, stopped on {:02}/{:02} with {:?} clock",
        seq.iteration(),
        ticks,
        seq.count(),
        seq.num_steps(),
        seq.clock().source()
    );
    println!("[SEQ] gate pulses per channel: {:?}", pulses.counts);
    if board.ignored_clock_writes() > 0 {
        println!(
            "[BOARD] {} writes to the clock line while it was an input",
            board.ignored_clock_writes()
        );
    }
    if let Some(queue) = seq.trace_queue() {
        if queue.dropped() > 0 {
            println!("[UART] {} trace bytes dropped", queue.dropped());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_demo_cues_are_ordered_and_released() {
        let cues = demo_cues();
        assert!(cues.windows(2).all(|pair| pair[0].at <= pair[1].at));
        assert_eq!(cues.last().map(|cue| cue.held), Some(Buttons::empty()));
    }

    #[test]
    fn test_demo_performance_records_pattern() {
        let config = Config {
            banner: false,
            ..Config::default()
        };
        let mut board = SimBoard::new();
        board.set_knob(TEMPO_KNOB, DEMO_TEMPO);
        board.set_knob(STEPS_KNOB, DEMO_STEPS);
        let mut seq = Sequencer::power_on(&mut board, &config);

        let cues = demo_cues();
        let mut next_cue = cues.iter().peekable();
        for iteration in 0..(48 * DEMO_STEP_LENGTH) {
            while let Some(cue) = next_cue.next_if(|cue| cue.at <= iteration) {
                board.apply(cue.held);
            }
            seq.step(&mut board);
        }

        let beats: Vec<usize> = (0..16).filter(|&s| seq.channel(1).is_active(s)).collect();
        assert_eq!(beats, vec![0, 4, 8, 12]);
        let offbeats: Vec<usize> = (0..16).filter(|&s| seq.channel(2).is_active(s)).collect();
        assert_eq!(offbeats, vec![2, 10, 14]);
        let fill: Vec<usize> = (0..16).filter(|&s| seq.channel(0).is_active(s)).collect();
        assert_eq!(fill, vec![12, 13, 14]);
    }

    #[test]
    fn test_pulse_counter_counts_rising_edges() {
        let mut pulses = PulseCounter::default();
        let mut report = StepReport {
            tick: false,
            step: 0,
            num_steps: 16,
            shown: 0,
            gates: [false; CHANNEL_COUNT],
        };
        let frames = [
            [true, false, false, false],
            [true, true, false, false],
            [false, true, false, false],
            [true, false, false, false],
        ];
        for levels in frames {
            report.gates = levels;
            pulses.update(&report);
        }
        assert_eq!(pulses.counts, [2, 1, 0, 0]);
    }

    #[test]
    fn test_format_line() {
        let config = Config {
            banner: false,
            ..Config::default()
        };
        let mut board = SimBoard::new();
        board.set_knob(STEPS_KNOB, DEMO_STEPS);
        let mut seq = Sequencer::power_on(&mut board, &config);
        board.apply(Buttons::Record3);
        let report = seq.step(&mut board);

        assert_eq!(
            format_line(&seq, &board, &report),
            "[SEQ] 00/16 | ..... ( 0) | . . . x"
        );
    }
}
