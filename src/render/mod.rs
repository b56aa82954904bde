pub mod palette;

use crate::board::sim::SimBoard;
use crate::board::Direction;
use crate::buttons::Buttons;
use crate::display::LedLines;
use crate::wiring::{CHANNEL_COUNT, LED_COUNT};

use palette::{lamp_colour, Rgb};

pub const PANEL_WIDTH: u32 = 480;
pub const PANEL_HEIGHT: u32 = 260;

const LAMP_SIZE: u32 = 36;
const SPACING: i32 = 80;
const LEFT: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lamp {
    pub x: i32,
    pub y: i32,
    pub size: u32,
    pub colour: Rgb,
}

impl Lamp {
    fn new(column: i32, y: i32, lit: bool, colour: Rgb) -> Lamp {
        Lamp {
            x: LEFT + column * SPACING,
            y,
            size: LAMP_SIZE,
            colour: lamp_colour(lit, colour),
        }
    }
}

/// What the front panel shows at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelState {
    pub leds: LedLines,
    pub gates: [bool; CHANNEL_COUNT],
    pub clock: bool,
    pub external: bool,
    pub held: Buttons,
}

impl PanelState {
    pub fn capture(board: &SimBoard) -> PanelState {
        let mut gates = [false; CHANNEL_COUNT];
        for (channel, gate) in gates.iter_mut().enumerate() {
            *gate = board.gate(channel);
        }
        let external = board.clock_direction() == Direction::Input;

        PanelState {
            leds: board.led_lines(),
            gates,
            clock: if external {
                board.held().contains(Buttons::Pulse)
            } else {
                board.clock_out()
            },
            external,
            held: board.held(),
        }
    }
}

/// Lay out the panel: LED lines on top in line order, gate lamps under them
/// with their record button indicators, clock lamps at the bottom.
pub fn layout(state: &PanelState) -> Vec<Lamp> {
    let mut lamps = Vec::new();

    for line in 0..LED_COUNT {
        lamps.push(Lamp::new(line as i32, 30, state.leds.line(line), palette::STEP_LED));
    }

    for (channel, &gate) in state.gates.iter().enumerate() {
        lamps.push(Lamp::new(channel as i32, 110, gate, palette::GATE_LED));
        let held = state.held.contains(Buttons::record(channel));
        let mut button = Lamp::new(channel as i32, 156, held, palette::BUTTON);
        button.size = LAMP_SIZE / 3;
        button.x += (LAMP_SIZE - button.size) as i32 / 2;
        lamps.push(button);
    }

    lamps.push(Lamp::new(0, 200, state.clock, palette::CLOCK_LED));
    lamps.push(Lamp::new(1, 200, state.external, palette::EXTERNAL_LED));
    lamps.push(Lamp::new(
        2,
        200,
        state.held.contains(Buttons::Clear),
        palette::BUTTON,
    ));

    lamps
}
