use std::time::{Duration, Instant};

use sdl3::event::Event;
use sdl3::keyboard::Keycode;
use sdl3::pixels::Color;
use sdl3::render::FRect;

use crate::board::sim::{SimBoard, ADC_MAX};
use crate::board::Knob;
use crate::buttons::Buttons;
use crate::config::Config;
use crate::render::{self, palette, PanelState, PANEL_HEIGHT, PANEL_WIDTH};
use crate::sequencer::Sequencer;
use crate::wiring::{CHANNELS, STEPS_KNOB, TEMPO_KNOB};

const SCALE: u32 = 2;
const ITERATIONS_PER_FRAME: u64 = 800;
const KNOB_STEP: i32 = 64;

enum Control {
    Hold(Buttons),
    ToggleSelect,
    Turn(Knob, i32),
}

fn get_control(keycode: Keycode) -> Option<Control> {
    match keycode {
        Keycode::_1 => Some(Control::Hold(Buttons::Record0)),
        Keycode::_2 => Some(Control::Hold(Buttons::Record1)),
        Keycode::_3 => Some(Control::Hold(Buttons::Record2)),
        Keycode::_4 => Some(Control::Hold(Buttons::Record3)),
        Keycode::Space => Some(Control::Hold(Buttons::Clear)),
        Keycode::Return => Some(Control::Hold(Buttons::Pulse)),
        Keycode::Tab => Some(Control::ToggleSelect),
        Keycode::Up => Some(Control::Turn(TEMPO_KNOB, KNOB_STEP)),
        Keycode::Down => Some(Control::Turn(TEMPO_KNOB, -KNOB_STEP)),
        Keycode::Right => Some(Control::Turn(STEPS_KNOB, 128)),
        Keycode::Left => Some(Control::Turn(STEPS_KNOB, -128)),
        Keycode::Q => Some(Control::Turn(CHANNELS[0].duty, KNOB_STEP)),
        Keycode::W => Some(Control::Turn(CHANNELS[1].duty, KNOB_STEP)),
        Keycode::E => Some(Control::Turn(CHANNELS[2].duty, KNOB_STEP)),
        Keycode::R => Some(Control::Turn(CHANNELS[3].duty, KNOB_STEP)),
        Keycode::A => Some(Control::Turn(CHANNELS[0].duty, -KNOB_STEP)),
        Keycode::S => Some(Control::Turn(CHANNELS[1].duty, -KNOB_STEP)),
        Keycode::D => Some(Control::Turn(CHANNELS[2].duty, -KNOB_STEP)),
        Keycode::F => Some(Control::Turn(CHANNELS[3].duty, -KNOB_STEP)),
        _ => None,
    }
}

fn turn(board: &mut SimBoard, knob: Knob, by: i32) {
    let value = (board.knob(knob) as i32 + by).clamp(0, ADC_MAX as i32) as u16;
    board.set_knob(knob, value);
    println!("[PANEL] knob {} at {}", knob.0, value);
}

fn colour(rgb: palette::Rgb) -> Color {
    Color::RGB(rgb.0, rgb.1, rgb.2)
}

pub fn run(config: &Config) -> Result<(), String> {
    let sdl_context = sdl3::init().map_err(|e| e.to_string())?;
    let video_subsystem = sdl_context.video().map_err(|e| e.to_string())?;

    let window = video_subsystem
        .window("pattern-seq", PANEL_WIDTH * SCALE, PANEL_HEIGHT * SCALE)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas();
    let mut event_pump = sdl_context.event_pump().map_err(|e| e.to_string())?;

    let mut board = SimBoard::with_noise(config.noise, config.seed);
    board.set_knob(TEMPO_KNOB, 3600);
    board.set_knob(STEPS_KNOB, 15 << 7);
    for wiring in CHANNELS.iter() {
        board.set_knob(wiring.duty, 2048);
    }
    let mut seq = Sequencer::power_on(&mut board, config);

    let target_frame_duration = Duration::from_secs_f64(1.0 / 60.0);

    'running: loop {
        let frame_start = Instant::now();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,

                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat,
                    ..
                } => match get_control(keycode) {
                    Some(Control::Hold(button)) => board.set_button(button, true),
                    Some(Control::ToggleSelect) if !repeat => {
                        let external = board.held().contains(Buttons::ClockSelect);
                        board.set_button(Buttons::ClockSelect, !external);
                    }
                    Some(Control::Turn(knob, by)) => turn(&mut board, knob, by),
                    _ => {}
                },

                Event::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => {
                    if let Some(Control::Hold(button)) = get_control(keycode) {
                        board.set_button(button, false);
                    }
                }

                _ => {}
            }
        }

        seq.run(&mut board, ITERATIONS_PER_FRAME);

        canvas.set_draw_color(colour(palette::BACKGROUND));
        canvas.clear();
        for lamp in render::layout(&PanelState::capture(&board)) {
            canvas.set_draw_color(colour(lamp.colour));
            let rect = FRect::new(
                (lamp.x * SCALE as i32) as f32,
                (lamp.y * SCALE as i32) as f32,
                (lamp.size * SCALE) as f32,
                (lamp.size * SCALE) as f32,
            );
            canvas.fill_rect(rect).map_err(|e| e.to_string())?;
        }
        canvas.present();

        let elapsed = frame_start.elapsed();
        if elapsed < target_frame_duration {
            std::thread::sleep(target_frame_duration - elapsed);
        }
    }

    Ok(())
}
