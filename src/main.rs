mod board;
mod buttons;
mod clock;
mod config;
mod console;
mod display;
mod knob;
#[cfg(feature = "panel")]
mod panel;
#[cfg(any(feature = "panel", test))]
mod render;
mod sequencer;
mod uart;
mod wiring;


use config::Config;

fn main() {
    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!(
                "usage: pattern-seq [--iterations N] [--tempo-refresh N] [--display-hold N] \
                 [--noise N] [--seed N] [--bit-period N] [--trace] [--serial-trace] [--no-banner]"
            );
            std::process::exit(2);
        }
    };

    start(&config);
}

#[cfg(feature = "panel")]
fn start(config: &Config) {
    if let Err(e) = panel::run(config) {
        eprintln!("[PANEL] {}", e);
        std::process::exit(2);
    }
}

#[cfg(not(feature = "panel"))]
fn start(config: &Config) {
    console::run(config);
}
