use crate::display::DISPLAY_HOLD;
use crate::uart::BAUD_300_BIT_DELAY;

pub const DEFAULT_TEMPO_REFRESH: u32 = 512;
pub const DEFAULT_ITERATIONS: u64 = 200_000;
pub const DEFAULT_TRACE_BIT_PERIOD: u32 = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Internal clock: re-read the tempo knob every this many iterations.
    pub tempo_refresh: u32,
    pub display_hold: u32,
    pub bit_delay: u32,
    pub trace_bit_period: u32,
    pub iterations: u64,
    pub noise: u16,
    pub seed: u64,
    pub banner: bool,
    pub trace: bool,
    pub serial_trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tempo_refresh: DEFAULT_TEMPO_REFRESH,
            display_hold: DISPLAY_HOLD,
            bit_delay: BAUD_300_BIT_DELAY,
            trace_bit_period: DEFAULT_TRACE_BIT_PERIOD,
            iterations: DEFAULT_ITERATIONS,
            noise: 0,
            seed: 0,
            banner: true,
            trace: false,
            serial_trace: false,
        }
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
    let value = value.ok_or(format!("[CONFIG] {} needs a value", flag))?;
    value
        .parse()
        .map_err(|_| format!("[CONFIG] {} expects a number, got '{}'", flag, value))
}

fn non_zero(flag: &str, value: u32) -> Result<u32, String> {
    if value == 0 {
        return Err(format!("[CONFIG] {} must be at least 1", flag));
    }
    Ok(value)
}

impl Config {
    pub fn from_args<I: Iterator<Item = String>>(mut args: I) -> Result<Config, String> {
        let mut config = Config::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--tempo-refresh" => {
                    config.tempo_refresh = non_zero(&arg, parse_number(&arg, args.next())?)?
                }
                "--display-hold" => {
                    config.display_hold = non_zero(&arg, parse_number(&arg, args.next())?)?
                }
                "--bit-period" => {
                    config.trace_bit_period = non_zero(&arg, parse_number(&arg, args.next())?)?
                }
                "--iterations" => config.iterations = parse_number(&arg, args.next())?,
                "--noise" => config.noise = parse_number(&arg, args.next())?,
                "--seed" => config.seed = parse_number(&arg, args.next())?,
                "--trace" => config.trace = true,
                "--serial-trace" => config.serial_trace = true,
                "--no-banner" => config.banner = false,
                _ => return Err(format!("[CONFIG] unknown flag '{}'", arg)),
            }
        }

        Ok(config)
    }
}
