pub mod sim;

/// Logical digital pins of the sequencer board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pin {
    Record(u8),
    Clear,
    ClockSelect,
    // pulse-in when the clock is external, clock-out when internal
    Clock,
    Gate(u8),
    Led(u8),
    SerialTx,
}

/// Analog input index on the ADC multiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Knob(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// The hardware the control loop runs against. Reads take `&mut self` because
/// sampling an ADC or a port is not free of side effects on real hardware.
pub trait Board {
    fn read_analog(&mut self, knob: Knob) -> u16;
    fn read_digital(&mut self, pin: Pin) -> bool;
    fn write_digital(&mut self, pin: Pin, level: bool);
    fn set_direction(&mut self, pin: Pin, direction: Direction);

    /// Busy-wait for `units` loop iterations. Only the blocking serial
    /// transmitter calls this; it must stay out of the steady-state loop.
    fn spin(&mut self, units: u32);
}
