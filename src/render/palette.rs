pub type Rgb = (u8, u8, u8);

pub const BACKGROUND: Rgb = (0x18, 0x18, 0x1c);
pub const STEP_LED: Rgb = (0xff, 0x40, 0x20);
pub const GATE_LED: Rgb = (0x30, 0xe0, 0x50);
pub const CLOCK_LED: Rgb = (0xff, 0xd0, 0x30);
pub const EXTERNAL_LED: Rgb = (0x40, 0x80, 0xff);
pub const BUTTON: Rgb = (0xe0, 0xe0, 0xe0);

/// Colour of a lamp that may be unlit. Unlit lamps keep a faint tint so the
/// panel layout stays visible.
pub fn lamp_colour(lit: bool, colour: Rgb) -> Rgb {
    if lit {
        colour
    } else {
        (colour.0 / 6, colour.1 / 6, colour.2 / 6)
    }
}
