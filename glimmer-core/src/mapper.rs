//! Logical-to-physical pixel coordinate mapping
//!
//! The panel is wired as a single 17x7 grid, but the IS31FL3731 addresses
//! its LEDs as a 16x9 matrix split into two 8-row banks. Columns 0..=8
//! sit in the first bank with their rows running bottom-up; columns 9..=16
//! are mirrored into the second bank with their rows shifted up by 8.

/// Translates a logical (x, y) coordinate to the chip's LED index.
///
/// `x` is the column (0..=16, left to right), `y` the row (0..=6, top to
/// bottom). Column 8 is the seam between the two banks and belongs to the
/// left half; the comparison must stay `x > 8`, not `>=`.
pub const fn pixel_addr(x: u8, y: u8) -> u8 {
    let (x, y) = if x > 8 {
        (17 - x, y + 8)
    } else {
        (x, 7 - y)
    };
    x * 16 + y
}
