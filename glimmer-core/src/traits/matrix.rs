//! Driver-chip interface consumed by the rendering engine

use crate::frame::FrameId;

/// Trait for the LED matrix driver chip
///
/// The engine performs no bus I/O itself; everything it needs from the
/// chip is a write page, a frame clear, and individual PWM writes. LED
/// indices are the physical addresses produced by
/// [`pixel_addr`](crate::mapper::pixel_addr), 0..144.
pub trait MatrixDriver {
    /// Error type for chip communication
    type Error;

    /// Select the frame subsequent writes go to.
    ///
    /// With `show` set, the chip's displayed-frame pointer is also moved
    /// to `frame`, making it visible in the same call.
    fn select_frame(&mut self, frame: FrameId, show: bool) -> Result<(), Self::Error>;

    /// Turn every LED of the selected frame off.
    fn clear_frame(&mut self) -> Result<(), Self::Error>;

    /// Set one LED of the selected frame to the given duty cycle.
    fn set_led(&mut self, index: u8, brightness: u8) -> Result<(), Self::Error>;
}
