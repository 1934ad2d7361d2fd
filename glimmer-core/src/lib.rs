//! Board-agnostic rendering engine for the Glimmer LED matrix
//!
//! This crate contains everything about the 17x7 panel that does not
//! touch a bus:
//!
//! - Coordinate mapping from the logical grid to the IS31FL3731's
//!   two-bank addressing scheme
//! - Double-buffered frame management
//! - The scrolling-text engine and its 5x7 column-bitmap font
//! - The named image catalog and the custom-image decoder
//! - The `MatrixDriver` trait implemented by hardware drivers
//!
//! The engine talks to the chip exclusively through [`MatrixDriver`];
//! see the `glimmer-drivers` crate for the I2C implementation.

#![no_std]
#![deny(unsafe_code)]

// Host-side unit tests (proptest) need the standard library
#[cfg(test)]
extern crate std;

pub mod brightness;
pub mod display;
pub mod font;
pub mod frame;
pub mod image;
pub mod mapper;
mod scroll;
pub mod traits;

pub use brightness::Brightness;
pub use display::{Content, Display, DisplayError};
pub use frame::{FrameBuffer, FrameId};
pub use image::{Image, ImageError, Pixel, PixelList};
pub use mapper::pixel_addr;
pub use traits::MatrixDriver;

/// Panel width in pixels (logical columns)
pub const WIDTH: usize = 17;

/// Panel height in pixels (logical rows)
pub const HEIGHT: usize = 7;

/// Number of LED channels the driver chip addresses (16 rows x 9 columns)
pub const LED_COUNT: usize = 144;
