//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in glimmer-core:
//!
//! - IS31FL3731 charlieplex matrix driver (I2C)

#![no_std]
#![deny(unsafe_code)]

pub mod is31fl3731;

pub use is31fl3731::{Error, Is31fl3731};
