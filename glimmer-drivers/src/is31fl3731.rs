//! IS31FL3731 LED Matrix Driver
//!
//! Driver for the charlieplexed matrix controller behind the Glimmer
//! panel, via I2C. The chip stores eight full frames of 144 PWM duty
//! cycles; the rendering engine double-buffers across the first two.
//!
//! Every register lives in a page selected through the command register;
//! the driver tracks the selected page so function-register writes can
//! restore it afterwards.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use glimmer_core::{FrameId, MatrixDriver, LED_COUNT};

/// IS31FL3731 I2C address with the AD pin tied to ground
const DEFAULT_ADDR: u8 = 0x74;

/// Bytes in the LED enable and blink blocks of a frame page
const ENABLE_LEN: usize = 18;

/// IS31FL3731 registers
#[allow(dead_code)]
mod reg {
    /// Page select ("command") register, reachable from any page
    pub const PAGE_SELECT: u8 = 0xFD;
    /// Page number of the function registers
    pub const FUNCTION_PAGE: u8 = 0x0B;

    // Function page registers
    pub const MODE: u8 = 0x00;
    pub const DISPLAYED_FRAME: u8 = 0x01;
    pub const AUTOPLAY_DELAY: u8 = 0x03;
    pub const DISPLAY_OPTION: u8 = 0x05;
    pub const AUDIO_SYNC: u8 = 0x06;
    pub const BREATH_CONTROL1: u8 = 0x08;
    pub const BREATH_CONTROL2: u8 = 0x09;
    pub const SHUTDOWN: u8 = 0x0A;

    // Frame page layout (pages 0..=7)
    pub const ENABLE_BASE: u8 = 0x00;
    pub const BLINK_BASE: u8 = 0x12;
    pub const PWM_BASE: u8 = 0x24;

    /// MODE value for static picture display
    pub const MODE_PICTURE: u8 = 0x00;
}

/// Errors from the IS31FL3731 driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<BusE> {
    /// I2C transaction failed
    Bus(BusE),
    /// LED index beyond the chip's 144 channels
    InvalidLed,
}

/// IS31FL3731 driver
pub struct Is31fl3731<I2C> {
    i2c: I2C,
    address: u8,
    /// Currently selected page
    page: u8,
}

impl<I2C> Is31fl3731<I2C>
where
    I2C: I2c,
{
    /// Create a new driver at the default address.
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DEFAULT_ADDR,
            page: 0,
        }
    }

    /// Use a non-default address (AD pin strapped high or to SCL/SDA).
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Release the I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Initialize the chip: picture mode, frame A displayed, both
    /// engine frames enabled and dark.
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<I2C::Error>> {
        self.write_function(reg::SHUTDOWN, 0)?;
        delay.delay_ms(10);
        self.write_function(reg::SHUTDOWN, 1)?;

        self.write_function(reg::MODE, reg::MODE_PICTURE)?;
        self.write_function(reg::DISPLAYED_FRAME, FrameId::A.index() as u8)?;
        self.write_function(reg::AUDIO_SYNC, 0)?;

        for frame in [FrameId::A, FrameId::B] {
            self.select_page(frame.index() as u8)?;
            self.enable_all_leds()?;
            self.clear_frame()?;
        }
        self.select_page(FrameId::A.index() as u8)
    }

    /// Select the page subsequent register writes land in.
    fn select_page(&mut self, page: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write(self.address, &[reg::PAGE_SELECT, page])
            .map_err(Error::Bus)?;
        self.page = page;
        Ok(())
    }

    /// Write a function-page register, restoring the selected page.
    fn write_function(&mut self, register: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        let page = self.page;
        self.select_page(reg::FUNCTION_PAGE)?;
        self.i2c
            .write(self.address, &[register, value])
            .map_err(Error::Bus)?;
        self.select_page(page)
    }

    /// Enable all 144 LEDs of the selected frame, blink off.
    fn enable_all_leds(&mut self) -> Result<(), Error<I2C::Error>> {
        let mut enable = [0xff; ENABLE_LEN + 1];
        enable[0] = reg::ENABLE_BASE;
        self.i2c
            .write(self.address, &enable)
            .map_err(Error::Bus)?;

        let mut blink = [0x00; ENABLE_LEN + 1];
        blink[0] = reg::BLINK_BASE;
        self.i2c.write(self.address, &blink).map_err(Error::Bus)
    }
}

impl<I2C> MatrixDriver for Is31fl3731<I2C>
where
    I2C: I2c,
{
    type Error = Error<I2C::Error>;

    fn select_frame(&mut self, frame: FrameId, show: bool) -> Result<(), Self::Error> {
        self.select_page(frame.index() as u8)?;
        if show {
            self.write_function(reg::DISPLAYED_FRAME, frame.index() as u8)?;
        }
        Ok(())
    }

    fn clear_frame(&mut self) -> Result<(), Self::Error> {
        // Register addresses auto-increment; one burst zeroes the PWM block
        let mut data = [0u8; LED_COUNT + 1];
        data[0] = reg::PWM_BASE;
        self.i2c.write(self.address, &data).map_err(Error::Bus)
    }

    fn set_led(&mut self, index: u8, brightness: u8) -> Result<(), Self::Error> {
        if index as usize >= LED_COUNT {
            return Err(Error::InvalidLed);
        }
        self.i2c
            .write(self.address, &[reg::PWM_BASE + index, brightness])
            .map_err(Error::Bus)
    }
}
