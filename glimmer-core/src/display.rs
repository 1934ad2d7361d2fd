//! Display facade: double-buffered drawing, scrolling and showing content
//!
//! [`Display`] owns the driver and the two shadow frame buffers. Every
//! visible update goes through [`Display::draw`]: populate the hidden
//! frame completely, then flip visibility in a single frame-select call.
//! Nothing ever draws into the visible frame, so no partial state can
//! reach the panel.

use core::fmt::Write;

use heapless::String;

use crate::brightness::Brightness;
use crate::frame::{FrameBuffer, FrameId};
use crate::image::{Image, Pixel};
use crate::mapper::pixel_addr;
use crate::scroll::{self, Marquee};
use crate::traits::MatrixDriver;
use crate::{HEIGHT, WIDTH};

/// Errors from a single show/scroll/clear invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<E> {
    /// Scroll text contains a character outside printable ASCII
    UnrenderableCharacter(char),
    /// A sparse pixel lies outside the 17x7 panel
    InvalidCoordinates,
    /// The driver chip reported a communication error
    Driver(E),
}

/// The kinds of content [`Display::show`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content<'a> {
    /// A number, scrolled as its decimal text
    Number(i32),
    /// Text, scrolled subject to the width policy
    Text(&'a str),
    /// A dense bitmap, drawn in a single frame
    Bitmap(&'a Image),
    /// Sparse pixels with per-pixel intensity, drawn in a single frame
    Pixels(&'a [Pixel]),
}

impl<'a> From<&'a str> for Content<'a> {
    fn from(text: &'a str) -> Self {
        Content::Text(text)
    }
}

impl From<i32> for Content<'_> {
    fn from(value: i32) -> Self {
        Content::Number(value)
    }
}

impl<'a> From<&'a Image> for Content<'a> {
    fn from(image: &'a Image) -> Self {
        Content::Bitmap(image)
    }
}

impl<'a> From<&'a [Pixel]> for Content<'a> {
    fn from(pixels: &'a [Pixel]) -> Self {
        Content::Pixels(pixels)
    }
}

/// Double-buffered controller for the 17x7 panel.
pub struct Display<D> {
    driver: D,
    frames: [FrameBuffer; 2],
    visible: FrameId,
}

impl<D: MatrixDriver> Display<D> {
    /// Wraps a driver. Frame A starts out visible and blank.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            frames: [FrameBuffer::EMPTY; 2],
            visible: FrameId::A,
        }
    }

    /// Access to the underlying driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Mutable access to the underlying driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// The frame currently shown on the panel
    pub fn visible(&self) -> FrameId {
        self.visible
    }

    /// Shadow copy of the frame currently shown
    pub fn visible_frame(&self) -> &FrameBuffer {
        &self.frames[self.visible.index()]
    }

    /// Shadow copy of either frame
    pub fn frame(&self, id: FrameId) -> &FrameBuffer {
        &self.frames[id.index()]
    }

    /// Shows content on the panel.
    ///
    /// Numbers and text scroll; bitmaps draw in one frame; sparse pixel
    /// lists draw with their own 0..=9 intensities, in which case
    /// `brightness` is not used.
    pub fn show(
        &mut self,
        content: Content<'_>,
        brightness: Brightness,
    ) -> Result<(), DisplayError<D::Error>> {
        match content {
            Content::Number(value) => self.scroll_number(value, brightness),
            Content::Text(text) => self.scroll(text, brightness),
            Content::Bitmap(image) => self.draw(image.columns(), brightness),
            Content::Pixels(pixels) => self.draw_pixels(pixels),
        }
    }

    /// Scrolls text across the panel, blocking until the animation ends.
    ///
    /// Up to three characters are padded to three and drawn statically;
    /// longer text runs the marquee, one draw per column step. Pacing
    /// between steps is the caller's job. Text is validated up front:
    /// a character without a glyph fails the whole call before anything
    /// is drawn.
    pub fn scroll(
        &mut self,
        text: &str,
        brightness: Brightness,
    ) -> Result<(), DisplayError<D::Error>> {
        let padded = scroll::normalize(text).map_err(DisplayError::UnrenderableCharacter)?;
        if padded.is_static() {
            return self.draw(&scroll::compose(&padded), brightness);
        }
        for frame in Marquee::new(padded) {
            self.draw(&frame, brightness)?;
        }
        Ok(())
    }

    /// Scrolls a number as its decimal representation.
    pub fn scroll_number(
        &mut self,
        value: i32,
        brightness: Brightness,
    ) -> Result<(), DisplayError<D::Error>> {
        let mut text: String<12> = String::new();
        let _ = write!(text, "{}", value);
        self.scroll(&text, brightness)
    }

    /// Draws a full-width bit pattern into the hidden frame and flips.
    pub fn draw(
        &mut self,
        columns: &[u8; WIDTH],
        brightness: Brightness,
    ) -> Result<(), DisplayError<D::Error>> {
        let target = self.visible.other();
        self.driver
            .select_frame(target, false)
            .map_err(DisplayError::Driver)?;
        self.driver.clear_frame().map_err(DisplayError::Driver)?;
        self.frames[target.index()].load(columns);
        for (x, &mask) in columns.iter().enumerate() {
            for y in 0..HEIGHT {
                if mask & (1 << y) != 0 {
                    self.driver
                        .set_led(pixel_addr(x as u8, y as u8), brightness.value())
                        .map_err(DisplayError::Driver)?;
                }
            }
        }
        self.driver
            .select_frame(target, true)
            .map_err(DisplayError::Driver)?;
        self.visible = target;
        Ok(())
    }

    /// Fills the visible frame with zero brightness without flipping.
    pub fn clear(&mut self) -> Result<(), DisplayError<D::Error>> {
        self.driver
            .select_frame(self.visible, false)
            .map_err(DisplayError::Driver)?;
        self.driver.clear_frame().map_err(DisplayError::Driver)?;
        self.frames[self.visible.index()].clear();
        Ok(())
    }

    fn draw_pixels(&mut self, pixels: &[Pixel]) -> Result<(), DisplayError<D::Error>> {
        if pixels
            .iter()
            .any(|p| p.x as usize >= WIDTH || p.y as usize >= HEIGHT)
        {
            return Err(DisplayError::InvalidCoordinates);
        }
        let target = self.visible.other();
        self.driver
            .select_frame(target, false)
            .map_err(DisplayError::Driver)?;
        self.driver.clear_frame().map_err(DisplayError::Driver)?;
        self.frames[target.index()].clear();
        for pixel in pixels {
            let duty = Brightness::from_intensity(pixel.intensity);
            self.driver
                .set_led(pixel_addr(pixel.x, pixel.y), duty.value())
                .map_err(DisplayError::Driver)?;
            if duty > Brightness::OFF {
                self.frames[target.index()].set(pixel.x, pixel.y);
            }
        }
        self.driver
            .select_frame(target, true)
            .map_err(DisplayError::Driver)?;
        self.visible = target;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font;
    use crate::LED_COUNT;

    struct Recorder {
        page: Option<FrameId>,
        shown: Option<FrameId>,
        flips: usize,
        clears: usize,
        led_writes: usize,
        last_brightness: Option<u8>,
        pwm: [[u8; LED_COUNT]; 2],
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                page: None,
                shown: None,
                flips: 0,
                clears: 0,
                led_writes: 0,
                last_brightness: None,
                pwm: [[0; LED_COUNT]; 2],
            }
        }
    }

    impl MatrixDriver for Recorder {
        type Error = core::convert::Infallible;

        fn select_frame(&mut self, frame: FrameId, show: bool) -> Result<(), Self::Error> {
            self.page = Some(frame);
            if show {
                self.shown = Some(frame);
                self.flips += 1;
            }
            Ok(())
        }

        fn clear_frame(&mut self) -> Result<(), Self::Error> {
            self.clears += 1;
            if let Some(page) = self.page {
                self.pwm[page.index()] = [0; LED_COUNT];
            }
            Ok(())
        }

        fn set_led(&mut self, index: u8, brightness: u8) -> Result<(), Self::Error> {
            self.led_writes += 1;
            self.last_brightness = Some(brightness);
            if let Some(page) = self.page {
                self.pwm[page.index()][index as usize] = brightness;
            }
            Ok(())
        }
    }

    #[test]
    fn static_scroll_draws_exactly_once() {
        let mut display = Display::new(Recorder::new());
        display.scroll("5", Brightness::DEFAULT).unwrap();
        assert_eq!(display.driver().flips, 1);
        assert_eq!(
            display.visible_frame().columns()[..5],
            font::glyph('5').unwrap()[..]
        );
        assert!(display.visible_frame().columns()[5..].iter().all(|&c| c == 0));
    }

    #[test]
    fn number_scrolls_like_its_padded_text() {
        let mut by_number = Display::new(Recorder::new());
        by_number
            .show(Content::Number(5), Brightness::DEFAULT)
            .unwrap();

        let mut by_text = Display::new(Recorder::new());
        by_text.scroll("5  ", Brightness::DEFAULT).unwrap();

        assert_eq!(by_number.driver().flips, 1);
        assert_eq!(
            by_number.visible_frame().columns(),
            by_text.visible_frame().columns()
        );
    }

    #[test]
    fn animated_scroll_draws_six_times_per_character() {
        let mut display = Display::new(Recorder::new());
        display.scroll("abcd", Brightness::DEFAULT).unwrap();
        // "abcd" pads to seven characters
        assert_eq!(display.driver().flips, 42);
    }

    #[test]
    fn draws_alternate_between_frames() {
        let mut display = Display::new(Recorder::new());
        display.draw(Image::HEART.columns(), Brightness::DEFAULT).unwrap();
        assert_eq!(display.visible(), FrameId::B);
        assert_eq!(display.driver().shown, Some(FrameId::B));
        display.draw(Image::NO.columns(), Brightness::DEFAULT).unwrap();
        assert_eq!(display.visible(), FrameId::A);
        assert_eq!(display.driver().shown, Some(FrameId::A));
    }

    #[test]
    fn previous_frame_survives_the_next_draw() {
        let mut display = Display::new(Recorder::new());
        display.draw(Image::HEART.columns(), Brightness::DEFAULT).unwrap();
        let heart = *display.visible_frame().columns();
        display.draw(Image::NO.columns(), Brightness::DEFAULT).unwrap();
        // The heart now sits in the hidden frame, untouched
        assert_eq!(display.frame(FrameId::B).columns(), &heart);
    }

    #[test]
    fn saturated_brightness_reaches_the_driver() {
        let mut display = Display::new(Recorder::new());
        display.scroll("abc", Brightness::saturating(300)).unwrap();
        assert_eq!(display.driver().last_brightness, Some(255));

        let mut dark = Display::new(Recorder::new());
        dark.draw(Image::HEART.columns(), Brightness::saturating(-5))
            .unwrap();
        assert_eq!(dark.driver().last_brightness, Some(0));
    }

    #[test]
    fn clear_does_not_flip_frames() {
        let mut display = Display::new(Recorder::new());
        display.draw(Image::HEART.columns(), Brightness::DEFAULT).unwrap();
        let flips = display.driver().flips;
        display.clear().unwrap();
        assert_eq!(display.driver().flips, flips);
        assert_eq!(display.visible(), FrameId::B);
        assert!(display.visible_frame().is_blank());
        assert_eq!(display.driver().page, Some(FrameId::B));
    }

    #[test]
    fn unrenderable_text_fails_before_any_draw() {
        let mut display = Display::new(Recorder::new());
        let err = display.scroll("ab\ncd", Brightness::DEFAULT).unwrap_err();
        assert_eq!(err, DisplayError::UnrenderableCharacter('\n'));
        assert_eq!(display.driver().flips, 0);
        assert_eq!(display.driver().clears, 0);
    }

    #[test]
    fn pixel_list_draws_with_scaled_intensity() {
        let pixels = [
            Pixel { x: 0, y: 0, intensity: 9 },
            Pixel { x: 16, y: 6, intensity: 3 },
        ];
        let mut display = Display::new(Recorder::new());
        display
            .show(Content::Pixels(&pixels), Brightness::DEFAULT)
            .unwrap();
        let driver = display.driver();
        assert_eq!(driver.led_writes, 2);
        assert_eq!(driver.pwm[FrameId::B.index()][pixel_addr(0, 0) as usize], 255);
        // Intensity 3 scales to 3 * 255 / 9 = 85
        assert_eq!(driver.pwm[FrameId::B.index()][pixel_addr(16, 6) as usize], 85);
        assert!(display.visible_frame().get(0, 0));
        assert!(display.visible_frame().get(16, 6));
    }

    #[test]
    fn out_of_range_pixel_fails_before_any_draw() {
        let pixels = [Pixel { x: 17, y: 0, intensity: 5 }];
        let mut display = Display::new(Recorder::new());
        let err = display
            .show(Content::Pixels(&pixels), Brightness::DEFAULT)
            .unwrap_err();
        assert_eq!(err, DisplayError::InvalidCoordinates);
        assert_eq!(display.driver().flips, 0);
        assert_eq!(display.driver().clears, 0);
    }

    #[test]
    fn decoded_custom_image_is_drawable() {
        let mut encoded = String::<128>::new();
        for y in 0..HEIGHT {
            for _ in 0..WIDTH {
                let _ = write!(encoded, "{}", y + 1);
            }
            if y < HEIGHT - 1 {
                let _ = encoded.push(':');
            }
        }
        let pixels = Image::decode(&encoded).unwrap();
        let mut display = Display::new(Recorder::new());
        display
            .show(Content::Pixels(&pixels), Brightness::DEFAULT)
            .unwrap();
        assert_eq!(display.driver().led_writes, WIDTH * HEIGHT);
        assert!(display.visible_frame().get(8, 3));
    }
}
