//! Text normalization and the marquee step engine
//!
//! Three characters fit the 17-column panel exactly (three 5-wide glyphs
//! plus their spacer columns), so anything up to three characters is
//! padded to three and drawn in one shot. Longer text is animated: each
//! step shifts the working buffer one column left and feeds the next
//! glyph column in from the right, the glyph's implicit sixth blank
//! column doubling as the inter-character gap.

use crate::font::{self, Glyph, GLYPH_STRIDE};
use crate::WIDTH;

static BLANK: Glyph = [0; font::GLYPH_WIDTH];

/// Scroll text with the width policy applied.
///
/// One or two characters are right-padded to three with spaces; exactly
/// three are taken as-is; everything else is right-padded to at least
/// four, which selects the animated path.
pub(crate) struct Padded<'a> {
    text: &'a [u8],
    len: usize,
}

impl<'a> Padded<'a> {
    fn new(text: &'a str) -> Self {
        let len = match text.len() {
            1 | 2 | 3 => 3,
            0 => 4,
            n => n + 3,
        };
        Self {
            text: text.as_bytes(),
            len,
        }
    }

    /// Padded length in characters.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Whether the text fits the panel without animation.
    pub(crate) fn is_static(&self) -> bool {
        self.len == 3
    }

    fn glyph(&self, index: usize) -> &'static Glyph {
        let c = self.text.get(index).copied().unwrap_or(b' ');
        font::glyph(c as char).unwrap_or(&BLANK)
    }
}

/// Validates and pads scroll text.
///
/// Returns the first character without a glyph, if any; nothing may be
/// drawn for text that fails here.
pub(crate) fn normalize(text: &str) -> Result<Padded<'_>, char> {
    match text.chars().find(|&c| font::glyph(c).is_none()) {
        Some(c) => Err(c),
        None => Ok(Padded::new(text)),
    }
}

/// Packs three glyphs and their spacers into one frame's column masks.
pub(crate) fn compose(text: &Padded<'_>) -> [u8; WIDTH] {
    let mut columns = [0u8; WIDTH];
    for (i, column) in columns.iter_mut().enumerate() {
        *column = font::column(text.glyph(i / GLYPH_STRIDE), i % GLYPH_STRIDE);
    }
    columns
}

/// Iterator over the frames of a marquee animation.
///
/// Yields one 17-column buffer per scroll step; the caller draws each
/// one and owns the pacing.
pub(crate) struct Marquee<'a> {
    text: Padded<'a>,
    buf: [u8; WIDTH],
    step: usize,
}

impl<'a> Marquee<'a> {
    pub(crate) fn new(text: Padded<'a>) -> Self {
        Self {
            text,
            buf: [0; WIDTH],
            step: 0,
        }
    }

    /// Total animation steps: six columns per padded character.
    pub(crate) fn steps(&self) -> usize {
        self.text.len() * GLYPH_STRIDE
    }
}

impl Iterator for Marquee<'_> {
    type Item = [u8; WIDTH];

    fn next(&mut self) -> Option<[u8; WIDTH]> {
        if self.step >= self.steps() {
            return None;
        }
        self.buf.copy_within(1.., 0);
        self.buf[WIDTH - 1] = font::column(
            self.text.glyph(self.step / GLYPH_STRIDE),
            self.step % GLYPH_STRIDE,
        );
        self.step += 1;
        Some(self.buf)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.steps() - self.step;
        (remaining, Some(remaining))
    }
}
