//! Polymorphic pixel sink over the hardware backends.
//!
//! A strip accepts at most `pixel_count` pixels per frame through
//! [`Strip::draw_pixel`] and commits the frame with [`Strip::finish_draw`].
//! Depending on hardware the LEDs may update during either call. Extra
//! pixels in a frame are silently discarded, and the draw cursor is always
//! back at zero after a commit.

mod lpd8806;
mod neopixel;
mod pwm;

pub use lpd8806::Lpd8806Strip;
pub use neopixel::{NeoEncoding, NeoPixelStrip};
pub use pwm::PwmLedStrip;

use crate::color::{BLACK, Color};

/// Capability set of an addressable strip.
pub trait Strip {
    /// Write one pixel at the cursor and advance it. Writes past
    /// `pixel_count` are discarded.
    fn draw_pixel(&mut self, color: Color);

    /// Commit the frame and reset the cursor.
    fn finish_draw(&mut self);

    /// Fill the whole strip with one color and commit.
    fn draw_solid(&mut self, color: Color) {
        for _ in 0..self.pixel_count() {
            self.draw_pixel(color);
        }
        self.finish_draw();
    }

    /// Number of pixels on the strip. Always greater than zero.
    fn pixel_count(&self) -> usize;

    /// The most recently committed frame, for backends that keep one.
    fn pixel_buffer(&self) -> Option<&[Color]>;
}

/// Pixel storage plus draw cursor, composed into buffered backends.
#[derive(Debug, Clone)]
pub(crate) struct FrameBuffer<const N: usize> {
    pixels: [Color; N],
    cursor: usize,
}

impl<const N: usize> FrameBuffer<N> {
    pub(crate) const fn new() -> Self {
        Self {
            pixels: [BLACK; N],
            cursor: 0,
        }
    }

    /// Store a pixel at the cursor. Returns false when the frame is full
    /// and the pixel was dropped.
    pub(crate) const fn push(&mut self, color: Color) -> bool {
        if self.cursor >= N {
            return false;
        }
        self.pixels[self.cursor] = color;
        self.cursor += 1;
        true
    }

    pub(crate) const fn reset(&mut self) {
        self.cursor = 0;
    }

    pub(crate) const fn pixels(&self) -> &[Color] {
        &self.pixels
    }
}

/// Plain in-RAM strip with no hardware attached.
///
/// Useful as a test double and for offscreen composition.
#[derive(Debug, Clone)]
pub struct BufferedStrip<const N: usize> {
    frame: FrameBuffer<N>,
}

impl<const N: usize> BufferedStrip<N> {
    pub const fn new() -> Self {
        Self {
            frame: FrameBuffer::new(),
        }
    }
}

impl<const N: usize> Default for BufferedStrip<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Strip for BufferedStrip<N> {
    fn draw_pixel(&mut self, color: Color) {
        self.frame.push(color);
    }

    fn finish_draw(&mut self) {
        self.frame.reset();
    }

    fn pixel_count(&self) -> usize {
        N
    }

    fn pixel_buffer(&self) -> Option<&[Color]> {
        Some(self.frame.pixels())
    }
}
