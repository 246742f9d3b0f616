//! SPI-clocked LPD8806 strip backend.
//!
//! Example hardware: <http://www.adafruit.com/product/306>
//!
//! The controller takes one byte per component in G,R,B order. Only the top
//! seven bits of each component are significant; the high bit of every data
//! byte is the protocol's framing marker. A run of zero bytes latches the
//! shifted data into the outputs.
//!
//! The bus must be configured by the host HAL as MSB-first, SPI mode 0.
//! Clock rates up to 20 MHz work on short runs; long strips prefer 2 MHz.

use embedded_hal::spi::SpiBus;

use super::{FrameBuffer, Strip};
use crate::color::{BLACK, Color};

/// LPD8806 strip over a dedicated SPI bus.
///
/// `N` is the pixel count. The strip assumes exclusive use of the bus for
/// the duration of a frame.
pub struct Lpd8806Strip<SPI, const N: usize> {
    spi: SPI,
    frame: FrameBuffer<N>,
}

impl<SPI: SpiBus, const N: usize> Lpd8806Strip<SPI, N> {
    /// Take ownership of a configured bus, latch any stale data out of the
    /// shift registers, and clear the strip to black.
    pub fn new(spi: SPI) -> Self {
        let mut strip = Self {
            spi,
            frame: FrameBuffer::new(),
        };
        strip.finish_draw();
        strip.draw_solid(BLACK);
        strip
    }

    /// Release the bus.
    pub fn release(self) -> SPI {
        self.spi
    }

    fn transfer(&mut self, bytes: &[u8]) {
        // The Strip surface is infallible; a failed transfer shows up as a
        // stale frame, which the next update overwrites.
        self.spi.write(bytes).ok();
    }
}

impl<SPI: SpiBus, const N: usize> Strip for Lpd8806Strip<SPI, N> {
    fn draw_pixel(&mut self, color: Color) {
        if !self.frame.push(color) {
            return;
        }

        // GRB order, top 7 bits, high bit always set.
        self.transfer(&[
            color.green >> 1 | 0x80,
            color.red >> 1 | 0x80,
            color.blue >> 1 | 0x80,
        ]);
    }

    fn finish_draw(&mut self) {
        self.frame.reset();

        // One zero byte latches 32 pixels worth of controllers.
        let latch_size = N.div_ceil(32) * 8;
        for _ in 0..latch_size {
            self.transfer(&[0]);
        }
    }

    fn pixel_count(&self) -> usize {
        N
    }

    fn pixel_buffer(&self) -> Option<&[Color]> {
        Some(self.frame.pixels())
    }
}
