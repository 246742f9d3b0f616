//! One-wire bit-banged NeoPixel backend.
//!
//! Each pixel's 24 bits go out MSB-first as variable-width high/low pulse
//! pairs; the component order and pulse widths depend on the controller
//! family. Frame emission is timing-critical, so the whole frame runs
//! inside a critical section with interrupts masked.
//!
//! The nanosecond delays are the one unportable surface. The [`DelayNs`]
//! implementation supplied by the host must be a calibrated busy-wait that
//! holds every width within ±15% of the encoding's specification; a
//! HAL-provided cycle-counting delay normally qualifies.

use embassy_time::Instant;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use smart_leds::RGB8;

use super::{FrameBuffer, Strip};
use crate::color::{BLACK, Color};

/// Wire encodings supported by the one-wire driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NeoEncoding {
    Ws2812,
    Ws2812b,
    Ws2811,
    Tm1803,
    Tm1829,
}

#[derive(Debug, Clone, Copy)]
enum ColorOrder {
    Grb,
    Rgb,
    Rbg,
}

/// Pulse shape of one encoding. `leading`/`trailing` are nanoseconds; the
/// leading level is high unless `inverted`.
#[derive(Debug, Clone, Copy)]
struct Waveform {
    one: (u32, u32),
    zero: (u32, u32),
    inverted: bool,
    reset_us: u32,
    order: ColorOrder,
}

impl NeoEncoding {
    const fn waveform(self) -> Waveform {
        match self {
            // WS2812 and WS2812B share an 800 kHz bitstream.
            Self::Ws2812 | Self::Ws2812b => Waveform {
                one: (700, 600),
                zero: (350, 800),
                inverted: false,
                reset_us: 50,
                order: ColorOrder::Grb,
            },
            // 400 kHz bitstream.
            Self::Ws2811 => Waveform {
                one: (1200, 1300),
                zero: (500, 2000),
                inverted: false,
                reset_us: 50,
                order: ColorOrder::Rgb,
            },
            Self::Tm1803 => Waveform {
                one: (1360, 680),
                zero: (680, 1360),
                inverted: false,
                reset_us: 24,
                order: ColorOrder::Rgb,
            },
            // TM1829 idles high and leads every bit with the low phase.
            Self::Tm1829 => Waveform {
                one: (800, 300),
                zero: (300, 800),
                inverted: true,
                reset_us: 500,
                order: ColorOrder::Rbg,
            },
        }
    }
}

/// Bit-banged one-wire strip on a single GPIO pin.
///
/// Buffered: the LAVA pattern reads the previous frame back out of RAM.
pub struct NeoPixelStrip<P, D, const N: usize> {
    pin: P,
    delay: D,
    waveform: Waveform,
    frame: FrameBuffer<N>,
    latch_started: Option<Instant>,
}

impl<P: OutputPin, D: DelayNs, const N: usize> NeoPixelStrip<P, D, N> {
    /// Take ownership of the data pin and its calibrated delay, then clear
    /// the strip to black.
    pub fn new(pin: P, delay: D, encoding: NeoEncoding) -> Self {
        let mut strip = Self {
            pin,
            delay,
            waveform: encoding.waveform(),
            frame: FrameBuffer::new(),
            latch_started: None,
        };
        strip.draw_solid(BLACK);
        strip
    }

    /// Honor any outstanding reset-idle window from the previous frame.
    fn wait_reset(&mut self) {
        let Some(started) = self.latch_started.take() else {
            return;
        };
        let elapsed_us = started.elapsed().as_micros();
        let reset_us = u64::from(self.waveform.reset_us);
        if elapsed_us < reset_us {
            self.delay.delay_us((reset_us - elapsed_us) as u32);
        }
    }

    /// Serialize the whole frame onto the wire.
    fn show(&mut self) {
        self.wait_reset();

        let Self {
            pin,
            delay,
            waveform,
            frame,
            ..
        } = self;

        // Need 100% focus on instruction timing until the final bit.
        critical_section::with(|_| {
            for color in frame.pixels() {
                let rgb = RGB8::from(*color);
                for byte in wire_bytes(waveform.order, rgb) {
                    for bit in (0..8).rev() {
                        emit_bit(pin, delay, waveform, byte >> bit & 1 == 1);
                    }
                }
            }
        });

        // Leave the line at its idle level and defer the reset wait to the
        // next frame.
        if self.waveform.inverted {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
        self.latch_started = Some(Instant::now());
    }
}

fn wire_bytes(order: ColorOrder, rgb: RGB8) -> [u8; 3] {
    match order {
        ColorOrder::Grb => [rgb.g, rgb.r, rgb.b],
        ColorOrder::Rgb => [rgb.r, rgb.g, rgb.b],
        ColorOrder::Rbg => [rgb.r, rgb.b, rgb.g],
    }
}

fn emit_bit<P: OutputPin, D: DelayNs>(pin: &mut P, delay: &mut D, waveform: &Waveform, bit: bool) {
    let (leading, trailing) = if bit { waveform.one } else { waveform.zero };

    if waveform.inverted {
        pin.set_low().ok();
        delay.delay_ns(leading);
        pin.set_high().ok();
        delay.delay_ns(trailing);
    } else {
        pin.set_high().ok();
        delay.delay_ns(leading);
        pin.set_low().ok();
        delay.delay_ns(trailing);
    }
}

impl<P: OutputPin, D: DelayNs, const N: usize> Strip for NeoPixelStrip<P, D, N> {
    fn draw_pixel(&mut self, color: Color) {
        self.frame.push(color);
    }

    fn finish_draw(&mut self) {
        self.show();
        self.frame.reset();
    }

    fn pixel_count(&self) -> usize {
        N
    }

    fn pixel_buffer(&self) -> Option<&[Color]> {
        Some(self.frame.pixels())
    }
}
