//! Single-LED backend over three PWM channels.
//!
//! Drives one RGB LED (or one analog strip segment) as a strip of length
//! one. Common-anode wiring sinks current through the pins, so the duty
//! cycle is inverted for those parts.

use embedded_hal::pwm::SetDutyCycle;

use super::Strip;
use crate::color::{BLACK, Color, invert_color};

/// One-pixel strip over three PWM channels.
///
/// Unbuffered: the LED state lives in the PWM hardware, not in RAM.
pub struct PwmLedStrip<R, G, B> {
    red: R,
    green: G,
    blue: B,
    common_anode: bool,
    cursor: usize,
}

impl<R, G, B> PwmLedStrip<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    /// Take ownership of the three channels and switch the LED off.
    pub fn new(red: R, green: G, blue: B, common_anode: bool) -> Self {
        let mut strip = Self {
            red,
            green,
            blue,
            common_anode,
            cursor: 0,
        };
        strip.draw_solid(BLACK);
        strip
    }
}

impl<R, G, B> Strip for PwmLedStrip<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    fn draw_pixel(&mut self, color: Color) {
        if self.cursor >= self.pixel_count() {
            return;
        }
        self.cursor += 1;

        let color = if self.common_anode {
            invert_color(color)
        } else {
            color
        };

        // 8-bit duty, scaled to whatever resolution the channel runs at.
        self.red
            .set_duty_cycle_fraction(u16::from(color.red), 255)
            .ok();
        self.green
            .set_duty_cycle_fraction(u16::from(color.green), 255)
            .ok();
        self.blue
            .set_duty_cycle_fraction(u16::from(color.blue), 255)
            .ok();
    }

    fn finish_draw(&mut self) {
        self.cursor = 0;
    }

    fn pixel_count(&self) -> usize {
        1
    }

    fn pixel_buffer(&self) -> Option<&[Color]> {
        None
    }
}
