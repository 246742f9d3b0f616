//! The per-kind animation steps.
//!
//! Every handler reads `active`, the working state and the randomness
//! capability, writes pixels to the strip, leaves the delay until the next
//! step in `state.delay`, and raises `state.next_ready` at its clean
//! breaks. A handler recognizes its own first step by `state.delay == 0`
//! (the reset value) and expands its colors there.

use libm::logf;

use super::Pattern;
use crate::color::{BLACK, BLUE, Color, GREEN, RED, WHITE, expand_special, mix_color, morph_color};
use crate::event::EventPublisher;
use crate::rng::RandomSource;
use crate::strip::Strip;

/// Positions of the PULSE interpolation ladder.
const PULSE_STEPS: i32 = 0xFF;

/// Steps between LAVA background fades.
const LAVA_FADE_PERIOD: i32 = 3;

/// LAVA and FLICKER tick at a fixed rate.
const STEP_MS: u64 = 10;

const TEST_COLORS: [Color; 4] = [RED, GREEN, BLUE, WHITE];

impl<S: Strip, R: RandomSource, E: EventPublisher> Pattern<S, R, E> {
    pub(super) fn handle_solid(&mut self) {
        if self.state.delay == 0 {
            self.state.delay = u64::from(self.active.speed);
            self.state.next_ready = true;
        }

        let color = expand_special(self.active.a, &mut self.rng);
        self.strip.draw_solid(color);
    }

    /// 256-step fade between the working colors and back.
    ///
    /// Each bounce re-expands the color that is invisible at that end, so
    /// RANDOM descriptors pick a fresh color every cycle without a visible
    /// jump. The bottom bounce is the clean break.
    pub(super) fn handle_pulse(&mut self) {
        self.state.next_ready = false;

        let initial = self.state.delay == 0;
        if initial {
            self.state.delay = u64::from(self.active.speed) / PULSE_STEPS as u64;
        }

        if self.state.position >= PULSE_STEPS {
            self.state.forward = false;
            self.state.a = expand_special(self.active.a, &mut self.rng);
        }
        if self.state.position <= 0 {
            self.state.forward = true;
            self.state.b = expand_special(self.active.b, &mut self.rng);
            self.state.next_ready = !initial;
        }

        let ratio = self.state.position as f32 / PULSE_STEPS as f32;
        let color = mix_color(self.state.a, self.state.b, ratio);
        self.strip.draw_solid(color);

        if self.state.forward {
            self.state.position += 1;
        } else {
            self.state.position -= 1;
        }
    }

    /// A bright eye of A sweeping over a background of B, with dimmed
    /// edges. The reversal points hold three steps.
    pub(super) fn handle_cylon(&mut self) {
        let initial = self.state.delay == 0;
        if initial {
            self.state.a = expand_special(self.active.a, &mut self.rng);
            self.state.b = expand_special(self.active.b, &mut self.rng);
            self.state.c = mix_color(self.state.a, self.state.b, 0.95);
        }

        self.state.next_ready = false;

        let count = self.strip.pixel_count() as i32;
        self.state.delay = u64::from(self.active.speed) / (count as u64 * 2);

        if self.state.position >= count - 1 {
            self.state.forward = false;
            self.state.delay *= 3;
        }
        if self.state.position <= 0 {
            self.state.forward = true;
            self.state.delay *= 3;
            self.state.next_ready = !initial;
        }

        for i in 0..count {
            let color = if i == self.state.position {
                self.state.a
            } else if i == self.state.position - 1 || i == self.state.position + 1 {
                self.state.c
            } else {
                self.state.b
            };
            self.strip.draw_pixel(color);
        }
        self.strip.finish_draw();

        if self.state.forward {
            self.state.position += 1;
        } else {
            self.state.position -= 1;
        }
    }

    pub(super) fn handle_alternate(&mut self) {
        if self.state.delay == 0 {
            self.state.delay = u64::from(self.active.speed);
            self.state.a = expand_special(self.active.a, &mut self.rng);
            self.state.b = expand_special(self.active.b, &mut self.rng);
        }

        for i in 0..self.strip.pixel_count() {
            let color = if (i % 2 == 0) == self.state.forward {
                self.state.a
            } else {
                self.state.b
            };
            self.strip.draw_pixel(color);
        }
        self.strip.finish_draw();

        self.state.forward = !self.state.forward;
        // Parity is back at the start every second step.
        self.state.next_ready = self.state.forward;
    }

    /// Simulates a light with a poor electrical connection, the halloween
    /// staple. A bounded drunkard's walk over `[0, speed]` crossing the
    /// midpoint switches the light between A ("on") and B ("off"); the
    /// wider the range, the rarer the flicker.
    pub(super) fn handle_flicker(&mut self) {
        if self.state.delay == 0 {
            self.state.delay = STEP_MS;
            self.state.a = expand_special(self.active.a, &mut self.rng);
            self.state.b = expand_special(self.active.b, &mut self.rng);
            self.state.position = self.active.speed as i32 / 2;
        }

        self.state.next_ready = false;

        // Steps of 10 to keep standard speeds lively.
        self.state.position += self.rng.random_range(-1, 2) * 10;

        let range = self.active.speed as i32;
        if self.state.position < 0 {
            self.state.position = 0;
            self.state.a = expand_special(self.active.a, &mut self.rng);
        }
        if self.state.position > range {
            self.state.position = range;
            self.state.b = expand_special(self.active.b, &mut self.rng);
            self.state.next_ready = true;
        }

        let connected = self.state.position >= range / 2;
        if connected != self.state.forward {
            self.state.forward = connected;
            let color = if connected { self.state.a } else { self.state.b };
            self.strip.draw_solid(color);
        }
    }

    /// Three blobs of A morphing over a background of B. Blob positions,
    /// sizes, lifetimes and (for special colors) colors are re-rolled at
    /// every expiry; the background fades one morph step every few ticks.
    pub(super) fn handle_lava(&mut self) {
        if self.state.delay == 0 {
            self.state.delay = STEP_MS;
            self.state.b = expand_special(self.active.b, &mut self.rng);
            self.strip.draw_solid(BLACK);
        }
        self.state.next_ready = true;

        let count = self.strip.pixel_count() as i32;
        let lifetime = (self.active.speed as i32).max(1);

        for i in 0..self.state.blobs.len() {
            let mut blob = self.state.blobs[i];
            blob.duration -= 1;

            if blob.pos == -1 {
                // Waiting out a cooldown; respawn at its end.
                if blob.duration <= 0 {
                    blob.pos = self.rng.random_below(count);
                    blob.size = blob_size(&mut self.rng, count);
                    blob.duration = self.rng.random_below(lifetime);
                    blob.color = expand_special(self.active.a, &mut self.rng);
                }
            } else if blob.duration <= 0 {
                blob.pos = -1;
                blob.duration = self.rng.random_below(lifetime);
            }

            self.state.blobs[i] = blob;
        }

        self.state.position += 1;
        let background_fade = self.state.position >= LAVA_FADE_PERIOD;
        if background_fade {
            self.state.position = 0;
        }

        for p in 0..count {
            // The buffer still holds the previous frame at indexes >= p.
            let mut pixel = self
                .strip
                .pixel_buffer()
                .map_or(BLACK, |buffer| buffer[p as usize]);

            if background_fade {
                pixel = morph_color(pixel, self.state.b);
            }

            for blob in &self.state.blobs {
                if blob.pos == -1 {
                    continue;
                }

                let lower = blob.pos - blob.size;
                let upper = blob.pos + blob.size;
                let inside = |x: i32| x > lower && x < upper;

                // Blob ranges wrap around the strip ends.
                if inside(p) || inside(p - count) || inside(p + count) {
                    pixel = morph_color(pixel, blob.color);
                }
            }

            self.strip.draw_pixel(pixel);
        }
        self.strip.finish_draw();
    }

    /// Hardware check. Solid phase: each test color fills the strip for
    /// `speed` ms. Walk phase: each pixel shows each test color alone for
    /// `speed / 2` ms. The phases alternate forever.
    pub(super) fn handle_test(&mut self) {
        self.state.next_ready = true;

        let count = self.strip.pixel_count() as i32;
        let colors = TEST_COLORS.len() as i32;

        let phase_end = if self.state.forward {
            colors
        } else {
            count * colors
        };
        if self.state.position >= phase_end {
            self.state.forward = !self.state.forward;
            self.state.position = 0;
        }

        if self.state.forward {
            self.strip
                .draw_solid(TEST_COLORS[self.state.position as usize]);
            self.state.delay = u64::from(self.active.speed);
        } else {
            let pixel = self.state.position / colors;
            let color = TEST_COLORS[(self.state.position % colors) as usize];

            for i in 0..count {
                self.strip
                    .draw_pixel(if i == pixel { color } else { BLACK });
            }
            self.strip.finish_draw();

            self.state.delay = u64::from(self.active.speed) / 2;
        }

        self.state.position += 1;
    }
}

/// Blob radius draw: `count − ln(uniform[0, e^count))`, which collapses to
/// an Exp(1) variable. Computing it collapsed keeps `expf` out of `f32`
/// overflow territory on long strips. Clamped to `[1, count]`.
fn blob_size<R: RandomSource>(rng: &mut R, count: i32) -> i32 {
    let u = rng.random_range(1, 0x1_0001) as f32 / 65536.0;
    let size = -logf(u);
    (size as i32).clamp(1, count)
}
