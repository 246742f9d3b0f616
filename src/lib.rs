#![no_std]

//! Animation pattern engine for addressable RGB LED strips.
//!
//! The crate splits into a strip abstraction (a bounded per-frame pixel
//! sink with SPI, PWM and bit-banged one-wire backends) and a pattern
//! engine (a per-strip state machine that advances a named animation on
//! wall-clock time and swaps descriptors only at clean breaks). A small
//! text protocol serializes descriptors for remote control.
//!
//! The host runtime stays behind capabilities: `embedded-hal` traits for
//! the wires, [`RandomSource`] for entropy, [`EventPublisher`] for the
//! event channel, and an explicit `now: Instant` for the clock.

pub mod color;
pub mod event;
pub mod pattern;
pub mod rng;
pub mod strip;
pub mod text;

pub use color::{Color, dim_color, expand_special, invert_color, mix_color, morph_color};
pub use event::{EventOptions, EventPublisher, NoopPublisher};
pub use pattern::{Pattern, PatternDescriptor, PatternKind};
pub use rng::{RandomSource, XorShift32};
pub use strip::{BufferedStrip, Lpd8806Strip, NeoEncoding, NeoPixelStrip, PwmLedStrip, Strip};
pub use text::TextError;

pub use embassy_time::{Duration, Instant};
