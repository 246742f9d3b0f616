//! Per-strip animation state machine.
//!
//! A [`Pattern`] owns a strip and advances one of seven animation kinds on
//! wall-clock time. Standard usage is to construct the pattern at setup and
//! call [`Pattern::update`] from the host's main loop; blocking in the loop
//! stalls the animation by exactly the overrun, no catch-up is attempted.
//!
//! [`Pattern::set_pattern`] is safe to call at any time: the new descriptor
//! is queued and only adopted at the next clean break of the running
//! animation, so switching never causes a visible glitch. When an event
//! name was given at construction, every adoption publishes the serialized
//! active descriptor to the host's event channel.

mod handlers;

use embassy_time::{Duration, Instant};
use heapless::String;

use crate::color::{BLACK, Color};
use crate::event::{EventOptions, EventPublisher, NoopPublisher};
use crate::rng::RandomSource;
use crate::strip::Strip;
use crate::text::{self, PATTERN_TEXT_MAX, TextError};

/// Number of simultaneously animated LAVA blobs.
pub const BLOB_COUNT: usize = 3;

/// Longest accepted event name.
pub const EVENT_NAME_MAX: usize = 32;

/// The closed set of animation kinds.
///
/// Each kind uses colors A and B differently; all of them accept the
/// RANDOM / RANDOM_PRIMARY sentinels. Speed roughly describes one cycle of
/// animation in milliseconds.
///
/// - SOLID: draws color A. Solid BLACK turns all lights off.
/// - PULSE: fades between color A and color B.
/// - CYLON: a moving eye in color A over a background of B.
/// - ALTERNATE: pixels alternate A and B, swapping every `speed` ms.
/// - FLICKER: a failing-bulb flicker; A is "on", B is "off". Speeds in the
///   200-1000 range work best.
/// - LAVA: three blobs of color A morphing over background B; speed
///   controls blob lifetime.
/// - TEST: hardware check; solid RED, GREEN, BLUE, WHITE, then the same
///   colors walked pixel by pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PatternKind {
    #[default]
    Solid,
    Pulse,
    Cylon,
    Alternate,
    Flicker,
    Lava,
    Test,
}

impl PatternKind {
    /// Wire name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "SOLID",
            Self::Pulse => "PULSE",
            Self::Cylon => "CYLON",
            Self::Alternate => "ALTERNATE",
            Self::Flicker => "FLICKER",
            Self::Lava => "LAVA",
            Self::Test => "TEST",
        }
    }

    /// Parse a wire name. Case-sensitive.
    pub fn parse_from_str(text: &str) -> Option<Self> {
        Some(match text {
            "SOLID" => Self::Solid,
            "PULSE" => Self::Pulse,
            "CYLON" => Self::Cylon,
            "ALTERNATE" => Self::Alternate,
            "FLICKER" => Self::Flicker,
            "LAVA" => Self::Lava,
            "TEST" => Self::Test,
            _ => return None,
        })
    }
}

/// A complete animation request: kind, the two colors, and the cycle time
/// in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PatternDescriptor {
    pub kind: PatternKind,
    pub a: Color,
    pub b: Color,
    pub speed: u32,
}

impl PatternDescriptor {
    pub const fn new(kind: PatternKind, a: Color, b: Color, speed: u32) -> Self {
        Self { kind, a, b, speed }
    }
}

impl Default for PatternDescriptor {
    fn default() -> Self {
        Self::new(PatternKind::Solid, BLACK, BLACK, 0)
    }
}

/// One moving illuminated region of the LAVA pattern.
///
/// `pos == -1` marks an inactive blob waiting out its cooldown.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Blob {
    pub(crate) pos: i32,
    pub(crate) size: i32,
    pub(crate) duration: i32,
    pub(crate) color: Color,
}

impl Blob {
    const INACTIVE: Self = Self {
        pos: -1,
        size: 0,
        duration: 0,
        color: BLACK,
    };
}

/// Working values shared between the engine and the active handler.
///
/// The fields are interpreted per kind; `reset` returns them to the state
/// every handler treats as "first step".
#[derive(Debug, Clone)]
pub(crate) struct WorkingState {
    /// Milliseconds until the next step.
    pub(crate) delay: u64,
    /// Did the handler reach a clean break?
    pub(crate) next_ready: bool,
    pub(crate) a: Color,
    pub(crate) b: Color,
    pub(crate) c: Color,
    pub(crate) forward: bool,
    pub(crate) position: i32,
    pub(crate) blobs: [Blob; BLOB_COUNT],
}

impl WorkingState {
    const fn new() -> Self {
        Self {
            delay: 0,
            next_ready: false,
            a: BLACK,
            b: BLACK,
            c: BLACK,
            forward: true,
            position: 0,
            blobs: [Blob::INACTIVE; BLOB_COUNT],
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Animation engine bound to one strip.
///
/// Owns the strip, the randomness capability and (optionally) an event
/// publisher. The host supplies the clock by passing `now` into
/// [`Pattern::update`].
pub struct Pattern<S, R, E = NoopPublisher> {
    strip: S,
    rng: R,
    publisher: E,
    event_name: String<EVENT_NAME_MAX>,
    active: PatternDescriptor,
    pending: Option<PatternDescriptor>,
    next_draw_at: Instant,
    state: WorkingState,
}

impl<S: Strip, R: RandomSource> Pattern<S, R> {
    /// Pattern with no event publication.
    pub fn new(strip: S, rng: R) -> Self {
        Self::with_event(strip, rng, "", NoopPublisher)
    }
}

impl<S: Strip, R: RandomSource, E: EventPublisher> Pattern<S, R, E> {
    /// Pattern that publishes its serialized descriptor under `event_name`
    /// at every adoption. An empty name disables publishing; a name longer
    /// than [`EVENT_NAME_MAX`] is truncated.
    ///
    /// Nothing is published here: the host runtime's event channel is
    /// typically not up yet while strips are being constructed.
    pub fn with_event(strip: S, rng: R, event_name: &str, publisher: E) -> Self {
        let mut name = String::new();
        for c in event_name.chars() {
            if name.push(c).is_err() {
                break;
            }
        }

        Self {
            strip,
            rng,
            publisher,
            event_name: name,
            active: PatternDescriptor::new(PatternKind::Solid, BLACK, BLACK, 100),
            pending: None,
            next_draw_at: Instant::from_millis(0),
            state: WorkingState::new(),
        }
    }

    /// Queue a new descriptor for adoption at the next clean break.
    ///
    /// Never touches the running animation; calling repeatedly before the
    /// break simply replaces the queued descriptor.
    pub fn set_pattern(&mut self, kind: PatternKind, a: Color, b: Color, speed: u32) {
        self.pending = Some(PatternDescriptor::new(kind, a, b, speed));
    }

    /// Queue a descriptor parsed from its text form.
    ///
    /// On failure nothing changes and the error carries the protocol's
    /// negative code.
    pub fn set_text(&mut self, value: &str) -> Result<(), TextError> {
        let descriptor = text::string_to_pattern(value)?;
        self.pending = Some(descriptor);
        Ok(())
    }

    /// Serialize the active descriptor.
    pub fn get_text(&self) -> String<PATTERN_TEXT_MAX> {
        text::pattern_to_string(&self.active)
    }

    /// The descriptor currently being rendered.
    pub const fn active(&self) -> &PatternDescriptor {
        &self.active
    }

    /// The queued descriptor, if any.
    pub const fn pending(&self) -> Option<&PatternDescriptor> {
        self.pending.as_ref()
    }

    /// The bound strip.
    pub const fn strip(&self) -> &S {
        &self.strip
    }

    /// Earliest instant at which [`Pattern::update`] will draw again.
    pub const fn next_update_at(&self) -> Instant {
        self.next_draw_at
    }

    /// Tear the engine apart again.
    pub fn into_parts(self) -> (S, R, E) {
        (self.strip, self.rng, self.publisher)
    }

    /// Advance the animation if its next step is due.
    ///
    /// Returns true exactly when a pending descriptor was adopted.
    pub fn update(&mut self, now: Instant) -> bool {
        if now < self.next_draw_at {
            return false;
        }

        match self.active.kind {
            PatternKind::Solid => self.handle_solid(),
            PatternKind::Pulse => self.handle_pulse(),
            PatternKind::Cylon => self.handle_cylon(),
            PatternKind::Alternate => self.handle_alternate(),
            PatternKind::Flicker => self.handle_flicker(),
            PatternKind::Lava => self.handle_lava(),
            PatternKind::Test => self.handle_test(),
        }

        self.next_draw_at = now + Duration::from_millis(self.state.delay);

        if self.state.next_ready {
            if let Some(next) = self.pending.take() {
                self.active = next;

                if !self.event_name.is_empty() {
                    let payload = self.get_text();
                    self.publisher
                        .publish(&self.event_name, &payload, EventOptions::default());
                }

                self.state.reset();
                return true;
            }
        }

        false
    }
}
