//! Event channel capability.
//!
//! When a pattern adopts a pending descriptor it can announce the new
//! active descriptor on the host's event channel. The host provides the
//! transport by implementing [`EventPublisher`].

/// Delivery options for a published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventOptions {
    /// Seconds the event stays available to subscribers.
    pub ttl_seconds: u32,
    /// Restrict delivery to the owner's devices.
    pub private: bool,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self {
            ttl_seconds: 60,
            private: true,
        }
    }
}

/// Host-provided event transport.
pub trait EventPublisher {
    /// Publish `payload` under `name`. Delivery is best-effort; the engine
    /// never retries.
    fn publish(&mut self, name: &str, payload: &str, options: EventOptions);
}

impl<P: EventPublisher + ?Sized> EventPublisher for &mut P {
    fn publish(&mut self, name: &str, payload: &str, options: EventOptions) {
        (**self).publish(name, payload, options);
    }
}

/// Publisher that drops every event.
///
/// The default for patterns constructed without an event name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl EventPublisher for NoopPublisher {
    fn publish(&mut self, _name: &str, _payload: &str, _options: EventOptions) {}
}
