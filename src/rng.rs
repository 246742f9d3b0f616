//! Random source capability.
//!
//! The host runtime owns the real entropy source; the engine only sees this
//! trait, which keeps the patterns deterministic under test with a seeded
//! generator.

/// Uniform integer randomness over a half-open range.
pub trait RandomSource {
    /// Uniform draw from `[low, high)`. `high` must be greater than `low`.
    fn random_range(&mut self, low: i32, high: i32) -> i32;

    /// Uniform draw from `[0, high)`.
    fn random_below(&mut self, high: i32) -> i32 {
        self.random_range(0, high)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn random_range(&mut self, low: i32, high: i32) -> i32 {
        (**self).random_range(low, high)
    }
}

/// Small xorshift PRNG.
///
/// Good enough for animation jitter; not a cryptographic source. Seed it
/// from the host's entropy at startup, or with a constant for repeatable
/// tests.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Create a generator from a seed. A zero seed is remapped, xorshift
    /// has a fixed point there.
    pub const fn new(seed: u32) -> Self {
        let state = if seed == 0 { 0x9E37_79B9 } else { seed };
        Self { state }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl RandomSource for XorShift32 {
    fn random_range(&mut self, low: i32, high: i32) -> i32 {
        debug_assert!(low < high);
        let span = (i64::from(high) - i64::from(low)) as u64;
        let draw = u64::from(self.next_u32()) % span;
        (i64::from(low) + draw as i64) as i32
    }
}
