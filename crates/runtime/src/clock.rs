//! # Time Sources
//!
//! The scheduler never reads the system time directly. It asks a [`Clock`],
//! so tests can drive it with a [`ManualClock`] and get exact, synchronous
//! results without a real pacing source.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Millisecond time source with a blocking sleep.
pub trait Clock {
    /// Milliseconds since an arbitrary origin. Expected to be non-decreasing;
    /// the scheduler tolerates violations.
    fn now_ms(&self) -> f64;

    /// Suspend the calling thread for `ms` milliseconds.
    fn sleep_ms(&self, ms: f64);
}

/// Monotonic wall clock, origin at construction.
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn sleep_ms(&self, ms: f64) {
        if let Some(duration) = sleep_duration(ms) {
            std::thread::sleep(duration);
        }
    }
}

/// Duration of a requested sleep. Non-positive and NaN requests are `None`;
/// requests too long for [`Duration`] saturate to [`Duration::MAX`].
fn sleep_duration(ms: f64) -> Option<Duration> {
    if ms.is_nan() || ms <= 0.0 {
        return None;
    }
    Some(Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX))
}

/// Hand-driven clock. Clones share the same time; sleeping advances it.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start_ms: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(start_ms.to_bits())),
        }
    }

    /// Jump to an absolute time, backwards included.
    pub fn set(&self, ms: f64) {
        self.bits.store(ms.to_bits(), Ordering::SeqCst);
    }

    pub fn advance(&self, ms: f64) {
        self.set(self.now_ms() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }

    fn sleep_ms(&self, ms: f64) {
        if ms > 0.0 {
            self.advance(ms);
        }
    }
}
