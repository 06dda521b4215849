//! Time source abstraction.
//!
//! The data path never calls `SystemTime::now()` directly — every method
//! that needs "now" takes it from a [`Clock`], so rate-limiter and
//! audit-chain timestamp scenarios (see spec §8, S4) can be driven
//! deterministically in tests without sleeping real wall-clock time.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of "now", in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Production clock backed by the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// A manually-advanced clock for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    current: AtomicI64,
}

impl ManualClock {
    #[must_use]
    pub fn new(start_ms: i64) -> Self {
        Self { current: AtomicI64::new(start_ms) }
    }

    pub fn set(&self, ms: i64) {
        self.current.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.current.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.current.load(Ordering::SeqCst)
    }
}
