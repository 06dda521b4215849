//! Per-source sliding-window rate limiting with block-out.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::clock::Clock;

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub window_ms: i64,
    pub max_requests: usize,
    pub block_duration_ms: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { window_ms: 1000, max_requests: 100, block_duration_ms: 1000 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub allowed: bool,
    pub retry_after_ms: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimiterStats {
    pub blocked: usize,
    pub active: usize,
}

#[derive(Debug, Default)]
struct SourceState {
    timestamps: VecDeque<i64>,
    blocked_until: Option<i64>,
}

/// One bounded timestamp queue plus an optional block-out deadline per
/// source. A given source's decisions are serialized by `&mut self`
/// requiring exclusive access (callers typically hold the limiter behind a
/// mutex, same as the quarantine); cross-source calls never interact.
pub struct RateLimiter {
    config: RateLimitConfig,
    sources: HashMap<String, SourceState>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, sources: HashMap::new(), clock }
    }

    /// Runs one admission decision for `source` at `now`.
    pub fn check(&mut self, source: &str, now: i64) -> Admission {
        let state = self.sources.entry(source.to_string()).or_default();

        if let Some(blocked_until) = state.blocked_until {
            if blocked_until > now {
                return Admission { allowed: false, retry_after_ms: Some(blocked_until - now) };
            }
            state.blocked_until = None;
        }

        let window_start = now - self.config.window_ms;
        while matches!(state.timestamps.front(), Some(&t) if t < window_start) {
            state.timestamps.pop_front();
        }

        if state.timestamps.len() >= self.config.max_requests {
            let blocked_until = now + self.config.block_duration_ms;
            state.blocked_until = Some(blocked_until);
            return Admission { allowed: false, retry_after_ms: Some(self.config.block_duration_ms) };
        }

        state.timestamps.push_back(now);
        Admission { allowed: true, retry_after_ms: None }
    }

    /// Current snapshot: how many sources are presently blocked, and how
    /// many have at least one timestamp inside the active window.
    #[must_use]
    pub fn stats(&self) -> RateLimiterStats {
        let now = self.clock.now_ms();
        let mut blocked = 0;
        let mut active = 0;
        for state in self.sources.values() {
            if matches!(state.blocked_until, Some(until) if until > now) {
                blocked += 1;
            }
            if !state.timestamps.is_empty() {
                active += 1;
            }
        }
        RateLimiterStats { blocked, active }
    }
}
