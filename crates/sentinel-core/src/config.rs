//! Process-wide defaults merged into a per-agent config at construction.
//! No global state: this module only produces values consumed once, at
//! [`crate::agent::Agent::new`] time.

use crate::agent::AgentConfig;
use crate::quarantine::{EvictionPolicy, QuarantineConfig};
use crate::rate_limiter::RateLimitConfig;
use sentinel_types::SentinelError;

/// Top-level configuration recognized by a Sentinel deployment. Loading
/// this from a file or environment is an external concern (spec §1); this
/// type is the in-memory record a loader produces.
#[derive(Debug, Clone, Copy)]
pub struct SentinelConfig {
    pub quarantine: QuarantineConfig,
    pub rate_limit: RateLimitConfig,
    pub agent: AgentConfig,
    /// If true, refuse to start unless `hardening_probe` reports the host
    /// has prototype-pollution mitigation in place. A memory-safe Rust
    /// process has no such prototype to pollute; this flag is retained for
    /// interface parity with deployments that embed a scripting runtime
    /// alongside the agent, and is satisfied by the injected probe.
    pub strict: bool,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            quarantine: QuarantineConfig { max_count: 10_000, max_bytes: 64 * 1024 * 1024, eviction_policy: EvictionPolicy::Priority },
            rate_limit: RateLimitConfig { window_ms: 1000, max_requests: 100, block_duration_ms: 1000 },
            agent: AgentConfig { max_payload_size: 1024 * 1024 },
            strict: false,
        }
    }
}

impl SentinelConfig {
    /// Validates `strict` mode against a caller-supplied hardening probe.
    /// Takes the probe as a parameter rather than calling out to a runtime
    /// API directly, since there is nothing in a compiled Rust binary
    /// equivalent to checking a scripting engine's object prototypes.
    ///
    /// # Errors
    /// [`SentinelError::RuntimeFlagMissing`] if `strict` is set and the
    /// probe reports `false`.
    pub fn validate_runtime(&self, hardening_probe: impl FnOnce() -> bool) -> Result<(), SentinelError> {
        if self.strict && !hardening_probe() {
            return Err(SentinelError::RuntimeFlagMissing);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_table() {
        let config = SentinelConfig::default();
        assert_eq!(config.quarantine.max_count, 10_000);
        assert_eq!(config.quarantine.eviction_policy, EvictionPolicy::Priority);
        assert_eq!(config.rate_limit.window_ms, 1000);
        assert_eq!(config.agent.max_payload_size, 1024 * 1024);
        assert!(!config.strict);
    }

    #[test]
    fn strict_mode_passes_when_probe_reports_hardened() {
        let config = SentinelConfig { strict: true, ..SentinelConfig::default() };
        assert!(config.validate_runtime(|| true).is_ok());
    }

    #[test]
    fn strict_mode_fails_when_probe_reports_unhardened() {
        let config = SentinelConfig { strict: true, ..SentinelConfig::default() };
        assert_eq!(config.validate_runtime(|| false).unwrap_err(), SentinelError::RuntimeFlagMissing);
    }

    #[test]
    fn non_strict_mode_ignores_the_probe() {
        let config = SentinelConfig::default();
        assert!(config.validate_runtime(|| false).is_ok());
    }
}
