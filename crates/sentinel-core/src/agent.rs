//! The orchestrator: threads rate limiting, payload encoding, deduplication,
//! and quarantine admission into a single `intercept` call per scent.

use std::sync::{Arc, Mutex};

use sentinel_types::{Scent, SentinelError, Signature};

use crate::clock::Clock;
use crate::config::SentinelConfig;
use crate::factory::EvidenceFactory;
use crate::quarantine::{EvidenceSummary, Quarantine, QuarantineConfig, QuarantineStats, SubmitOutcome};
use crate::rate_limiter::{RateLimitConfig, RateLimiter, RateLimiterStats};

#[derive(Debug, Clone, Copy)]
pub struct AgentConfig {
    pub max_payload_size: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { max_payload_size: 1024 * 1024 }
    }
}

/// Tagged outcome of one [`Agent::intercept`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum InterceptResult {
    Clean,
    RateLimited { retry_after_ms: i64 },
    PayloadTooLarge { limit: usize },
    Ignored { signature: Signature },
    Quarantined { signature: Signature },
    Error { code: String, message: String, recoverable: bool },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentStats {
    pub total_intercepts: u64,
    pub clean_count: u64,
    pub rate_limited_count: u64,
    pub payload_too_large_count: u64,
    pub ignored_count: u64,
    pub quarantined_count: u64,
    pub error_count: u64,
}

/// Owns the Quarantine and RateLimiter; no other component mutates them.
/// `intercept` is non-suspending — no awaits, no locks held across I/O.
pub struct Agent {
    config: AgentConfig,
    factory: EvidenceFactory,
    quarantine: Mutex<Quarantine>,
    rate_limiter: Mutex<RateLimiter>,
    clock: Arc<dyn Clock>,
    stats: Mutex<AgentStats>,
}

impl Agent {
    #[must_use]
    pub fn new(
        config: AgentConfig,
        quarantine_config: QuarantineConfig,
        rate_limit_config: RateLimitConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            factory: EvidenceFactory::new(config.max_payload_size),
            config,
            quarantine: Mutex::new(Quarantine::new(quarantine_config, Arc::clone(&clock))),
            rate_limiter: Mutex::new(RateLimiter::new(rate_limit_config, Arc::clone(&clock))),
            clock,
            stats: Mutex::new(AgentStats::default()),
        }
    }

    /// The gated constructor a Sentinel deployment actually calls:
    /// validates `config.strict` against `hardening_probe` before building
    /// anything, refusing to start rather than running unhardened (spec
    /// §6's `runtime.strict` contract). `Agent::new` remains available for
    /// callers (tests, embedders with their own validation) that already
    /// know the runtime is acceptable and want to skip the gate.
    ///
    /// # Errors
    /// [`SentinelError::RuntimeFlagMissing`] if `config.strict` is set and
    /// `hardening_probe` reports `false`.
    pub fn from_config(
        config: &SentinelConfig,
        hardening_probe: impl FnOnce() -> bool,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SentinelError> {
        config.validate_runtime(hardening_probe)?;
        Ok(Self::new(config.agent, config.quarantine, config.rate_limit, clock))
    }

    /// Attaches a compression codec to the evidence factory. Must be
    /// called before any `intercept`.
    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn crate::codec::Codec>) -> Self {
        self.factory = EvidenceFactory::new(self.config.max_payload_size).with_codec(codec);
        self
    }

    #[must_use]
    pub fn stats(&self) -> AgentStats {
        *self.stats.lock().expect("stats mutex poisoned")
    }

    #[must_use]
    pub fn quarantine_stats(&self) -> QuarantineStats {
        self.quarantine.lock().expect("quarantine mutex poisoned").stats()
    }

    #[must_use]
    pub fn rate_limiter_stats(&self) -> RateLimiterStats {
        self.rate_limiter.lock().expect("rate limiter mutex poisoned").stats()
    }

    /// Read-only metadata for every quarantined entry. Consumers (e.g. the
    /// CLI inspector) never get the underlying evidence bytes this way —
    /// only the signature, severity, capture time, size, and compression
    /// flag (spec §4.8: "no privileged access to evidence internals").
    #[must_use]
    pub fn quarantine_entries(&self) -> Vec<EvidenceSummary> {
        self.quarantine.lock().expect("quarantine mutex poisoned").summaries()
    }

    /// Read-only metadata for one quarantined entry, if present.
    #[must_use]
    pub fn quarantine_entry(&self, signature: &sentinel_types::Signature) -> Option<EvidenceSummary> {
        self.quarantine.lock().expect("quarantine mutex poisoned").summary_for(signature)
    }

    /// Runs the security-order pipeline for one scent:
    /// threat-check → rate-limit → encode+sign → dedup/admit.
    ///
    /// Never raises on data-path failures — they are converted to
    /// [`InterceptResult::Error`]. Only misuse elsewhere (e.g. a disposed
    /// evidence handle) raises.
    pub fn intercept(&self, scent: &Scent) -> InterceptResult {
        let now = self.clock.now_ms();
        let result = self.intercept_inner(scent, now);
        self.record(&result);
        result
    }

    fn intercept_inner(&self, scent: &Scent, now: i64) -> InterceptResult {
        let Some(threat) = &scent.threat else {
            return InterceptResult::Clean;
        };

        let admission = {
            let mut limiter = self.rate_limiter.lock().expect("rate limiter mutex poisoned");
            limiter.check(&scent.source, now)
        };
        if !admission.allowed {
            tracing::warn!(source = %scent.source, "rate limited");
            return InterceptResult::RateLimited { retry_after_ms: admission.retry_after_ms.unwrap_or(0) };
        }

        let built = self.factory.build(scent, threat.category, threat.severity, now);
        let (evidence, signature) = match built {
            Ok(pair) => pair,
            Err(SentinelError::PayloadTooLarge { limit, .. }) => {
                return InterceptResult::PayloadTooLarge { limit };
            }
            Err(err) => {
                tracing::error!(error = %err, "evidence construction failed");
                return InterceptResult::Error { code: error_code(&err), message: err.to_string(), recoverable: true };
            }
        };
        let _ = signature;

        let submitted = {
            let mut quarantine = self.quarantine.lock().expect("quarantine mutex poisoned");
            quarantine.submit(evidence)
        };
        match submitted {
            Ok(result) => match result.outcome {
                SubmitOutcome::Admitted => InterceptResult::Quarantined { signature: result.signature },
                SubmitOutcome::Duplicate | SubmitOutcome::Rejected => InterceptResult::Ignored { signature: result.signature },
            },
            Err(err) => {
                tracing::error!(error = %err, "quarantine submission failed");
                InterceptResult::Error { code: error_code(&err), message: err.to_string(), recoverable: true }
            }
        }
    }

    fn record(&self, result: &InterceptResult) {
        let mut stats = self.stats.lock().expect("stats mutex poisoned");
        stats.total_intercepts += 1;
        match result {
            InterceptResult::Clean => stats.clean_count += 1,
            InterceptResult::RateLimited { .. } => stats.rate_limited_count += 1,
            InterceptResult::PayloadTooLarge { .. } => stats.payload_too_large_count += 1,
            InterceptResult::Ignored { .. } => stats.ignored_count += 1,
            InterceptResult::Quarantined { .. } => stats.quarantined_count += 1,
            InterceptResult::Error { .. } => stats.error_count += 1,
        }
    }
}

fn error_code(err: &SentinelError) -> String {
    match err {
        SentinelError::SerializationFailed(_) => "serialization_failed",
        SentinelError::PayloadTooLarge { .. } => "payload_too_large",
        SentinelError::HashMismatch => "hash_mismatch",
        SentinelError::EvidenceAlreadyDisposed => "evidence_already_disposed",
        SentinelError::InvalidSignature(_) => "invalid_signature",
        SentinelError::RuntimeFlagMissing => "runtime_flag_missing",
        SentinelError::Internal(_) => "internal",
    }
    .to_string()
}
