//! Builds a representative in-process [`Agent`] for the inspector commands.
//!
//! Sentinel has no persistence and no network transport (spec §1
//! Non-goals) — it is a library an embedding application wires its own
//! traffic through via `Agent::intercept`. This binary is a thin read-only
//! inspector over *a* agent (spec §4.8/§6), not a server; since there is no
//! external process to attach to, it seeds one in-memory agent with a
//! handful of representative scents so `status`/`inspect`/`watch` have
//! something to show.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use sentinel_core::{Agent, AgentConfig, Clock, EvictionPolicy, QuarantineConfig, RateLimitConfig, SentinelConfig, SystemClock};
use sentinel_types::{Payload, Scent, Severity, Threat, ThreatCategory};
use serde_json::json;

/// Builds an [`Agent`] with the default configuration table from spec §6
/// and feeds it one round of sample traffic.
///
/// Goes through `Agent::from_config` rather than the raw `Agent::new` so
/// the CLI exercises the same `runtime.strict` hardening gate a production
/// embedder would. A compiled Rust binary has no scripting-engine
/// prototype to pollute, so the probe always reports hardened.
#[must_use]
pub fn seeded_agent() -> Agent {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let config = SentinelConfig {
        agent: AgentConfig { max_payload_size: 64 * 1024 },
        quarantine: QuarantineConfig { max_count: 500, max_bytes: 16 * 1024 * 1024, eviction_policy: EvictionPolicy::Priority },
        rate_limit: RateLimitConfig { window_ms: 60_000, max_requests: 200, block_duration_ms: 5_000 },
        strict: false,
    };
    let agent = Agent::from_config(&config, || true, clock).expect("non-strict config never fails the hardening gate");
    for scent in sample_scents() {
        agent.intercept(&scent);
    }
    agent
}

/// Feeds one more synthetic, timestamped scent through `agent`. Used by
/// `watch` to give the live view something new to show between ticks.
pub fn inject_one(agent: &Agent, tick: u64) {
    let now = now_ms();
    let scent = match tick % 4 {
        0 => Scent::clean(
            format!("poll-{tick}"),
            "198.51.100.10",
            now,
            Payload::new(json!({"path": "/health", "tick": tick})).unwrap(),
        ),
        1 => Scent::adversarial(
            format!("poll-{tick}"),
            "203.0.113.7",
            now,
            Payload::new(json!({"query": format!("' OR {tick}=1 --")})).unwrap(),
            Threat { category: ThreatCategory::Injection, severity: Severity::High },
        ),
        2 => Scent::adversarial(
            format!("poll-{tick}"),
            "203.0.113.7",
            now,
            Payload::new(json!({"burst": tick})).unwrap(),
            Threat { category: ThreatCategory::Flood, severity: Severity::Medium },
        ),
        _ => Scent::adversarial(
            format!("poll-{tick}"),
            "198.51.100.77",
            now,
            Payload::new(json!({"message": "buy now", "n": tick})).unwrap(),
            Threat { category: ThreatCategory::Spam, severity: Severity::Low },
        ),
    };
    agent.intercept(&scent);
}

fn sample_scents() -> Vec<Scent> {
    let now = now_ms();
    vec![
        Scent::clean("req-1", "198.51.100.10", now, Payload::new(json!({"path": "/health"})).unwrap()),
        Scent::clean("req-2", "198.51.100.11", now, Payload::new(json!({"path": "/status"})).unwrap()),
        Scent::adversarial(
            "req-3",
            "203.0.113.7",
            now,
            Payload::new(json!({"query": "' OR 1=1 --"})).unwrap(),
            Threat { category: ThreatCategory::Injection, severity: Severity::High },
        ),
        Scent::adversarial(
            "req-4",
            "203.0.113.8",
            now,
            Payload::new(json!({"payload": "eicar-test-signature"})).unwrap(),
            Threat { category: ThreatCategory::Malware, severity: Severity::Critical },
        ),
        Scent::adversarial(
            "req-5",
            "198.51.100.77",
            now,
            Payload::new(json!({"message": "buy cheap watches now"})).unwrap(),
            Threat { category: ThreatCategory::Spam, severity: Severity::Low },
        ),
        Scent::adversarial(
            "req-6",
            "203.0.113.9",
            now,
            Payload::new(json!({"burst_id": 42})).unwrap(),
            Threat { category: ThreatCategory::Ddos, severity: Severity::High },
        ),
    ]
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
