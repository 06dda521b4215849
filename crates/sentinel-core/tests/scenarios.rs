//! End-to-end scenarios for the intercept pipeline, exercising the Agent
//! exactly as an external caller would.

use std::sync::Arc;

use sentinel_core::{
    Agent, AgentConfig, Clock, EvictionPolicy, InMemoryColdStorage, InterceptResult, ManualClock,
    QuarantineConfig, RateLimitConfig,
};
use sentinel_types::{Payload, Scent, Severity, Threat, ThreatCategory};
use serde_json::json;

fn agent_with(
    max_payload_size: usize,
    quarantine: QuarantineConfig,
    rate_limit: RateLimitConfig,
    clock: Arc<ManualClock>,
) -> Agent {
    Agent::new(AgentConfig { max_payload_size }, quarantine, rate_limit, clock as Arc<dyn Clock>)
}

fn generous_rate_limit() -> RateLimitConfig {
    RateLimitConfig { window_ms: 60_000, max_requests: 1000, block_duration_ms: 1000 }
}

#[test]
fn s1_clean_pass_through() {
    let clock = Arc::new(ManualClock::new(0));
    let agent = agent_with(1024 * 1024, QuarantineConfig::default(), generous_rate_limit(), clock);

    let scent = Scent::clean("s1", "u", 0, Payload::new(json!({"a": 1})).unwrap());
    let result = agent.intercept(&scent);

    assert_eq!(result, InterceptResult::Clean);
    let stats = agent.stats();
    assert_eq!(stats.total_intercepts, 1);
    assert_eq!(stats.clean_count, 1);
    assert_eq!(agent.quarantine_stats().count, 0);
}

#[test]
fn s2_quarantine_then_dedup() {
    let clock = Arc::new(ManualClock::new(0));
    let agent = agent_with(1024 * 1024, QuarantineConfig::default(), generous_rate_limit(), clock);

    let threat = Threat { category: ThreatCategory::Injection, severity: Severity::High };
    let scent = Scent::adversarial("s2", "u", 0, Payload::new(json!({"attack": "x"})).unwrap(), threat);

    let first = agent.intercept(&scent);
    let InterceptResult::Quarantined { signature } = first else {
        panic!("expected quarantined, got {first:?}")
    };
    assert!(signature.as_str().starts_with("injection:"));

    let second = agent.intercept(&scent);
    assert_eq!(second, InterceptResult::Ignored { signature });
    assert_eq!(agent.quarantine_stats().count, 1);
}

#[test]
fn s3_priority_eviction_admits_critical_evicts_oldest_low() {
    let clock = Arc::new(ManualClock::new(0));
    let quarantine = QuarantineConfig { max_count: 2, max_bytes: 1_000_000, eviction_policy: EvictionPolicy::Priority };
    let agent = agent_with(1024 * 1024, quarantine, generous_rate_limit(), Arc::clone(&clock));

    let low = Threat { category: ThreatCategory::Spam, severity: Severity::Low };
    agent.intercept(&Scent::adversarial("a", "u", 0, Payload::new(json!({"n": 1})).unwrap(), low.clone()));
    agent.intercept(&Scent::adversarial("b", "u", 0, Payload::new(json!({"n": 2})).unwrap(), low));

    let critical = Threat { category: ThreatCategory::Malware, severity: Severity::Critical };
    let result = agent.intercept(&Scent::adversarial("c", "u", 0, Payload::new(json!({"n": 3})).unwrap(), critical));
    assert!(matches!(result, InterceptResult::Quarantined { .. }));

    let stats = agent.quarantine_stats();
    assert_eq!(stats.count, 2);
    assert_eq!(stats.by_severity.critical, 1);
    assert_eq!(stats.by_severity.low, 1);
    assert_eq!(stats.evictions, 1);
}

#[test]
fn s4_rate_limiting_blocks_then_recovers() {
    let clock = Arc::new(ManualClock::new(0));
    let rate_limit = RateLimitConfig { window_ms: 1000, max_requests: 3, block_duration_ms: 500 };
    let agent = agent_with(1024 * 1024, QuarantineConfig::default(), rate_limit, Arc::clone(&clock));
    let threat = Threat { category: ThreatCategory::Ddos, severity: Severity::Medium };

    let submit_at = |t: i64, tag: &str| {
        clock.set(t);
        agent.intercept(&Scent::adversarial(tag, "u", t, Payload::new(json!({"n": t})).unwrap(), threat.clone()))
    };

    assert!(matches!(submit_at(0, "1"), InterceptResult::Quarantined { .. }));
    assert!(matches!(submit_at(100, "2"), InterceptResult::Quarantined { .. }));
    assert!(matches!(submit_at(200, "3"), InterceptResult::Quarantined { .. }));

    let fourth = submit_at(300, "4");
    assert_eq!(fourth, InterceptResult::RateLimited { retry_after_ms: 500 });

    let still_blocked = submit_at(300 + 500 - 200, "5");
    assert!(matches!(still_blocked, InterceptResult::RateLimited { .. }));

    let recovered = submit_at(300 + 500 + 1000, "6");
    assert!(matches!(recovered, InterceptResult::Quarantined { .. } | InterceptResult::Ignored { .. }));
}

#[test]
fn s5_payload_too_large_is_not_recorded_anywhere() {
    let clock = Arc::new(ManualClock::new(0));
    let agent = agent_with(64, QuarantineConfig::default(), generous_rate_limit(), clock);
    let threat = Threat { category: ThreatCategory::Flood, severity: Severity::Medium };
    let scent = Scent::adversarial("s5", "u", 0, Payload::new(json!({"data": "x".repeat(200)})).unwrap(), threat);

    let result = agent.intercept(&scent);
    assert_eq!(result, InterceptResult::PayloadTooLarge { limit: 64 });
    assert_eq!(agent.quarantine_stats().count, 0);
    assert_eq!(agent.stats().payload_too_large_count, 1);
}

#[test]
fn s6_audit_tamper_detection() {
    use sentinel_core::{Evidence, Quarantine};
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(0));
    let quarantine_config = QuarantineConfig { max_count: 2, max_bytes: 1_000_000, eviction_policy: EvictionPolicy::Priority };
    let mut quarantine = Quarantine::new(quarantine_config, Arc::clone(&clock));

    let make = |tag: &str, severity: Severity, captured: i64| {
        let bytes = format!("payload-{tag}").into_bytes();
        let hash = sentinel_crypto::hash::sha256(&bytes);
        let signature = sentinel_crypto::signature::compose(ThreatCategory::Spam, &sentinel_crypto::hash::hex_encode(&hash));
        Evidence::new(bytes, signature, hash, severity, captured, false).unwrap()
    };

    quarantine.submit(make("a", Severity::Low, 0)).unwrap();
    quarantine.submit(make("b", Severity::Low, 1)).unwrap();
    quarantine.submit(make("c", Severity::Critical, 2)).unwrap(); // evicts "a"

    assert!(quarantine.audit_chain().verify());

    let untampered = quarantine.audit_chain().export();
    assert!(sentinel_core::AuditChain::from_export(untampered.clone()).verify());

    let mut tampered = untampered;
    tampered[0].timestamp += 1;
    assert!(!sentinel_core::AuditChain::from_export(tampered).verify());
}

#[test]
fn evacuate_hands_bytes_to_cold_storage_and_records_audit() {
    use sentinel_core::{Evidence, Quarantine};
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(0));
    let mut quarantine = Quarantine::new(QuarantineConfig::default(), clock);
    let bytes = b"evacuation-target".to_vec();
    let hash = sentinel_crypto::hash::sha256(&bytes);
    let signature = sentinel_crypto::signature::compose(ThreatCategory::Malware, &sentinel_crypto::hash::hex_encode(&hash));
    let evidence = Evidence::new(bytes.clone(), signature.clone(), hash, Severity::Critical, 0, false).unwrap();
    quarantine.submit(evidence).unwrap();

    let storage = InMemoryColdStorage::new();
    let moved = quarantine.evacuate(&signature, "s3://bucket/obj", &storage).unwrap();
    assert!(moved);
    assert_eq!(storage.read(signature.as_str()), Some(bytes));
    assert_eq!(quarantine.audit_chain().len(), 1);
    assert!(quarantine.get(&signature).is_none());
}
