//! Core type definitions for the Sentinel interception buffer.
//!
//! This crate has no behavior of its own — it defines the data model shared
//! by `sentinel-crypto` and `sentinel-core`:
//! - Threat classification ([`Severity`], [`ThreatCategory`], [`Threat`])
//! - Submission units ([`Scent`], [`Payload`])
//! - The signature newtype ([`Signature`])
//! - The error taxonomy ([`SentinelError`])

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordered threat severity. `Critical` is the highest priority; ordering
/// matches the "lowest severity first" eviction rule in the quarantine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// Closed set of threat categories. The `Display` form is the lowercase
/// token used as the prefix of a [`Signature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatCategory {
    Injection,
    Ddos,
    Flood,
    Spam,
    Malware,
    Other,
}

impl fmt::Display for ThreatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Injection => "injection",
            Self::Ddos => "ddos",
            Self::Flood => "flood",
            Self::Spam => "spam",
            Self::Malware => "malware",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// A threat signal attached to a [`Scent`]. A scent without one is treated
/// as non-adversarial and passes cleanly through the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threat {
    pub category: ThreatCategory,
    pub severity: Severity,
}

/// A structured payload value: null, bool, number, string, ordered array, or
/// keyed map. Backed by [`serde_json::Value`], whose variant set matches
/// this shape exactly (arbitrary-precision integers are rejected by keeping
/// the `arbitrary_precision` feature disabled workspace-wide).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(serde_json::Value);

impl Payload {
    /// Wraps a `serde_json::Value`. Rejects non-finite numbers, which
    /// `serde_json::Number` can only hold via the `arbitrary_precision`
    /// feature — disabled here, but checked defensively in case a future
    /// dependency bump enables it transitively.
    pub fn new(value: serde_json::Value) -> Result<Self, SentinelError> {
        if contains_non_finite(&value) {
            return Err(SentinelError::SerializationFailed(
                "payload contains a non-finite number".into(),
            ));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for Payload {
    /// Infallible conversion for call sites that already hold a value known
    /// to be finite (e.g. literals built in tests). Prefer [`Payload::new`]
    /// when the value's provenance is untrusted.
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

fn contains_non_finite(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| !f.is_finite()),
        serde_json::Value::Array(items) => items.iter().any(contains_non_finite),
        serde_json::Value::Object(map) => map.values().any(contains_non_finite),
        _ => false,
    }
}

/// An incoming submission awaiting classification.
///
/// Ephemeral: a `Scent` is never stored raw. If it carries a [`Threat`], the
/// agent captures it as evidence; otherwise it passes through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scent {
    pub id: String,
    /// Origin key used by the rate limiter (e.g. client IP, API key).
    pub source: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub payload: Payload,
    pub threat: Option<Threat>,
}

impl Scent {
    pub fn clean(id: impl Into<String>, source: impl Into<String>, timestamp: i64, payload: Payload) -> Self {
        Self { id: id.into(), source: source.into(), timestamp, payload, threat: None }
    }

    pub fn adversarial(
        id: impl Into<String>,
        source: impl Into<String>,
        timestamp: i64,
        payload: Payload,
        threat: Threat,
    ) -> Self {
        Self { id: id.into(), source: source.into(), timestamp, payload, threat: Some(threat) }
    }
}

/// A deterministic signature string of the form `"<category>:<hex64>"`.
///
/// Equality always goes through a constant-time byte comparison (see the
/// `PartialEq` impl below) rather than a short-circuiting one — this type
/// is used as a stand-in for a secret-adjacent identifier per spec.
#[derive(Debug, Clone, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Validates `s` against `^[a-z_]+:[0-9a-f]{64}$` and wraps it.
    pub fn parse(s: impl Into<String>) -> Result<Self, SentinelError> {
        let s = s.into();
        if !is_valid_signature(&s) {
            return Err(SentinelError::InvalidSignature(s));
        }
        Ok(Self(s))
    }

    /// Builds a signature from an already-validated category token and hex
    /// digest, skipping the full-string reparse. Used internally by
    /// `sentinel_crypto::signature::generate`, which controls both inputs.
    #[must_use]
    pub fn from_parts(category: &str, hex64: &str) -> Self {
        debug_assert!(category.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
        debug_assert_eq!(hex64.len(), 64);
        Self(format!("{category}:{hex64}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Constant-time by construction: fixed-length fold over both byte strings,
// no early return. HashMap lookups still get a fast hash-bucket match
// first, so this only runs on actual bucket collisions.
impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self.0.bytes().zip(other.0.bytes()).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
    }
}

fn is_valid_signature(s: &str) -> bool {
    let Some((category, hex)) = s.split_once(':') else {
        return false;
    };
    if category.is_empty() || !category.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
        return false;
    }
    hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

/// Error taxonomy shared across the workspace. Data-path outcomes
/// (`PayloadTooLarge`, rate-limit denials) are modeled as ordinary results
/// elsewhere, not as errors — only genuine failures live here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SentinelError {
    /// Payload contained an unrepresentable value (NaN, circular reference,
    /// opaque/function-like value, etc.).
    #[error("serialization failed: {0}")]
    SerializationFailed(String),

    /// Encoded payload exceeded the configured size limit.
    #[error("payload too large: {actual} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { actual: usize, limit: usize },

    /// Reconstructed hash disagrees with the recorded hash.
    #[error("hash mismatch: evidence bytes do not match recorded hash")]
    HashMismatch,

    /// A consumed `Evidence` handle was accessed again.
    #[error("evidence already disposed")]
    EvidenceAlreadyDisposed,

    /// A string did not match `^[a-z_]+:[0-9a-f]{64}$`.
    #[error("invalid signature: {0:?}")]
    InvalidSignature(String),

    /// `runtime.strict` is set but the host did not report hardening.
    #[error("required platform hardening is not present (strict mode)")]
    RuntimeFlagMissing,

    /// Wraps an unexpected fault that does not fit another variant.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, SentinelError>;
