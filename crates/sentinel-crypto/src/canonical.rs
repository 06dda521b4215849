//! Canonical JSON-equivalent encoding with size-first rejection.
//!
//! Two payloads that differ only in map-key ordering at every depth must
//! encode to identical bytes. Rejection of oversized payloads is checked
//! against the final encoded byte length, never an intermediate string
//! length or a conservative estimate.

use sentinel_types::{Payload, SentinelError};

/// The canonical encoding of a payload: UTF-8 bytes with object keys sorted
/// lexicographically at every depth and array order preserved.
#[derive(Debug, Clone)]
pub struct Encoded {
    bytes: Vec<u8>,
}

impl Encoded {
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The canonical form as a `&str`. Always valid UTF-8: `serde_json`
    /// never emits invalid UTF-8 for a value that itself came from valid
    /// Rust strings.
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes).expect("canonical encoding is valid UTF-8")
    }
}

/// Encodes `payload` canonically and enforces `max_size` against the final
/// byte length.
///
/// # Errors
/// - [`SentinelError::SerializationFailed`] if the value cannot be
///   serialized (practically unreachable for a well-formed [`Payload`],
///   but kept as a typed outcome rather than a panic since `serde_json`'s
///   serializer is fallible in general).
/// - [`SentinelError::PayloadTooLarge`] if the encoded length exceeds
///   `max_size`.
pub fn encode(payload: &Payload, max_size: usize) -> Result<Encoded, SentinelError> {
    let canonical = canonicalize(payload.as_value());
    let bytes = serde_json::to_vec(&canonical)
        .map_err(|e| SentinelError::SerializationFailed(e.to_string()))?;

    if bytes.len() > max_size {
        return Err(SentinelError::PayloadTooLarge { actual: bytes.len(), limit: max_size });
    }

    Ok(Encoded { bytes })
}

/// A fast, conservative upper-bound estimate of the encoded size, usable
/// for an early bail-out before running the real encoder on a payload that
/// is obviously oversized. Never authoritative — callers must still check
/// [`encode`]'s result against the limit.
#[must_use]
pub fn estimate_len(payload: &Payload) -> usize {
    serde_json::to_string(payload.as_value()).map_or(usize::MAX, |s| s.len().saturating_mul(2))
}

/// Recursively rebuilds `value` with every object's keys sorted
/// lexicographically. Arrays keep their original order.
fn canonicalize(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(canonicalize).collect())
        }
        serde_json::Value::Object(map) => {
            let mut sorted: std::collections::BTreeMap<String, serde_json::Value> =
                std::collections::BTreeMap::new();
            for (key, val) in map {
                sorted.insert(key.clone(), canonicalize(val));
            }
            serde_json::Value::Object(sorted.into_iter().collect())
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(v: serde_json::Value) -> Payload {
        Payload::new(v).unwrap()
    }

    #[test]
    fn key_order_does_not_affect_encoding() {
        let a = payload(json!({"b": 1, "a": 2}));
        let b = payload(json!({"a": 2, "b": 1}));
        assert_eq!(encode(&a, 1024).unwrap().bytes(), encode(&b, 1024).unwrap().bytes());
    }

    #[test]
    fn nested_key_order_does_not_affect_encoding() {
        let a = payload(json!({"outer": {"z": 1, "y": 2}, "arr": [1, 2, 3]}));
        let b = payload(json!({"arr": [1, 2, 3], "outer": {"y": 2, "z": 1}}));
        assert_eq!(encode(&a, 1024).unwrap().bytes(), encode(&b, 1024).unwrap().bytes());
    }

    #[test]
    fn array_order_is_preserved() {
        let a = payload(json!({"arr": [1, 2, 3]}));
        let b = payload(json!({"arr": [3, 2, 1]}));
        assert_ne!(encode(&a, 1024).unwrap().bytes(), encode(&b, 1024).unwrap().bytes());
    }

    #[test]
    fn oversized_payload_is_rejected_on_final_bytes() {
        let p = payload(json!({"data": "x".repeat(200)}));
        let err = encode(&p, 64).unwrap_err();
        match err {
            SentinelError::PayloadTooLarge { actual, limit } => {
                assert!(actual > limit);
                assert_eq!(limit, 64);
            }
            other => panic!("expected PayloadTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn estimator_is_not_authoritative_but_conservative_in_practice() {
        let p = payload(json!({"a": 1}));
        let estimate = estimate_len(&p);
        let actual = encode(&p, usize::MAX).unwrap().size();
        assert!(estimate >= actual);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn canonicalization_is_idempotent(s in "[a-z]{1,5}", n in 0i64..1000) {
                let p = payload(json!({s.clone(): n}));
                let once = encode(&p, usize::MAX).unwrap().into_bytes();
                let twice_value: serde_json::Value = serde_json::from_slice(&once).unwrap();
                let twice = encode(&payload(twice_value), usize::MAX).unwrap().into_bytes();
                prop_assert_eq!(once, twice);
            }
        }
    }
}
