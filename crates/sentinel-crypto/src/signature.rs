//! Deterministic signature composition: `"<category>:<hex64>"`.

use sentinel_types::{Payload, SentinelError, Signature, ThreatCategory};

use crate::{canonical, hash};

/// Encodes `payload` canonically, hashes it, and composes the category
/// prefix into a [`Signature`]. The signature is always computed over the
/// uncompressed canonical bytes — compression, if any, happens after this
/// call and must never be allowed to change the result.
///
/// # Errors
/// Propagates [`canonical::encode`]'s errors (`SerializationFailed`,
/// `PayloadTooLarge`).
pub fn generate(
    category: ThreatCategory,
    payload: &Payload,
    max_size: usize,
) -> Result<Signature, SentinelError> {
    let encoded = canonical::encode(payload, max_size)?;
    Ok(compose(category, &hash::sha256_hex(encoded.bytes())))
}

/// Composes a signature from an already-known category and hex digest,
/// skipping re-encoding. Used by the evidence factory, which already holds
/// the encoded bytes and hash from its own pipeline.
#[must_use]
pub fn compose(category: ThreatCategory, hex64: &str) -> Signature {
    Signature::from_parts(&category.to_string(), hex64)
}

/// Validates that `s` has the exact `"<category>:<hex64>"` shape.
///
/// # Errors
/// [`SentinelError::InvalidSignature`] if the shape does not match.
pub fn validate(s: &str) -> Result<Signature, SentinelError> {
    Signature::parse(s)
}
