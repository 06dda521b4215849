//! Turns a raw [`sentinel_types::Scent`] into owned [`Evidence`].

use std::sync::Arc;

use sentinel_types::{Scent, Severity, Signature, ThreatCategory};

use crate::codec::Codec;
use crate::evidence::Evidence;

/// Builds [`Evidence`] from scents: canonicalize, hash, sign, optionally
/// compress. Holds no state of its own beyond its configured collaborators,
/// so it is cheap to share across quarantine instances via `Arc`.
pub struct EvidenceFactory {
    max_payload_size: usize,
    codec: Option<Arc<dyn Codec>>,
}

impl EvidenceFactory {
    #[must_use]
    pub fn new(max_payload_size: usize) -> Self {
        Self { max_payload_size, codec: None }
    }

    /// Attaches a codec. Evidence produced afterwards is encoded through it
    /// and marked `compressed = true`.
    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Canonicalizes and hashes `scent.payload`, derives its signature from
    /// `category` and the hash, optionally runs the result through the
    /// configured codec, and returns owned [`Evidence`] plus the signature
    /// that was minted for it.
    ///
    /// # Errors
    /// [`sentinel_types::SentinelError::PayloadTooLarge`] if the canonical
    /// encoding exceeds `max_payload_size`; any error the codec returns, or
    /// one from within [`sentinel_crypto`].
    pub fn build(
        &self,
        scent: &Scent,
        category: ThreatCategory,
        severity: Severity,
        captured: i64,
    ) -> Result<(Evidence, Signature), sentinel_types::SentinelError> {
        let encoded = sentinel_crypto::canonical::encode(&scent.payload, self.max_payload_size)?;
        let hash = sentinel_crypto::hash::sha256(encoded.bytes());
        let signature = sentinel_crypto::signature::compose(category, &sentinel_crypto::hash::hex_encode(&hash));

        let (bytes, compressed) = match &self.codec {
            Some(codec) => (codec.encode(encoded.bytes())?, true),
            None => (encoded.into_bytes(), false),
        };

        let evidence = Evidence::new(bytes, signature.clone(), hash, severity, captured, compressed)?;
        Ok((evidence, signature))
    }
}
