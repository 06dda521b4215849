//! Append-only hash-linked log of destructive actions against evidence.

use sentinel_types::{Payload, SentinelError, Signature};

use crate::evidence::{EvacuateRecord, NeutralizationRecord};

/// The kind of destructive action an [`AuditRecord`] documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditRecordKind {
    Neutralization,
    Evacuation,
}

/// One link in the chain. `hash` covers `{id, signature, timestamp,
/// previousHash}` of this record alone — `kind` and any kind-specific
/// fields (like `destination`) are not hashed, matching the on-wire shape
/// the chain's integrity guarantee is defined over.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AuditRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AuditRecordKind,
    pub signature: Signature,
    pub timestamp: i64,
    pub previous_hash: String,
    pub hash: String,
    /// Present only on evacuation records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

/// Append-only, hash-linked audit log. `last_hash` starts at the genesis
/// value and advances with every `append`.
#[derive(Debug, Clone)]
pub struct AuditChain {
    records: Vec<AuditRecord>,
    last_hash: String,
}

impl Default for AuditChain {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditChain {
    #[must_use]
    pub fn new() -> Self {
        Self { records: Vec::new(), last_hash: sentinel_crypto::hash::genesis_hex() }
    }

    /// The hash the next appended record must chain from.
    #[must_use]
    pub fn last_hash(&self) -> &str {
        &self.last_hash
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rebuilds a chain view over a previously [`AuditChain::export`]ed
    /// record list, trusting the stored `hash`/`previous_hash` fields
    /// as-is rather than recomputing them. Used to re-verify a log that
    /// was persisted or transmitted elsewhere; [`AuditChain::verify`] still
    /// independently recomputes each record's hash from its own fields, so
    /// tampering anywhere in `records` is still detected.
    #[must_use]
    pub fn from_export(records: Vec<AuditRecord>) -> Self {
        let last_hash = records.last().map_or_else(sentinel_crypto::hash::genesis_hex, |r| r.hash.clone());
        Self { records, last_hash }
    }

    /// Appends a neutralization record, deriving its hash from the chain's
    /// current `last_hash` — the record's own `previous_hash` field is
    /// informational only and is not trusted as the chain link.
    ///
    /// # Errors
    /// Propagates a canonicalization failure, which is unreachable for the
    /// well-formed values this crate constructs but kept typed rather than
    /// panicking.
    pub fn append_neutralization(&mut self, record: &NeutralizationRecord) -> Result<&AuditRecord, SentinelError> {
        self.append(record.id.clone(), AuditRecordKind::Neutralization, record.signature.clone(), record.timestamp, None)
    }

    /// Appends an evacuation record, carrying its `destination` forward.
    ///
    /// # Errors
    /// See [`AuditChain::append_neutralization`].
    pub fn append_evacuation(&mut self, record: &EvacuateRecord) -> Result<&AuditRecord, SentinelError> {
        self.append(
            record.id.clone(),
            AuditRecordKind::Evacuation,
            record.signature.clone(),
            record.timestamp,
            Some(record.destination.clone()),
        )
    }

    fn append(
        &mut self,
        id: String,
        kind: AuditRecordKind,
        signature: Signature,
        timestamp: i64,
        destination: Option<String>,
    ) -> Result<&AuditRecord, SentinelError> {
        let previous_hash = self.last_hash.clone();
        let hash = Self::compute_hash(&id, signature.as_str(), timestamp, &previous_hash)?;
        let record = AuditRecord { id, kind, signature, timestamp, previous_hash, hash: hash.clone(), destination };
        self.records.push(record);
        self.last_hash = hash;
        Ok(self.records.last().expect("just pushed"))
    }

    fn compute_hash(id: &str, signature: &str, timestamp: i64, previous_hash: &str) -> Result<String, SentinelError> {
        let value = serde_json::json!({
            "id": id,
            "signature": signature,
            "timestamp": timestamp,
            "previousHash": previous_hash,
        });
        let payload = Payload::new(value)?;
        let encoded = sentinel_crypto::canonical::encode(&payload, usize::MAX)?;
        Ok(sentinel_crypto::hash::sha256_hex(encoded.bytes()))
    }

    /// Walks the chain from genesis, confirming every record's
    /// `previous_hash` matches its predecessor's `hash` and every record's
    /// `hash` matches a fresh recomputation. Tampering with any field of any
    /// stored record is detected.
    #[must_use]
    pub fn verify(&self) -> bool {
        let mut expected_previous = sentinel_crypto::hash::genesis_hex();
        for record in &self.records {
            if !sentinel_crypto::constant_time::bytes_eq(record.previous_hash.as_bytes(), expected_previous.as_bytes()) {
                return false;
            }
            let Ok(recomputed) = Self::compute_hash(&record.id, record.signature.as_str(), record.timestamp, &record.previous_hash)
            else {
                return false;
            };
            if !sentinel_crypto::constant_time::bytes_eq(recomputed.as_bytes(), record.hash.as_bytes()) {
                return false;
            }
            expected_previous = record.hash.clone();
        }
        true
    }

    /// A defensive copy of the full log, in append order.
    #[must_use]
    pub fn export(&self) -> Vec<AuditRecord> {
        self.records.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_types::ThreatCategory;

    fn sig(n: u8) -> Signature {
        let hex: String = format!("{n:02x}").chars().chain(std::iter::repeat('a')).take(64).collect();
        sentinel_crypto::signature::compose(ThreatCategory::Injection, &hex)
    }

    fn simple_sig() -> Signature {
        sentinel_crypto::signature::compose(ThreatCategory::Injection, &"a".repeat(64))
    }

    #[test]
    fn fresh_chain_starts_at_genesis_and_verifies() {
        let chain = AuditChain::new();
        assert_eq!(chain.last_hash(), sentinel_crypto::hash::genesis_hex());
        assert!(chain.verify());
        assert!(chain.is_empty());
    }

    #[test]
    fn append_links_to_previous_hash_and_advances() {
        let mut chain = AuditChain::new();
        let record = NeutralizationRecord {
            id: "n1".into(),
            signature: simple_sig(),
            hash: [0u8; 32],
            size: 10,
            timestamp: 1000,
            previous_hash: chain.last_hash().to_string(),
        };
        chain.append_neutralization(&record).unwrap();
        assert_eq!(chain.len(), 1);
        assert_ne!(chain.last_hash(), sentinel_crypto::hash::genesis_hex());
        assert!(chain.verify());
    }

    #[test]
    fn verify_detects_tampered_field() {
        let mut chain = AuditChain::new();
        let record = NeutralizationRecord {
            id: "n1".into(),
            signature: simple_sig(),
            hash: [0u8; 32],
            size: 10,
            timestamp: 1000,
            previous_hash: chain.last_hash().to_string(),
        };
        chain.append_neutralization(&record).unwrap();
        let mut exported = chain.export();
        exported[0].timestamp += 1;

        let mut tampered = AuditChain::new();
        tampered.records = exported;
        tampered.last_hash = tampered.records.last().unwrap().hash.clone();
        assert!(!tampered.verify());
    }

    #[test]
    fn evacuation_record_carries_destination() {
        let mut chain = AuditChain::new();
        let record = EvacuateRecord {
            id: "e1".into(),
            signature: simple_sig(),
            destination: "s3://bucket/key".into(),
            timestamp: 2000,
            compressed: false,
            size: 20,
        };
        let appended = chain.append_evacuation(&record).unwrap().clone();
        assert_eq!(appended.destination.as_deref(), Some("s3://bucket/key"));
        assert_eq!(appended.kind, AuditRecordKind::Evacuation);
        assert!(chain.verify());
    }

    #[test]
    fn multiple_appends_chain_correctly() {
        let mut chain = AuditChain::new();
        for i in 0..5 {
            let record = NeutralizationRecord {
                id: format!("n{i}"),
                signature: sig(i),
                hash: [0u8; 32],
                size: i as usize,
                timestamp: 1000 + i as i64,
                previous_hash: chain.last_hash().to_string(),
            };
            chain.append_neutralization(&record).unwrap();
        }
        assert_eq!(chain.len(), 5);
        assert!(chain.verify());
    }
}
