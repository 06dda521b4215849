//! Owned, single-consumer evidence records and their destruction snapshots.

use sentinel_types::{Severity, Signature};
use uuid::Uuid;

/// An owned record produced from a scent. Owned exclusively by the
/// [`crate::quarantine::Quarantine`] from insert until destruction.
///
/// `bytes` is non-empty at construction. For uncompressed evidence,
/// `hash(bytes) == hash` is re-verified in [`Evidence::new`]; compressed
/// evidence trusts the hash recorded against the pre-compression content,
/// since the compressed bytes themselves hash to something else entirely.
/// Once disposed, every accessor except [`Evidence::disposed`] fails.
#[derive(Debug)]
pub struct Evidence {
    signature: Signature,
    hash: [u8; 32],
    severity: Severity,
    captured: i64,
    bytes: Option<Vec<u8>>,
    compressed: bool,
    disposed: bool,
}

/// Snapshot produced by [`Evidence::neutralize`], fed into the audit chain.
#[derive(Debug, Clone)]
pub struct NeutralizationRecord {
    pub id: String,
    pub signature: Signature,
    pub hash: [u8; 32],
    pub size: usize,
    pub timestamp: i64,
    pub previous_hash: String,
}

/// Snapshot produced by [`Evidence::evacuate`], fed into the audit chain.
#[derive(Debug, Clone)]
pub struct EvacuateRecord {
    pub id: String,
    pub signature: Signature,
    pub destination: String,
    pub timestamp: i64,
    pub compressed: bool,
    pub size: usize,
}

use sentinel_types::SentinelError;

impl Evidence {
    /// Constructs evidence from already-encoded (and possibly compressed)
    /// bytes. `bytes` must be non-empty. When `compressed` is false, the
    /// hash is independently recomputed and checked against `hash`.
    pub(crate) fn new(
        bytes: Vec<u8>,
        signature: Signature,
        hash: [u8; 32],
        severity: Severity,
        captured: i64,
        compressed: bool,
    ) -> Result<Self, SentinelError> {
        if bytes.is_empty() {
            return Err(SentinelError::Internal("evidence bytes must be non-empty".into()));
        }
        if !compressed {
            let actual = sentinel_crypto::hash::sha256(&bytes);
            if !sentinel_crypto::constant_time::bytes_eq(&actual, &hash) {
                return Err(SentinelError::HashMismatch);
            }
        }
        Ok(Self { signature, hash, severity, captured, bytes: Some(bytes), compressed, disposed: false })
    }

    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    #[must_use]
    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn captured(&self) -> i64 {
        self.captured
    }

    #[must_use]
    pub fn compressed(&self) -> bool {
        self.compressed
    }

    #[must_use]
    pub fn disposed(&self) -> bool {
        self.disposed
    }

    /// Current buffer size. Zero once disposed.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.as_ref().map_or(0, Vec::len)
    }

    /// Read access to the stored bytes.
    ///
    /// # Errors
    /// [`SentinelError::EvidenceAlreadyDisposed`] if the evidence was
    /// already consumed.
    pub fn bytes(&self) -> Result<&[u8], SentinelError> {
        self.bytes.as_deref().ok_or(SentinelError::EvidenceAlreadyDisposed)
    }

    /// Moves ownership of the buffer out to the caller, disposing this
    /// handle. Subsequent calls to any accessor (other than `disposed`)
    /// fail.
    ///
    /// # Errors
    /// [`SentinelError::EvidenceAlreadyDisposed`] if already disposed.
    pub fn transfer(&mut self) -> Result<Vec<u8>, SentinelError> {
        let bytes = self.bytes.take().ok_or(SentinelError::EvidenceAlreadyDisposed)?;
        self.disposed = true;
        Ok(bytes)
    }

    /// Atomically snapshots then destroys this evidence in place. No
    /// suspension point separates the snapshot from the drop — this
    /// function body is fully synchronous.
    ///
    /// # Errors
    /// [`SentinelError::EvidenceAlreadyDisposed`] if already disposed.
    pub fn neutralize(
        &mut self,
        now: i64,
        previous_hash: impl Into<String>,
    ) -> Result<NeutralizationRecord, SentinelError> {
        if self.disposed {
            return Err(SentinelError::EvidenceAlreadyDisposed);
        }
        let record = NeutralizationRecord {
            id: Uuid::new_v4().to_string(),
            signature: self.signature.clone(),
            hash: self.hash,
            size: self.size(),
            timestamp: now,
            previous_hash: previous_hash.into(),
        };
        self.bytes = None;
        self.disposed = true;
        Ok(record)
    }

    /// Atomically snapshots and transfers this evidence for handoff to
    /// cold storage. Returns the snapshot alongside the raw bytes the
    /// caller must forward to a [`crate::cold_storage::ColdStorageAdapter`].
    ///
    /// # Errors
    /// [`SentinelError::EvidenceAlreadyDisposed`] if already disposed.
    pub fn evacuate(
        &mut self,
        destination: impl Into<String>,
        now: i64,
    ) -> Result<(EvacuateRecord, Vec<u8>), SentinelError> {
        if self.disposed {
            return Err(SentinelError::EvidenceAlreadyDisposed);
        }
        let compressed = self.compressed;
        let size = self.size();
        let bytes = self.bytes.take().ok_or(SentinelError::EvidenceAlreadyDisposed)?;
        self.disposed = true;
        let record = EvacuateRecord {
            id: Uuid::new_v4().to_string(),
            signature: self.signature.clone(),
            destination: destination.into(),
            timestamp: now,
            compressed,
            size,
        };
        Ok((record, bytes))
    }
}
