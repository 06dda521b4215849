//! Bounded, signature-keyed store of [`Evidence`] with priority/LRU/FIFO
//! eviction and deduplication.

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Arc;

use sentinel_types::{Severity, Signature};

use crate::audit::AuditChain;
use crate::clock::Clock;
use crate::cold_storage::ColdStorageAdapter;
use crate::evidence::Evidence;

/// Which victim a saturated quarantine selects for eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Lowest severity first, then oldest `captured` among ties. A
    /// candidate may only evict a victim of severity ≤ its own.
    Priority,
    /// Least-recently-read entry first (reads include both `get` and the
    /// dedup check on `submit`).
    Lru,
    /// Oldest-inserted entry first.
    Fifo,
}

#[derive(Debug, Clone, Copy)]
pub struct QuarantineConfig {
    pub max_count: usize,
    pub max_bytes: usize,
    pub eviction_policy: EvictionPolicy,
}

impl Default for QuarantineConfig {
    fn default() -> Self {
        Self { max_count: 10_000, max_bytes: 64 * 1024 * 1024, eviction_policy: EvictionPolicy::Priority }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    fn bump(&mut self, severity: Severity, delta: i64) {
        let field = match severity {
            Severity::Critical => &mut self.critical,
            Severity::High => &mut self.high,
            Severity::Medium => &mut self.medium,
            Severity::Low => &mut self.low,
        };
        *field = (*field as i64 + delta).max(0) as usize;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuarantineStats {
    pub count: usize,
    pub bytes: usize,
    pub by_severity: SeverityCounts,
    pub evictions: usize,
    pub deduplicated: usize,
}

/// Outcome of [`Quarantine::submit`]. The public `ok` field collapses
/// `Duplicate` and `Rejected` to the same externally-visible "ignored"
/// treatment the agent exposes, per the source's documented contract;
/// callers that need to tell them apart can match on `SubmitOutcome`
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Admitted,
    Duplicate,
    Rejected,
}

#[derive(Debug)]
pub struct SubmitResult {
    pub outcome: SubmitOutcome,
    pub signature: Signature,
}

struct Slot {
    evidence: Evidence,
    inserted_at_seq: u64,
    last_read_seq: Cell<u64>,
}

/// A read-only snapshot of one quarantined entry's metadata, exposed to
/// external consumers (e.g. `sentinel-cli`'s `inspect` command) that must
/// not get privileged access to the evidence internals itself (spec §4.8).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EvidenceSummary {
    pub signature: Signature,
    pub severity: Severity,
    pub captured: i64,
    pub size: usize,
    pub compressed: bool,
}

impl Slot {
    fn summary(&self, signature: &Signature) -> EvidenceSummary {
        EvidenceSummary {
            signature: signature.clone(),
            severity: self.evidence.severity(),
            captured: self.evidence.captured(),
            size: self.evidence.size(),
            compressed: self.evidence.compressed(),
        }
    }
}

/// Bounded store keyed by signature. Victim selection is a linear scan
/// over the entry map — `n` is bounded by `max_count`, so this stays cheap
/// without maintaining a separate ordered index that would need to track
/// every recency/priority update in lockstep.
pub struct Quarantine {
    entries: HashMap<Signature, Slot>,
    config: QuarantineConfig,
    stats: QuarantineStats,
    audit: AuditChain,
    clock: Arc<dyn Clock>,
    seq: u64,
}

impl Quarantine {
    #[must_use]
    pub fn new(config: QuarantineConfig, clock: Arc<dyn Clock>) -> Self {
        Self { entries: HashMap::new(), config, stats: QuarantineStats::default(), audit: AuditChain::new(), clock, seq: 0 }
    }

    #[must_use]
    pub fn stats(&self) -> QuarantineStats {
        self.stats
    }

    #[must_use]
    pub fn audit_chain(&self) -> &AuditChain {
        &self.audit
    }

    pub fn audit_chain_mut(&mut self) -> &mut AuditChain {
        &mut self.audit
    }

    /// Returns a borrowed view. Valid only until the next mutating call on
    /// this quarantine — enforced by the borrow checker, since the returned
    /// reference borrows `self`.
    pub fn get(&self, signature: &Signature) -> Option<&Evidence> {
        let slot = self.entries.get(signature)?;
        self.next_seq_for_read(slot);
        Some(&slot.evidence)
    }

    /// Read-only metadata for every quarantined entry, newest-inserted
    /// last. Does not touch LRU recency bookkeeping — unlike [`Self::get`],
    /// listing entries is not itself "a read" of any one entry.
    #[must_use]
    pub fn summaries(&self) -> Vec<EvidenceSummary> {
        let mut items: Vec<(&Signature, &Slot)> = self.entries.iter().collect();
        items.sort_by_key(|(_, slot)| slot.inserted_at_seq);
        items.into_iter().map(|(sig, slot)| slot.summary(sig)).collect()
    }

    /// Read-only metadata for a single entry, if present.
    #[must_use]
    pub fn summary_for(&self, signature: &Signature) -> Option<EvidenceSummary> {
        self.entries.get(signature).map(|slot| slot.summary(signature))
    }

    fn next_seq_for_read(&self, slot: &Slot) {
        // `get` only reads; recency bookkeeping for LRU still needs to
        // advance through the shared reference, so the counter lives in a
        // `Cell` rather than requiring `&mut self` here.
        slot.last_read_seq.set(self.seq);
    }

    /// Inserts `evidence`, evicting victims under `evictionPolicy` if the
    /// quarantine is saturated. Deduplicates on signature.
    ///
    /// # Errors
    /// Propagates a canonicalization failure from the audit chain, which is
    /// unreachable for the well-formed values this crate constructs.
    pub fn submit(&mut self, evidence: Evidence) -> Result<SubmitResult, sentinel_types::SentinelError> {
        let signature = evidence.signature().clone();

        if let Some(existing) = self.entries.get(&signature) {
            self.next_seq_for_read(existing);
            self.stats.deduplicated += 1;
            tracing::info!(signature = %signature, "duplicate scent ignored");
            return Ok(SubmitResult { outcome: SubmitOutcome::Duplicate, signature });
        }

        while self.is_saturated(evidence.size()) {
            let Some(victim_signature) = self.select_victim(evidence.severity()) else {
                tracing::warn!(signature = %signature, "no admissible eviction victim; rejecting new evidence");
                return Ok(SubmitResult { outcome: SubmitOutcome::Rejected, signature });
            };
            self.evict(&victim_signature)?;
        }

        self.seq += 1;
        let seq = self.seq;
        let size = evidence.size();
        let severity = evidence.severity();
        self.entries.insert(
            signature.clone(),
            Slot { evidence, inserted_at_seq: seq, last_read_seq: Cell::new(seq) },
        );
        self.stats.count += 1;
        self.stats.bytes += size;
        self.stats.by_severity.bump(severity, 1);
        tracing::info!(signature = %signature, severity = %severity, "evidence quarantined");
        Ok(SubmitResult { outcome: SubmitOutcome::Admitted, signature })
    }

    fn is_saturated(&self, incoming_size: usize) -> bool {
        self.entries.len() >= self.config.max_count || self.stats.bytes + incoming_size > self.config.max_bytes
    }

    fn select_victim(&self, candidate_severity: Severity) -> Option<Signature> {
        match self.config.eviction_policy {
            EvictionPolicy::Priority => self
                .entries
                .iter()
                .filter(|(_, slot)| slot.evidence.severity() <= candidate_severity)
                .min_by_key(|(_, slot)| (slot.evidence.severity(), slot.evidence.captured()))
                .map(|(sig, _)| sig.clone()),
            EvictionPolicy::Lru => self
                .entries
                .iter()
                .min_by_key(|(_, slot)| slot.last_read_seq.get())
                .map(|(sig, _)| sig.clone()),
            EvictionPolicy::Fifo => self
                .entries
                .iter()
                .min_by_key(|(_, slot)| slot.inserted_at_seq)
                .map(|(sig, _)| sig.clone()),
        }
    }

    fn evict(&mut self, signature: &Signature) -> Result<(), sentinel_types::SentinelError> {
        let mut slot = self.entries.remove(signature).expect("victim must be present");
        let severity = slot.evidence.severity();
        let previous_hash = self.audit.last_hash().to_string();
        let record = slot.evidence.neutralize(self.clock.now_ms(), previous_hash)?;
        self.audit.append_neutralization(&record)?;
        self.stats.count -= 1;
        self.stats.bytes -= record.size.min(self.stats.bytes);
        self.stats.by_severity.bump(severity, -1);
        self.stats.evictions += 1;
        tracing::info!(signature = %signature, "evidence evicted");
        Ok(())
    }

    /// Neutralizes the entry for `signature` in place without making room
    /// for anything new. Used for caller-driven disposal (e.g. an operator
    /// clearing a specific entry) rather than eviction pressure.
    ///
    /// # Errors
    /// `None` (via the returned `Option`) if no entry exists for
    /// `signature`; otherwise propagates audit-chain errors.
    pub fn neutralize(&mut self, signature: &Signature) -> Option<Result<(), sentinel_types::SentinelError>> {
        if !self.entries.contains_key(signature) {
            return None;
        }
        Some(self.evict(signature))
    }

    /// Removes the entry for `signature`, hands its bytes to `cold_storage`
    /// fire-and-forget, and appends an evacuation record.
    ///
    /// # Errors
    /// [`sentinel_types::SentinelError::EvidenceAlreadyDisposed`] is
    /// unreachable here since the entry is only ever touched once; returns
    /// `Ok(false)` if no entry exists for `signature`.
    pub fn evacuate(
        &mut self,
        signature: &Signature,
        destination: &str,
        cold_storage: &dyn ColdStorageAdapter,
    ) -> Result<bool, sentinel_types::SentinelError> {
        let Some(mut slot) = self.entries.remove(signature) else {
            return Ok(false);
        };
        let size = slot.evidence.size();
        let severity = slot.evidence.severity();
        let (record, bytes) = slot.evidence.evacuate(destination, self.clock.now_ms())?;
        self.audit.append_evacuation(&record)?;
        cold_storage.write(signature.as_str(), bytes);
        self.stats.count -= 1;
        self.stats.bytes -= size.min(self.stats.bytes);
        self.stats.by_severity.bump(severity, -1);
        tracing::info!(signature = %signature, destination, "evidence evacuated");
        Ok(true)
    }
}
