//! Interception pipeline for the Sentinel security buffer.
//!
//! Wires together the canonical-encoding and signing primitives from
//! `sentinel-crypto` with the stateful components that make up one
//! process-local [`agent::Agent`]: a bounded [`quarantine::Quarantine`], a
//! sliding-window [`rate_limiter::RateLimiter`], and a hash-linked
//! [`audit::AuditChain`].

pub mod agent;
pub mod audit;
pub mod clock;
pub mod codec;
pub mod cold_storage;
pub mod config;
pub mod evidence;
pub mod factory;
pub mod quarantine;
pub mod rate_limiter;

pub use agent::{Agent, AgentConfig, AgentStats, InterceptResult};
pub use audit::{AuditChain, AuditRecord, AuditRecordKind};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{Codec, IdentityCodec};
pub use cold_storage::{ColdStorageAdapter, InMemoryColdStorage};
pub use config::SentinelConfig;
pub use evidence::{EvacuateRecord, Evidence, NeutralizationRecord};
pub use factory::EvidenceFactory;
pub use quarantine::{EvictionPolicy, EvidenceSummary, Quarantine, QuarantineConfig, QuarantineStats, SubmitOutcome, SubmitResult};
pub use rate_limiter::{Admission, RateLimitConfig, RateLimiter, RateLimiterStats};
