//! The `ColdStorageAdapter` interface evacuated evidence is handed off to.
//!
//! A durable backend is an external collaborator per spec §1/§4.8 and is
//! not implemented here. `InMemoryColdStorage` exists so `Quarantine::evacuate`
//! and the CLI demo have something to hand bytes to in tests.

use std::collections::HashMap;
use std::sync::Mutex;

/// Fire-and-forget sink for evacuated evidence bytes. `write` never
/// returns a `Result` on purpose: failures are the adapter's problem to log
/// and never propagate into the data path (spec §4.8, §5).
pub trait ColdStorageAdapter: Send + Sync {
    fn write(&self, signature: &str, payload: Vec<u8>);
    fn read(&self, signature: &str) -> Option<Vec<u8>>;
    fn delete(&self, signature: &str);
    fn is_available(&self) -> bool;
}

/// An in-process stand-in for a durable backend. Not a product surface —
/// evidence evacuated here does not survive process restart.
#[derive(Debug, Default)]
pub struct InMemoryColdStorage {
    inner: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryColdStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ColdStorageAdapter for InMemoryColdStorage {
    fn write(&self, signature: &str, payload: Vec<u8>) {
        match self.inner.lock() {
            Ok(mut guard) => {
                guard.insert(signature.to_string(), payload);
            }
            Err(_) => {
                tracing::error!(signature, "cold storage lock poisoned; write dropped");
            }
        }
    }

    fn read(&self, signature: &str) -> Option<Vec<u8>> {
        self.inner.lock().ok()?.get(signature).cloned()
    }

    fn delete(&self, signature: &str) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.remove(signature);
        }
    }

    fn is_available(&self) -> bool {
        true
    }
}
