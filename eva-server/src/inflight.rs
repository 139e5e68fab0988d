//! Duplicate-submission guard
//!
//! Save, dispatch and decision requests hold a key for as long as they run.
//! A second request with the same key is refused until the first finishes.

use dashmap::DashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct InFlight {
    keys: Arc<DashSet<String>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `key`; `None` while another holder has it
    pub fn try_acquire(&self, key: impl Into<String>) -> Option<InFlightGuard> {
        let key = key.into();
        if !self.keys.insert(key.clone()) {
            tracing::debug!(key = %key, "Operation already in progress");
            return None;
        }
        Some(InFlightGuard {
            keys: self.keys.clone(),
            key,
        })
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

/// Releases its key on drop
#[derive(Debug)]
pub struct InFlightGuard {
    keys: Arc<DashSet<String>>,
    key: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.keys.remove(&self.key);
    }
}
