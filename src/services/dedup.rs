use std::collections::HashSet;
use std::sync::Mutex;

use crate::models::SlotIdentity;

/// Identities already announced by this process. Entries are never
/// removed and nothing is persisted.
#[derive(Debug, Default)]
pub struct DedupRegistry {
    seen: Mutex<HashSet<SlotIdentity>>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_seen(&self, identity: &SlotIdentity) -> bool {
        self.lock().contains(identity)
    }

    pub fn mark_seen(&self, identity: SlotIdentity) {
        self.lock().insert(identity);
    }

    /// Atomic check-then-mark. Returns `true` for exactly one caller per
    /// identity; every later or concurrent caller gets `false`.
    pub fn claim(&self, identity: &SlotIdentity) -> bool {
        let mut seen = self.lock();
        if seen.contains(identity) {
            return false;
        }
        seen.insert(identity.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<SlotIdentity>> {
        self.seen.lock().unwrap_or_else(|e| e.into_inner())
    }
}
