//! Run-scoped identifier uniqueness.
//!
//! One `UuidSet` spans however many documents share a uniqueness domain.
//! The set is `Mutex`-protected so parallel per-file workers can share it;
//! a pipeline processing documents independently just creates one per run.

use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct UuidSet {
    claimed: Mutex<HashSet<Uuid>>,
}

impl UuidSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id` for this run. Returns `false` when it was already claimed.
    pub fn claim(&self, id: Uuid) -> bool {
        match self.claimed.lock() {
            Ok(mut set) => set.insert(id),
            Err(poisoned) => poisoned.into_inner().insert(id),
        }
    }

    pub fn len(&self) -> usize {
        match self.claimed.lock() {
            Ok(set) => set.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
