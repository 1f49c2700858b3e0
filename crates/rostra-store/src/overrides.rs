//! Persistence for the override patch set.

use std::sync::Arc;

use rostra_core::{PatchSet, Result};

use crate::local::{LocalStore, OVERRIDES_KEY};

/// Reads and writes the patch set under its well-known key.
///
/// `read` never fails: a missing key is an empty patch set and corrupt
/// stored data is treated the same way (logged, never fatal). `write`
/// replaces the whole stored value; partial writes are never visible.
#[derive(Clone)]
pub struct OverrideStore {
    store: Arc<dyn LocalStore>,
}

impl OverrideStore {
    /// Wrap a local store.
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// The persisted patch set, or an empty one when unset or unreadable.
    pub fn read(&self) -> PatchSet {
        let raw = match self.store.get(OVERRIDES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return PatchSet::new(),
            Err(e) => {
                log::warn!("override store unreadable, treating as empty: {e}");
                return PatchSet::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(set) => set,
            Err(e) => {
                log::warn!("stored override data is corrupt, treating as empty: {e}");
                PatchSet::new()
            }
        }
    }

    /// Replace the persisted patch set.
    pub fn write(&self, patches: &PatchSet) -> Result<()> {
        let raw = serde_json::to_string(patches)?;
        self.store.put(OVERRIDES_KEY, &raw)
    }

    /// Drop the persisted patch set entirely.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(OVERRIDES_KEY)
    }
}
