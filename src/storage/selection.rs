//! Persisted "last selected suggestion" slot

use super::KeyValueStore;
use crate::error::StorageError;
use crate::suburbs::StoredSelection;
use tracing::warn;

/// Well-known key of the stored selection
pub const SELECTED_SUGGESTION_KEY: &str = "settly:selectedSuggestion";

/// Reads and writes the single stored selection
pub struct SelectionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SelectionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Overwrite the stored selection
    pub fn save(&self, selection: &StoredSelection) -> Result<(), StorageError> {
        let json = serde_json::to_string(selection)?;
        self.store.set(SELECTED_SUGGESTION_KEY, json)
    }

    /// Read the stored selection; absence and corruption both read as `None`
    pub fn load(&self) -> Option<StoredSelection> {
        let raw = match self.store.get(SELECTED_SUGGESTION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read stored selection: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(selection) => Some(selection),
            Err(e) => {
                warn!("Discarding malformed stored selection: {}", e);
                None
            }
        }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }
}
