//! Model selection store
//!
//! The playground's current model, the marketplace filters, and the list
//! view mode. The one slice that survives restarts: serialized as JSON under
//! a fixed durable-store key on every set, reloaded on construction.

use super::Watchers;
use crate::error::Result;
use crate::storage::DurableStore;
use crate::sync::RwLockExt;
use crate::types::ModelFilters;
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use time::OffsetDateTime;

/// Durable-store key the slice is persisted under
pub const MODEL_SELECTION_KEY: &str = "console.model-selection";

/// Marketplace listing layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// The persisted slice
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelSelection {
    pub model: Option<String>,
    pub filters: ModelFilters,
    pub view: ViewMode,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub updated_at: Option<OffsetDateTime>,
}

/// Store for the current model selection
pub struct ModelSelectionStore {
    storage: Arc<dyn DurableStore>,
    state: RwLock<ModelSelection>,
    watchers: Watchers<ModelSelection>,
}

impl ModelSelectionStore {
    /// Load the persisted slice (corrupt or absent payloads start default)
    pub fn new(storage: Arc<dyn DurableStore>) -> Self {
        let state = match storage.get(MODEL_SELECTION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(e) => {
                    warn!("Discarding corrupt model selection: {e}");
                    ModelSelection::default()
                }
            },
            Ok(None) => ModelSelection::default(),
            Err(e) => {
                warn!("Failed to load model selection: {e}");
                ModelSelection::default()
            }
        };

        Self {
            storage,
            state: RwLock::new(state),
            watchers: Watchers::new(),
        }
    }

    /// Current slice values
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> ModelSelection {
        self.state.read_recovered().expect("Lock poisoned").clone()
    }

    /// Replace the selected model
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the slice fails.
    pub fn set_model(&self, model: Option<String>) -> Result<()> {
        self.update(|state| state.model = model)
    }

    /// Replace the marketplace filters
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the slice fails.
    pub fn set_filters(&self, filters: ModelFilters) -> Result<()> {
        self.update(|state| state.filters = filters)
    }

    /// Replace the view mode
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the slice fails.
    pub fn set_view(&self, view: ViewMode) -> Result<()> {
        self.update(|state| state.view = view)
    }

    /// Watch for slice changes
    pub fn watch<F>(&self, callback: F)
    where
        F: Fn(&ModelSelection) + Send + Sync + 'static,
    {
        self.watchers.watch(callback);
    }

    fn update(&self, apply: impl FnOnce(&mut ModelSelection)) -> Result<()> {
        let snapshot = {
            let mut state = self.state.write_recovered()?;
            apply(&mut state);
            state.updated_at = Some(OffsetDateTime::now_utc());
            state.clone()
        };
        self.storage
            .set(MODEL_SELECTION_KEY, &serde_json::to_string(&snapshot)?)?;
        self.watchers.notify(&snapshot);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_fields_set_independently() {
        let store = ModelSelectionStore::new(Arc::new(MemoryStore::new()));

        store.set_model(Some("llama-3-70b".into())).unwrap();
        store.set_view(ViewMode::List).unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.model.as_deref(), Some("llama-3-70b"));
        assert_eq!(snapshot.view, ViewMode::List);
        // Untouched field keeps its value
        assert_eq!(snapshot.filters, ModelFilters::default());
    }

    #[test]
    fn test_persists_and_reloads() {
        let storage: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());

        let store = ModelSelectionStore::new(storage.clone());
        store.set_model(Some("mixtral".into())).unwrap();

        let reloaded = ModelSelectionStore::new(storage);
        assert_eq!(reloaded.snapshot().model.as_deref(), Some("mixtral"));
        assert!(reloaded.snapshot().updated_at.is_some());
    }

    #[test]
    fn test_corrupt_payload_starts_default() {
        let storage: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());
        storage.set(MODEL_SELECTION_KEY, "{broken").unwrap();

        let store = ModelSelectionStore::new(storage);
        assert_eq!(store.snapshot(), ModelSelection::default());
    }

    #[test]
    fn test_watchers_see_new_snapshot() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let store = ModelSelectionStore::new(Arc::new(MemoryStore::new()));
        let seen = Arc::new(AtomicBool::new(false));
        let seen_clone = seen.clone();
        store.watch(move |snapshot| {
            if snapshot.model.as_deref() == Some("phi-4") {
                seen_clone.store(true, Ordering::SeqCst);
            }
        });

        store.set_model(Some("phi-4".into())).unwrap();
        assert!(seen.load(Ordering::SeqCst));
    }
}
