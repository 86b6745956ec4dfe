//! Cross-route UI state stores
//!
//! Explicit state containers: construct an instance, inject it where needed.
//! Each store exposes a snapshot, independent per-field setters
//! (unconditional replace - setting one field never touches another), and
//! `watch` subscriptions.

mod model_selection;
mod onboarding;
mod role;

pub use model_selection::{ModelSelection, ModelSelectionStore, ViewMode, MODEL_SELECTION_KEY};
pub use onboarding::{OnboardVm, OnboardingState, OnboardingStore};
pub use role::{Role, RoleStore, ROLE_KEY};

use crate::sync::RwLockExt;
use std::sync::{Arc, RwLock};

/// Snapshot callback registered on a store
pub type WatchCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Listener list shared by every store
pub(crate) struct Watchers<T> {
    listeners: RwLock<Vec<WatchCallback<T>>>,
}

impl<T> Watchers<T> {
    pub(crate) fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Register a listener, called with each new snapshot after a set
    pub(crate) fn watch<F>(&self, callback: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.write_recovered().expect("Lock poisoned");
        listeners.push(Arc::new(callback));
    }

    /// Notify all listeners of a new snapshot
    pub(crate) fn notify(&self, snapshot: &T) {
        let listeners = self.listeners.read_recovered().expect("Lock poisoned");
        for listener in listeners.iter() {
            listener(snapshot);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
