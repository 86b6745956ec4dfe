//! Cluster onboarding wizard store
//!
//! Session-only state shared across the wizard's routes; nothing here is
//! persisted.

use super::Watchers;
use crate::error::Result;
use crate::sync::RwLockExt;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// One VM the wizard will provision into the new cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardVm {
    pub name: String,
    pub cpus: u32,
    pub memory_gb: u32,
}

/// The wizard's accumulated state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OnboardingState {
    pub vms: Vec<OnboardVm>,
    pub account_id: Option<String>,
}

/// Store for the onboarding wizard
pub struct OnboardingStore {
    state: RwLock<OnboardingState>,
    watchers: Watchers<OnboardingState>,
}

impl OnboardingStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(OnboardingState::default()),
            watchers: Watchers::new(),
        }
    }

    /// Current wizard state
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> OnboardingState {
        self.state.read_recovered().expect("Lock poisoned").clone()
    }

    /// Replace the VM list
    ///
    /// # Errors
    ///
    /// Returns an error only on lock poisoning.
    pub fn set_vms(&self, vms: Vec<OnboardVm>) -> Result<()> {
        self.update(|state| state.vms = vms)
    }

    /// Replace the billing account id
    ///
    /// # Errors
    ///
    /// Returns an error only on lock poisoning.
    pub fn set_account_id(&self, account_id: Option<String>) -> Result<()> {
        self.update(|state| state.account_id = account_id)
    }

    /// Reset the wizard (leaving it or finishing it)
    ///
    /// # Errors
    ///
    /// Returns an error only on lock poisoning.
    pub fn reset(&self) -> Result<()> {
        self.update(|state| *state = OnboardingState::default())
    }

    /// Watch for wizard-state changes
    pub fn watch<F>(&self, callback: F)
    where
        F: Fn(&OnboardingState) + Send + Sync + 'static,
    {
        self.watchers.watch(callback);
    }

    fn update(&self, apply: impl FnOnce(&mut OnboardingState)) -> Result<()> {
        let snapshot = {
            let mut state = self.state.write_recovered()?;
            apply(&mut state);
            state.clone()
        };
        self.watchers.notify(&snapshot);
        Ok(())
    }
}

impl Default for OnboardingStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_set_independently() {
        let store = OnboardingStore::new();

        store
            .set_vms(vec![OnboardVm {
                name: "worker-1".into(),
                cpus: 8,
                memory_gb: 32,
            }])
            .unwrap();
        store.set_account_id(Some("acct-9".into())).unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.vms.len(), 1);
        assert_eq!(snapshot.account_id.as_deref(), Some("acct-9"));

        // Replacing one field leaves the other untouched
        store.set_account_id(None).unwrap();
        assert_eq!(store.snapshot().vms.len(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let store = OnboardingStore::new();
        store.set_account_id(Some("acct-1".into())).unwrap();
        store.reset().unwrap();
        assert_eq!(store.snapshot(), OnboardingState::default());
    }
}
