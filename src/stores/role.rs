//! Workspace role store
//!
//! One closed enumeration with a single parse function, instead of three
//! independent booleans that could drift into overlapping truth. The raw
//! role string lives in durable storage (written at sign-in); `recompute`
//! re-derives the enum from it.

use super::Watchers;
use crate::error::Result;
use crate::storage::DurableStore;
use crate::sync::RwLockExt;
use std::sync::{Arc, RwLock};

/// Durable-store key the raw role string lives under
pub const ROLE_KEY: &str = "console.workspace-role";

/// The caller's role in the current workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    Admin,
    Owner,
    User,
    /// Anything unrecognized, including "never signed in"
    #[default]
    Unknown,
}

impl Role {
    /// Case-insensitive match against the known role strings
    #[must_use]
    pub fn parse(raw: &str) -> Role {
        if raw.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else if raw.eq_ignore_ascii_case("owner") {
            Role::Owner
        } else if raw.eq_ignore_ascii_case("user") {
            Role::User
        } else {
            Role::Unknown
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    #[must_use]
    pub fn is_owner(&self) -> bool {
        matches!(self, Role::Owner)
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        matches!(self, Role::User)
    }
}

/// Store deriving the role flags from the persisted role string
pub struct RoleStore {
    storage: Arc<dyn DurableStore>,
    role: RwLock<Role>,
    watchers: Watchers<Role>,
}

impl RoleStore {
    /// Build the store and derive the current role from durable storage
    pub fn new(storage: Arc<dyn DurableStore>) -> Self {
        let store = Self {
            storage,
            role: RwLock::new(Role::Unknown),
            watchers: Watchers::new(),
        };
        if let Err(e) = store.recompute() {
            log::warn!("Failed to derive workspace role: {e}");
        }
        store
    }

    /// Current role
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn role(&self) -> Role {
        *self.role.read_recovered().expect("Lock poisoned")
    }

    /// Persist a raw role string (as received at sign-in) and re-derive
    ///
    /// # Errors
    ///
    /// Returns an error if the durable store fails to persist.
    pub fn remember(&self, raw: &str) -> Result<()> {
        self.storage.set(ROLE_KEY, raw)?;
        self.recompute()?;
        Ok(())
    }

    /// Re-derive the role from the durable value
    ///
    /// A missing value derives [`Role::Unknown`].
    ///
    /// # Errors
    ///
    /// Returns an error if the durable store fails to read.
    pub fn recompute(&self) -> Result<Role> {
        let role = self
            .storage
            .get(ROLE_KEY)?
            .map_or(Role::Unknown, |raw| Role::parse(&raw));
        {
            let mut current = self.role.write_recovered()?;
            *current = role;
        }
        self.watchers.notify(&role);
        Ok(role)
    }

    /// Watch for role changes
    pub fn watch<F>(&self, callback: F)
    where
        F: Fn(&Role) + Send + Sync + 'static,
    {
        self.watchers.watch(callback);
    }
}

// =============================================================================
// Tests
// =============================================================================
