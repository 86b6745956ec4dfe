//! Auth token persistence
//!
//! The login mutation stores the session token here on success, before any
//! notification fires; API consumers read it back when wiring their wire
//! client. Default backend is the durable store; the `keychain` feature
//! routes the token to the OS keychain instead.

use crate::error::Result;
use crate::storage::DurableStore;
use log::debug;
use std::sync::Arc;

#[cfg(feature = "keychain")]
use crate::error::Error;
#[cfg(feature = "keychain")]
use log::info;

/// Durable-store key the token lives under
pub const TOKEN_KEY: &str = "console.auth-token";

/// Persistent holder for the session auth token
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn DurableStore>,
    #[cfg(feature = "keychain")]
    service_name: Option<String>,
}

impl TokenStore {
    /// Token store backed by the given durable store
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self {
            store,
            #[cfg(feature = "keychain")]
            service_name: None,
        }
    }

    /// Token store backed by the OS keychain under `service_name`
    ///
    /// The durable store is still required as the carrier for non-secret
    /// state; only the token itself moves to the keychain.
    #[cfg(feature = "keychain")]
    pub fn with_keychain(store: Arc<dyn DurableStore>, service_name: impl Into<String>) -> Self {
        info!("Keychain-backed token storage enabled");
        Self {
            store,
            service_name: Some(service_name.into()),
        }
    }

    /// Current token, `None` when signed out
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails to read.
    pub fn token(&self) -> Result<Option<String>> {
        #[cfg(feature = "keychain")]
        if let Some(service) = &self.service_name {
            return match self.entry(service)?.get_password() {
                Ok(token) => Ok(Some(token)),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(e) => Err(Error::Credential(e.to_string())),
            };
        }
        self.store.get(TOKEN_KEY)
    }

    /// Store a new token, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails to persist.
    pub fn set_token(&self, token: &str) -> Result<()> {
        #[cfg(feature = "keychain")]
        if let Some(service) = &self.service_name {
            self.entry(service)?
                .set_password(token)
                .map_err(|e| Error::Credential(e.to_string()))?;
            debug!("Auth token stored in keychain");
            return Ok(());
        }
        self.store.set(TOKEN_KEY, token)?;
        debug!("Auth token stored");
        Ok(())
    }

    /// Drop the stored token (sign-out)
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails to persist.
    pub fn clear(&self) -> Result<()> {
        #[cfg(feature = "keychain")]
        if let Some(service) = &self.service_name {
            return match self.entry(service)?.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                Err(e) => Err(Error::Credential(e.to_string())),
            };
        }
        self.store.remove(TOKEN_KEY)
    }

    #[cfg(feature = "keychain")]
    fn entry(&self, service: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(service, TOKEN_KEY).map_err(|e| Error::Credential(e.to_string()))
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
    fn test_token_roundtrip() {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));

        assert_eq!(tokens.token().unwrap(), None);
        tokens.set_token("jwt-abc").unwrap();
        assert_eq!(tokens.token().unwrap(), Some("jwt-abc".to_string()));

        tokens.clear().unwrap();
        assert_eq!(tokens.token().unwrap(), None);
    }
}
