//! Builder for [`Console`]

use super::Console;
use crate::api::{
    AuthClient, ClustersClient, DeploymentsClient, ModelsClient, ProjectsClient, ServersClient,
    WorkspaceClient,
};
use crate::error::{Error, Result};
use crate::notify::{LogNotifier, Notifier};
use crate::query::{CacheStrategy, InvalidationMap, QueryCache};
use crate::storage::{DurableStore, JsonFileStore};
use crate::stores::{ModelSelectionStore, OnboardingStore, RoleStore};
use crate::token::TokenStore;
use crate::transport::HttpTransport;
use log::info;
use std::sync::Arc;
use std::time::Duration;

/// Fluent construction of a [`Console`]
///
/// # Example
///
/// ```rust,no_run
/// use opsdeck::{CacheStrategy, Console, MemoryTransport};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let console = Console::builder("my-console", Arc::new(MemoryTransport::new()))
///     .cache_strategy(CacheStrategy::Lru(256))
///     .stale_after(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// # let _ = console;
/// ```
pub struct ConsoleBuilder {
    app_name: String,
    transport: Arc<dyn HttpTransport>,
    notifier: Arc<dyn Notifier>,
    durable: Option<Arc<dyn DurableStore>>,
    strategy: CacheStrategy,
    stale_after: Option<Duration>,
    invalidations: InvalidationMap,
    #[cfg(feature = "keychain")]
    keychain_tokens: bool,
}

impl ConsoleBuilder {
    /// Create a new builder with the required app name and transport
    pub fn new(app_name: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            app_name: app_name.into(),
            transport,
            notifier: Arc::new(LogNotifier),
            durable: None,
            strategy: CacheStrategy::Full,
            stale_after: None,
            invalidations: InvalidationMap::declared(),
            #[cfg(feature = "keychain")]
            keychain_tokens: false,
        }
    }

    /// Route notifications to a custom sink (default: the `log` facade)
    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Use a custom durable store (default: `state.json` under the app's
    /// config directory)
    #[must_use]
    pub fn durable(mut self, durable: Arc<dyn DurableStore>) -> Self {
        self.durable = Some(durable);
        self
    }

    /// Set the cache eviction strategy (default: keep everything)
    #[must_use]
    pub fn cache_strategy(mut self, strategy: CacheStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Age past which a cached entry is refetched on read
    ///
    /// Without this, entries stay fresh until a mutation invalidates them.
    #[must_use]
    pub fn stale_after(mut self, window: Duration) -> Self {
        self.stale_after = Some(window);
        self
    }

    /// Replace the declared invalidation table
    ///
    /// `build` rejects a table that leaves any write op undeclared.
    #[must_use]
    pub fn invalidations(mut self, invalidations: InvalidationMap) -> Self {
        self.invalidations = invalidations;
        self
    }

    /// Keep the auth token in the OS keychain instead of the durable store
    #[cfg(feature = "keychain")]
    #[must_use]
    pub fn keychain_tokens(mut self) -> Self {
        self.keychain_tokens = true;
        self
    }

    /// Build the console
    ///
    /// # Errors
    ///
    /// Returns an error if the cache strategy is invalid, the invalidation
    /// table leaves a write op undeclared, or the durable store cannot be
    /// opened.
    pub fn build(self) -> Result<Console> {
        let missing = self.invalidations.missing_ops();
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "invalidation table leaves write ops undeclared: {missing:?}"
            )));
        }

        let cache = Arc::new(QueryCache::new(self.strategy, self.stale_after)?);

        let durable: Arc<dyn DurableStore> = match self.durable {
            Some(store) => store,
            None => Arc::new(JsonFileStore::for_app(&self.app_name)?),
        };

        #[cfg(feature = "keychain")]
        let tokens = if self.keychain_tokens {
            TokenStore::with_keychain(durable.clone(), self.app_name.clone())
        } else {
            TokenStore::new(durable.clone())
        };
        #[cfg(not(feature = "keychain"))]
        let tokens = TokenStore::new(durable.clone());

        let transport = self.transport;

        info!("Initialized opsdeck console '{}'", self.app_name);

        Ok(Console {
            cache,
            notifier: self.notifier,
            tokens,
            invalidations: Arc::new(self.invalidations),

            clusters: ClustersClient::new(transport.clone()),
            deployments: DeploymentsClient::new(transport.clone()),
            projects: ProjectsClient::new(transport.clone()),
            servers: ServersClient::new(transport.clone()),
            workspace: WorkspaceClient::new(transport.clone()),
            models: ModelsClient::new(transport.clone()),
            auth: AuthClient::new(transport.clone()),

            model_selection: Arc::new(ModelSelectionStore::new(durable.clone())),
            onboarding: Arc::new(OnboardingStore::new()),
            roles: Arc::new(RoleStore::new(durable.clone())),

            durable,
            transport,
        })
    }
}
