//! The console: one object tying the data layer together
//!
//! Owns the transport, the query cache, the notifier, durable storage, the
//! token store, every resource client, and the UI state stores. Built with
//! [`ConsoleBuilder`]; read-query constructors live in `reads`, mutation
//! constructors in `writes`.

mod builder;
mod reads;
mod writes;

pub use builder::ConsoleBuilder;

use crate::api::{
    AuthClient, ClustersClient, DeploymentsClient, ModelsClient, ProjectsClient, ServersClient,
    WorkspaceClient,
};
use crate::notify::Notifier;
use crate::query::{InvalidationMap, QueryCache};
use crate::storage::DurableStore;
use crate::stores::{ModelSelectionStore, OnboardingStore, RoleStore};
use crate::token::TokenStore;
use crate::transport::HttpTransport;
use std::sync::Arc;

/// Entry point for the console data layer
///
/// # Example
///
/// ```rust,no_run
/// use opsdeck::{Console, MemoryTransport};
/// use std::sync::Arc;
///
/// let transport = Arc::new(MemoryTransport::new());
/// let console = Console::builder("my-console", transport)
///     .build()
///     .unwrap();
///
/// // Route loader: warm the cache before render
/// console.prefetch(&[opsdeck::query::descriptors::clusters(console.clusters())]);
///
/// // Component: same descriptor, same cache slot - no second fetch
/// let clusters = console.clusters_query().read().unwrap();
/// # let _ = clusters;
/// ```
pub struct Console {
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) cache: Arc<QueryCache>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) durable: Arc<dyn DurableStore>,
    pub(crate) tokens: TokenStore,
    pub(crate) invalidations: Arc<InvalidationMap>,

    pub(crate) clusters: ClustersClient,
    pub(crate) deployments: DeploymentsClient,
    pub(crate) projects: ProjectsClient,
    pub(crate) servers: ServersClient,
    pub(crate) workspace: WorkspaceClient,
    pub(crate) models: ModelsClient,
    pub(crate) auth: AuthClient,

    pub(crate) model_selection: Arc<ModelSelectionStore>,
    pub(crate) onboarding: Arc<OnboardingStore>,
    pub(crate) roles: Arc<RoleStore>,
}

impl Console {
    /// Create a builder with a fluent API (the recommended way)
    pub fn builder(
        app_name: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> ConsoleBuilder {
        ConsoleBuilder::new(app_name, transport)
    }

    /// The shared query cache
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// The wire transport the clients talk through
    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    /// Durable key-value storage
    pub fn durable(&self) -> &Arc<dyn DurableStore> {
        &self.durable
    }

    /// The auth token store
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    // =========================================================================
    // Resource clients
    // =========================================================================

    pub fn clusters(&self) -> &ClustersClient {
        &self.clusters
    }

    pub fn deployments(&self) -> &DeploymentsClient {
        &self.deployments
    }

    pub fn projects(&self) -> &ProjectsClient {
        &self.projects
    }

    pub fn servers(&self) -> &ServersClient {
        &self.servers
    }

    pub fn workspace(&self) -> &WorkspaceClient {
        &self.workspace
    }

    pub fn models(&self) -> &ModelsClient {
        &self.models
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    // =========================================================================
    // UI state stores
    // =========================================================================

    pub fn model_selection(&self) -> &Arc<ModelSelectionStore> {
        &self.model_selection
    }

    pub fn onboarding(&self) -> &Arc<OnboardingStore> {
        &self.onboarding
    }

    pub fn role_store(&self) -> &Arc<RoleStore> {
        &self.roles
    }
}
