//! Read-query constructors
//!
//! One constructor per resource, all reading through the shared cache via
//! the same descriptors route loaders prefetch with.

use super::Console;
use crate::api::servers::DEFAULT_LIMIT;
use crate::query::descriptors;
use crate::query::{PagedQuery, PollingQuery, QueryDescriptor, ReadQuery};
use crate::types::{
    Cluster, ClusterStatus, Deployment, MemberRole, ModelCard, ModelFilters, Paged, Project,
    Server, WorkspaceMember,
};
use serde_json::Value;
use std::time::Duration;

impl Console {
    /// Warm the cache for a route before it renders
    ///
    /// Loaders call this with every descriptor the route's reads will use;
    /// prefetch failures are swallowed and surface on the read instead.
    pub fn prefetch(&self, queries: &[QueryDescriptor]) {
        for descriptor in queries {
            self.cache.prefetch_query(descriptor);
        }
    }

    pub fn clusters_query(&self) -> ReadQuery<Vec<Cluster>> {
        ReadQuery::new(self.cache.clone(), descriptors::clusters(&self.clusters))
    }

    pub fn cluster_query(&self, id: u64) -> ReadQuery<Cluster> {
        ReadQuery::new(self.cache.clone(), descriptors::cluster(&self.clusters, id))
    }

    /// Onboarding/health polling for one cluster
    pub fn cluster_status_query(&self, id: u64, interval: Duration) -> PollingQuery<ClusterStatus> {
        PollingQuery::new(
            ReadQuery::new(
                self.cache.clone(),
                descriptors::cluster_status(&self.clusters, id),
            ),
            interval,
        )
    }

    pub fn deployments_query(&self) -> ReadQuery<Vec<Deployment>> {
        ReadQuery::new(
            self.cache.clone(),
            descriptors::deployments(&self.deployments),
        )
    }

    /// Guarded: the id usually comes from another resolved query, so the
    /// fetch must not fire until it is present
    pub fn deployment_query(&self, id: Option<u64>) -> ReadQuery<Deployment> {
        match id {
            Some(id) => ReadQuery::new(
                self.cache.clone(),
                descriptors::deployment(&self.deployments, id),
            ),
            None => ReadQuery::disabled(self.cache.clone(), "deployment id"),
        }
    }

    /// Rollout polling for one deployment
    pub fn deployment_status_query(&self, id: u64, interval: Duration) -> PollingQuery<Value> {
        PollingQuery::new(
            ReadQuery::new(
                self.cache.clone(),
                descriptors::deployment_status(&self.deployments, id),
            ),
            interval,
        )
    }

    pub fn projects_query(&self) -> ReadQuery<Vec<Project>> {
        ReadQuery::new(self.cache.clone(), descriptors::projects(&self.projects))
    }

    /// One page of the server fleet
    pub fn servers_query(&self, page: u32, limit: u32, search: &str) -> ReadQuery<Paged<Server>> {
        ReadQuery::new(
            self.cache.clone(),
            descriptors::servers(&self.servers, page, limit, search),
        )
    }

    /// The fleet with the shared defaults (`page=1, limit=12, search=""`)
    pub fn servers_query_default(&self) -> ReadQuery<Paged<Server>> {
        self.servers_query(1, DEFAULT_LIMIT, "")
    }

    /// Incrementally loaded fleet listing
    pub fn servers_pages(&self, limit: u32, search: &str) -> PagedQuery<Server> {
        let client = self.servers.clone();
        let search = search.to_owned();
        PagedQuery::new(self.cache.clone(), limit, move |page| {
            descriptors::servers(&client, page, limit, &search)
        })
    }

    pub fn members_query(&self) -> ReadQuery<Vec<WorkspaceMember>> {
        ReadQuery::new(self.cache.clone(), descriptors::members(&self.workspace))
    }

    pub fn roles_query(&self) -> ReadQuery<Vec<MemberRole>> {
        ReadQuery::new(self.cache.clone(), descriptors::roles(&self.workspace))
    }

    /// One marketplace page under the given filters
    pub fn models_query(
        &self,
        filters: &ModelFilters,
        page: u32,
        limit: u32,
    ) -> ReadQuery<Paged<ModelCard>> {
        ReadQuery::new(
            self.cache.clone(),
            descriptors::models(&self.models, filters, page, limit),
        )
    }

    /// Incrementally loaded marketplace listing
    pub fn models_pages(&self, filters: &ModelFilters, limit: u32) -> PagedQuery<ModelCard> {
        let client = self.models.clone();
        let filters = filters.clone();
        PagedQuery::new(self.cache.clone(), limit, move |page| {
            descriptors::models(&client, &filters, page, limit)
        })
    }

    /// Guarded: the playground reads the id from the model-selection store,
    /// which may be empty
    pub fn model_query(&self, id: Option<&str>) -> ReadQuery<ModelCard> {
        match id {
            Some(id) => ReadQuery::new(self.cache.clone(), descriptors::model(&self.models, id)),
            None => ReadQuery::disabled(self.cache.clone(), "model id"),
        }
    }
}
