//! Cluster resource client
//!
//! Clusters live under the `/infrastructure` path on the backend.

use super::{decode, unwrap_data};
use crate::error::Result;
use crate::transport::{HttpTransport, Method};
use crate::types::{Cluster, ClusterStatus, ConnectClusterRequest};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct ClustersClient {
    transport: Arc<dyn HttpTransport>,
}

impl ClustersClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// List all connected clusters
    ///
    /// # Errors
    ///
    /// Propagates transport failures unmodified.
    pub fn list(&self) -> Result<Vec<Cluster>> {
        decode(self.transport.request(Method::Get, "/infrastructure", None)?)
    }

    /// Fetch one cluster by id
    pub fn get(&self, id: u64) -> Result<Cluster> {
        decode(
            self.transport
                .request(Method::Get, &format!("/infrastructure/{id}"), None)?,
        )
    }

    /// Live onboarding/health status for one cluster (polling target)
    pub fn status(&self, id: u64) -> Result<ClusterStatus> {
        decode(
            self.transport
                .request(Method::Get, &format!("/infrastructure/{id}/status"), None)?,
        )
    }

    /// Connect (register) a new cluster
    pub fn connect(&self, req: &ConnectClusterRequest) -> Result<Cluster> {
        let body = serde_json::to_value(req)?;
        decode(
            self.transport
                .request(Method::Post, "/infrastructure", Some(&body))?,
        )
    }

    /// Remove a cluster; returns the unwrapped response body
    pub fn remove(&self, id: u64) -> Result<Value> {
        unwrap_data(
            self.transport
                .request(Method::Delete, &format!("/infrastructure/{id}"), None)?,
        )
    }
}
