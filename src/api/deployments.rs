//! Deployment resource client

use super::{decode, unwrap_data};
use crate::error::Result;
use crate::transport::{HttpTransport, Method};
use crate::types::{CreateDeploymentRequest, Deployment, UpdateDeploymentRequest};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct DeploymentsClient {
    transport: Arc<dyn HttpTransport>,
}

impl DeploymentsClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// List all deployments in the workspace
    pub fn list(&self) -> Result<Vec<Deployment>> {
        decode(self.transport.request(Method::Get, "/deployments", None)?)
    }

    /// Fetch one deployment by id
    pub fn get(&self, id: u64) -> Result<Deployment> {
        decode(
            self.transport
                .request(Method::Get, &format!("/deployments/{id}"), None)?,
        )
    }

    /// Live rollout status for one deployment (polling target)
    pub fn status(&self, id: u64) -> Result<Value> {
        unwrap_data(
            self.transport
                .request(Method::Get, &format!("/deployments/{id}/status"), None)?,
        )
    }

    /// Create a deployment
    pub fn create(&self, req: &CreateDeploymentRequest) -> Result<Deployment> {
        let body = serde_json::to_value(req)?;
        decode(
            self.transport
                .request(Method::Post, "/deployments", Some(&body))?,
        )
    }

    /// Update a deployment in place (scale, edit)
    pub fn update(&self, req: &UpdateDeploymentRequest) -> Result<Deployment> {
        let body = serde_json::to_value(req)?;
        decode(self.transport.request(
            Method::Put,
            &format!("/deployments/{}", req.id),
            Some(&body),
        )?)
    }

    /// Delete a deployment; returns the unwrapped response body
    pub fn delete(&self, id: u64) -> Result<Value> {
        unwrap_data(
            self.transport
                .request(Method::Delete, &format!("/deployments/{id}"), None)?,
        )
    }
}
