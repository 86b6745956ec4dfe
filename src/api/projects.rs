//! Project resource client

use super::{decode, unwrap_data};
use crate::error::{Error, Result};
use crate::transport::{HttpTransport, Method};
use crate::types::{Project, ProjectToken, TokenUpdateRequest};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct ProjectsClient {
    transport: Arc<dyn HttpTransport>,
}

impl ProjectsClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// List all projects
    pub fn list(&self) -> Result<Vec<Project>> {
        decode(self.transport.request(Method::Get, "/projects", None)?)
    }

    /// Create a project
    pub fn create(&self, name: &str, environment: &str) -> Result<Project> {
        let body = json!({"name": name, "environment": environment});
        decode(
            self.transport
                .request(Method::Post, "/projects", Some(&body))?,
        )
    }

    /// Delete a project; returns the unwrapped response body
    pub fn delete(&self, id: u64) -> Result<Value> {
        unwrap_data(
            self.transport
                .request(Method::Delete, &format!("/projects/{id}"), None)?,
        )
    }

    /// Rotate a project API token
    ///
    /// Posts exactly the request shape; the resolved value is the server body
    /// merged with a `projectId`/`environment` echo of the request, so call
    /// sites never have to re-join the grant with what they asked for.
    pub fn update_token(&self, req: &TokenUpdateRequest) -> Result<ProjectToken> {
        let body = serde_json::to_value(req)?;
        let mut data = unwrap_data(self.transport.request(
            Method::Post,
            "/projects/token",
            Some(&body),
        )?)?;

        let obj = data
            .as_object_mut()
            .ok_or_else(|| Error::Protocol("token grant body is not an object".into()))?;
        obj.insert("projectId".to_owned(), json!(req.project_id));
        obj.insert("environment".to_owned(), json!(req.environment));

        serde_json::from_value(data).map_err(|e| Error::Parse(e.to_string()))
    }
}
