//! Workspace membership client

use super::{decode, unwrap_data};
use crate::error::Result;
use crate::transport::{HttpTransport, Method};
use crate::types::{MemberRole, WorkspaceMember};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct WorkspaceClient {
    transport: Arc<dyn HttpTransport>,
}

impl WorkspaceClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// List workspace members
    pub fn members(&self) -> Result<Vec<WorkspaceMember>> {
        decode(
            self.transport
                .request(Method::Get, "/workspace/members", None)?,
        )
    }

    /// Role assignments for the workspace
    ///
    /// # Errors
    ///
    /// Failures cross this method unchanged; consumers observe the original
    /// rejection reason.
    pub fn roles(&self) -> Result<Vec<MemberRole>> {
        decode(self.transport.request(Method::Get, "/workspace/roles", None)?)
    }

    /// Invite a member by email
    pub fn invite(&self, email: &str, role: &str) -> Result<WorkspaceMember> {
        let body = json!({"email": email, "role": role});
        decode(
            self.transport
                .request(Method::Post, "/workspace/members", Some(&body))?,
        )
    }

    /// Remove a member; returns the unwrapped response body
    pub fn remove(&self, member_id: u64) -> Result<Value> {
        unwrap_data(self.transport.request(
            Method::Delete,
            &format!("/workspace/members/{member_id}"),
            None,
        )?)
    }

    /// Change a member's role
    pub fn change_role(&self, member_id: u64, role: &str) -> Result<WorkspaceMember> {
        let body = json!({"role": role});
        decode(self.transport.request(
            Method::Put,
            &format!("/workspace/members/{member_id}"),
            Some(&body),
        )?)
    }
}
