//! Data-transfer shapes for platform resources
//!
//! Plain serde structs mirroring the backend's response bodies. No invariants
//! beyond field types live here; all behavior sits in the query layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A connected compute cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: u64,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub region: Option<String>,
}

/// Live status of one cluster, the polling target during onboarding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterStatus {
    pub phase: String,
    pub ready: bool,
}

/// Request body for connecting a new cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectClusterRequest {
    pub name: String,
    pub kubeconfig: String,
}

/// A model deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: u64,
    pub name: String,
    pub model_id: String,
    pub status: String,
    pub replicas: u32,
}

/// Request body for creating a deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDeploymentRequest {
    pub name: String,
    pub model_id: String,
    pub cluster_id: u64,
    pub replicas: u32,
}

/// Request body for updating a deployment in place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDeploymentRequest {
    pub id: u64,
    pub replicas: u32,
}

/// A project within the workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub environment: Option<String>,
}

/// Request body for creating a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub environment: String,
}

/// Request body for rotating a project API token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenUpdateRequest {
    pub project_id: u64,
    pub environment: String,
}

/// Resolved value of a token rotation: the server body plus the request echo
///
/// The echo fields use the response-side naming (`projectId`), matching what
/// call sites key on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectToken {
    #[serde(rename = "projectId")]
    pub project_id: u64,
    pub environment: String,
    #[serde(flatten)]
    pub grant: serde_json::Map<String, Value>,
}

/// An inference server in the fleet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub gpu: Option<String>,
    pub status: String,
}

/// A member of the current workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceMember {
    pub id: u64,
    pub email: String,
    pub role: String,
}

/// Request body for inviting a workspace member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteMemberRequest {
    pub email: String,
    pub role: String,
}

/// Request body for changing a member's role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRoleRequest {
    pub member_id: u64,
    pub role: String,
}

/// Role assignment row from the workspace roles endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRole {
    pub user_id: u64,
    pub role: String,
}

/// A marketplace model card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCard {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub task: String,
}

/// Marketplace filter set; empty filters list everything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelFilters {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub task: Option<String>,
}

/// A playground invocation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub prompt: String,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// A playground invocation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub output: String,
    #[serde(default)]
    pub usage: Option<Value>,
}

/// Login / signup credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Signup request: credentials plus the workspace to create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub workspace_name: String,
}

/// An authenticated session as returned by login/signup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u32,
}
