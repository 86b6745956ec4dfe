//! Central key registry
//!
//! One construction function per resource. Reads and the invalidation table
//! both go through these; nothing else in the crate builds a key literal, so
//! a mutation can never target a drifted copy of a read's key.

use super::key::QueryKey;
use crate::types::ModelFilters;

/// Resource-name constants: the leading segment of every key
pub mod resource {
    pub const CLUSTERS: &str = "clusters";
    pub const DEPLOYMENTS: &str = "deployments";
    pub const PROJECTS: &str = "projects";
    pub const SERVERS: &str = "servers";
    pub const MEMBERS: &str = "workspace-members";
    pub const ROLES: &str = "roles";
    pub const MODELS: &str = "models";
}

pub fn clusters() -> QueryKey {
    QueryKey::of(resource::CLUSTERS)
}

pub fn cluster(id: u64) -> QueryKey {
    QueryKey::of(resource::CLUSTERS).param("id", id)
}

pub fn cluster_status(id: u64) -> QueryKey {
    QueryKey::of(resource::CLUSTERS).seg("status").param("id", id)
}

pub fn deployments() -> QueryKey {
    QueryKey::of(resource::DEPLOYMENTS)
}

pub fn deployment(id: u64) -> QueryKey {
    QueryKey::of(resource::DEPLOYMENTS).param("id", id)
}

pub fn deployment_status(id: u64) -> QueryKey {
    QueryKey::of(resource::DEPLOYMENTS)
        .seg("status")
        .param("id", id)
}

pub fn projects() -> QueryKey {
    QueryKey::of(resource::PROJECTS)
}

pub fn servers(page: u32, limit: u32, search: &str) -> QueryKey {
    QueryKey::of(resource::SERVERS).params([
        ("page", page.to_string()),
        ("limit", limit.to_string()),
        ("search", search.to_owned()),
    ])
}

pub fn members() -> QueryKey {
    QueryKey::of(resource::MEMBERS)
}

pub fn roles() -> QueryKey {
    QueryKey::of(resource::ROLES)
}

pub fn models(filters: &ModelFilters, page: u32, limit: u32) -> QueryKey {
    QueryKey::of(resource::MODELS).params([
        ("page", page.to_string()),
        ("limit", limit.to_string()),
        ("provider", filters.provider.clone().unwrap_or_default()),
        ("task", filters.task.clone().unwrap_or_default()),
    ])
}

pub fn model(id: &str) -> QueryKey {
    QueryKey::of(resource::MODELS).param("id", id)
}

// =============================================================================
// Tests
// =============================================================================
