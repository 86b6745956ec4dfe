//! Descriptor factories per resource
//!
//! Each factory captures a client clone and its parameters, pairing the
//! registry key with the pre-bound fetch. Route loaders hand these to
//! [`QueryCache::prefetch_query`](super::cache::QueryCache::prefetch_query);
//! read queries wrap the very same values.

use super::descriptor::QueryDescriptor;
use super::keys;
use crate::api::{
    ClustersClient, DeploymentsClient, ModelsClient, ProjectsClient, ServersClient,
    WorkspaceClient,
};
use crate::error::Result;
use crate::types::ModelFilters;
use serde_json::Value;

fn to_value<T: serde::Serialize>(data: T) -> Result<Value> {
    Ok(serde_json::to_value(data)?)
}

pub fn clusters(client: &ClustersClient) -> QueryDescriptor {
    let client = client.clone();
    QueryDescriptor::new(keys::clusters(), move || to_value(client.list()?))
}

pub fn cluster(client: &ClustersClient, id: u64) -> QueryDescriptor {
    let client = client.clone();
    QueryDescriptor::new(keys::cluster(id), move || to_value(client.get(id)?))
}

pub fn cluster_status(client: &ClustersClient, id: u64) -> QueryDescriptor {
    let client = client.clone();
    QueryDescriptor::new(keys::cluster_status(id), move || to_value(client.status(id)?))
}

pub fn deployments(client: &DeploymentsClient) -> QueryDescriptor {
    let client = client.clone();
    QueryDescriptor::new(keys::deployments(), move || to_value(client.list()?))
}

pub fn deployment(client: &DeploymentsClient, id: u64) -> QueryDescriptor {
    let client = client.clone();
    QueryDescriptor::new(keys::deployment(id), move || to_value(client.get(id)?))
}

pub fn deployment_status(client: &DeploymentsClient, id: u64) -> QueryDescriptor {
    let client = client.clone();
    QueryDescriptor::new(keys::deployment_status(id), move || {
        to_value(client.status(id)?)
    })
}

pub fn projects(client: &ProjectsClient) -> QueryDescriptor {
    let client = client.clone();
    QueryDescriptor::new(keys::projects(), move || to_value(client.list()?))
}

pub fn servers(client: &ServersClient, page: u32, limit: u32, search: &str) -> QueryDescriptor {
    let client = client.clone();
    let search = search.to_owned();
    QueryDescriptor::new(keys::servers(page, limit, &search), move || {
        to_value(client.list(page, limit, &search)?)
    })
}

pub fn members(client: &WorkspaceClient) -> QueryDescriptor {
    let client = client.clone();
    QueryDescriptor::new(keys::members(), move || to_value(client.members()?))
}

pub fn roles(client: &WorkspaceClient) -> QueryDescriptor {
    let client = client.clone();
    QueryDescriptor::new(keys::roles(), move || to_value(client.roles()?))
}

pub fn models(
    client: &ModelsClient,
    filters: &ModelFilters,
    page: u32,
    limit: u32,
) -> QueryDescriptor {
    let client = client.clone();
    let filters = filters.clone();
    QueryDescriptor::new(keys::models(&filters, page, limit), move || {
        to_value(client.list(&filters, page, limit)?)
    })
}

pub fn model(client: &ModelsClient, id: &str) -> QueryDescriptor {
    let client = client.clone();
    let id = id.to_owned();
    QueryDescriptor::new(keys::model(&id), move || to_value(client.get(&id)?))
}
