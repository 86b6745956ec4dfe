//! Model marketplace and playground client

use super::decode;
use crate::error::Result;
use crate::transport::{HttpTransport, Method};
use crate::types::{InvokeRequest, InvokeResponse, ModelCard, ModelFilters, Paged};
use std::sync::Arc;

/// Default page size for marketplace listings
pub const DEFAULT_LIMIT: u32 = 12;

#[derive(Clone)]
pub struct ModelsClient {
    transport: Arc<dyn HttpTransport>,
}

impl ModelsClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// First marketplace page under the given filters, with the shared limit
    pub fn list_default(&self, filters: &ModelFilters) -> Result<Paged<ModelCard>> {
        self.list(filters, 1, DEFAULT_LIMIT)
    }

    /// List one marketplace page under the given filters
    pub fn list(&self, filters: &ModelFilters, page: u32, limit: u32) -> Result<Paged<ModelCard>> {
        let provider = filters.provider.as_deref().unwrap_or("");
        let task = filters.task.as_deref().unwrap_or("");
        let path =
            format!("/models?page={page}&limit={limit}&provider={provider}&task={task}");
        decode(self.transport.request(Method::Get, &path, None)?)
    }

    /// Fetch one model card
    pub fn get(&self, id: &str) -> Result<ModelCard> {
        decode(
            self.transport
                .request(Method::Get, &format!("/models/{id}"), None)?,
        )
    }

    /// Run a playground invocation against a model
    ///
    /// A plain call, not a mutation: it touches no cached listing and drives
    /// no notification.
    pub fn invoke(&self, model_id: &str, req: &InvokeRequest) -> Result<InvokeResponse> {
        let body = serde_json::to_value(req)?;
        decode(self.transport.request(
            Method::Post,
            &format!("/models/{model_id}/invoke"),
            Some(&body),
        )?)
    }
}
