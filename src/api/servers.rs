//! Server fleet client
//!
//! The only client with a paginated-by-default listing. Defaults live here
//! (page 1, 12 items, empty search) so every call site issues the same query.

use super::decode;
use crate::error::Result;
use crate::transport::{HttpTransport, Method};
use crate::types::{Paged, Server};
use std::sync::Arc;

/// Default page size for server listings
pub const DEFAULT_LIMIT: u32 = 12;

#[derive(Clone)]
pub struct ServersClient {
    transport: Arc<dyn HttpTransport>,
}

impl ServersClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// List servers with the shared defaults: `page=1, limit=12, search=""`
    pub fn list_default(&self) -> Result<Paged<Server>> {
        self.list(1, DEFAULT_LIMIT, "")
    }

    /// List one page of servers
    pub fn list(&self, page: u32, limit: u32, search: &str) -> Result<Paged<Server>> {
        let path = format!("/servers?page={page}&limit={limit}&search={search}");
        decode(self.transport.request(Method::Get, &path, None)?)
    }
}
