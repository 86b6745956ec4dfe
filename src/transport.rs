//! HTTP transport contract and the in-memory test transport
//!
//! The actual wire client (connection pooling, auth header injection, token
//! refresh) lives outside this crate. Everything here talks to it through
//! [`HttpTransport`], one call per API-client method.

use crate::error::{Error, Result};
use crate::sync::RwLockExt;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

/// HTTP method for a transport call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Trait for the wire-level HTTP collaborator
///
/// Implementations resolve with the full response body (the `{data: T}`
/// envelope included) or reject with a transport error. Server error bodies
/// that carry a message surface as [`Error::Api`] so mutation notifications
/// can show them.
pub trait HttpTransport: Send + Sync {
    /// Issue a single request and return the raw response body
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] for connection-level failures and
    /// [`Error::Api`] for non-2xx responses.
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value>;
}

// =============================================================================
// In-Memory Transport (for tests)
// =============================================================================

/// A canned transport response, re-issued as an owned result on every hit
#[derive(Debug, Clone)]
enum Canned {
    Body(Value),
    Api { status: u16, message: Option<String> },
    Network(String),
}

impl Canned {
    fn to_result(&self) -> Result<Value> {
        match self {
            Canned::Body(v) => Ok(v.clone()),
            Canned::Api { status, message } => Err(Error::Api {
                status: *status,
                message: message.clone(),
            }),
            Canned::Network(reason) => Err(Error::Network(reason.clone())),
        }
    }
}

/// A call observed by [`MemoryTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// In-memory transport with canned responses and call recording
///
/// Responses are queued per `(method, path)` route; the final queued response
/// is sticky and keeps answering once the queue drains, which is what
/// refetch-after-invalidation tests want. Unrouted paths reject with a 404.
pub struct MemoryTransport {
    routes: RwLock<HashMap<(Method, String), VecDeque<Canned>>>,
    calls: RwLock<Vec<RecordedCall>>,
}

impl MemoryTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(HashMap::new()),
            calls: RwLock::new(Vec::new()),
        }
    }

    /// Queue a successful response body for a route
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn respond(&self, method: Method, path: &str, body: Value) {
        self.enqueue(method, path, Canned::Body(body));
    }

    /// Queue a server rejection for a route
    pub fn reject(&self, method: Method, path: &str, status: u16, message: Option<&str>) {
        self.enqueue(
            method,
            path,
            Canned::Api {
                status,
                message: message.map(str::to_owned),
            },
        );
    }

    /// Queue a connection-level failure for a route
    pub fn fail(&self, method: Method, path: &str, reason: &str) {
        self.enqueue(method, path, Canned::Network(reason.to_owned()));
    }

    /// All calls observed so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .read_recovered()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Calls observed for one route, in order
    pub fn calls_to(&self, method: Method, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }

    fn enqueue(&self, method: Method, path: &str, canned: Canned) {
        let mut routes = self.routes.write_recovered().expect("Lock poisoned");
        routes
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(canned);
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for MemoryTransport {
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        {
            let mut calls = self.calls.write_recovered()?;
            calls.push(RecordedCall {
                method,
                path: path.to_owned(),
                body: body.cloned(),
            });
        }

        let mut routes = self.routes.write_recovered()?;
        let queue = routes
            .get_mut(&(method, path.to_owned()))
            .filter(|q| !q.is_empty())
            .ok_or(Error::Api {
                status: 404,
                message: None,
            })?;

        // Sticky tail: keep the last response around for repeat hits
        let canned = if queue.len() > 1 {
            queue.pop_front().expect("queue checked non-empty")
        } else {
            queue.front().expect("queue checked non-empty").clone()
        };
        canned.to_result()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_transport_records_calls() {
        let transport = MemoryTransport::new();
        transport.respond(Method::Get, "/things", json!({"data": []}));

        transport
            .request(Method::Get, "/things", None)
            .expect("routed call succeeds");

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::Get);
        assert_eq!(calls[0].path, "/things");
        assert_eq!(calls[0].body, None);
    }

    #[test]
    fn test_memory_transport_queue_then_sticky() {
        let transport = MemoryTransport::new();
        transport.respond(Method::Get, "/v", json!({"data": 1}));
        transport.respond(Method::Get, "/v", json!({"data": 2}));

        assert_eq!(
            transport.request(Method::Get, "/v", None).unwrap(),
            json!({"data": 1})
        );
        // Second response is the tail and keeps answering
        assert_eq!(
            transport.request(Method::Get, "/v", None).unwrap(),
            json!({"data": 2})
        );
        assert_eq!(
            transport.request(Method::Get, "/v", None).unwrap(),
            json!({"data": 2})
        );
    }

    #[test]
    fn test_memory_transport_unrouted_is_404() {
        let transport = MemoryTransport::new();
        let err = transport.request(Method::Get, "/missing", None).unwrap_err();
        assert!(matches!(err, Error::Api { status: 404, .. }));
    }

    #[test]
    fn test_memory_transport_rejection_carries_message() {
        let transport = MemoryTransport::new();
        transport.reject(Method::Post, "/x", 422, Some("name already taken"));

        let err = transport
            .request(Method::Post, "/x", Some(&json!({})))
            .unwrap_err();
        assert_eq!(err.server_message(), Some("name already taken"));
    }
}
