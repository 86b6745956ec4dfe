//! Common test utilities for opsdeck integration tests
//!
//! Provides a console fixture over the in-memory transport, a collecting
//! notifier, and envelope helpers.

#![allow(dead_code)]

use opsdeck::{
    Console, MemoryStore, MemoryTransport, Method, NotificationKind, Notifier, RecordedCall,
};
use serde_json::{json, Value};
use std::sync::{Arc, RwLock};

/// Notifier that records every notification for assertions
pub struct CollectingNotifier {
    messages: RwLock<Vec<(NotificationKind, String)>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<(NotificationKind, String)> {
        self.messages.read().expect("Lock poisoned").clone()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.messages
            .write()
            .expect("Lock poisoned")
            .push((kind, message.to_owned()));
    }
}

impl Default for CollectingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Test fixture: a console over an in-memory transport and in-memory storage
pub struct TestFixture {
    pub transport: Arc<MemoryTransport>,
    pub notifier: Arc<CollectingNotifier>,
    pub console: Console,
}

impl TestFixture {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let transport = Arc::new(MemoryTransport::new());
        let notifier = Arc::new(CollectingNotifier::new());
        let console = Console::builder("opsdeck-test", transport.clone())
            .notifier(notifier.clone())
            .durable(Arc::new(MemoryStore::new()))
            .build()
            .expect("Failed to build console");

        Self {
            transport,
            notifier,
            console,
        }
    }

    /// Calls the transport observed for one route
    pub fn calls_to(&self, method: Method, path: &str) -> Vec<RecordedCall> {
        self.transport.calls_to(method, path)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap a payload in the `{data: T}` transport envelope
pub fn envelope(payload: Value) -> Value {
    json!({ "data": payload })
}

/// A deployment body as the backend would return it
pub fn deployment_json(id: u64, name: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "model_id": "llama-3-8b",
        "status": status,
        "replicas": 2
    })
}

/// A server body as the backend would return it
pub fn server_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "gpu": "h100",
        "status": "ready"
    })
}
