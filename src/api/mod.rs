//! Resource API clients
//!
//! One client per backend resource. Each method performs exactly one
//! transport call, unwraps the `{data: T}` envelope, and propagates failures
//! unmodified; translating errors into user feedback is the mutation layer's
//! job. Parameter defaulting lives here so every call site agrees on it.

pub mod auth;
pub mod clusters;
pub mod deployments;
pub mod models;
pub mod projects;
pub mod servers;
pub mod workspace;

pub use auth::AuthClient;
pub use clusters::ClustersClient;
pub use deployments::DeploymentsClient;
pub use models::ModelsClient;
pub use projects::ProjectsClient;
pub use servers::ServersClient;
pub use workspace::WorkspaceClient;

use crate::error::{Error, Result};
use serde_json::Value;

/// Strip the `{data: T}` transport envelope
///
/// Callers of the clients never see the envelope; a body without one is a
/// protocol violation, not a caller error.
pub(crate) fn unwrap_data(mut body: Value) -> Result<Value> {
    match body.get_mut("data") {
        Some(data) => Ok(data.take()),
        None => Err(Error::Protocol("response body missing 'data' envelope".into())),
    }
}

/// Deserialize the unwrapped `data` payload into a typed shape
pub(crate) fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T> {
    let data = unwrap_data(body)?;
    serde_json::from_value(data).map_err(|e| Error::Parse(e.to_string()))
}
