//! Authentication client

use super::decode;
use crate::error::Result;
use crate::transport::{HttpTransport, Method};
use crate::types::{Credentials, Session, SignupRequest};
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthClient {
    transport: Arc<dyn HttpTransport>,
}

impl AuthClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Exchange credentials for a session
    pub fn login(&self, creds: &Credentials) -> Result<Session> {
        let body = serde_json::to_value(creds)?;
        decode(
            self.transport
                .request(Method::Post, "/auth/login", Some(&body))?,
        )
    }

    /// Create an account and workspace, returning a session
    pub fn signup(&self, req: &SignupRequest) -> Result<Session> {
        let body = serde_json::to_value(req)?;
        decode(
            self.transport
                .request(Method::Post, "/auth/signup", Some(&body))?,
        )
    }
}
