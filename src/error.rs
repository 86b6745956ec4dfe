//! Error types for the opsdeck library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for opsdeck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the opsdeck library
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Server rejected request with status {status}: {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        /// Message extracted from the server's error body, when present
        message: Option<String>,
    },

    #[error("Network failure: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to parse response body: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Query Errors
    // -------------------------------------------------------------------------
    #[error("Query parameter not yet available: {0}")]
    NotReady(String),

    #[error("Invalid cache strategy: {0}")]
    InvalidCacheStrategy(String),

    // -------------------------------------------------------------------------
    // Durable Storage Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // Credential Errors
    // -------------------------------------------------------------------------
    #[error("Credential error: {0}")]
    Credential(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("Internal lock was poisoned - possible thread panic. The operation may have left data in an inconsistent state.")]
    LockPoisoned,
}

impl Error {
    /// Check if this is a transport-level failure (network or non-2xx response)
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Api { .. } | Error::Network(_))
    }

    /// Check if this is a "not ready" guard error (a disabled query was read)
    #[must_use]
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Error::NotReady(_))
    }

    /// The server-provided error message, if the server sent one.
    ///
    /// Mutations use this for user-facing failure notifications, falling back
    /// to a fixed string when the server body carried no message.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
