//! Error types for dynawrap

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by a [`StoreApi`](crate::store::StoreApi) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum Error {
    // === Connectivity Errors ===
    #[error("Unable to connect to {endpoint} after backoff ({attempts} attempts)")]
    Connectivity { endpoint: String, attempts: usize },

    // === Remote Errors ===
    #[error("Remote operation failed: {0}")]
    Remote(BoxError),

    // === Binding Errors ===
    #[error("Failed to bind record {index}: {source}")]
    Binding {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported key value: {0}")]
    UnsupportedKey(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config error: {0}")]
    Config(#[from] ::config::ConfigError),

    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Generic ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap a store client failure.
    pub fn remote<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Remote(err.into())
    }

    /// Is this a retryable error?
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Connectivity { .. } | Error::Remote(_) | Error::Io(_)
        )
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::InvalidConfig(format!("invalid endpoint: {}", e))
    }
}
