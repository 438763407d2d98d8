//! Error types for Schemascope
//!
//! Defines a single error enum covering all failure modes across the system.
//! Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Result type alias for Schemascope operations
pub type Result<T> = std::result::Result<T, SchemascopeError>;

/// Comprehensive error type for Schemascope operations
#[derive(Error, Debug)]
pub enum SchemascopeError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// SPARQL endpoint fetch errors (network, timeout, bad status, malformed body)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Cache-file persistence errors (logged, never fatal)
    #[error("Persist error: {0}")]
    Persist(String),

    /// Fallback-data load errors at startup
    #[error("Load error: {0}")]
    Load(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),

    /// Anyhow errors (for more context)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

impl SchemascopeError {
    /// True when the error came out of the fetch path and the refresher
    /// should keep the previous snapshot rather than surface it.
    pub fn is_fetch(&self) -> bool {
        matches!(self, SchemascopeError::Fetch(_) | SchemascopeError::Http(_))
    }
}
