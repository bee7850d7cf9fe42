//! Error types for the homeskill gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the homeskill gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Unknown appliance id
    #[error("not found: {0}")]
    NotFound(String),

    /// Directive name or capability the device cannot perform
    #[error("unsupported action: {0}")]
    UnsupportedAction(String),

    /// Directive namespace the router does not handle
    #[error("unsupported namespace: {0}")]
    UnsupportedNamespace(String),

    /// Access token does not resolve to the authorized identity
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Device backend error
    #[error("backend error: {0}")]
    Backend(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
