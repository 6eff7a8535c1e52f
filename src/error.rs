//! Error types for the sea local-home bridge
//!
//! Device failures never show up here: they are folded into per-device
//! outcomes by the intent handlers. These errors cover decoding the platform
//! envelope and bringing the service up.

use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the bridge
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Platform request carried no intent inputs
    #[error("missing inputs")]
    MissingInputs,

    /// Platform request named an intent the bridge does not handle
    #[error("intent not supported: {intent}")]
    UnsupportedIntent { request_id: String, intent: String },

    /// HTTP client error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
