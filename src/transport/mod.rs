//! Device transport
//!
//! The `Transport` trait is the single seam between the intent handlers and
//! the network. Handlers only ever see a parsed JSON value or a
//! [`TransportError`].

mod http;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use http::HttpTransport;

use crate::devices::ResolvedAddress;

/// HTTP method used against the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// Failure talking to a device
///
/// Callers do not discriminate between variants; every one of them ends up as
/// a `deviceOffline` outcome. The variants exist for logs.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection-level failure
    #[error("request to {url} failed: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Device answered with a non-success status
    #[error("device returned {status} for {url}")]
    Status { url: String, status: u16 },

    /// Device answered with no body
    #[error("empty response from device")]
    EmptyResponse,

    /// Body present but not valid JSON
    #[error("malformed response from device: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

/// Sends one request to a device and returns the parsed JSON response
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue `method path` against `address`, with an optional JSON body
    ///
    /// # Errors
    ///
    /// Returns an error if the device is unreachable or replies with an
    /// empty or non-JSON body
    async fn send(
        &self,
        address: &ResolvedAddress,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, TransportError>;
}

/// Parse a raw response body, rejecting empty payloads
///
/// # Errors
///
/// Returns [`TransportError::EmptyResponse`] for an empty or whitespace-only
/// body and [`TransportError::MalformedResponse`] when it is not JSON
pub fn parse_body(bytes: &[u8]) -> Result<Value, TransportError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(TransportError::EmptyResponse);
    }
    Ok(serde_json::from_slice(bytes)?)
}
