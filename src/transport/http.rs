//! Plaintext HTTP transport backed by `reqwest`

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{Method, Transport, TransportError, parse_body};
use crate::Result;
use crate::devices::ResolvedAddress;

/// Talks JSON over plain HTTP to the sensor's embedded web server
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new transport
    ///
    /// No request timeout is set; callers that need a deadline wrap the whole
    /// handler invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("sea-local-home/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        address: &ResolvedAddress,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> std::result::Result<Value, TransportError> {
        let url = address.url(path);
        tracing::debug!(
            device_id = %address.device_id,
            %method,
            %url,
            "sending device request"
        );

        let mut req = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req
            .send()
            .await
            .map_err(|source| TransportError::Connection {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| TransportError::Connection { url, source })?;

        parse_body(&bytes)
    }
}
