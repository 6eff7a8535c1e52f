//! Local-home intent handling
//!
//! Decodes the platform's `{requestId, inputs:[{intent, payload}]}` envelope
//! into a typed [`IntentRequest`] and routes it to one of three handlers:
//!
//! - [`identify`] synthesizes the static sensor descriptor, no network
//! - [`query`] fans out a state read to every listed device
//! - [`execute`] forwards each command to the device that owns it

pub mod execute;
pub mod identify;
pub mod outcome;
pub mod query;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use execute::{Command, CommandResult, ExecuteRequest, ExecuteResponse};
pub use identify::{DeviceDescriptor, IdentifyDevice, IdentifyRequest, IdentifyResponse};
pub use outcome::{DeviceOutcome, ErrorCode, Status};
pub use query::{QueryRequest, QueryResponse};

use crate::transport::Transport;
use crate::{Error, Result};

/// Platform intent names
pub const IDENTIFY_INTENT: &str = "action.devices.IDENTIFY";
pub const QUERY_INTENT: &str = "action.devices.QUERY";
pub const EXECUTE_INTENT: &str = "action.devices.EXECUTE";

/// Request id used when the platform omits one
pub const FALLBACK_REQUEST_ID: &str = "local";

/// Raw platform envelope, before the intent is known
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformRequest {
    #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    #[serde(default)]
    pub inputs: Vec<IntentInput>,
}

impl PlatformRequest {
    /// Request id, or [`FALLBACK_REQUEST_ID`] when absent
    #[must_use]
    pub fn request_id(&self) -> &str {
        self.request_id.as_deref().unwrap_or(FALLBACK_REQUEST_ID)
    }
}

/// One entry of the envelope's `inputs` array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentInput {
    pub intent: String,

    #[serde(default)]
    pub payload: Value,
}

/// A decoded intent, one variant per kind
#[derive(Debug, Clone, PartialEq)]
pub enum IntentRequest {
    Identify(IdentifyRequest),
    Query(QueryRequest),
    Execute(ExecuteRequest),
}

impl IntentRequest {
    #[must_use]
    pub fn request_id(&self) -> &str {
        match self {
            Self::Identify(r) => &r.request_id,
            Self::Query(r) => &r.request_id,
            Self::Execute(r) => &r.request_id,
        }
    }

    /// Platform name of this intent
    #[must_use]
    pub const fn intent(&self) -> &'static str {
        match self {
            Self::Identify(_) => IDENTIFY_INTENT,
            Self::Query(_) => QUERY_INTENT,
            Self::Execute(_) => EXECUTE_INTENT,
        }
    }
}

impl TryFrom<PlatformRequest> for IntentRequest {
    type Error = Error;

    /// Only the first input is considered, matching the platform contract
    fn try_from(request: PlatformRequest) -> Result<Self> {
        let request_id = request.request_id().to_string();
        let input = request.inputs.into_iter().next().ok_or(Error::MissingInputs)?;

        // `payload` may be omitted entirely; treat that as an empty object
        let payload = match input.payload {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        match input.intent.as_str() {
            IDENTIFY_INTENT => {
                let payload: identify::IdentifyPayload = serde_json::from_value(payload)?;
                Ok(Self::Identify(IdentifyRequest {
                    request_id,
                    device: payload.device,
                }))
            }
            QUERY_INTENT => {
                let payload: query::QueryPayload = serde_json::from_value(payload)?;
                Ok(Self::Query(QueryRequest {
                    request_id,
                    devices: payload.devices,
                }))
            }
            EXECUTE_INTENT => {
                let payload: execute::ExecutePayload = serde_json::from_value(payload)?;
                Ok(Self::Execute(ExecuteRequest {
                    request_id,
                    commands: payload.commands,
                }))
            }
            _ => Err(Error::UnsupportedIntent {
                request_id,
                intent: input.intent,
            }),
        }
    }
}

/// Handler output, mirroring [`IntentRequest`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IntentResponse {
    Identify(IdentifyResponse),
    Query(QueryResponse),
    Execute(ExecuteResponse),
}

impl IntentResponse {
    #[must_use]
    pub fn request_id(&self) -> &str {
        match self {
            Self::Identify(r) => &r.request_id,
            Self::Query(r) => &r.request_id,
            Self::Execute(r) => &r.request_id,
        }
    }
}

/// Routes decoded intents to their handlers over a shared transport
#[derive(Clone)]
pub struct IntentHandler {
    transport: Arc<dyn Transport>,
}

impl IntentHandler {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Handle one intent
    ///
    /// Never fails: device problems are reported inside the response.
    pub async fn handle(&self, request: &IntentRequest) -> IntentResponse {
        tracing::info!(
            request_id = %request.request_id(),
            intent = request.intent(),
            "handling intent"
        );

        match request {
            IntentRequest::Identify(r) => IntentResponse::Identify(identify::handle(r)),
            IntentRequest::Query(r) => {
                IntentResponse::Query(query::handle(self.transport.as_ref(), r).await)
            }
            IntentRequest::Execute(r) => {
                IntentResponse::Execute(execute::handle(self.transport.as_ref(), r).await)
            }
        }
    }
}

impl std::fmt::Debug for IntentHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentHandler").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport shared by the handler tests

    use std::collections::HashSet;

    use async_trait::async_trait;
    use serde_json::Value;
    use tokio::sync::Mutex;

    use crate::devices::ResolvedAddress;
    use crate::transport::{Method, Transport, TransportError};

    /// A request the mock transport observed
    #[derive(Debug, Clone)]
    pub struct SentRequest {
        pub address: ResolvedAddress,
        pub method: Method,
        pub path: String,
        pub body: Option<Value>,
    }

    /// Answers every request with `response`, except for hostnames listed
    /// as offline
    pub struct MockTransport {
        response: Value,
        offline: HashSet<String>,
        sent: Mutex<Vec<SentRequest>>,
    }

    impl MockTransport {
        pub fn new(response: Value) -> Self {
            Self {
                response,
                offline: HashSet::new(),
                sent: Mutex::new(Vec::new()),
            }
        }

        pub fn offline(mut self, hostname: &str) -> Self {
            self.offline.insert(hostname.to_string());
            self
        }

        pub async fn sent(&self) -> Vec<SentRequest> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(
            &self,
            address: &ResolvedAddress,
            method: Method,
            path: &str,
            body: Option<&Value>,
        ) -> Result<Value, TransportError> {
            self.sent.lock().await.push(SentRequest {
                address: address.clone(),
                method,
                path: path.to_string(),
                body: body.cloned(),
            });
            if self.offline.contains(&address.hostname) {
                return Err(TransportError::EmptyResponse);
            }
            Ok(self.response.clone())
        }
    }
}
