//! QUERY intent
//!
//! Reads `/api/google/state` from every listed device concurrently. A device
//! that cannot be reached is reported as `deviceOffline` without affecting
//! the others.

use std::collections::BTreeMap;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DeviceOutcome;
use crate::devices::DeviceRef;
use crate::transport::{Method, Transport, TransportError};

/// Device endpoint serving the current sensor snapshot
pub const STATE_PATH: &str = "/api/google/state";

#[derive(Debug, Default, Deserialize)]
pub(super) struct QueryPayload {
    #[serde(default)]
    pub devices: Vec<DeviceRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub request_id: String,
    pub devices: Vec<DeviceRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponsePayload {
    pub devices: BTreeMap<String, DeviceOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub request_id: String,
    pub payload: QueryResponsePayload,
}

/// Query every device in the request
///
/// The result has one entry per distinct device identity. When the same
/// identity is listed twice the later entry wins.
pub async fn handle(transport: &dyn Transport, request: &QueryRequest) -> QueryResponse {
    let outcomes = join_all(request.devices.iter().map(|device| async move {
        let id = device.identity();
        let outcome = query_device(transport, &request.request_id, device).await;
        (id, outcome)
    }))
    .await;

    QueryResponse {
        request_id: request.request_id.clone(),
        payload: QueryResponsePayload {
            devices: outcomes.into_iter().collect(),
        },
    }
}

async fn query_device(
    transport: &dyn Transport,
    request_id: &str,
    device: &DeviceRef,
) -> DeviceOutcome {
    let address = device.address();

    let result = transport
        .send(&address, Method::Get, STATE_PATH, None)
        .await
        .and_then(into_state);

    match result {
        Ok(state) => DeviceOutcome::Success(state),
        Err(e) => {
            tracing::warn!(
                request_id,
                device_id = %address.device_id,
                hostname = %address.hostname,
                port = address.port,
                error = %e,
                "query failed"
            );
            DeviceOutcome::from_transport_error(&e)
        }
    }
}

/// A state document must be a JSON object to be merged into the outcome
fn into_state(value: Value) -> Result<serde_json::Map<String, Value>, TransportError> {
    match value {
        Value::Object(state) => Ok(state),
        other => Err(TransportError::MalformedResponse(serde::de::Error::custom(
            format!("expected state object, got {other}"),
        ))),
    }
}
