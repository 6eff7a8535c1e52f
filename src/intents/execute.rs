//! EXECUTE intent
//!
//! Each command is re-wrapped as a single-command EXECUTE envelope and posted
//! to the device's `/api/google/homegraph` endpoint. Only the first listed
//! device is used for addressing: one physical sensor bridges every id it
//! reports, so all ids in a command share that device's outcome.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::{DeviceOutcome, EXECUTE_INTENT};
use crate::devices::{DEFAULT_DEVICE_ID, DeviceRef, resolve};
use crate::transport::{Method, Transport};

/// Device endpoint accepting platform-shaped intent envelopes
pub const HOMEGRAPH_PATH: &str = "/api/google/homegraph";

/// One command of an EXECUTE payload
///
/// Everything besides `devices` (typically `execution`) is kept as-is so the
/// device receives the command exactly as the platform sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Command {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<DeviceRef>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Command {
    /// Ids reported for this command
    ///
    /// A command without a `devices` list reports the default identity.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.devices.as_ref().map_or_else(
            || vec![DEFAULT_DEVICE_ID.to_string()],
            |devices| {
                devices
                    .iter()
                    .map(|d| d.platform_id().unwrap_or(DEFAULT_DEVICE_ID).to_string())
                    .collect()
            },
        )
    }

    /// The device used to address the whole command
    #[must_use]
    pub fn addressing_device(&self) -> Option<&DeviceRef> {
        self.devices.as_ref()?.first()
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ExecutePayload {
    #[serde(default)]
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteRequest {
    pub request_id: String,
    pub commands: Vec<Command>,
}

/// Outcome of one command, covering every id it listed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResult {
    pub ids: Vec<String>,
    #[serde(flatten)]
    pub outcome: DeviceOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecuteResponsePayload {
    pub commands: Vec<CommandResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    pub request_id: String,
    pub payload: ExecuteResponsePayload,
}

/// Forward every command to its device
///
/// Commands run concurrently; results keep the input order.
pub async fn handle(transport: &dyn Transport, request: &ExecuteRequest) -> ExecuteResponse {
    let commands = join_all(
        request
            .commands
            .iter()
            .map(|command| execute_command(transport, &request.request_id, command)),
    )
    .await;

    ExecuteResponse {
        request_id: request.request_id.clone(),
        payload: ExecuteResponsePayload { commands },
    }
}

async fn execute_command(
    transport: &dyn Transport,
    request_id: &str,
    command: &Command,
) -> CommandResult {
    let ids = command.ids();
    let first_id = ids.first().map_or(DEFAULT_DEVICE_ID, String::as_str);
    let metadata = command
        .addressing_device()
        .and_then(|device| device.custom_data.as_ref());
    let address = resolve(first_id, metadata);

    let body = envelope(request_id, command);
    let outcome = match transport
        .send(&address, Method::Post, HOMEGRAPH_PATH, Some(&body))
        .await
    {
        // Response content is not inspected beyond being valid, non-empty JSON
        Ok(_) => DeviceOutcome::success(),
        Err(e) => {
            tracing::warn!(
                request_id,
                device_id = %address.device_id,
                hostname = %address.hostname,
                port = address.port,
                ids = ?ids,
                error = %e,
                "execute failed"
            );
            DeviceOutcome::from_transport_error(&e)
        }
    };

    CommandResult { ids, outcome }
}

/// Wrap a single command in the platform's EXECUTE envelope
#[must_use]
pub fn envelope(request_id: &str, command: &Command) -> Value {
    json!({
        "requestId": request_id,
        "inputs": [{
            "intent": EXECUTE_INTENT,
            "payload": { "commands": [command] },
        }],
    })
}
