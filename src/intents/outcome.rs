//! Per-device and per-command outcomes
//!
//! Failures are reported as data inside the response, never as errors
//! returned to the platform.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::transport::TransportError;

/// Status string the platform expects on every device entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    Error,
}

/// Platform error codes emitted by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    /// Device could not be reached or answered with garbage
    DeviceOffline,
    /// Request named an intent the bridge does not handle
    IntentNotSupported,
}

/// Result of talking to one device (or one command's device group)
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceOutcome {
    /// Device answered; carries the state fields it reported
    Success(Map<String, Value>),
    /// Device failed; carries the code reported to the platform
    Failure(ErrorCode),
}

impl DeviceOutcome {
    /// Successful outcome with no state fields
    #[must_use]
    pub fn success() -> Self {
        Self::Success(Map::new())
    }

    /// Map a transport failure to the outcome the platform sees
    ///
    /// The cause is not carried along; callers log it before converting.
    #[must_use]
    pub const fn from_transport_error(_err: &TransportError) -> Self {
        Self::Failure(ErrorCode::DeviceOffline)
    }

    #[must_use]
    pub const fn status(&self) -> Status {
        match self {
            Self::Success(_) => Status::Success,
            Self::Failure(_) => Status::Error,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl Serialize for DeviceOutcome {
    /// `{"status":"SUCCESS", ...state}` or `{"status":"ERROR","errorCode":...}`
    ///
    /// A `status` field reported by the device never overrides ours.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(state) => {
                let fields = state.iter().filter(|(k, _)| k.as_str() != "status");
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("status", &Status::Success)?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Failure(code) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("status", &Status::Error)?;
                map.serialize_entry("errorCode", code)?;
                map.end()
            }
        }
    }
}
