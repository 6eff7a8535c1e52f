//! Device references carried inside platform intents
//!
//! The platform echoes back whatever `customData` the device reported during
//! discovery, so these types keep unknown fields intact for pass-through.
//! Fields are decoded loosely: a value of the wrong type is kept for
//! pass-through but ignored for addressing, so one malformed device never
//! rejects a whole request.

pub mod address;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub use address::{DEFAULT_DEVICE_ID, DEFAULT_HOSTNAME, DEFAULT_PORT, ResolvedAddress, resolve};

/// Opaque addressing metadata attached to a device by the platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomData {
    /// Identity the device reported during discovery
    #[serde(rename = "deviceId", default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<Value>,

    /// Hostname to reach the device on the local network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<Value>,

    /// Port as supplied by the platform; kept loose so falsy values round-trip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<Value>,

    /// Any other fields, echoed back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CustomData {
    /// Reported identity, if it is a non-empty string
    #[must_use]
    pub fn device_id(&self) -> Option<&str> {
        text(self.device_id.as_ref())
    }

    /// Hostname, if it is a non-empty string
    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        text(self.hostname.as_ref())
    }
}

/// A device as referenced in a query or execute payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Dropped when it is not an object
    #[serde(
        rename = "customData",
        default,
        deserialize_with = "lenient_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_data: Option<CustomData>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceRef {
    /// Identity used to key this device in responses
    ///
    /// Falls back from the platform id to the `customData` id, then to the
    /// default identity. Empty strings count as missing.
    #[must_use]
    pub fn identity(&self) -> String {
        self.platform_id()
            .or_else(|| self.custom_data.as_ref()?.device_id())
            .unwrap_or(DEFAULT_DEVICE_ID)
            .to_string()
    }

    /// Platform-assigned id, if it is a non-empty string
    #[must_use]
    pub fn platform_id(&self) -> Option<&str> {
        text(self.id.as_ref())
    }

    /// Resolve the network location of this device
    #[must_use]
    pub fn address(&self) -> ResolvedAddress {
        resolve(&self.identity(), self.custom_data.as_ref())
    }
}

fn text(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Decode an optional object field, treating any non-object as absent
pub(crate) fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_prefers_platform_id() {
        let device: DeviceRef = serde_json::from_value(serde_json::json!({
            "id": "sea.dock",
            "customData": { "deviceId": "sea.other" }
        }))
        .unwrap();
        assert_eq!(device.identity(), "sea.dock");
    }

    #[test]
    fn test_identity_falls_back_to_custom_data() {
        let device: DeviceRef = serde_json::from_value(serde_json::json!({
            "id": "",
            "customData": { "deviceId": "sea.other" }
        }))
        .unwrap();
        assert_eq!(device.identity(), "sea.other");
    }

    #[test]
    fn test_identity_default() {
        assert_eq!(DeviceRef::default().identity(), DEFAULT_DEVICE_ID);
    }

    #[test]
    fn test_non_string_ids_are_ignored() {
        let device: DeviceRef = serde_json::from_value(serde_json::json!({
            "id": 7,
            "customData": { "deviceId": ["sea.other"], "hostname": 5 }
        }))
        .unwrap();
        assert_eq!(device.platform_id(), None);
        assert_eq!(device.identity(), DEFAULT_DEVICE_ID);
        assert_eq!(device.address().hostname, DEFAULT_HOSTNAME);
        // Kept for pass-through
        assert_eq!(device.id, Some(serde_json::json!(7)));
    }

    #[test]
    fn test_non_object_custom_data_is_dropped() {
        let device: DeviceRef = serde_json::from_value(serde_json::json!({
            "id": "sea.dock",
            "customData": "dock.local"
        }))
        .unwrap();
        assert_eq!(device.custom_data, None);
        assert_eq!(device.address().hostname, DEFAULT_HOSTNAME);
    }

    #[test]
    fn test_custom_data_keeps_unknown_fields() {
        let raw = serde_json::json!({
            "deviceId": "sea.dock",
            "hostname": "dock.local",
            "port": "",
            "stateEndpoint": "/api/google/state"
        });
        let data: CustomData = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(data.extra["stateEndpoint"], "/api/google/state");
        assert_eq!(serde_json::to_value(&data).unwrap(), raw);
    }
}
