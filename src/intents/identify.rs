//! IDENTIFY intent
//!
//! Synthesizes the descriptor of the sea sensor from the scan data the
//! platform forwards. No network call is made.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::IDENTIFY_INTENT;
use crate::devices::{DEFAULT_DEVICE_ID, DEFAULT_HOSTNAME, DEFAULT_PORT, lenient_object};

const MANUFACTURER: &str = "SeaMonitor";
const MODEL: &str = "SeaSensor-ESP32";
const HW_VERSION: &str = "revA";
const SW_VERSION: &str = "local-bridge-0.1";

const DEVICE_TYPE: &str = "action.devices.types.SENSOR";
const TRAITS: [&str; 2] = [
    "action.devices.traits.SensorState",
    "action.devices.traits.OnOff",
];

/// Sensor readings the device exposes, with their units
const SENSOR_STATES: [(&str, &str); 6] = [
    ("airTemperatureC", "C"),
    ("humidityPercent", "%"),
    ("waterTemperatureC", "C"),
    ("waterLevelCm", "cm"),
    ("airPressureHpa", "hPa"),
    ("batteryPercent", "%"),
];

/// Device block of an IDENTIFY payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentifyDevice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Scan metadata; merged into the descriptor's `customData`. Ignored
    /// unless it is an object.
    #[serde(
        rename = "deviceInfo",
        default,
        deserialize_with = "lenient_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub device_info: Option<Map<String, Value>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct IdentifyPayload {
    #[serde(default)]
    pub device: IdentifyDevice,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifyRequest {
    pub request_id: String,
    pub device: IdentifyDevice,
}

/// Static manufacturer/model information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub manufacturer: String,
    pub model: String,
    pub hw_version: String,
    pub sw_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportedSensorState {
    pub name: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAttributes {
    pub sensor_states_supported: Vec<SupportedSensorState>,
}

/// Descriptor returned to the platform during discovery
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub traits: Vec<String>,
    pub attributes: DeviceAttributes,
    pub device_info: DeviceInfo,
    /// Passed back verbatim by the platform on later QUERY/EXECUTE intents
    pub custom_data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyResponsePayload {
    pub device: DeviceDescriptor,
    pub device_id: String,
    pub verification_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyResponse {
    pub request_id: String,
    pub intent: &'static str,
    pub payload: IdentifyResponsePayload,
}

/// Build the descriptor for the identifying device
///
/// Caller-supplied scan metadata is layered over the default addressing
/// fields, so a caller `hostname` or `port` wins.
#[must_use]
pub fn handle(request: &IdentifyRequest) -> IdentifyResponse {
    let id = request
        .device
        .id
        .as_ref()
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .unwrap_or(DEFAULT_DEVICE_ID)
        .to_string();

    tracing::debug!(request_id = %request.request_id, device_id = %id, "identify");

    let mut custom_data = Map::new();
    custom_data.insert("deviceId".to_string(), Value::from(id.clone()));
    custom_data.insert("hostname".to_string(), Value::from(DEFAULT_HOSTNAME));
    custom_data.insert("port".to_string(), Value::from(DEFAULT_PORT));
    if let Some(info) = &request.device.device_info {
        custom_data.extend(info.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    let device = DeviceDescriptor {
        id: id.clone(),
        device_type: DEVICE_TYPE.to_string(),
        traits: TRAITS.iter().map(ToString::to_string).collect(),
        attributes: DeviceAttributes {
            sensor_states_supported: SENSOR_STATES
                .iter()
                .map(|(name, unit)| SupportedSensorState {
                    name: (*name).to_string(),
                    unit: (*unit).to_string(),
                })
                .collect(),
        },
        device_info: DeviceInfo {
            manufacturer: MANUFACTURER.to_string(),
            model: MODEL.to_string(),
            hw_version: HW_VERSION.to_string(),
            sw_version: SW_VERSION.to_string(),
        },
        custom_data,
    };

    IdentifyResponse {
        request_id: request.request_id.clone(),
        intent: IDENTIFY_INTENT,
        payload: IdentifyResponsePayload {
            device,
            device_id: id.clone(),
            verification_id: id,
        },
    }
}
