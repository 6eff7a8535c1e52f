//! Device address resolution
//!
//! Turns the loose `customData` the platform hands us into a concrete
//! `hostname:port`. Missing or falsy values fall back to the defaults the
//! firmware advertises over mDNS.

use serde::Serialize;
use serde_json::Value;

use super::CustomData;

/// Identity used when a request does not name a device
pub const DEFAULT_DEVICE_ID: &str = "sea.sea";

/// Hostname the sensor advertises over mDNS
pub const DEFAULT_HOSTNAME: &str = "sea.local";

/// Port of the sensor's embedded HTTP server
pub const DEFAULT_PORT: u16 = 80;

/// Concrete network location of a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAddress {
    pub device_id: String,
    pub hostname: String,
    pub port: u16,
}

impl ResolvedAddress {
    /// Plaintext URL for a path on this device
    ///
    /// IPv6 literals are bracketed.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if self.hostname.contains(':') && !self.hostname.starts_with('[') {
            format!("http://[{}]:{}{path}", self.hostname, self.port)
        } else {
            format!("http://{}:{}{path}", self.hostname, self.port)
        }
    }
}

/// Resolve a device's address from its id and optional metadata
///
/// Never fails. An empty id maps to [`DEFAULT_DEVICE_ID`], a missing or empty
/// or non-string hostname to [`DEFAULT_HOSTNAME`], and a missing or falsy port (`0`, `""`,
/// `null`, `false`) to [`DEFAULT_PORT`].
#[must_use]
pub fn resolve(device_id: &str, metadata: Option<&CustomData>) -> ResolvedAddress {
    let device_id = if device_id.is_empty() {
        DEFAULT_DEVICE_ID
    } else {
        device_id
    };

    let hostname = metadata
        .and_then(CustomData::hostname)
        .unwrap_or(DEFAULT_HOSTNAME);

    let port = metadata
        .and_then(|m| m.port.as_ref())
        .and_then(port_from_value)
        .unwrap_or(DEFAULT_PORT);

    ResolvedAddress {
        device_id: device_id.to_string(),
        hostname: hostname.to_string(),
        port,
    }
}

/// Truthy port values only; anything unusable is treated as absent
fn port_from_value(value: &Value) -> Option<u16> {
    let port = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    u16::try_from(port).ok().filter(|p| *p != 0)
}
