//! Identifier and topic derivation for published entities.
//!
//! Unique ids are derived from the vendor's numeric ids alone, never from
//! names or other mutable metadata, so every discovery cycle lands on the
//! same ids and re-announcement is idempotent.

use serde::Serialize;

use pulse_api::types::SensorType;

/// Prefix stamped on every unique id the bridge derives.
const UID_PREFIX: &str = "pulsed";

/// Topic prefixes the bridge publishes under.
#[derive(Debug, Clone)]
pub struct Topics {
    pub discovery_prefix: String,
    pub state_prefix: String,
}

impl Topics {
    /// Device-based discovery config topic for a unique id.
    pub fn config_topic(&self, uid: &str) -> String {
        format!("{}/device/{}/config", self.discovery_prefix, uid)
    }

    /// State topic a device's values are published on.
    pub fn state_topic(&self, uid: &str) -> String {
        format!("{}/{}/state", self.state_prefix, uid)
    }
}

impl Default for Topics {
    fn default() -> Self {
        Self {
            discovery_prefix: "homeassistant".to_string(),
            state_prefix: "pulsed".to_string(),
        }
    }
}

/// Normalize a vendor parameter name into a payload key: lowercased, spaces
/// to underscores. Idempotent.
pub fn normalize_param(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Unique id for a hub.
pub fn hub_uid(hub_id: i64) -> String {
    format!("{UID_PREFIX}_hub_{hub_id}")
}

/// Unique id for a sensor device.
pub fn device_uid(hub_id: i64, device_id: i64) -> String {
    format!("{UID_PREFIX}_{hub_id}_{device_id}")
}

/// Unique id for one published metric of a device.
pub fn metric_uid(hub_id: i64, device_id: i64, param_name: &str) -> String {
    format!(
        "{}_{}",
        device_uid(hub_id, device_id),
        normalize_param(param_name)
    )
}

/// Uppercase model name for a sensor type, e.g. "THV1".
pub fn sensor_model_name(sensor_type: SensorType) -> String {
    sensor_type.to_string().to_uppercase()
}

/// Format a bare MAC address string with a colon between octet pairs.
pub fn format_mac(raw: &str) -> String {
    raw.chars()
        .collect::<Vec<_>>()
        .chunks(2)
        .map(|pair| pair.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(":")
}

/// Home Assistant device-class hint attached to a metric announcement.
///
/// The mapping from vendor parameter names is exact and case-sensitive;
/// parameters it does not know get no hint rather than a guessed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Humidity,
    Temperature,
    Moisture,
    Pressure,
}

impl DeviceClass {
    pub fn for_param(param_name: &str) -> Option<Self> {
        match param_name {
            "Humidity" => Some(Self::Humidity),
            "Temperature" => Some(Self::Temperature),
            "Water Content" => Some(Self::Moisture),
            "VPD" => Some(Self::Pressure),
            _ => None,
        }
    }
}
