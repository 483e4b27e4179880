use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{
    DeviceType, HubThresholdType, SensorThresholdType, SensorType, ThresholdType,
};

/// A hub with its attached sensor devices, as returned by `/hubs/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hub {
    pub id: i64,
    pub name: String,
    pub hub_thresholds: Vec<HubThreshold>,
    pub hidden: bool,
    pub mac_address: String,
    pub grow_id: i64,
    pub sensor_devices: Vec<SensorDevice>,
}

/// A sensor device attached to a hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorDevice {
    pub hub_id: i64,
    #[serde(default)]
    pub par_sensor_subtype: Option<String>,
    pub device_type: DeviceType,
    pub sensor_type: SensorType,
    pub id: i64,
    pub display_order: i64,
    pub name: String,
    pub grow_id: i64,
    pub hidden: bool,
}

/// An alert threshold configured on the hub itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubThreshold {
    pub hub_id: i64,
    pub threshold_type: HubThresholdType,
    pub id: i64,
    pub notification_active: bool,
    #[serde(default)]
    pub low_threshold_value: Option<f64>,
    #[serde(default)]
    pub high_threshold_value: Option<f64>,
    /// Delay before the alert fires, e.g. "00:03:00"
    pub delay: String,
    /// Day-of-week restriction; absent when the threshold applies every day
    #[serde(default)]
    pub day: Option<String>,
}

/// One measured value inside a data point.
///
/// These three fields are the only PascalCase ones in the vendor API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPointValue {
    #[serde(rename = "MeasuringUnit")]
    pub measuring_unit: String,
    #[serde(rename = "ParamName")]
    pub param_name: String,
    #[serde(rename = "ParamValue")]
    pub param_value: f64,
}

/// An alert that fired for a device, carried alongside its readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggeredThreshold {
    pub id: i64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_opt_timestamp")]
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved: bool,
    pub threshold_id: i64,
    #[serde(default)]
    pub threshold_type: Option<ThresholdType>,
    pub device_id: i64,
    pub device_name: String,
    pub low_or_high: bool,
    pub low_threshold_value: f64,
    pub high_threshold_value: f64,
    pub triggering_value: String,
    #[serde(default)]
    pub sensor_threshold_type: Option<SensorThresholdType>,
    #[serde(default)]
    pub hub_threshold_type: Option<HubThresholdType>,
}

/// A timestamped batch of values reported by one sensor device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPointDto {
    pub data_point_values: Vec<DataPointValue>,
    #[serde(default)]
    pub triggered_thresholds: Vec<TriggeredThreshold>,
    pub sensor_id: i64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// The most recent reading for a device, as returned by
/// `/sensors/{id}/recent-data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestSensorData {
    pub sensor_type: SensorType,
    pub device_type: DeviceType,
    pub name: String,
    pub data_point_dto: DataPointDto,
}

/// Parse a vendor timestamp.
///
/// The API emits both RFC 3339 timestamps with an offset and naive
/// ISO 8601 timestamps with no zone at all; naive ones are taken as UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(_) => raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc()),
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(de::Error::custom)
}

fn deserialize_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw).map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}
