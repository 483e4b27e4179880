//! Discovery cycle: enumerate hubs and devices, record the topology, and
//! announce everything to Home Assistant.
//!
//! Announcements use device-based MQTT discovery: one retained config
//! message per hub and per sensor device, each carrying its components.

use std::collections::BTreeMap;

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use pulse_api::models::{Hub, LatestSensorData, SensorDevice};

use crate::engine::{DiscoveryCounts, TopologySnapshot};
use crate::integrations::mqtt::MqttClient;

use super::entity::{self, DeviceClass, Topics};
use super::Bridge;

const MANUFACTURER: &str = "Pulse Labs, Inc.";

/// `origin` block carried by every announcement, so Home Assistant logs
/// have context about the source of the config messages.
#[derive(Debug, Clone, Serialize)]
pub struct Origin {
    pub name: &'static str,
    pub sw_version: &'static str,
}

impl Default for Origin {
    fn default() -> Self {
        Self {
            name: "pulsed",
            sw_version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// `device` block describing the hub or sensor device being announced
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    pub identifiers: String,
    pub name: String,
    pub manufacturer: &'static str,
    pub model: String,
    pub model_id: String,

    /// Unique id of the parent hub, present on sensor devices only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via_device: Option<String>,

    /// Network connections, e.g. `[["mac", "a1:b2:..."]]` on hubs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<(String, String)>>,
}

/// One component (entity) inside a device-based discovery announcement
#[derive(Debug, Clone, Serialize)]
pub struct Component {
    pub platform: &'static str,
    pub name: String,
    pub unique_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<DeviceClass>,

    pub state_topic: String,

    /// Template extracting this component's value from the device state
    /// payload, e.g. `{{ value_json.temperature }}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_template: Option<String>,
}

/// Full device-based discovery announcement payload
#[derive(Debug, Clone, Serialize)]
pub struct DeviceDiscovery {
    pub origin: Origin,
    pub device: DeviceInfo,
    pub components: BTreeMap<String, Component>,
}

/// Build the announcement for a hub: the device block plus a single
/// binary_sensor presence component.
fn hub_announcement(hub: &Hub, topics: &Topics) -> (String, DeviceDiscovery) {
    let uid = entity::hub_uid(hub.id);
    let status_uid = format!("{uid}_status");

    let mut components = BTreeMap::new();
    components.insert(
        status_uid.clone(),
        Component {
            platform: "binary_sensor",
            name: format!("{} {}", hub.name, hub.id),
            unique_id: status_uid,
            object_id: None,
            unit_of_measurement: None,
            device_class: None,
            state_topic: topics.state_topic(&uid),
            value_template: None,
        },
    );

    let payload = DeviceDiscovery {
        origin: Origin::default(),
        device: DeviceInfo {
            identifiers: uid.clone(),
            name: hub.name.clone(),
            manufacturer: MANUFACTURER,
            model: "Pulse Hub".to_string(),
            model_id: "Hub".to_string(),
            via_device: None,
            connections: Some(vec![(
                "mac".to_string(),
                entity::format_mac(&hub.mac_address),
            )]),
        },
        components,
    };

    (topics.config_topic(&uid), payload)
}

/// Build the announcement for a sensor device: one sensor component per
/// data point in its latest reading.
fn device_announcement(
    hub_id: i64,
    device: &SensorDevice,
    latest: &LatestSensorData,
    topics: &Topics,
) -> (String, DeviceDiscovery) {
    let uid = entity::device_uid(hub_id, device.id);
    let state_topic = topics.state_topic(&uid);
    let model_name = entity::sensor_model_name(latest.sensor_type);

    let mut components = BTreeMap::new();
    for value in &latest.data_point_dto.data_point_values {
        let param_key = entity::normalize_param(&value.param_name);
        let metric_uid = entity::metric_uid(hub_id, device.id, &value.param_name);
        components.insert(
            metric_uid.clone(),
            Component {
                platform: "sensor",
                name: value.param_name.clone(),
                unique_id: metric_uid.clone(),
                object_id: Some(metric_uid),
                unit_of_measurement: Some(value.measuring_unit.clone()),
                device_class: DeviceClass::for_param(&value.param_name),
                state_topic: state_topic.clone(),
                value_template: Some(format!("{{{{ value_json.{param_key} }}}}")),
            },
        );
    }

    let payload = DeviceDiscovery {
        origin: Origin::default(),
        device: DeviceInfo {
            identifiers: uid.clone(),
            name: latest.name.clone(),
            manufacturer: MANUFACTURER,
            model: format!("Pulse {model_name} Sensor"),
            model_id: model_name,
            via_device: Some(entity::hub_uid(hub_id)),
            connections: None,
        },
        components,
    };

    (topics.config_topic(&uid), payload)
}

/// Run one discovery cycle.
///
/// Fetches the full hub topology, swaps it into the state store, and then
/// publishes the retained announcements. A hub or device that cannot be
/// fetched is skipped with a warning and never aborts the batch; only a
/// failure to enumerate hub ids ends the cycle early.
pub(crate) async fn run<C: MqttClient>(bridge: &Bridge<C>) -> anyhow::Result<DiscoveryCounts> {
    info!("Discovering hubs and their sensors");

    let hub_ids = bridge
        .client
        .hub_ids()
        .await
        .context("Failed to list hubs")?;
    if hub_ids.is_empty() {
        warn!("Discovery: no hub ids found, skipping");
        return Ok(DiscoveryCounts::default());
    }
    debug!("Discovery: found {} hub ids", hub_ids.len());

    let mut hubs = Vec::new();
    let mut announcements: Vec<(String, Vec<u8>)> = Vec::new();
    let mut counts = DiscoveryCounts::default();

    for hub_id in hub_ids {
        let hub = match bridge.client.hub_details(hub_id).await {
            Ok(Some(hub)) => hub,
            Ok(None) => {
                warn!("Discovery: no usable details for hub {}, skipping", hub_id);
                continue;
            }
            Err(e) => {
                warn!("Discovery: failed to fetch hub {}: {:#}", hub_id, e);
                continue;
            }
        };

        let (topic, payload) = hub_announcement(&hub, &bridge.topics);
        announcements.push((
            topic,
            serde_json::to_vec(&payload).context("Failed to encode hub announcement")?,
        ));

        for device in &hub.sensor_devices {
            let latest = match bridge.client.latest_sensor_data(device.id).await {
                Ok(Some(latest)) => latest,
                Ok(None) => {
                    warn!(
                        "Discovery: no data received for device {}, skipping announcement",
                        device.id
                    );
                    continue;
                }
                Err(e) => {
                    warn!("Discovery: failed to fetch device {}: {:#}", device.id, e);
                    continue;
                }
            };

            let (topic, payload) = device_announcement(hub.id, device, &latest, &bridge.topics);
            counts.metrics += payload.components.len();
            announcements.push((
                topic,
                serde_json::to_vec(&payload).context("Failed to encode device announcement")?,
            ));
        }

        counts.devices += hub.sensor_devices.len();
        hubs.push(hub);
    }

    if hubs.is_empty() {
        warn!("Discovery: no hub details could be fetched, keeping previous topology");
        return Ok(DiscoveryCounts::default());
    }
    counts.hubs = hubs.len();

    // Record the new topology in a single swap before announcing it.
    bridge.store.replace_topology(TopologySnapshot {
        hubs,
        counts,
        discovered_at: Utc::now(),
    });

    for (topic, payload) in announcements {
        debug!("Discovery: publishing announcement to {}", topic);
        bridge.publish(&topic, payload, true).await;
    }

    info!(
        "Discovery complete: {} hubs, {} devices, {} metrics",
        counts.hubs, counts.devices, counts.metrics
    );

    Ok(counts)
}
