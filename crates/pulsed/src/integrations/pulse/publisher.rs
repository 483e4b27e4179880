//! Update cycle: publish the latest reading of every known device.
//!
//! Works entirely from the topology snapshot recorded by the discovery
//! cycle; readings are re-fetched fresh on every cycle.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use pulse_api::models::LatestSensorData;

use crate::integrations::mqtt::MqttClient;

use super::entity;
use super::Bridge;

/// Totals from one update cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PublishSummary {
    pub published: usize,
    pub skipped: usize,
}

/// Flatten a reading into the device state payload: normalized parameter
/// name to numeric value. A BTreeMap keeps the key order stable across
/// cycles.
fn state_payload(latest: &LatestSensorData) -> BTreeMap<String, f64> {
    latest
        .data_point_dto
        .data_point_values
        .iter()
        .map(|value| (entity::normalize_param(&value.param_name), value.param_value))
        .collect()
}

/// Run one update cycle.
///
/// Publishes a retained presence payload per hub and one retained JSON
/// state message per device. Devices whose fetch fails are skipped; the
/// cycle itself never fails.
pub(crate) async fn run<C: MqttClient>(bridge: &Bridge<C>) -> PublishSummary {
    if bridge.mqtt.is_none() {
        debug!("No MQTT transport configured, skipping state publish");
        return PublishSummary::default();
    }

    let Some(snapshot) = bridge.store.topology() else {
        warn!("No sensors discovered yet, skipping state publish");
        return PublishSummary::default();
    };

    let mut summary = PublishSummary::default();

    for hub in &snapshot.hubs {
        let hub_topic = bridge.topics.state_topic(&entity::hub_uid(hub.id));
        bridge.publish(&hub_topic, b"ON".to_vec(), true).await;

        for device in &hub.sensor_devices {
            let latest = match bridge.client.latest_sensor_data(device.id).await {
                Ok(Some(latest)) => latest,
                Ok(None) => {
                    warn!("No data received from device {}, skipping", device.id);
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!("Failed to fetch device {}: {:#}", device.id, e);
                    summary.skipped += 1;
                    continue;
                }
            };

            let payload = match serde_json::to_vec(&state_payload(&latest)) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Failed to encode state for device {}: {}", device.id, e);
                    summary.skipped += 1;
                    continue;
                }
            };

            let topic = bridge
                .topics
                .state_topic(&entity::device_uid(hub.id, device.id));
            debug!("Publishing state update to {}", topic);
            bridge.publish(&topic, payload, true).await;
            summary.published += 1;
        }
    }

    info!(
        "Update cycle complete: {} devices published, {} skipped",
        summary.published, summary.skipped
    );

    summary
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::Utc;
    use pulse_api::models::{DataPointDto, DataPointValue, Hub, SensorDevice};
    use pulse_api::types::{DeviceType, SensorType};
    use pulse_api::PulseClient;
    use serde_json::json;
    use tokio::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::engine::{DiscoveryCounts, StateStore, TopologySnapshot};
    use crate::integrations::mqtt::MockMqttClient;
    use crate::integrations::pulse::entity::Topics;

    use super::*;

    fn hub_with_devices(hub_id: i64, device_ids: &[i64]) -> Hub {
        Hub {
            id: hub_id,
            name: format!("Hub {hub_id}"),
            hub_thresholds: vec![],
            hidden: false,
            mac_address: "a1b2c3d4e5f6".to_string(),
            grow_id: 3,
            sensor_devices: device_ids
                .iter()
                .map(|&id| SensorDevice {
                    hub_id,
                    par_sensor_subtype: None,
                    device_type: DeviceType::Sensor,
                    sensor_type: SensorType::Vwc1,
                    id,
                    display_order: 0,
                    name: format!("Device {id}"),
                    grow_id: 3,
                    hidden: false,
                })
                .collect(),
        }
    }

    fn test_bridge(server: &MockServer) -> (Bridge<MockMqttClient>, Arc<StateStore>) {
        let store = Arc::new(StateStore::new(
            Duration::from_secs(60),
            Duration::from_secs(3600),
        ));
        let bridge = Bridge {
            client: PulseClient::with_base_url(&server.uri(), "test-key", Duration::from_secs(2))
                .unwrap(),
            mqtt: Some(Mutex::new(MockMqttClient::new())),
            store: store.clone(),
            topics: Topics::default(),
        };
        (bridge, store)
    }

    fn seed_topology(store: &StateStore, hubs: Vec<Hub>) {
        let devices = hubs.iter().map(|h| h.sensor_devices.len()).sum();
        store.replace_topology(TopologySnapshot {
            counts: DiscoveryCounts {
                hubs: hubs.len(),
                devices,
                metrics: 0,
            },
            hubs,
            discovered_at: Utc::now(),
        });
    }

    fn latest_body(sensor_id: i64) -> serde_json::Value {
        json!({
            "sensorType": 1,
            "deviceType": 3,
            "name": format!("Device {sensor_id}"),
            "dataPointDto": {
                "dataPointValues": [
                    {"MeasuringUnit": "%", "ParamName": "Water Content", "ParamValue": 42.5},
                    {"MeasuringUnit": "°F", "ParamName": "Temperature", "ParamValue": 71.0},
                ],
                "sensorId": sensor_id,
                "createdAt": "2025-03-04T18:20:00Z",
            },
        })
    }

    #[test]
    fn test_state_payload_flattens_and_normalizes() {
        let latest = LatestSensorData {
            sensor_type: SensorType::Vwc1,
            device_type: DeviceType::Sensor,
            name: "Device 10".to_string(),
            data_point_dto: DataPointDto {
                data_point_values: vec![
                    DataPointValue {
                        measuring_unit: "%".to_string(),
                        param_name: "Water Content".to_string(),
                        param_value: 42.5,
                    },
                    DataPointValue {
                        measuring_unit: "mS/cm".to_string(),
                        param_name: "Pore Water EC".to_string(),
                        param_value: 2.1,
                    },
                ],
                triggered_thresholds: vec![],
                sensor_id: 10,
                created_at: "2025-03-04T18:20:00Z".parse().unwrap(),
            },
        };

        let payload = state_payload(&latest);
        assert_eq!(payload["water_content"], 42.5);
        assert_eq!(payload["pore_water_ec"], 2.1);
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"pore_water_ec":2.1,"water_content":42.5}"#
        );
    }

    #[tokio::test]
    async fn test_publish_before_discovery_is_noop() {
        let server = MockServer::start().await;
        // Any request at all would be a bug; nothing is mounted and the
        // catch-all asserts zero hits.
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let (bridge, _store) = test_bridge(&server);
        let summary = run(&bridge).await;

        assert_eq!(summary, PublishSummary::default());
        assert!(bridge.mqtt.as_ref().unwrap().lock().await.published.is_empty());
    }

    #[tokio::test]
    async fn test_publish_cycle_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sensors/10/recent-data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(latest_body(10)))
            .mount(&server)
            .await;

        let (bridge, store) = test_bridge(&server);
        seed_topology(&store, vec![hub_with_devices(1, &[10])]);

        let summary = run(&bridge).await;
        assert_eq!(summary.published, 1);
        assert_eq!(summary.skipped, 0);

        let mqtt = bridge.mqtt.as_ref().unwrap().lock().await;
        assert_eq!(
            mqtt.published,
            vec![
                (
                    "pulsed/pulsed_hub_1/state".to_string(),
                    b"ON".to_vec(),
                    true
                ),
                (
                    "pulsed/pulsed_1_10/state".to_string(),
                    br#"{"temperature":71.0,"water_content":42.5}"#.to_vec(),
                    true
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_device_fetch_skips_only_that_device() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sensors/10/recent-data"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sensors/11/recent-data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(latest_body(11)))
            .mount(&server)
            .await;

        let (bridge, store) = test_bridge(&server);
        seed_topology(&store, vec![hub_with_devices(1, &[10, 11])]);

        let summary = run(&bridge).await;
        assert_eq!(summary.published, 1);
        assert_eq!(summary.skipped, 1);

        let mqtt = bridge.mqtt.as_ref().unwrap().lock().await;
        assert_eq!(
            mqtt.published_topics(),
            vec!["pulsed/pulsed_hub_1/state", "pulsed/pulsed_1_11/state"]
        );
    }

    #[tokio::test]
    async fn test_no_mqtt_skips_cycle_without_fetching() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let (mut bridge, store) = test_bridge(&server);
        bridge.mqtt = None;
        seed_topology(&store, vec![hub_with_devices(1, &[10])]);

        assert_eq!(run(&bridge).await, PublishSummary::default());
    }
}
