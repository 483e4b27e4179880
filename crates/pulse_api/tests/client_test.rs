// Behavior tests for `PulseClient` against a wiremock server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pulse_api::types::{DeviceType, SensorType};
use pulse_api::{Error, PulseClient};

async fn setup() -> (MockServer, PulseClient) {
    let server = MockServer::start().await;
    let client = PulseClient::with_base_url(&server.uri(), "test-key", Duration::from_secs(2))
        .expect("client builds");
    (server, client)
}

fn hub_body() -> serde_json::Value {
    json!({
        "id": 1,
        "name": "Veg Room",
        "hubThresholds": [],
        "hidden": false,
        "macAddress": "AABBCCDDEEFF",
        "growId": 7,
        "sensorDevices": [
            {
                "hubId": 1,
                "deviceType": 3,
                "sensorType": 1,
                "id": 10,
                "displayOrder": 0,
                "name": "Bed A Probe",
                "growId": 7,
                "hidden": false
            }
        ]
    })
}

#[tokio::test]
async fn test_hub_ids() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/hubs/ids"))
        .and(header("x-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .expect(1)
        .mount(&server)
        .await;

    let ids = client.hub_ids().await.unwrap();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_hub_ids_empty_account() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/hubs/ids"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert_eq!(client.hub_ids().await.unwrap(), Vec::<i64>::new());
}

#[tokio::test]
async fn test_hub_ids_null_body_treated_as_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/hubs/ids"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    assert_eq!(client.hub_ids().await.unwrap(), Vec::<i64>::new());
}

#[tokio::test]
async fn test_hub_details() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/hubs/1"))
        .and(header("x-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hub_body()))
        .mount(&server)
        .await;

    let hub = client.hub_details(1).await.unwrap().expect("hub present");
    assert_eq!(hub.id, 1);
    assert_eq!(hub.name, "Veg Room");
    assert_eq!(hub.sensor_devices.len(), 1);
    assert_eq!(hub.sensor_devices[0].device_type, DeviceType::Sensor);
}

#[tokio::test]
async fn test_validation_failure_is_absent_not_error() {
    let (server, client) = setup().await;

    // Valid JSON, wrong shape.
    Mock::given(method("GET"))
        .and(path("/hubs/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    assert_eq!(client.hub_details(1).await.unwrap(), None);
}

#[tokio::test]
async fn test_latest_sensor_data() {
    let (server, client) = setup().await;

    let body = json!({
        "sensorType": 1,
        "deviceType": 3,
        "name": "Bed A Probe",
        "dataPointDto": {
            "dataPointValues": [
                {"MeasuringUnit": "%", "ParamName": "Water Content", "ParamValue": 42.5}
            ],
            "sensorId": 10,
            "createdAt": "2025-03-04T18:20:00Z"
        }
    });

    Mock::given(method("GET"))
        .and(path("/sensors/10/recent-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let data = client
        .latest_sensor_data(10)
        .await
        .unwrap()
        .expect("reading present");
    assert_eq!(data.sensor_type, SensorType::Vwc1);
    assert_eq!(data.data_point_dto.data_point_values[0].param_value, 42.5);
}

#[tokio::test]
async fn test_error_status_propagates() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/hubs/1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    match client.hub_details(1).await {
        Err(Error::Status { status, .. }) => assert_eq!(status.as_u16(), 503),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_propagates() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sensors/10/recent-data"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<!doctype html>"))
        .mount(&server)
        .await;

    assert!(matches!(
        client.latest_sensor_data(10).await,
        Err(Error::MalformedBody { .. })
    ));
}

#[tokio::test]
async fn test_lenient_mode_substitutes_empty_results() {
    let (server, client) = setup().await;
    let client = client.lenient(true);

    Mock::given(method("GET"))
        .and(path("/hubs/ids"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hubs/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    // Transport failures become empty results instead of errors.
    assert_eq!(client.hub_ids().await.unwrap(), Vec::<i64>::new());
    assert_eq!(client.hub_details(1).await.unwrap(), None);
}

#[tokio::test]
async fn test_lenient_mode_leaves_validation_behavior_alone() {
    let (server, client) = setup().await;
    let client = client.lenient(true);

    Mock::given(method("GET"))
        .and(path("/hubs/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    assert_eq!(client.hub_details(1).await.unwrap(), None);
}
