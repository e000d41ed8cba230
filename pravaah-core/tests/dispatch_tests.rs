// Tests for background search/toggle dispatch against a mock API

use pravaah_api::StationClient;
use pravaah_core::amenities::{AmenityEvent, AmenityState, EMPTY_SEARCH_MESSAGE, StatusKind};
use pravaah_core::dispatch::{event_channel, run_search, run_toggle, spawn_search, spawn_toggle};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

fn station_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "data": {"mapData": {"vertices": [
            {"id": "1", "objectName": "entry", "visible": true},
            {"id": "2", "objectName": "restRoom", "visible": false}
        ]}}
    })
}

async fn mount_search(server: &MockServer, key_path: &str, name: &str, delay_ms: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/api/stations/search/{}", key_path)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(station_body(name))
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_spawned_search_delivers_completion() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, "Central", "Central", 0).await;

    let client = StationClient::with_base_url(&mock_server.uri()).unwrap();
    let (tx, mut rx) = event_channel();
    let mut state = AmenityState::new();
    state.set_search_key("Central");

    let ticket = state.submit_search().unwrap();
    spawn_search(&client, ticket, tx);

    let event = rx.recv().await.unwrap();
    assert!(state.apply(event));
    assert_eq!(state.amenities().len(), 1);
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_slow_stale_search_does_not_overwrite() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, "Old", "Old", 300).await;
    mount_search(&mock_server, "Central", "Central", 0).await;

    let client = StationClient::with_base_url(&mock_server.uri()).unwrap();
    let (tx, mut rx) = event_channel();
    let mut state = AmenityState::new();

    state.set_search_key("Old");
    let first = state.submit_search().unwrap();
    spawn_search(&client, first, tx.clone());

    state.set_search_key("Central");
    let second = state.submit_search().unwrap();
    spawn_search(&client, second, tx);

    let mut applied = 0;
    while let Some(event) = rx.recv().await {
        if state.apply(event) {
            applied += 1;
        }
    }

    assert_eq!(applied, 1);
    assert_eq!(state.result().unwrap().name, "Central");
}

#[tokio::test]
async fn test_spawned_toggle_patches_on_success() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, "Central", "Central", 0).await;
    Mock::given(method("PUT"))
        .and(path("/api/stations/Central/amenities"))
        .and(body_json(json!({"vertexId": "2", "visible": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StationClient::with_base_url(&mock_server.uri()).unwrap();
    let mut state = AmenityState::new();
    state.set_search_key("Central");
    assert!(run_search(&client, &mut state).await);

    let (tx, mut rx) = event_channel();
    let request = state.request_toggle("2").unwrap();
    spawn_toggle(&client, request, tx);

    match rx.recv().await.unwrap() {
        event @ AmenityEvent::ToggleCompleted { .. } => {
            state.apply(event);
        }
        other => panic!("unexpected event: {:?}", other),
    }

    assert!(state.amenities()[0].visible);
    assert_eq!(
        state.last_update_status().unwrap().kind,
        StatusKind::Success
    );
}

#[tokio::test]
async fn test_run_toggle_failure_keeps_result() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, "Central", "Central", 0).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "conflict"})))
        .mount(&mock_server)
        .await;

    let client = StationClient::with_base_url(&mock_server.uri()).unwrap();
    let mut state = AmenityState::new();
    state.set_search_key("Central");
    run_search(&client, &mut state).await;
    let before = state.result().unwrap().clone();

    assert!(run_toggle(&client, &mut state, "2").await);

    assert_eq!(state.result().unwrap(), &before);
    assert_eq!(state.last_update_status().unwrap().message, "conflict");
}

#[tokio::test]
async fn test_blank_search_never_reaches_server() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(station_body("x")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = StationClient::with_base_url(&mock_server.uri()).unwrap();
    let mut state = AmenityState::new();
    state.set_search_key("   ");

    assert!(!run_search(&client, &mut state).await);
    assert_eq!(state.last_error(), Some(EMPTY_SEARCH_MESSAGE));
}

#[tokio::test]
async fn test_search_with_html_response_sets_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html></html>"),
        )
        .mount(&mock_server)
        .await;

    let client = StationClient::with_base_url(&mock_server.uri()).unwrap();
    let mut state = AmenityState::new();
    state.set_search_key("Central");
    run_search(&client, &mut state).await;

    assert!(state.result().is_none());
    assert_eq!(
        state.last_error(),
        Some("Invalid response format from server")
    );
}

#[tokio::test]
async fn test_padded_key_reaches_server_as_typed() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, "%20Central%20", "Central", 0).await;
    Mock::given(method("PUT"))
        .and(path("/api/stations/%20Central%20/amenities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StationClient::with_base_url(&mock_server.uri()).unwrap();
    let mut state = AmenityState::new();
    state.set_search_key(" Central ");

    assert!(run_search(&client, &mut state).await);
    assert!(run_toggle(&client, &mut state, "2").await);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/api/stations/search/%20Central%20");
    assert_eq!(requests[1].url.path(), "/api/stations/%20Central%20/amenities");
    assert_eq!(
        state.last_update_status().unwrap().kind,
        StatusKind::Success
    );
}
