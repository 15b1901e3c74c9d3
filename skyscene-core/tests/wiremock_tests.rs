//! Integration tests for the OpenWeather client and the full lookup
//! pipeline against a mock HTTP server.

use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};
use skyscene_core::{
    Condition, Controller, FixedClock, LookupError, LookupOutcome, OpenWeatherClient, Trigger,
    WeatherSource,
    panel::NOT_FOUND_MESSAGE,
    scene::{CLEAR_DAY_BACKGROUND, ContainerId},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn clear_response(name: &str, temp: f64) -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 139.69, "lat": 35.69 },
        "weather": [
            { "id": 800, "main": "Clear", "description": "晴天", "icon": "01d" }
        ],
        "main": { "temp": temp, "feels_like": temp, "humidity": 35 },
        "name": name,
        "cod": 200
    })
}

fn not_found_response() -> serde_json::Value {
    serde_json::json!({ "cod": "404", "message": "city not found" })
}

fn client(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::with_base_url("TEST_KEY".into(), server.uri())
}

async fn mount(server: &MockServer, city: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", city))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "ja"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn controller(server: &MockServer, hour: u32) -> Controller {
    Controller::new(Arc::new(client(server)), Arc::new(FixedClock(hour)), StdRng::seed_from_u64(11))
}

// ============================================================================
// Client
// ============================================================================

#[tokio::test]
async fn sends_raw_city_without_country_suffix() {
    let server = MockServer::start().await;
    mount(&server, "東京", ResponseTemplate::new(200).set_body_json(clear_response("Tokyo", 20.0)))
        .await;

    let report = client(&server).current_weather("東京").await.expect("lookup should succeed");

    assert_eq!(report.location_name, "Tokyo");
    assert_eq!(report.condition, Condition::Clear);
    assert_eq!(report.icon_code, "01d");
}

#[tokio::test]
async fn not_found_body_maps_to_not_found() {
    let server = MockServer::start().await;
    mount(&server, "Atlantis", ResponseTemplate::new(404).set_body_json(not_found_response()))
        .await;

    let err = client(&server).current_weather("Atlantis").await.unwrap_err();
    assert_eq!(err, LookupError::NotFound);
}

#[tokio::test]
async fn server_error_maps_to_network_failure() {
    let server = MockServer::start().await;
    mount(&server, "Tokyo", ResponseTemplate::new(500).set_body_string("internal error")).await;

    let err = client(&server).current_weather("Tokyo").await.unwrap_err();
    assert!(matches!(err, LookupError::NetworkFailure(_)));
}

#[tokio::test]
async fn unauthorized_json_maps_to_network_failure() {
    let server = MockServer::start().await;
    mount(
        &server,
        "Tokyo",
        ResponseTemplate::new(401)
            .set_body_json(serde_json::json!({ "cod": 401, "message": "Invalid API key" })),
    )
    .await;

    let err = client(&server).current_weather("Tokyo").await.unwrap_err();
    assert!(matches!(err, LookupError::NetworkFailure(_)));
}

#[tokio::test]
async fn connection_refused_maps_to_network_failure() {
    let client = OpenWeatherClient::with_base_url("TEST_KEY".into(), "http://127.0.0.1:1".into());

    let err = client.current_weather("Tokyo").await.unwrap_err();
    assert!(matches!(err, LookupError::NetworkFailure(_)));
}

// ============================================================================
// End to end
// ============================================================================

#[tokio::test]
async fn tokyo_clear_day_shows_sun() {
    let server = MockServer::start().await;
    mount(&server, "Tokyo", ResponseTemplate::new(200).set_body_json(clear_response("Tokyo", 22.5)))
        .await;

    let ctrl = controller(&server, 11);
    let outcome = ctrl.handle(Trigger::Click, "Tokyo").await;
    assert!(outcome.is_applied());

    let widget = ctrl.snapshot();
    assert_eq!(widget.panel.location, "Tokyo");
    assert_eq!(widget.panel.temperature, "23 ℃");
    assert_eq!(widget.panel.description, "晴天");
    assert!(!widget.panel.description.ends_with(" (夜)"));
    assert_eq!(widget.scene.active_containers(), vec![ContainerId::Sun]);
    assert_eq!(widget.scene.sun.children.len(), 2);
    assert_eq!(widget.scene.background.as_deref(), Some(CLEAR_DAY_BACKGROUND));
}

#[tokio::test]
async fn unknown_city_only_changes_description() {
    let server = MockServer::start().await;
    mount(&server, "Tokyo", ResponseTemplate::new(200).set_body_json(clear_response("Tokyo", 8.0)))
        .await;
    mount(&server, "Unknown City", ResponseTemplate::new(404).set_body_json(not_found_response()))
        .await;

    let ctrl = controller(&server, 22);
    ctrl.lookup("Tokyo").await;
    let before = ctrl.snapshot();
    assert_eq!(before.panel.description, "晴天 (夜)");

    let outcome = ctrl.handle(Trigger::Key("Enter"), "Unknown City").await;
    assert!(matches!(
        outcome,
        LookupOutcome::Applied { result: Err(LookupError::NotFound), .. }
    ));

    let after = ctrl.snapshot();
    assert_eq!(after.panel.description, NOT_FOUND_MESSAGE);
    assert_eq!(after.panel.location, before.panel.location);
    assert_eq!(after.panel.temperature, before.panel.temperature);
    assert_eq!(after.panel.icon, before.panel.icon);
    assert_eq!(after.scene, before.scene);
}
