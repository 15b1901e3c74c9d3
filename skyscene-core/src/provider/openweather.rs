use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    config::DEFAULT_BASE_URL,
    model::{Condition, WeatherReport},
    provider::{LookupError, with_country_suffix},
};

use super::WeatherSource;

const UNITS: &str = "metric";
const LANG: &str = "ja";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self { api_key, base_url: base_url.trim_end_matches('/').to_string(), http: Client::new() }
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherReport, LookupError> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", UNITS),
                ("lang", LANG),
            ])
            .send()
            .await
            .map_err(|e| failure("Failed to send request to OpenWeather", e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| failure("Failed to read OpenWeather response body", e))?;

        debug!(%status, bytes = body.len(), "OpenWeather responded");

        decode_current(&body)
    }
}

/// Decode a current-weather body regardless of HTTP status; the `cod` field
/// decides whether the city was unknown.
pub fn decode_current(body: &str) -> Result<WeatherReport, LookupError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        failure(&format!("Failed to parse OpenWeather JSON ({})", truncate_body(body)), e)
    })?;

    if value.get("cod").is_some_and(is_not_found) {
        return Err(LookupError::NotFound);
    }

    let parsed: OwCurrentResponse = serde_json::from_value(value)
        .map_err(|e| failure("Unexpected OpenWeather response shape", e))?;

    let weather = parsed.weather.into_iter().next().ok_or_else(|| {
        LookupError::NetworkFailure("OpenWeather response contained no weather entry".into())
    })?;

    Ok(WeatherReport {
        location_name: parsed.name,
        temperature_c: parsed.main.temp,
        condition: Condition::from(weather.main.as_str()),
        description: weather.description,
        icon_code: weather.icon,
    })
}

/// Only the string form `"cod": "404"` marks an unknown city; a numeric 404
/// has to decode like any other body.
fn is_not_found(cod: &Value) -> bool {
    matches!(cod, Value::String(s) if s == "404")
}

fn failure(context: &str, err: impl std::fmt::Display) -> LookupError {
    LookupError::NetworkFailure(format!("{context}: {err}"))
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn current_weather(&self, city: &str) -> Result<WeatherReport, LookupError> {
        // TODO: send the qualified query once the country restriction is confirmed as intended.
        let qualified = with_country_suffix(city);
        debug!(%qualified, "country-qualified query computed but not sent");

        self.fetch_current(city).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR_BODY: &str = r#"{
        "cod": 200,
        "name": "Tokyo",
        "main": { "temp": 21.6, "feels_like": 20.0, "humidity": 40 },
        "weather": [
            { "id": 800, "main": "Clear", "description": "晴天", "icon": "01d" }
        ]
    }"#;

    #[test]
    fn decodes_success_body() {
        let report = decode_current(CLEAR_BODY).expect("should decode");

        assert_eq!(report.location_name, "Tokyo");
        assert_eq!(report.temperature_c, 21.6);
        assert_eq!(report.condition, Condition::Clear);
        assert_eq!(report.description, "晴天");
        assert_eq!(report.icon_code, "01d");
    }

    #[test]
    fn string_404_is_not_found() {
        let err = decode_current(r#"{"cod":"404","message":"city not found"}"#).unwrap_err();
        assert_eq!(err, LookupError::NotFound);
    }

    #[test]
    fn numeric_404_is_network_failure() {
        let err = decode_current(r#"{"cod":404,"message":"city not found"}"#).unwrap_err();
        assert!(matches!(err, LookupError::NetworkFailure(_)));
    }

    #[test]
    fn string_404_wins_over_report_fields() {
        let body = r#"{"cod":"404","name":"X","main":{"temp":1.0},"weather":[]}"#;
        assert_eq!(decode_current(body).unwrap_err(), LookupError::NotFound);
    }

    #[test]
    fn other_error_codes_are_network_failures() {
        let err = decode_current(r#"{"cod":401,"message":"Invalid API key"}"#).unwrap_err();
        assert!(matches!(err, LookupError::NetworkFailure(_)));
    }

    #[test]
    fn non_json_body_is_network_failure() {
        let err = decode_current("<html>bad gateway</html>").unwrap_err();
        match err {
            LookupError::NetworkFailure(msg) => assert!(msg.contains("bad gateway")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_weather_array_is_network_failure() {
        let body = r#"{"cod":200,"name":"X","main":{"temp":1.0},"weather":[]}"#;
        let err = decode_current(body).unwrap_err();
        assert!(matches!(err, LookupError::NetworkFailure(_)));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "雨".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
    }
}
