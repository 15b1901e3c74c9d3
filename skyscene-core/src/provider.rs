use crate::{Config, WeatherReport, provider::openweather::OpenWeatherClient};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// The two ways a lookup can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The API answered with `cod` 404.
    #[error("city not found")]
    NotFound,

    /// Transport error, unreadable body, or a response that didn't decode.
    #[error("failed to load weather: {0}")]
    NetworkFailure(String),
}

#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<WeatherReport, LookupError>;
}

/// Appends the `,jp` country code unless the query already names a country.
///
/// Not applied to outgoing requests: the client only logs the qualified form
/// and sends the raw city.
pub fn with_country_suffix(city: &str) -> String {
    if city.contains(',') { city.to_string() } else { format!("{city},jp") }
}

/// Construct the OpenWeather client from config.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let api_key = config.require_api_key()?;
    Ok(Box::new(OpenWeatherClient::with_base_url(api_key.to_owned(), config.base_url.clone())))
}
