use crate::{
    Config, WeatherError, WeatherQuery, WeatherRecord,
    provider::openweather::{CityNameProvider, CoordinatesProvider},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::{convert::TryFrom, fmt::Debug, time::Duration};

pub mod geocode;
pub mod openweather;

pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("weather-core/", env!("CARGO_PKG_VERSION"));

/// How the weather endpoint is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryMode {
    /// By city name and language, metric units.
    #[default]
    CityName,
    /// Geocode first, then by latitude/longitude; Kelvin converted locally.
    Coordinates,
}

impl QueryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::CityName => "city",
            QueryMode::Coordinates => "coordinates",
        }
    }

    pub const fn all() -> &'static [QueryMode] {
        &[QueryMode::CityName, QueryMode::Coordinates]
    }
}

impl std::fmt::Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for QueryMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "city" => Ok(QueryMode::CityName),
            "coordinates" => Ok(QueryMode::Coordinates),
            _ => Err(anyhow::anyhow!(
                "Unknown query mode '{value}'. Supported modes: city, coordinates."
            )),
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(&self, query: &WeatherQuery, api_key: &str) -> Result<WeatherRecord, WeatherError>;
}

/// Shared HTTP client for provider calls. Connection and read timeouts
/// surface as fetch errors.
pub fn http_client() -> anyhow::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Construct a provider for an explicit mode, honouring the configured base URL.
pub fn provider_from_config(mode: QueryMode, config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let http = http_client()?;

    let boxed: Box<dyn WeatherProvider> = match (mode, config.base_url.as_deref()) {
        (QueryMode::CityName, None) => Box::new(CityNameProvider::new(http)),
        (QueryMode::CityName, Some(base_url)) => Box::new(CityNameProvider::with_base_url(http, base_url)),
        (QueryMode::Coordinates, None) => Box::new(CoordinatesProvider::new(http)),
        (QueryMode::Coordinates, Some(base_url)) => {
            Box::new(CoordinatesProvider::with_base_url(http, base_url))
        }
    };

    Ok(boxed)
}

/// Construct the provider selected by the config's `mode` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let mode = config.query_mode()?;
    provider_from_config(mode, config)
}
