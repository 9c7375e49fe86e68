//! The two OpenWeather current-weather fetchers.
//!
//! [`CityNameProvider`] queries by name with `units=metric` and passes
//! temperatures through. [`CoordinatesProvider`] geocodes first, queries by
//! latitude/longitude without `units`, and converts the Kelvin result to
//! Celsius rounded to two decimals.

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::instrument;

use crate::{
    error::WeatherError,
    model::{WeatherQuery, WeatherRecord},
    normalize::{Units, normalize},
    validate::validate_weather_status,
};

use super::{OPENWEATHER_BASE_URL, WeatherProvider, geocode::Geocoder};

fn weather_url(base_url: &str) -> String {
    format!("{}/data/2.5/weather", base_url.trim_end_matches('/'))
}

async fn read_record(res: Response, city: &str, units: Units) -> Result<WeatherRecord, WeatherError> {
    validate_weather_status(res.status(), city)?;
    let body = res.text().await?;
    normalize(&body, city, units)
}

#[derive(Debug, Clone)]
pub struct CityNameProvider {
    http: Client,
    base_url: String,
}

impl CityNameProvider {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, OPENWEATHER_BASE_URL)
    }

    pub fn with_base_url(http: Client, base_url: &str) -> Self {
        Self { http, base_url: base_url.to_string() }
    }
}

#[async_trait]
impl WeatherProvider for CityNameProvider {
    #[instrument(skip(self, api_key), level = "debug")]
    async fn get_weather(&self, query: &WeatherQuery, api_key: &str) -> Result<WeatherRecord, WeatherError> {
        tracing::info!("Fetching weather data for {}", query.city);

        let res = self
            .http
            .get(weather_url(&self.base_url))
            .query(&[
                ("q", query.city.as_str()),
                ("appid", api_key),
                ("units", "metric"),
                ("lang", query.language.as_str()),
            ])
            .send()
            .await?;

        read_record(res, &query.city, Units::Metric).await
    }
}

#[derive(Debug, Clone)]
pub struct CoordinatesProvider {
    http: Client,
    base_url: String,
    geocoder: Geocoder,
}

impl CoordinatesProvider {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, OPENWEATHER_BASE_URL)
    }

    pub fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            geocoder: Geocoder::with_base_url(http.clone(), base_url),
            http,
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl WeatherProvider for CoordinatesProvider {
    #[instrument(skip(self, api_key), level = "debug")]
    async fn get_weather(&self, query: &WeatherQuery, api_key: &str) -> Result<WeatherRecord, WeatherError> {
        let coords = self.geocoder.resolve(&query.city, api_key).await?;
        tracing::info!("Fetching weather data for {}", query.city);

        let res = self
            .http
            .get(weather_url(&self.base_url))
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("appid", api_key.to_string()),
                ("lang", query.language.to_string()),
            ])
            .send()
            .await?;

        read_record(res, &query.city, Units::Kelvin).await
    }
}
