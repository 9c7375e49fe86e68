//! Direct geocoding: city name to coordinates via OpenWeather's geo API.

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::{error::WeatherError, model::Coordinates, validate::validate_geocode_status};

#[derive(Debug, Deserialize)]
struct GeoEntry {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Clone)]
pub struct Geocoder {
    http: Client,
    base_url: String,
}

impl Geocoder {
    pub fn with_base_url(http: Client, base_url: &str) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_string() }
    }

    /// Resolve `city` to the coordinates of the provider's first match.
    #[instrument(skip(self, api_key), level = "debug")]
    pub async fn resolve(&self, city: &str, api_key: &str) -> Result<Coordinates, WeatherError> {
        tracing::info!("Fetching coordinates for {}", city);
        let url = format!("{}/geo/1.0/direct", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("limit", "1"), ("appid", api_key)])
            .send()
            .await?;

        validate_geocode_status(res.status(), city)?;

        let body = res.text().await?;
        let entries: Vec<GeoEntry> = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!("Geocoding payload for {} did not parse: {}", city, e);
            WeatherError::invalid_city(city)
        })?;

        let first = entries.into_iter().next().ok_or_else(|| WeatherError::invalid_city(city))?;

        Ok(Coordinates { latitude: first.lat, longitude: first.lon })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AUTH_ERROR;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn geocoder(server: &MockServer) -> Geocoder {
        Geocoder::with_base_url(Client::new(), &server.uri())
    }

    #[tokio::test]
    async fn resolves_first_result() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "Mumbai"))
            .and(query_param("limit", "1"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "name": "Mumbai", "lat": 19.0144, "lon": 72.8479, "country": "IN" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let coords = geocoder(&server).resolve("Mumbai", "KEY").await.unwrap();
        assert_eq!(coords, Coordinates { latitude: 19.0144, longitude: 72.8479 });
    }

    #[tokio::test]
    async fn empty_result_is_invalid_city() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let err = geocoder(&server).resolve("Atlantis", "KEY").await.unwrap_err();
        assert_eq!(err, WeatherError::invalid_city("Atlantis"));
    }

    #[tokio::test]
    async fn unauthorized_is_generic_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "cod": 401,
                "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."
            })))
            .mount(&server)
            .await;

        let err = geocoder(&server).resolve("Mumbai", "BAD").await.unwrap_err();
        assert_eq!(err.to_string(), AUTH_ERROR);
    }

    #[tokio::test]
    async fn server_error_is_invalid_city() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = geocoder(&server).resolve("Mumbai", "KEY").await.unwrap_err();
        assert!(matches!(err, WeatherError::InvalidCityName(_)));
    }
}
