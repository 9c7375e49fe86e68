//! Classification of provider HTTP statuses into domain outcomes.
//!
//! `429 Too Many Requests` passes on both endpoints: the provider still
//! returns a parseable body, so the response goes on to normalization and a
//! warning is logged.

use reqwest::StatusCode;

use crate::error::WeatherError;

fn is_passable(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::TOO_MANY_REQUESTS
}

fn is_auth(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

/// Status rules for the current-weather endpoint.
pub fn validate_weather_status(status: StatusCode, city: &str) -> Result<(), WeatherError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        tracing::warn!("Weather provider rate limited the request for {}", city);
    }

    match status {
        s if is_passable(s) => Ok(()),
        s if is_auth(s) => {
            tracing::error!("Weather provider rejected the API key with status {}", s);
            Err(WeatherError::auth())
        }
        s if s == StatusCode::NOT_FOUND => Err(WeatherError::invalid_city(city)),
        s => {
            tracing::warn!("Weather provider returned unexpected status {}", s);
            Err(WeatherError::fetch())
        }
    }
}

/// Status rules for the direct-geocoding endpoint. Any failure that is not
/// an auth problem is reported as an unknown city.
pub fn validate_geocode_status(status: StatusCode, city: &str) -> Result<(), WeatherError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        tracing::warn!("Geocoding provider rate limited the request for {}", city);
    }

    match status {
        s if is_passable(s) => Ok(()),
        s if is_auth(s) => {
            tracing::error!("Geocoding provider rejected the API key with status {}", s);
            Err(WeatherError::auth())
        }
        s => {
            tracing::debug!("Geocoding returned status {} for {}", s, city);
            Err(WeatherError::invalid_city(city))
        }
    }
}
