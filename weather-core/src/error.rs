//! Domain errors surfaced by the weather pipeline.
//!
//! Every variant carries the message that is safe to show to the caller.
//! Provider, transport and credential details are logged where they occur
//! and never end up in these messages.

use thiserror::Error;

pub const AUTH_ERROR: &str = "Internal server error: Auth Error";
pub const FETCH_ERROR: &str = "Error fetching weather data please try again";
pub const PARSER_ERROR: &str = "Parser error please try again";
pub const API_KEY_ERROR: &str = "Internal server error: Cannot fetch API Key";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("{0}")]
    InvalidCityName(String),

    #[error("{0}")]
    InvalidLanguage(String),

    #[error("{0}")]
    InvalidLatLon(String),

    #[error("{0}")]
    ErrorFetchingWeather(String),
}

impl WeatherError {
    pub fn invalid_city(city: &str) -> Self {
        Self::InvalidCityName(format!("Invalid city {city}"))
    }

    pub fn auth() -> Self {
        Self::ErrorFetchingWeather(AUTH_ERROR.to_string())
    }

    pub fn fetch() -> Self {
        Self::ErrorFetchingWeather(FETCH_ERROR.to_string())
    }

    pub fn parser() -> Self {
        Self::ErrorFetchingWeather(PARSER_ERROR.to_string())
    }

    pub fn missing_api_key() -> Self {
        Self::ErrorFetchingWeather(API_KEY_ERROR.to_string())
    }

    /// HTTP status the error maps to at the service boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCityName(_) | Self::InvalidLanguage(_) | Self::InvalidLatLon(_) => 400,
            Self::ErrorFetchingWeather(_) => 500,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidCityName(msg)
            | Self::InvalidLanguage(msg)
            | Self::InvalidLatLon(msg)
            | Self::ErrorFetchingWeather(msg) => msg,
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            tracing::warn!("Request to weather provider timed out: {}", err);
        } else {
            tracing::warn!("Request to weather provider failed: {}", err);
        }
        Self::fetch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(WeatherError::invalid_city("x").status_code(), 400);
        assert_eq!(WeatherError::InvalidLanguage("x".into()).status_code(), 400);
        assert_eq!(WeatherError::InvalidLatLon("x".into()).status_code(), 400);
    }

    #[test]
    fn fetch_errors_map_to_500() {
        assert_eq!(WeatherError::auth().status_code(), 500);
        assert_eq!(WeatherError::parser().status_code(), 500);
        assert_eq!(WeatherError::missing_api_key().status_code(), 500);
    }

    #[test]
    fn display_is_the_user_message() {
        let err = WeatherError::invalid_city("Atlantis");
        assert_eq!(err.to_string(), "Invalid city Atlantis");
        assert_eq!(err.message(), "Invalid city Atlantis");
        assert_eq!(WeatherError::auth().to_string(), AUTH_ERROR);
    }
}
