//! Mapping of raw OpenWeather current-weather JSON into [`WeatherRecord`].

use serde::Deserialize;

use crate::{
    error::WeatherError,
    model::{Temperature, WeatherRecord, Wind},
};

const COMPASS: [&str; 8] = ["↑ N", "↗ NE", "→ E", "↘ SE", "↓ S", "↙ SW", "← W", "↖ NW"];

/// Unit system the upstream weather request was made in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    /// `units=metric`: temperatures already in Celsius.
    Metric,
    /// No `units` parameter: temperatures in Kelvin.
    Kelvin,
}

/// Compass label for a wind bearing in degrees.
///
/// The bearing wraps into `[0, 360)`, is rounded to the nearest whole degree
/// (ties to even) and split into eight 45° sectors starting at north. Bearings that round up
/// to 360 land back on north.
pub fn compass_direction(degree: f64) -> &'static str {
    let normalized = degree.rem_euclid(360.0).round_ties_even() as usize;
    COMPASS[(normalized / 45) % COMPASS.len()]
}

/// Kelvin to Celsius, rounded to two decimals.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    ((kelvin - 273.15) * 100.0).round() / 100.0
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp_min: f64,
    temp_max: f64,
    pressure: i64,
    humidity: i64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

/// Parse a current-weather payload. Any missing or malformed field fails the
/// whole record with the generic parser error.
pub fn normalize(body: &str, city: &str, units: Units) -> Result<WeatherRecord, WeatherError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body).map_err(|e| {
        tracing::warn!("Failed to parse weather payload for {}: {}", city, e);
        WeatherError::parser()
    })?;

    let description = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or_else(|| {
            tracing::warn!("Weather payload for {} has no conditions", city);
            WeatherError::parser()
        })?;

    let (min, max) = match units {
        Units::Metric => (parsed.main.temp_min, parsed.main.temp_max),
        Units::Kelvin => (
            kelvin_to_celsius(parsed.main.temp_min),
            kelvin_to_celsius(parsed.main.temp_max),
        ),
    };

    Ok(WeatherRecord {
        city: city.to_string(),
        description,
        temperature: Temperature { min, max },
        humidity: parsed.main.humidity,
        pressure: parsed.main.pressure,
        wind: Wind {
            speed: parsed.wind.speed,
            direction: compass_direction(parsed.wind.deg).to_string(),
            degree: parsed.wind.deg,
        },
    })
}
