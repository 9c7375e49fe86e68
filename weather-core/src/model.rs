use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::error::WeatherError;

/// Languages the provider is asked to describe conditions in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    En,
    Hi,
    De,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::De => "de",
        }
    }

    pub const fn all() -> &'static [Language] {
        &[Language::En, Language::Hi, Language::De]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Language {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "hi" => Ok(Language::Hi),
            "de" => Ok(Language::De),
            _ => {
                let supported: Vec<&str> = Language::all().iter().map(Language::as_str).collect();
                Err(WeatherError::InvalidLanguage(format!(
                    "Invalid language {value}, supported languages are: {}",
                    supported.join(", ")
                )))
            }
        }
    }
}

/// Check a language code against the supported set.
pub fn validate_language(lang: &str) -> Result<Language, WeatherError> {
    Language::try_from(lang)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
    pub language: Language,
}

impl WeatherQuery {
    /// Build a validated query. Nothing here touches the network.
    pub fn new(city: &str, lang: Option<&str>) -> Result<Self, WeatherError> {
        let language = match lang {
            Some(lang) => validate_language(lang)?,
            None => Language::default(),
        };

        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::InvalidCityName("Invalid city: name is empty".to_string()));
        }

        Ok(Self { city: city.to_string(), language })
    }

    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.city.to_lowercase(), self.language)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub direction: String,
    pub degree: f64,
}

/// Normalized current weather. Temperatures are Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    pub description: String,
    pub temperature: Temperature,
    pub humidity: i64,
    pub pressure: i64,
    pub wind: Wind,
}
