//! Core library for the `weather` service.
//!
//! This crate defines:
//! - Configuration & credential sources
//! - The fetch / validate / normalize pipeline against OpenWeather
//! - Shared domain models (queries, weather records) and errors
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod service;
pub mod validate;

pub use cache::{MemoryCache, ResultCache};
pub use config::{ApiKeySource, Config, EnvApiKey, StaticApiKey};
pub use error::WeatherError;
pub use model::{Coordinates, Language, Temperature, WeatherQuery, WeatherRecord, Wind, validate_language};
pub use normalize::compass_direction;
pub use provider::{QueryMode, WeatherProvider};
pub use service::WeatherService;
