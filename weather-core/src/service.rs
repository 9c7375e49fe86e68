//! Entry point for callers: validates the query, resolves the credential and
//! runs the configured provider, with an optional result cache in front.

use std::{sync::Arc, time::Duration};

use tracing::instrument;

use crate::{
    cache::{MemoryCache, ResultCache},
    config::{ApiKeySource, Config, EnvApiKey},
    error::WeatherError,
    model::{WeatherQuery, WeatherRecord},
    provider::{WeatherProvider, default_provider_from_config},
};

#[derive(Debug)]
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
    keys: Arc<dyn ApiKeySource>,
    cache: Option<(Arc<dyn ResultCache>, Duration)>,
}

impl WeatherService {
    pub fn new(provider: Box<dyn WeatherProvider>, keys: Arc<dyn ApiKeySource>) -> Self {
        Self { provider, keys, cache: None }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>, ttl: Duration) -> Self {
        self.cache = Some((cache, ttl));
        self
    }

    /// Wire up provider, key source and cache from the loaded configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = default_provider_from_config(config)?;
        let service = Self::new(provider, Arc::new(EnvApiKey::from_config(config)));

        Ok(match config.cache_ttl() {
            Some(ttl) => service.with_cache(Arc::new(MemoryCache::new()), ttl),
            None => service,
        })
    }

    /// Current weather for `city`, described in `lang` (default `en`).
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, city: &str, lang: Option<&str>) -> Result<WeatherRecord, WeatherError> {
        let query = WeatherQuery::new(city, lang)?;
        let key = query.cache_key();

        if let Some((cache, _)) = &self.cache {
            if let Some(record) = cache.get(&key) {
                tracing::debug!("Serving cached weather for {}", key);
                return Ok(record);
            }
        }

        let api_key = self.keys.api_key().ok_or_else(|| {
            tracing::error!("No API key available for the weather provider");
            WeatherError::missing_api_key()
        })?;

        let record = self.provider.get_weather(&query, &api_key).await?;

        if let Some((cache, ttl)) = &self.cache {
            cache.set(key, record.clone(), *ttl);
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticApiKey;
    use crate::error::API_KEY_ERROR;
    use crate::normalize::tests::{mumbai_payload, mumbai_record};
    use crate::provider::openweather::CityNameProvider;
    use reqwest::Client;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer, key: StaticApiKey) -> WeatherService {
        let provider = CityNameProvider::with_base_url(Client::new(), &server.uri());
        WeatherService::new(Box::new(provider), Arc::new(key))
    }

    async fn mount_mumbai(server: &MockServer, times: u64) {
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Mumbai"))
            .respond_with(ResponseTemplate::new(200).set_body_json(mumbai_payload()))
            .expect(times)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn fetches_weather() {
        let server = MockServer::start().await;
        mount_mumbai(&server, 1).await;

        let record = service(&server, StaticApiKey::new("1234"))
            .fetch("Mumbai", Some("en"))
            .await
            .unwrap();

        assert_eq!(record, mumbai_record(302.14, 302.14));
    }

    #[tokio::test]
    async fn invalid_language_never_reaches_provider() {
        let server = MockServer::start().await;
        mount_mumbai(&server, 0).await;

        let err = service(&server, StaticApiKey::new("1234"))
            .fetch("Mumbai", Some("eng"))
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::InvalidLanguage(_)));
    }

    #[tokio::test]
    async fn missing_api_key_is_internal_error() {
        let server = MockServer::start().await;
        mount_mumbai(&server, 0).await;

        let err = service(&server, StaticApiKey::default())
            .fetch("Mumbai", None)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), API_KEY_ERROR);
    }

    #[tokio::test]
    async fn cache_serves_repeat_queries() {
        let server = MockServer::start().await;
        mount_mumbai(&server, 1).await;

        let service = service(&server, StaticApiKey::new("1234"))
            .with_cache(Arc::new(MemoryCache::new()), Duration::from_secs(60));

        let first = service.fetch("Mumbai", None).await.unwrap();
        let second = service.fetch("mumbai", Some("en")).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({ "cod": "404" })))
            .expect(2)
            .mount(&server)
            .await;

        let cache = Arc::new(MemoryCache::new());
        let service = service(&server, StaticApiKey::new("1234"))
            .with_cache(cache.clone(), Duration::from_secs(60));

        assert!(service.fetch("Nowhere", None).await.is_err());
        assert!(service.fetch("Nowhere", None).await.is_err());
        assert!(cache.is_empty());
    }
}
