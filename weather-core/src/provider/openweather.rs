use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{sync::Arc, time::Duration};

use crate::{config::ConfigSource, model::WeatherRecord};

use super::{WeatherError, WeatherProvider};

pub const DEFAULT_OPENWEATHER_URL: &str = "http://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    config: Arc<dyn ConfigSource>,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_client(
        config: Arc<dyn ConfigSource>,
        base_url: impl Into<String>,
        http: Client,
    ) -> Self {
        Self { config, base_url: base_url.into(), http }
    }

    /// Build a provider whose outbound calls give up after `timeout`.
    /// Without a timeout a hanging upstream holds the lookup indefinitely.
    pub fn with_timeout(
        config: Arc<dyn ConfigSource>,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_client(config, base_url, builder.build()?))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        let api_config = self.config.api_config()?;

        let res = self
            .http
            .get(&self.base_url)
            .query(&[("appid", api_config.api_key.as_str()), ("q", city)])
            .send()
            .await
            // The URL carries `appid`; keep it out of error text.
            .map_err(|e| WeatherError::Request(e.without_url()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| WeatherError::ReadBody(e.without_url()))?;

        if !status.is_success() {
            tracing::warn!(%city, %status, "OpenWeather rejected the request");
            return Err(WeatherError::Status { status, body: truncate_body(&body) });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;

        Ok(WeatherRecord::from_kelvin(parsed.name, parsed.main.temp))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        tracing::debug!(%city, "fetching current weather");
        self.fetch_current(city).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, FileConfigSource, StaticConfigSource};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn provider_for(server: &MockServer) -> OpenWeatherProvider {
        let config = Arc::new(StaticConfigSource(ApiConfig::new("KEY")));
        OpenWeatherProvider::with_client(config, format!("{}/weather", server.uri()), Client::new())
    }

    #[tokio::test]
    async fn converts_kelvin_from_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("appid", "KEY"))
            .and(query_param("q", "London"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"name":"London","main":{"temp":300.0}}"#, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let record = provider_for(&server).current_weather("London").await.unwrap();

        assert_eq!(record.name, "London");
        assert_eq!(record.main.kelvin, 300.0);
        assert!((record.main.celsius - 26.85).abs() < 1e-9);
    }

    #[tokio::test]
    async fn city_with_reserved_characters_is_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "Saint-Denis&x=1 #?"))
            .and(query_param("appid", "KEY"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"name":"Saint-Denis","main":{"temp":290.0}}"#, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let record = provider_for(&server).current_weather("Saint-Denis&x=1 #?").await.unwrap();
        assert_eq!(record.name, "Saint-Denis");
    }

    #[tokio::test]
    async fn non_success_status_is_rejected_before_decoding() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_raw(r#"{"cod":"404","message":"city not found"}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server).current_weather("Nowhere").await.unwrap_err();

        match err {
            WeatherError::Status { status, body } => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
                assert!(body.contains("city not found"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = provider_for(&server).current_weather("London").await.unwrap_err();
        assert!(matches!(err, WeatherError::Decode(_)));
    }

    #[tokio::test]
    async fn missing_temperature_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"name":"London","main":{}}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server).current_weather("London").await.unwrap_err();
        assert!(matches!(err, WeatherError::Decode(_)));
    }

    #[tokio::test]
    async fn missing_config_fails_without_calling_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = Arc::new(FileConfigSource::new(dir.path().join(".apiConfig")));
        let provider =
            OpenWeatherProvider::with_client(config, format!("{}/weather", server.uri()), Client::new());

        let err = provider.current_weather("London").await.unwrap_err();
        assert!(matches!(err, WeatherError::Config(_)));
        assert!(err.to_string().contains(".apiConfig"));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"name":"London","main":{"temp":300.0}}"#, "application/json")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let config = Arc::new(StaticConfigSource(ApiConfig::new("KEY")));
        let provider = OpenWeatherProvider::with_timeout(
            config,
            format!("{}/weather", server.uri()),
            Some(Duration::from_millis(100)),
        )
        .unwrap();

        let err = provider.current_weather("London").await.unwrap_err();
        assert!(matches!(err, WeatherError::Request(_)));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_request_error() {
        let config = Arc::new(StaticConfigSource(ApiConfig::new("KEY")));
        let provider =
            OpenWeatherProvider::with_client(config, "http://127.0.0.1:9/weather", Client::new());

        let err = provider.current_weather("London").await.unwrap_err();
        assert!(matches!(err, WeatherError::Request(_)));
    }

    #[tokio::test]
    async fn request_error_text_omits_api_key() {
        let config = Arc::new(StaticConfigSource(ApiConfig::new("TOP_SECRET_KEY")));
        let provider =
            OpenWeatherProvider::with_client(config, "http://127.0.0.1:9/weather", Client::new());

        let err = provider.current_weather("London").await.unwrap_err();

        assert!(matches!(err, WeatherError::Request(_)));
        assert!(!err.to_string().contains("TOP_SECRET_KEY"));
        assert!(!format!("{err:?}").contains("TOP_SECRET_KEY"));
    }

    #[tokio::test]
    async fn timeout_error_text_omits_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let config = Arc::new(StaticConfigSource(ApiConfig::new("TOP_SECRET_KEY")));
        let provider = OpenWeatherProvider::with_timeout(
            config,
            format!("{}/weather", server.uri()),
            Some(Duration::from_millis(100)),
        )
        .unwrap();

        let err = provider.current_weather("London").await.unwrap_err();
        assert!(!err.to_string().contains("TOP_SECRET_KEY"));
    }

    #[test]
    fn provider_debug_omits_api_key() {
        let config = Arc::new(StaticConfigSource(ApiConfig::new("TOP_SECRET_KEY")));
        let provider = OpenWeatherProvider::with_client(config, DEFAULT_OPENWEATHER_URL, Client::new());

        assert!(!format!("{provider:?}").contains("TOP_SECRET_KEY"));
    }

    #[test]
    fn truncate_body_limits_length() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);

        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(150);
        let truncated = truncate_body(&long);

        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }
}
