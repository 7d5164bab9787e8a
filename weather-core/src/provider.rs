use crate::{WeatherRecord, config::ConfigError};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to send request to OpenWeather: {0}")]
    Request(#[source] reqwest::Error),

    #[error("failed to read OpenWeather response body: {0}")]
    ReadBody(#[source] reqwest::Error),

    #[error("OpenWeather request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse OpenWeather JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError>;
}
