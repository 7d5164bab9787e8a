//! Core library for the weather proxy.
//!
//! This crate defines:
//! - Loading the upstream API credentials
//! - The OpenWeather lookup and the Kelvin to Celsius conversion
//! - The record served back to clients
//!
//! It is used by `weather-proxy`, but the provider can be reused by other binaries or services.

pub mod config;
pub mod model;
pub mod provider;

pub use config::{ApiConfig, ConfigError, ConfigSource, FileConfigSource, StaticConfigSource};
pub use model::{Temperature, WeatherRecord, kelvin_to_celsius};
pub use provider::{OpenWeatherProvider, WeatherError, WeatherProvider};
