use std::sync::Arc;

use weather_core::WeatherProvider;

/// Shared, read-only state handed to every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }
}
