use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use weather_core::{
    FileConfigSource, OpenWeatherProvider, config::DEFAULT_API_CONFIG_PATH,
    provider::openweather::DEFAULT_OPENWEATHER_URL,
};

use crate::{routes::create_router, shutdown::shutdown_signal, state::AppState};

pub const DEFAULT_LOG_FILTER: &str = "weather_proxy=info,weather_core=info,tower_http=info";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-proxy", version, about = "HTTP proxy for OpenWeather lookups")]
pub struct Cli {
    /// Address the HTTP listener binds to.
    #[arg(long, default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// JSON file holding the OpenWeather API key; re-read on every lookup.
    #[arg(long, default_value = DEFAULT_API_CONFIG_PATH)]
    pub api_config: PathBuf,

    /// OpenWeather current-weather endpoint.
    #[arg(long, default_value = DEFAULT_OPENWEATHER_URL)]
    pub upstream_url: String,

    /// Give up on upstream calls after this many seconds; unset waits forever.
    #[arg(long)]
    pub upstream_timeout: Option<u64>,

    /// Log level filter (e.g. "weather_proxy=debug,tower_http=info").
    #[arg(short, long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Tracing filter: `--log-level`, then `RUST_LOG`, then the default.
    fn log_filter(&self, env_filter: Option<String>) -> String {
        self.log_level
            .clone()
            .or(env_filter)
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let log_filter = self.log_filter(std::env::var("RUST_LOG").ok());

        tracing_subscriber::registry()
            .with(EnvFilter::try_new(&log_filter).context("Invalid log filter")?)
            .with(tracing_subscriber::fmt::layer())
            .init();

        let config = Arc::new(FileConfigSource::new(&self.api_config));
        let provider = OpenWeatherProvider::with_timeout(
            config,
            self.upstream_url.as_str(),
            self.upstream_timeout.map(Duration::from_secs),
        )
        .context("Failed to build HTTP client for OpenWeather")?;

        tracing::info!(
            api_config = %self.api_config.display(),
            upstream = %provider.base_url(),
            timeout_secs = ?self.upstream_timeout,
            "Configured OpenWeather provider"
        );

        let app = create_router(AppState::new(Arc::new(provider)));

        let listener = tokio::net::TcpListener::bind(self.listen)
            .await
            .with_context(|| format!("Failed to bind {}", self.listen))?;
        tracing::info!("Listening on http://{}", self.listen);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server failed")?;

        Ok(())
    }
}
