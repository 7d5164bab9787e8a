//! HTTP routes.
//!
//! - `GET /hello` answers with a constant greeting.
//! - `GET /weather/{city}` looks the city up upstream and returns the record as JSON.
//!
//! `/weather` and `/weather/` carry no city and are answered with 400.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;
use weather_core::WeatherRecord;

use crate::{error::AppError, state::AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/weather", get(missing_city))
        .route("/weather/", get(missing_city))
        .route("/weather/{*city}", get(weather))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn hello() -> &'static str {
    "hello"
}

async fn weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<WeatherRecord>, AppError> {
    let record = state.provider.current_weather(&city).await?;
    tracing::info!(%city, celsius = record.main.celsius, "served weather");
    Ok(Json(record))
}

async fn missing_city() -> AppError {
    AppError::MissingCity
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404 page not found")
}
