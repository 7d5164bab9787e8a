use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use weather_core::WeatherError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("missing city: expected a path of the form /weather/{{city}}")]
    MissingCity,

    #[error(transparent)]
    Weather(#[from] WeatherError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingCity => StatusCode::BAD_REQUEST,
            AppError::Weather(err) => {
                tracing::error!(error = %err, "weather lookup failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
