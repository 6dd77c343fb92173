//! HTTP routes.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use weather_core::{CurrentConditions, DailyForecastEntry, LookupError, WeatherService};

/// Create all HTTP routes.
pub fn routes() -> Router<WeatherService> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/weather", get(current_weather))
        .route("/api/forecast", get(daily_forecast))
}

#[derive(Debug, Deserialize)]
struct CityParams {
    city: Option<String>,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn current_weather(
    State(service): State<WeatherService>,
    query: Result<Query<CityParams>, QueryRejection>,
) -> Result<Json<CurrentConditions>, ApiError> {
    let Query(params) = query?;
    service
        .get_current_conditions(params.city.as_deref())
        .await
        .map(Json)
        .map_err(|e| ApiError::from_lookup(e, "Could not fetch weather data"))
}

async fn daily_forecast(
    State(service): State<WeatherService>,
    query: Result<Query<CityParams>, QueryRejection>,
) -> Result<Json<Vec<DailyForecastEntry>>, ApiError> {
    let Query(params) = query?;
    service
        .get_daily_forecast(params.city.as_deref())
        .await
        .map(Json)
        .map_err(|e| ApiError::from_lookup(e, "Could not fetch forecast data"))
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(&'static str),
}

impl ApiError {
    /// Upstream causes were already logged by the service; only the generic text leaves here.
    fn from_lookup(err: LookupError, upstream_message: &'static str) -> Self {
        match err {
            LookupError::InvalidInput => ApiError::BadRequest(err.to_string()),
            LookupError::Upstream(_) => ApiError::Internal(upstream_message),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection, "rejected malformed query string");
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
