//! Weather data endpoints. All of them sit behind the rate limiter.
//!
//! - GET /api/weather/current?lat=&lon=
//! - GET /api/weather/forecast?lat=&lon=
//! - GET /api/weather/air-quality?lat=&lon=
//! - GET /api/weather/all?lat=&lon=

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;

use crate::errors::{AppError, ErrorResponse};
use crate::models::{AirQualitySample, CompositeWeatherReport, CurrentConditions, ForecastSeries};
use crate::routes::{ApiResponse, AppState, CoordinateQuery};
use crate::services::aggregator;

/// Current conditions for a coordinate.
#[utoipa::path(
    get,
    path = "/api/weather/current",
    tag = "Weather",
    params(CoordinateQuery),
    responses(
        (status = 200, description = "Current conditions", body = ApiResponse<CurrentConditions>),
        (status = 400, description = "Missing or invalid coordinates", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 502, description = "Upstream provider failure", body = ErrorResponse),
        (status = 504, description = "Upstream provider timed out", body = ErrorResponse),
    )
)]
pub async fn get_current_weather(
    State(state): State<AppState>,
    query: Result<Query<CoordinateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<CurrentConditions>>, AppError> {
    let Query(params) = query?;
    let coord = params.coordinate()?;
    let data = state.client.fetch_current(coord).await?;
    Ok(ApiResponse::ok(data))
}

/// Five-day forecast at a 3-hour cadence.
#[utoipa::path(
    get,
    path = "/api/weather/forecast",
    tag = "Weather",
    params(CoordinateQuery),
    responses(
        (status = 200, description = "Forecast series", body = ApiResponse<ForecastSeries>),
        (status = 400, description = "Missing or invalid coordinates", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 502, description = "Upstream provider failure", body = ErrorResponse),
        (status = 504, description = "Upstream provider timed out", body = ErrorResponse),
    )
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    query: Result<Query<CoordinateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ForecastSeries>>, AppError> {
    let Query(params) = query?;
    let coord = params.coordinate()?;
    let data = state.client.fetch_forecast(coord).await?;
    Ok(ApiResponse::ok(data))
}

/// Air quality index and pollutant concentrations.
#[utoipa::path(
    get,
    path = "/api/weather/air-quality",
    tag = "Weather",
    params(CoordinateQuery),
    responses(
        (status = 200, description = "Air quality", body = ApiResponse<AirQualitySample>),
        (status = 400, description = "Missing or invalid coordinates", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 502, description = "Upstream provider failure", body = ErrorResponse),
        (status = 504, description = "Upstream provider timed out", body = ErrorResponse),
    )
)]
pub async fn get_air_quality(
    State(state): State<AppState>,
    query: Result<Query<CoordinateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<AirQualitySample>>, AppError> {
    let Query(params) = query?;
    let coord = params.coordinate()?;
    let data = state.client.fetch_air_quality(coord).await?;
    Ok(ApiResponse::ok(data))
}

/// Current conditions, forecast and air quality in one response.
///
/// The three upstream calls run concurrently. If any of them fails the whole
/// request fails; a partial report is never returned.
#[utoipa::path(
    get,
    path = "/api/weather/all",
    tag = "Weather",
    params(CoordinateQuery),
    responses(
        (status = 200, description = "Composite weather report", body = ApiResponse<CompositeWeatherReport>),
        (status = 400, description = "Missing or invalid coordinates", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 502, description = "One of the upstream calls failed", body = ErrorResponse),
        (status = 504, description = "One of the upstream calls timed out", body = ErrorResponse),
    )
)]
pub async fn get_all_weather_data(
    State(state): State<AppState>,
    query: Result<Query<CoordinateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<CompositeWeatherReport>>, AppError> {
    let Query(params) = query?;
    let coord = params.coordinate()?;
    let data = aggregator::get_composite(&state.client, coord).await?;
    Ok(ApiResponse::ok(data))
}
