//! Geocoding endpoints. Not rate limited.
//!
//! - GET /api/weather/search?q=
//! - GET /api/weather/reverse-geocode?lat=&lon=

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::errors::{AppError, ErrorResponse};
use crate::models::LocationMatch;
use crate::routes::{ApiResponse, AppState, CoordinateQuery};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Place name, e.g. "Montreal" or "London,GB"
    pub q: Option<String>,
}

/// Search locations by name.
#[utoipa::path(
    get,
    path = "/api/weather/search",
    tag = "Geocoding",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching locations (at most 5)", body = ApiResponse<Vec<LocationMatch>>),
        (status = 400, description = "Missing search query", body = ErrorResponse),
        (status = 502, description = "Upstream provider failure", body = ErrorResponse),
    )
)]
pub async fn search_location(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<LocationMatch>>>, AppError> {
    let Query(params) = query?;
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("Search query is required".to_string()))?;

    let data = state.client.search_by_name(query).await?;
    Ok(ApiResponse::ok(data))
}

/// Resolve a coordinate to nearby place names.
#[utoipa::path(
    get,
    path = "/api/weather/reverse-geocode",
    tag = "Geocoding",
    params(CoordinateQuery),
    responses(
        (status = 200, description = "Nearby places (at most 5)", body = ApiResponse<Vec<LocationMatch>>),
        (status = 400, description = "Missing or invalid coordinates", body = ErrorResponse),
        (status = 502, description = "Upstream provider failure", body = ErrorResponse),
    )
)]
pub async fn reverse_geocode(
    State(state): State<AppState>,
    query: Result<Query<CoordinateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<LocationMatch>>>, AppError> {
    let Query(params) = query?;
    let coord = params.coordinate()?;
    let data = state.client.reverse_lookup(coord).await?;
    Ok(ApiResponse::ok(data))
}
