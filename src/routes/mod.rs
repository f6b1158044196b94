//! HTTP surface.
//!
//! Every handler answers with `{ "success": true, "data": ... }` or, through
//! [`AppError`], `{ "success": false, "error": ... }`.

pub mod geocoding;
pub mod health;
pub mod weather;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::errors::{AppError, ErrorResponse};
use crate::models;
use crate::models::Coordinate;
use crate::services::openweather::OpenWeatherClient;
use crate::services::rate_limit::RateLimiter;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub client: OpenWeatherClient,
    pub limiter: Arc<RateLimiter>,
}

/// Success envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Always `true`
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// `lat`/`lon` as sent by the browser. Kept as raw strings so that missing
/// and malformed values get our own validation message.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CoordinateQuery {
    /// Latitude in decimal degrees
    pub lat: Option<String>,
    /// Longitude in decimal degrees
    pub lon: Option<String>,
}

impl CoordinateQuery {
    pub fn coordinate(&self) -> Result<Coordinate, AppError> {
        Coordinate::parse(self.lat.as_deref(), self.lon.as_deref())
    }
}

/// OpenAPI document for the weather dashboard API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather Dashboard API",
        version = "0.1.0",
        description = "Proxies OpenWeather for the dashboard front end. \
            Serves current conditions, forecast, air quality and geocoding, \
            plus a composite endpoint that fetches the three weather datasets \
            concurrently and returns them together.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Weather", description = "Weather data (rate limited)"),
        (name = "Geocoding", description = "Location search and reverse lookup"),
    ),
    paths(
        health::health_check,
        weather::get_current_weather,
        weather::get_forecast,
        weather::get_air_quality,
        weather::get_all_weather_data,
        geocoding::search_location,
        geocoding::reverse_geocode,
    ),
    components(
        schemas(
            health::HealthResponse,
            models::Coordinate,
            models::CurrentConditions,
            models::ForecastSeries,
            models::AirQualitySample,
            models::LocationMatch,
            models::CompositeWeatherReport,
            ErrorResponse,
        )
    )
)]
pub struct ApiDoc;

/// Build the application router. CORS and request tracing are layered on
/// by the caller.
pub fn router(state: AppState) -> Router {
    let weather_routes = Router::new()
        .route("/api/weather/current", get(weather::get_current_weather))
        .route("/api/weather/forecast", get(weather::get_forecast))
        .route("/api/weather/air-quality", get(weather::get_air_quality))
        .route("/api/weather/all", get(weather::get_all_weather_data))
        .route_layer(middleware::from_fn_with_state(
            state.limiter.clone(),
            enforce_rate_limit,
        ))
        .with_state(state.clone());

    let geocoding_routes = Router::new()
        .route("/api/weather/search", get(geocoding::search_location))
        .route("/api/weather/reverse-geocode", get(geocoding::reverse_geocode))
        .with_state(state);

    Router::new()
        .route("/health", get(health::health_check))
        .merge(weather_routes)
        .merge(geocoding_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
}

/// Reject the request before it reaches a handler once the caller is over
/// its ceiling.
async fn enforce_rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = caller_key(&request);
    limiter.check(&key).await?;
    Ok(next.run(request).await)
}

/// Identify the caller: first `X-Forwarded-For` hop, then the peer address.
fn caller_key(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_caller_key_prefers_forwarded_for() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(caller_key(&request), "203.0.113.7");
    }

    #[test]
    fn test_caller_key_uses_peer_address() {
        let mut request = Request::builder().body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 52000))));
        assert_eq!(caller_key(&request), "192.0.2.1");
    }

    #[test]
    fn test_caller_key_fallback() {
        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(caller_key(&request), "unknown");
    }

    #[test]
    fn test_coordinate_query_validation() {
        let q = CoordinateQuery {
            lat: Some("45.5".to_string()),
            lon: None,
        };
        assert!(matches!(q.coordinate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_openapi_lists_weather_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/weather/all"));
        assert!(doc.paths.paths.contains_key("/api/weather/search"));
    }
}
