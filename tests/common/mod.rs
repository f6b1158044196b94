#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use weather_dashboard::config::UpstreamConfig;
use weather_dashboard::routes::{self, AppState};
use weather_dashboard::services::openweather::OpenWeatherClient;
use weather_dashboard::services::rate_limit::RateLimiter;

pub const API_KEY: &str = "test-key-1234";

pub const CURRENT_PATH: &str = "/data/2.5/weather";
pub const FORECAST_PATH: &str = "/data/2.5/forecast";
pub const AIR_QUALITY_PATH: &str = "/data/2.5/air_pollution";
pub const SEARCH_PATH: &str = "/geo/1.0/direct";
pub const REVERSE_PATH: &str = "/geo/1.0/reverse";

pub fn current_json() -> Value {
    serde_json::from_str(include_str!("../fixtures/current.json")).unwrap()
}

pub fn forecast_json() -> Value {
    serde_json::from_str(include_str!("../fixtures/forecast.json")).unwrap()
}

pub fn air_quality_json() -> Value {
    serde_json::from_str(include_str!("../fixtures/air_quality.json")).unwrap()
}

pub fn geo_json() -> Value {
    serde_json::from_str(include_str!("../fixtures/geo.json")).unwrap()
}

pub fn upstream_config(server: &MockServer, timeout: Duration) -> UpstreamConfig {
    UpstreamConfig {
        api_key: API_KEY.to_string(),
        base_url: format!("{}/data/2.5", server.uri()),
        geo_url: format!("{}/geo/1.0", server.uri()),
        timeout,
    }
}

pub fn client(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::new(upstream_config(server, Duration::from_secs(5))).unwrap()
}

/// Serve every provider endpoint with its recorded payload.
pub async fn mount_all_success(server: &MockServer) {
    for (p, body) in [
        (CURRENT_PATH, current_json()),
        (FORECAST_PATH, forecast_json()),
        (AIR_QUALITY_PATH, air_quality_json()),
        (SEARCH_PATH, geo_json()),
        (REVERSE_PATH, geo_json()),
    ] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }
}

pub fn app_with(client: OpenWeatherClient, max_requests: u32) -> Router {
    routes::router(AppState {
        client,
        limiter: Arc::new(RateLimiter::new(max_requests, Duration::from_secs(60))),
    })
}

pub fn app(server: &MockServer) -> Router {
    app_with(client(server), 100)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    get_from(app, uri, None).await
}

/// GET `uri`, optionally as the caller identified by `forwarded_for`.
pub async fn get_from(app: &Router, uri: &str, forwarded_for: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().uri(uri);
    if let Some(ip) = forwarded_for {
        request = request.header("x-forwarded-for", ip);
    }
    let response = app
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn upstream_request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}
