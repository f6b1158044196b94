mod common;

use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use weather_dashboard::config::UpstreamConfig;
use weather_dashboard::errors::{AppError, NetworkErrorKind};
use weather_dashboard::models::Coordinate;
use weather_dashboard::services::openweather::OpenWeatherClient;

use common::*;

fn montreal() -> Coordinate {
    Coordinate::new(45.5019, -73.5674).unwrap()
}

#[tokio::test]
async fn test_fetch_current_sends_coordinates_units_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CURRENT_PATH))
        .and(query_param("lat", "45.5019"))
        .and(query_param("lon", "-73.5674"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_json()))
        .expect(1)
        .mount(&server)
        .await;

    let current = client(&server).fetch_current(montreal()).await.unwrap();
    assert_eq!(current.name, "Montreal");
    assert_eq!(current.timezone, -14400);
    assert_eq!(current.weather[0].icon, "04d");
}

#[tokio::test]
async fn test_fetch_forecast_and_air_quality() {
    let server = MockServer::start().await;
    mount_all_success(&server).await;
    let client = client(&server);

    let forecast = client.fetch_forecast(montreal()).await.unwrap();
    assert_eq!(forecast.list.len(), 40);
    assert_eq!(forecast.city.timezone, -14400);

    let air = client.fetch_air_quality(montreal()).await.unwrap();
    assert_eq!(air.list[0].main.aqi, 2);
}

#[tokio::test]
async fn test_search_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("q", "Montreal"))
        .and(query_param("limit", "5"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(geo_json()))
        .expect(1)
        .mount(&server)
        .await;

    let matches = client(&server).search_by_name("Montreal").await.unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].country, "CA");
    assert_eq!(matches[1].state.as_deref(), Some("Wisconsin"));
}

#[tokio::test]
async fn test_search_blank_query_never_reaches_upstream() {
    let server = MockServer::start().await;
    let err = client(&server).search_by_name("").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(upstream_request_count(&server).await, 0);
}

#[tokio::test]
async fn test_reverse_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(REVERSE_PATH))
        .and(query_param("lat", "45.5019"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geo_json()))
        .expect(1)
        .mount(&server)
        .await;

    let matches = client(&server).reverse_lookup(montreal()).await.unwrap();
    assert_eq!(matches[0].name, "Montreal");
}

#[tokio::test]
async fn test_upstream_error_carries_status_and_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CURRENT_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).fetch_current(montreal()).await.unwrap_err();
    match err {
        AppError::Upstream { status, message } => {
            assert_eq!(status, 401);
            assert!(message.starts_with("Invalid API key"));
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_upstream_error_without_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server).fetch_forecast(montreal()).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Upstream { status: 503, ref message } if message == "Service Unavailable"
    ));
}

#[tokio::test]
async fn test_unexpected_payload_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(AIR_QUALITY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "nope": true })))
        .mount(&server)
        .await;

    let err = client(&server).fetch_air_quality(montreal()).await.unwrap_err();
    assert!(matches!(err, AppError::Upstream { status: 200, .. }));
}

#[tokio::test]
async fn test_deadline_yields_timeout_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CURRENT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_json())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = OpenWeatherClient::new(upstream_config(&server, Duration::from_millis(200))).unwrap();
    let err = client.fetch_current(montreal()).await.unwrap_err();
    assert!(
        matches!(err, AppError::Network { kind: NetworkErrorKind::Timeout, .. }),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn test_refused_connection_is_connect_error_without_credential() {
    let client = OpenWeatherClient::new(UpstreamConfig {
        api_key: API_KEY.to_string(),
        base_url: "http://127.0.0.1:1/data/2.5".to_string(),
        geo_url: "http://127.0.0.1:1/geo/1.0".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap();

    let err = client.fetch_current(montreal()).await.unwrap_err();
    assert!(
        matches!(err, AppError::Network { kind: NetworkErrorKind::Connect, .. }),
        "got {:?}",
        err
    );
    assert!(!err.to_string().contains(API_KEY));
    assert!(!format!("{:?}", err).contains(API_KEY));
}
