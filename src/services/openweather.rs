//! OpenWeather client.
//!
//! One method per upstream capability: current weather, 5 day / 3 hour
//! forecast, air pollution, direct geocoding and reverse geocoding.
//! See: https://openweathermap.org/api
//!
//! No retries happen here; a failed call is reported once and the caller
//! decides what to do with it.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::UpstreamConfig;
use crate::errors::AppError;
use crate::models::{AirQualitySample, Coordinate, CurrentConditions, ForecastSeries, LocationMatch};

/// Maximum number of geocoding matches requested from the provider.
const GEO_RESULT_LIMIT: &str = "5";

/// Client for the OpenWeather data and geocoding APIs.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    config: Arc<UpstreamConfig>,
}

/// Error body the provider sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("weather-dashboard/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub async fn fetch_current(&self, coord: Coordinate) -> Result<CurrentConditions, AppError> {
        let url = format!("{}/weather", self.config.base_url);
        self.get_json("current weather", &url, &weather_params(coord))
            .await
    }

    pub async fn fetch_forecast(&self, coord: Coordinate) -> Result<ForecastSeries, AppError> {
        let url = format!("{}/forecast", self.config.base_url);
        self.get_json("forecast", &url, &weather_params(coord)).await
    }

    pub async fn fetch_air_quality(&self, coord: Coordinate) -> Result<AirQualitySample, AppError> {
        let url = format!("{}/air_pollution", self.config.base_url);
        self.get_json("air quality", &url, &weather_params(coord))
            .await
    }

    /// Forward geocoding: place name to candidate locations.
    pub async fn search_by_name(&self, query: &str) -> Result<Vec<LocationMatch>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Validation("Search query is required".to_string()));
        }

        let url = format!("{}/direct", self.config.geo_url);
        let params = [
            ("q", query.to_string()),
            ("limit", GEO_RESULT_LIMIT.to_string()),
        ];
        self.get_json("geocoding search", &url, &params).await
    }

    /// Reverse geocoding: coordinate to nearby place names.
    pub async fn reverse_lookup(&self, coord: Coordinate) -> Result<Vec<LocationMatch>, AppError> {
        let url = format!("{}/reverse", self.config.geo_url);
        let params = [
            ("lat", coord.lat.to_string()),
            ("lon", coord.lon.to_string()),
            ("limit", GEO_RESULT_LIMIT.to_string()),
        ];
        self.get_json("reverse geocoding", &url, &params).await
    }

    /// Issue one GET and decode the body.
    ///
    /// The credential is attached here and nowhere else. Neither the URL nor
    /// the query string is logged.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, AppError> {
        tracing::debug!(endpoint, "Requesting upstream");

        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("appid", self.config.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ProviderErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                });
            tracing::debug!(endpoint, status = status.as_u16(), "Upstream returned an error");
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| AppError::Upstream {
            status: status.as_u16(),
            message: format!("unexpected {} response: {}", endpoint, e),
        })
    }
}

fn weather_params(coord: Coordinate) -> [(&'static str, String); 3] {
    [
        ("lat", coord.lat.to_string()),
        ("lon", coord.lon.to_string()),
        ("units", "metric".to_string()),
    ]
}
