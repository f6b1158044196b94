//! Transport from the dashboard to the weather API.
//!
//! Every response is an envelope; `fetch_data` hands back only `data` and
//! turns everything else into a [`ClientError`].

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::Coordinate;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error. status: {status}: {message}")]
    Http { status: u16, message: String },

    #[error("API request failed: {0}")]
    Api(String),

    #[error("Malformed API response: {0}")]
    Decode(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// The API operations the dashboard can call.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    CurrentWeather(Coordinate),
    Forecast(Coordinate),
    AirPollution(Coordinate),
    ReverseGeo(Coordinate),
    Geo(String),
    /// Current + forecast + air quality in one call.
    AllWeatherData(Coordinate),
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::CurrentWeather(_) => "/current",
            Endpoint::Forecast(_) => "/forecast",
            Endpoint::AirPollution(_) => "/air-quality",
            Endpoint::ReverseGeo(_) => "/reverse-geocode",
            Endpoint::Geo(_) => "/search",
            Endpoint::AllWeatherData(_) => "/all",
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::CurrentWeather(c)
            | Endpoint::Forecast(c)
            | Endpoint::AirPollution(c)
            | Endpoint::ReverseGeo(c)
            | Endpoint::AllWeatherData(c) => {
                vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())]
            }
            Endpoint::Geo(q) => vec![("q", q.clone())],
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())?;
        for (i, (k, v)) in self.query().iter().enumerate() {
            write!(f, "{}{}={}", if i == 0 { '?' } else { '&' }, k, v)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

/// Client for the weather API, rooted at e.g. `http://localhost:3000/api/weather`.
#[derive(Debug, Clone)]
pub struct DashboardApi {
    client: reqwest::Client,
    base_url: String,
}

impl DashboardApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_data<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, ClientError> {
        tracing::debug!(%endpoint, "Fetching");

        let response = self
            .client
            .get(format!("{}{}", self.base_url, endpoint.path()))
            .query(&endpoint.query())
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|e| e.error)
                .unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> =
            serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))?;

        match envelope {
            Envelope {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            Envelope { success: true, .. } => {
                Err(ClientError::Decode("envelope has no data".to_string()))
            }
            Envelope { error, .. } => Err(ClientError::Api(
                error.unwrap_or_else(|| "API request failed".to_string()),
            )),
        }
    }
}
