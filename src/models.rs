//! Provider payloads as returned by OpenWeather.
//!
//! Field names follow the provider's JSON so that the HTTP surface can hand
//! the decoded payload back to callers without reshaping it. The dashboard
//! reads the named fields; everything else lands in each struct's `extra`
//! map and is serialized back out unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::errors::AppError;

/// A validated WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinate {
    /// Latitude in degrees, -90..=90
    pub lat: f64,
    /// Longitude in degrees, -180..=180
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, AppError> {
        // NaN passes range comparisons, so reject non-finite values first.
        if !lat.is_finite() || !lon.is_finite() {
            return Err(AppError::Validation(
                "Latitude and longitude must be finite numbers".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::Validation(
                "Latitude must be between -90 and 90".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(AppError::Validation(
                "Longitude must be between -180 and 180".to_string(),
            ));
        }
        Ok(Self { lat, lon })
    }

    /// Parse raw `lat`/`lon` query values.
    ///
    /// Missing or empty values are reported together, matching the message
    /// callers already rely on.
    pub fn parse(lat: Option<&str>, lon: Option<&str>) -> Result<Self, AppError> {
        let (lat, lon) = match (non_empty(lat), non_empty(lon)) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                return Err(AppError::Validation(
                    "Latitude and longitude are required".to_string(),
                ))
            }
        };

        let lat: f64 = lat
            .parse()
            .map_err(|_| AppError::Validation(format!("Invalid latitude: {}", lat)))?;
        let lon: f64 = lon
            .parse()
            .map_err(|_| AppError::Validation(format!("Invalid longitude: {}", lon)))?;

        Self::new(lat, lon)
    }
}

fn non_empty(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

/// Icon code plus text description of the sky.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherCondition {
    pub id: i32,
    /// Short group name, e.g. "Clouds"
    pub main: String,
    /// e.g. "broken clouds"
    pub description: String,
    /// Provider icon code, e.g. "04d"
    pub icon: String,
    /// Provider fields not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Temperature, pressure and humidity readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MainReadings {
    /// Celsius
    pub temp: f64,
    /// Celsius
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// hPa
    pub pressure: f64,
    /// Percent
    pub humidity: f64,
    /// Provider fields not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Wind {
    /// Metres per second
    pub speed: f64,
    /// Degrees, meteorological
    pub deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gust: Option<f64>,
    /// Provider fields not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SunTimes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// UTC epoch seconds
    pub sunrise: i64,
    /// UTC epoch seconds
    pub sunset: i64,
    /// Provider fields not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Snapshot from the current-weather endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurrentConditions {
    pub coord: Coordinate,
    pub weather: Vec<WeatherCondition>,
    pub main: MainReadings,
    /// Metres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind: Option<Wind>,
    /// Observation time, UTC epoch seconds
    pub dt: i64,
    pub sys: SunTimes,
    /// Shift from UTC in seconds
    pub timezone: i32,
    #[serde(default)]
    pub name: String,
    /// Provider fields not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One 3-hour step of the five-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastSample {
    /// UTC epoch seconds
    pub dt: i64,
    pub main: MainReadings,
    pub weather: Vec<WeatherCondition>,
    pub wind: Wind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt_txt: Option<String>,
    /// Provider fields not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastCity {
    #[serde(default)]
    pub name: String,
    pub coord: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Shift from UTC in seconds
    pub timezone: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset: Option<i64>,
    /// Provider fields not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Ordered forecast samples, typically 40 at a 3-hour cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastSeries {
    #[serde(default)]
    pub cnt: u32,
    pub list: Vec<ForecastSample>,
    pub city: ForecastCity,
    /// Provider fields not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AqiIndex {
    /// 1 (good) to 5 (very poor)
    pub aqi: u8,
    /// Provider fields not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Pollutant concentrations in μg/m³. Only the ones shown on the dashboard
/// are named; `co`, `no`, `pm10` and `nh3` ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PollutantConcentrations {
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    /// Provider fields not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AirQualityEntry {
    pub main: AqiIndex,
    pub components: PollutantConcentrations,
    pub dt: i64,
    /// Provider fields not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Air pollution readings; the provider returns at least one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AirQualitySample {
    pub coord: Coordinate,
    pub list: Vec<AirQualityEntry>,
    /// Provider fields not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A geocoding hit, from forward search or reverse lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocationMatch {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(flatten)]
    pub coord: Coordinate,
    /// Provider fields not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Current + forecast + air quality, fetched together.
///
/// Only ever built from three successful sub-calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompositeWeatherReport {
    pub current: CurrentConditions,
    pub forecast: ForecastSeries,
    #[serde(rename = "airQuality")]
    pub air_quality: AirQualitySample,
}
