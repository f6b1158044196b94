//! Recorded provider payloads shared by the unit tests.

use crate::models::{
    AirQualitySample, CompositeWeatherReport, CurrentConditions, ForecastSeries, LocationMatch,
};

pub const CURRENT_JSON: &str = include_str!("../tests/fixtures/current.json");
pub const FORECAST_JSON: &str = include_str!("../tests/fixtures/forecast.json");
pub const AIR_QUALITY_JSON: &str = include_str!("../tests/fixtures/air_quality.json");
pub const GEO_JSON: &str = include_str!("../tests/fixtures/geo.json");

pub fn current() -> CurrentConditions {
    serde_json::from_str(CURRENT_JSON).unwrap()
}

/// 40 samples, 3 hours apart, `dt_txt` = "sample-<index>".
pub fn forecast() -> ForecastSeries {
    serde_json::from_str(FORECAST_JSON).unwrap()
}

pub fn air_quality() -> AirQualitySample {
    serde_json::from_str(AIR_QUALITY_JSON).unwrap()
}

pub fn locations() -> Vec<LocationMatch> {
    serde_json::from_str(GEO_JSON).unwrap()
}

pub fn composite_report() -> CompositeWeatherReport {
    CompositeWeatherReport {
        current: current(),
        forecast: forecast(),
        air_quality: air_quality(),
    }
}
