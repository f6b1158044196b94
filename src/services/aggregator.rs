//! Composite weather fetch.
//!
//! Current conditions, forecast and air quality are independent reads, so
//! they are issued concurrently. The composite either carries all three or
//! does not exist: the first sub-call to fail aborts the whole fetch, and
//! the still-pending sub-calls are dropped (cancelled) rather than awaited.

use crate::errors::AppError;
use crate::models::{CompositeWeatherReport, Coordinate};
use crate::services::openweather::OpenWeatherClient;

/// Fetch current + forecast + air quality for one coordinate.
pub async fn get_composite(
    client: &OpenWeatherClient,
    coord: Coordinate,
) -> Result<CompositeWeatherReport, AppError> {
    tracing::debug!(lat = coord.lat, lon = coord.lon, "Fetching composite report");

    let (current, forecast, air_quality) = futures::try_join!(
        client.fetch_current(coord),
        client.fetch_forecast(coord),
        client.fetch_air_quality(coord),
    )
    .map_err(AppError::aggregation)?;

    Ok(CompositeWeatherReport {
        current,
        forecast,
        air_quality,
    })
}
