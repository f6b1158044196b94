//! Hash routes understood by the dashboard page.
//!
//! - `#/current-location` uses the device position
//! - `#/weather?lat=..&lon=..` shows a searched location
//! - anything else is not found

use crate::models::Coordinate;

/// Where the page goes when the device position is unavailable.
pub const DEFAULT_LOCATION: &str = "#/weather?lat=45.5019&lon=-73.5674";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Route {
    CurrentLocation,
    Weather(Coordinate),
    NotFound,
}

impl Route {
    /// Parse a location hash such as `#/weather?lat=1&lon=2`. The leading
    /// `#` is optional.
    pub fn resolve(hash: &str) -> Self {
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        let (path, query) = match hash.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (hash, None),
        };

        match path {
            "/current-location" => Route::CurrentLocation,
            "/weather" => query
                .and_then(parse_coordinate)
                .map(Route::Weather)
                .unwrap_or(Route::NotFound),
            _ => Route::NotFound,
        }
    }
}

fn parse_coordinate(query: &str) -> Option<Coordinate> {
    let mut lat = None;
    let mut lon = None;
    for pair in query.split('&') {
        match pair.split_once('=') {
            Some(("lat", v)) => lat = Some(v),
            Some(("lon", v)) => lon = Some(v),
            _ => {}
        }
    }
    Coordinate::parse(lat, lon).ok()
}
