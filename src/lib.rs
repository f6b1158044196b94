//! Weather dashboard: an OpenWeather proxy with a composite fan-out endpoint,
//! and the dashboard client that consumes it.

pub mod config;
pub mod dashboard;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
mod test_fixtures;
