//! Dashboard client: fetches the composite report and renders each section.
//!
//! One call to `/all` feeds four renderers. The place-name label comes from
//! a separate reverse-geocoding call that never holds up the weather
//! sections. Each update takes a sequence token; a response that arrives
//! after a newer update was started is dropped instead of rendered.

pub mod api;
pub mod format;
pub mod render;
pub mod route;
pub mod search;
pub mod view;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::models::{CompositeWeatherReport, Coordinate, LocationMatch};
use api::{DashboardApi, Endpoint};
use route::Route;
use view::{DashboardView, Region};

/// What happened to the weather sections during one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Rendered,
    /// A newer update started before this one's response arrived.
    Superseded,
    /// The fetch failed; previous content was left in place.
    Failed,
    /// The route did not name a location; the not-found panel was shown.
    NotFound,
}

pub struct Dashboard<V> {
    api: DashboardApi,
    view: Arc<V>,
    latest: AtomicU64,
}

impl<V: DashboardView> Dashboard<V> {
    pub fn new(api: DashboardApi, view: Arc<V>) -> Self {
        Self {
            api,
            view,
            latest: AtomicU64::new(0),
        }
    }

    pub fn view(&self) -> &Arc<V> {
        &self.view
    }

    fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }

    /// Fetch everything for `coord` and redraw the page.
    pub async fn update_weather(&self, coord: Coordinate) -> UpdateOutcome {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(token, lat = coord.lat, lon = coord.lon, "Updating weather");

        let weather = async {
            let result = self
                .api
                .fetch_data::<CompositeWeatherReport>(&Endpoint::AllWeatherData(coord))
                .await;

            if !self.is_current(token) {
                tracing::debug!(token, "Discarding superseded weather response");
                return UpdateOutcome::Superseded;
            }

            match result {
                Ok(report) => {
                    self.render_report(&report);
                    UpdateOutcome::Rendered
                }
                Err(e) => {
                    self.view.diagnostic(&format!("Weather update failed: {}", e));
                    UpdateOutcome::Failed
                }
            }
        };

        let label = async {
            let result = self
                .api
                .fetch_data::<Vec<LocationMatch>>(&Endpoint::ReverseGeo(coord))
                .await;

            if !self.is_current(token) {
                return;
            }

            match result {
                Ok(matches) => self
                    .view
                    .replace(Region::Location, render::render_location(&matches)),
                Err(e) => self
                    .view
                    .diagnostic(&format!("Reverse geocoding failed: {}", e)),
            }
        };

        let (outcome, ()) = futures::join!(weather, label);
        outcome
    }

    /// Render the four weather sections in page order.
    fn render_report(&self, report: &CompositeWeatherReport) {
        let CompositeWeatherReport {
            current,
            forecast,
            air_quality,
        } = report;

        self.view
            .replace(Region::CurrentWeather, render::render_current_weather(current));
        self.view.replace(
            Region::Highlights,
            render::render_highlights(current, air_quality),
        );
        self.view
            .replace(Region::HourlyForecast, render::render_hourly(forecast));
        self.view
            .replace(Region::DailyForecast, render::render_daily(forecast));
    }

    /// Follow a location hash. `position` is the device position, or `None`
    /// when it is unavailable, in which case the default location is used.
    pub async fn navigate(&self, hash: &str, position: Option<Coordinate>) -> UpdateOutcome {
        let route = match Route::resolve(hash) {
            Route::CurrentLocation => match position {
                Some(coord) => Route::Weather(coord),
                None => Route::resolve(route::DEFAULT_LOCATION),
            },
            other => other,
        };

        match route {
            Route::Weather(coord) => self.update_weather(coord).await,
            Route::CurrentLocation | Route::NotFound => {
                tracing::debug!("No route for '{}'", hash);
                self.view.replace(Region::NotFound, render::render_not_found());
                UpdateOutcome::NotFound
            }
        }
    }
}
