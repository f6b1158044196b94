//! Where rendered fragments go.

use std::collections::HashMap;

use maud::Markup;
use parking_lot::Mutex;

/// A target area of the dashboard page. Each render replaces the whole
/// content of its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    CurrentWeather,
    Highlights,
    HourlyForecast,
    DailyForecast,
    /// Place name shown next to the current conditions.
    Location,
    NotFound,
}

pub trait DashboardView: Send + Sync {
    /// Replace everything in `region` with `content`.
    fn replace(&self, region: Region, content: Markup);

    /// Report a failure without touching the page content.
    fn diagnostic(&self, message: &str);
}

/// Keeps the latest HTML per region in memory.
#[derive(Debug, Default)]
pub struct InMemoryView {
    regions: Mutex<HashMap<Region, String>>,
    history: Mutex<Vec<Region>>,
    diagnostics: Mutex<Vec<String>>,
}

impl InMemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self, region: Region) -> Option<String> {
        self.regions.lock().get(&region).cloned()
    }

    /// Regions in the order they were written.
    pub fn history(&self) -> Vec<Region> {
        self.history.lock().clone()
    }

    pub fn diagnostics(&self) -> Vec<String> {
        self.diagnostics.lock().clone()
    }
}

impl DashboardView for InMemoryView {
    fn replace(&self, region: Region, content: Markup) {
        self.regions.lock().insert(region, content.into_string());
        self.history.lock().push(region);
    }

    fn diagnostic(&self, message: &str) {
        tracing::warn!("Dashboard: {}", message);
        self.diagnostics.lock().push(message.to_string());
    }
}
