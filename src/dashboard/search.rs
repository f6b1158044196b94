//! Debounced location search.
//!
//! Each keystroke replaces the pending search. Only when input has been
//! quiet for the debounce delay does a request go out, carrying the latest
//! value. A newer keystroke also cancels a search that is already in flight.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::dashboard::api::{ClientError, DashboardApi, Endpoint};
use crate::models::LocationMatch;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Result of one debounced search.
#[derive(Debug)]
pub struct SearchOutcome {
    pub query: String,
    pub result: Result<Vec<LocationMatch>, ClientError>,
}

pub struct SearchDebouncer {
    api: DashboardApi,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    results: mpsc::UnboundedSender<SearchOutcome>,
}

impl SearchDebouncer {
    /// Outcomes are delivered on the returned receiver.
    pub fn new(api: DashboardApi, delay: Duration) -> (Self, mpsc::UnboundedReceiver<SearchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            api,
            delay,
            pending: Mutex::new(None),
            results: tx,
        };
        (debouncer, rx)
    }

    /// Debouncer with the dashboard's standard [`SEARCH_DEBOUNCE`] delay.
    pub fn with_default_delay(api: DashboardApi) -> (Self, mpsc::UnboundedReceiver<SearchOutcome>) {
        Self::new(api, SEARCH_DEBOUNCE)
    }

    /// Feed the current contents of the search box. Must be called from
    /// within a tokio runtime.
    pub fn input(&self, value: &str) {
        let mut pending = self.pending.lock();
        if let Some(task) = pending.take() {
            task.abort();
        }

        let query = value.trim().to_string();
        if query.is_empty() {
            return;
        }

        let api = self.api.clone();
        let delay = self.delay;
        let results = self.results.clone();
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = api
                .fetch_data::<Vec<LocationMatch>>(&Endpoint::Geo(query.clone()))
                .await;
            if let Err(e) = &result {
                tracing::warn!("Location search for '{}' failed: {}", query, e);
            }
            // Receiver gone means nobody is listening any more.
            let _ = results.send(SearchOutcome { query, result });
        }));
    }

    /// Drop any scheduled or running search.
    pub fn cancel(&self) {
        if let Some(task) = self.pending.lock().take() {
            task.abort();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
