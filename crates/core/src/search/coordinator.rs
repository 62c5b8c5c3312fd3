//! Search coordinator.
//!
//! Owns the search page state and drives it from user input:
//! - Keystrokes update the query immediately and feed the debouncer
//! - A settled query that differs from the last one triggers a fetch cycle
//! - Successful non-empty searches record their top result in the trend store
//!
//! In-flight fetches are never cancelled. A slow response for an older query
//! can land after a newer one and overwrite it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::catalog::{CatalogEndpoint, MovieCatalog};
use crate::metrics::{FETCH_CYCLES, SEARCH_RESULTS};
use crate::trending::TrendStore;

use super::config::SearchConfig;
use super::debounce::Debouncer;
use super::state::{SearchState, FETCH_ERROR_MESSAGE};

struct Inner {
    catalog: Arc<dyn MovieCatalog>,
    trends: Arc<TrendStore>,
    config: SearchConfig,
    state: watch::Sender<SearchState>,
    debouncer: Mutex<Option<Debouncer<String>>>,
    running: AtomicBool,
}

/// Coordinates catalog fetches and trend recording for one search page.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SearchCoordinator {
    inner: Arc<Inner>,
}

impl SearchCoordinator {
    /// Create a new coordinator. Nothing runs until [`start`](Self::start).
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        trends: Arc<TrendStore>,
        config: SearchConfig,
    ) -> Self {
        let (state, _) = watch::channel(SearchState::default());

        Self {
            inner: Arc::new(Inner {
                catalog,
                trends,
                config,
                state,
                debouncer: Mutex::new(None),
                running: AtomicBool::new(false),
            }),
        }
    }

    /// Arm the debouncer, then run the initial discover fetch and trending
    /// load.
    pub async fn start(&self) {
        if self.start_debouncing() {
            self.load_initial().await;
        }
    }

    /// Arm the debouncer without loading anything. Returns false if the
    /// coordinator was already running.
    pub fn start_debouncing(&self) -> bool {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            warn!("Search coordinator already running");
            return false;
        }

        info!(
            "Starting search coordinator (debounce {}ms)",
            self.inner.config.debounce_ms
        );

        let weak = Arc::downgrade(&self.inner);
        let debouncer = Debouncer::spawn(
            Duration::from_millis(self.inner.config.debounce_ms),
            move |text: String| {
                let weak: Weak<Inner> = weak.clone();
                async move {
                    if let Some(inner) = weak.upgrade() {
                        SearchCoordinator { inner }.apply_debounced(text).await;
                    }
                }
            },
        );
        *self.lock_debouncer() = Some(debouncer);
        true
    }

    /// Fetch movies for the current debounced query and load trending
    /// searches concurrently.
    pub async fn load_initial(&self) {
        let initial = self.inner.state.borrow().debounced_query.clone();
        tokio::join!(self.fetch_movies(&initial), self.load_trending_movies());
    }

    /// Stop debouncing input. Fetches already in flight still complete.
    pub fn stop(&self) {
        if !self.inner.running.swap(false, Ordering::SeqCst) {
            warn!("Search coordinator not running");
            return;
        }

        self.lock_debouncer().take();
        info!("Search coordinator stopped");
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Relaxed)
    }

    /// Update the search box text. Only the debouncer can start a fetch.
    pub fn on_query_change(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.state.send_modify(|s| s.query = text.clone());

        match self.lock_debouncer().as_ref() {
            Some(debouncer) => {
                debouncer.push(text);
            }
            None => debug!("Query changed while coordinator stopped, not searching"),
        }
    }

    /// Run one fetch cycle for `query`.
    ///
    /// An empty query discovers popular movies. On failure the previous movie
    /// list is kept and the error message is set.
    pub async fn fetch_movies(&self, query: &str) {
        let mode = CatalogEndpoint::for_query(query).mode();

        self.inner.state.send_modify(|s| {
            s.is_loading = true;
            s.error_message = None;
        });

        match self.inner.catalog.fetch_movies(query).await {
            Ok(movies) => {
                FETCH_CYCLES.with_label_values(&[mode, "success"]).inc();
                SEARCH_RESULTS
                    .with_label_values(&[])
                    .observe(movies.len() as f64);
                debug!("Fetched {} movies for '{}'", movies.len(), query);

                let top = movies.first().cloned();
                self.inner.state.send_modify(|s| s.movies = movies);

                // Trend store failures are logged there and never reach the page.
                if !query.is_empty() {
                    if let Some(movie) = top {
                        self.inner.trends.record_search(query, &movie).await;
                    }
                }
            }
            Err(e) => {
                FETCH_CYCLES.with_label_values(&[mode, "failed"]).inc();
                error!("Error fetching movies for '{}': {}", query, e);
                self.inner
                    .state
                    .send_modify(|s| s.error_message = Some(FETCH_ERROR_MESSAGE.to_string()));
            }
        }

        self.inner.state.send_modify(|s| s.is_loading = false);
    }

    /// Reload the trending list. On failure the previous list is kept.
    pub async fn load_trending_movies(&self) {
        if let Some(trending) = self.inner.trends.fetch_trending().await {
            debug!("Loaded {} trending search terms", trending.len());
            self.inner.state.send_modify(|s| s.trending = trending);
        }
    }

    /// Current state.
    pub fn snapshot(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    async fn apply_debounced(&self, text: String) {
        let changed = self.inner.state.send_if_modified(|s| {
            if s.debounced_query == text {
                false
            } else {
                s.debounced_query = text.clone();
                true
            }
        });

        if changed {
            self.fetch_movies(&text).await;
        }
    }

    fn lock_debouncer(&self) -> std::sync::MutexGuard<'_, Option<Debouncer<String>>> {
        self.inner
            .debouncer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
