//! Mock movie catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, Movie, MovieCatalog};

/// Mock implementation of the MovieCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Empty query returns all movies by descending popularity
/// - Other queries match titles case-insensitively
/// - Track queries for assertions
/// - Simulate failures and slow responses
///
/// # Example
///
/// ```rust,ignore
/// use reelscout_core::testing::{fixtures, MockMovieCatalog};
///
/// let catalog = MockMovieCatalog::new();
/// catalog.add_movie(fixtures::movie(438631, "Dune", Some("/dune.jpg"))).await;
///
/// let results = catalog.fetch_movies("dune").await?;
/// assert_eq!(results.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockMovieCatalog {
    /// Movies in insertion order.
    movies: Arc<RwLock<Vec<Movie>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<String>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
    /// Artificial latency per query.
    delays: Arc<RwLock<HashMap<String, Duration>>>,
}

impl MockMovieCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Add a movie.
    pub async fn add_movie(&self, movie: Movie) {
        self.movies.write().await.push(movie);
    }

    /// Replace all movies.
    pub async fn set_movies(&self, movies: Vec<Movie>) {
        *self.movies.write().await = movies;
    }

    /// Clear all movies.
    pub async fn clear_movies(&self) {
        self.movies.write().await.clear();
    }

    /// Delay responses to `query` by `delay`.
    pub async fn set_delay(&self, query: &str, delay: Duration) {
        self.delays.write().await.insert(query.to_string(), delay);
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Clear recorded queries.
    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl MovieCatalog for MockMovieCatalog {
    async fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, CatalogError> {
        self.queries.write().await.push(query.to_string());

        let delay = self.delays.read().await.get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let movies = self.movies.read().await;

        if query.is_empty() {
            let mut popular = movies.clone();
            popular.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
            return Ok(popular);
        }

        let query_lower = query.to_lowercase();
        Ok(movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&query_lower))
            .cloned()
            .collect())
    }
}
