//! Movie catalog integration.
//!
//! The catalog is an external HTTP API (TMDB). An empty query lists popular
//! movies, anything else runs a title search.

mod tmdb;
mod types;

pub use tmdb::{CatalogEndpoint, TmdbClient, TmdbConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when querying the movie catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for movie catalog clients.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Fetch movies for a query.
    ///
    /// An empty query discovers popular movies instead of searching.
    async fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, CatalogError>;
}
