//! TMDB (The Movie Database) API client.
//!
//! Authenticates with a v4 read access token sent as a bearer header.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{Movie, MovieListResponse};
use super::{CatalogError, MovieCatalog};
use crate::metrics::{EXTERNAL_SERVICE_DURATION, EXTERNAL_SERVICE_REQUESTS};

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API read access token (required).
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Image base URL for posters (default: https://image.tmdb.org/t/p/w500).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

impl TmdbConfig {
    /// Base URL with the default applied.
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Image base URL with the default applied.
    pub fn image_base_url(&self) -> &str {
        self.image_base_url
            .as_deref()
            .unwrap_or(DEFAULT_IMAGE_BASE_URL)
    }
}

/// Which catalog endpoint a query maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEndpoint {
    /// Popular movies, used for the empty query.
    Discover,
    /// Title search.
    Search(String),
}

impl CatalogEndpoint {
    /// Select the endpoint for a raw query.
    pub fn for_query(query: &str) -> Self {
        if query.is_empty() {
            CatalogEndpoint::Discover
        } else {
            CatalogEndpoint::Search(query.to_string())
        }
    }

    /// Full request URL relative to `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        match self {
            CatalogEndpoint::Discover => {
                format!("{}/discover/movie?sort_by=popularity.desc", base_url)
            }
            CatalogEndpoint::Search(query) => format!(
                "{}/search/movie?query={}",
                base_url,
                urlencoding::encode(query)
            ),
        }
    }

    /// Short label for logs and metrics.
    pub fn mode(&self) -> &'static str {
        match self {
            CatalogEndpoint::Discover => "discover",
            CatalogEndpoint::Search(_) => "search",
        }
    }
}

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    image_base_url: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url().to_string(),
            api_key: config.api_key,
        })
    }

    /// Image base URL used to build poster URLs.
    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    async fn get_movie_list(&self, endpoint: &CatalogEndpoint) -> Result<Vec<Movie>, CatalogError> {
        let url = endpoint.url(&self.base_url);

        debug!("TMDB {} request: {}", endpoint.mode(), url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let list: MovieListResponse = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse movie list response: {}", e))
        })?;

        Ok(list.into_movies())
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, CatalogError> {
        let endpoint = CatalogEndpoint::for_query(query);
        let started = Instant::now();

        let result = self.get_movie_list(&endpoint).await;

        let outcome = if result.is_ok() { "success" } else { "error" };
        EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&["tmdb", endpoint.mode(), outcome])
            .inc();
        EXTERNAL_SERVICE_DURATION
            .with_label_values(&["tmdb", endpoint.mode()])
            .observe(started.elapsed().as_secs_f64());

        if let Ok(ref movies) = result {
            debug!("TMDB {} returned {} movies", endpoint.mode(), movies.len());
        }

        result
    }
}
