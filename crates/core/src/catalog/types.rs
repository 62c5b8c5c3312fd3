//! Types for movie catalog responses.

use serde::{Deserialize, Serialize};

/// A movie as returned by the catalog's search and discover endpoints.
///
/// Only `id` is required; everything else defaults when the catalog omits it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Catalog movie ID.
    pub id: u64,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Original title (in original language).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    /// Synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    /// Poster path fragment (relative to the image base URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    /// Backdrop path fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    /// Release date (YYYY-MM-DD), sometimes an empty string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// ISO 639-1 language code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    /// Average vote (0-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl Movie {
    /// Get the release year from the release date.
    pub fn year(&self) -> Option<u32> {
        self.release_date
            .as_ref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }

    /// Absolute poster URL, or `None` when the movie has no poster.
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| join_poster_url(image_base_url, path))
    }
}

/// Concatenate the image base URL with a poster path fragment.
///
/// Poster paths from the catalog start with `/`, so plain concatenation is
/// what the catalog expects.
pub fn join_poster_url(image_base_url: &str, poster_path: &str) -> String {
    format!("{}{}", image_base_url, poster_path)
}

/// Body of a catalog list response.
#[derive(Debug, Deserialize)]
pub(crate) struct MovieListResponse {
    #[serde(default)]
    results: Option<Vec<Movie>>,
}

impl MovieListResponse {
    /// Movies in the response. A missing or null `results` means none.
    pub fn into_movies(self) -> Vec<Movie> {
        self.results.unwrap_or_default()
    }
}
