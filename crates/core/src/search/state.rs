use serde::{Deserialize, Serialize};

use crate::catalog::Movie;
use crate::trending::SearchTermRow;

/// User-facing message shown when the movie fetch fails.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching movies. Please try again later.";

/// Snapshot of everything the search page renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    /// Raw text in the search box.
    pub query: String,
    /// Last query that survived the debounce window.
    pub debounced_query: String,
    pub is_loading: bool,
    /// Set when the last fetch failed; the movie list is hidden while set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub movies: Vec<Movie>,
    pub trending: Vec<SearchTermRow>,
}
