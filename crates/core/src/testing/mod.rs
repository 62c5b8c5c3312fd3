//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external service traits,
//! allowing end-to-end testing without a real catalog or row store.
//!
//! # Example
//!
//! ```rust,ignore
//! use reelscout_core::testing::{fixtures, MockMovieCatalog, MockRowStore};
//!
//! let catalog = MockMovieCatalog::new();
//! let store = MockRowStore::new();
//!
//! catalog.add_movie(fixtures::movie(42, "Dune", Some("/x.jpg"))).await;
//! store.fail_next("create_row", RowStoreError::Conflict("dup".into())).await;
//! ```

mod mock_movie_catalog;
mod mock_row_store;

pub use mock_movie_catalog::MockMovieCatalog;
pub use mock_row_store::{MockRowStore, RecordedRowCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Map};

    use crate::catalog::Movie;
    use crate::row_store::Row;

    /// Create a test movie with reasonable defaults.
    pub fn movie(id: u64, title: &str, poster_path: Option<&str>) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            original_title: None,
            overview: Some(format!("A movie about {}.", title.to_lowercase())),
            poster_path: poster_path.map(str::to_string),
            backdrop_path: None,
            release_date: Some("2021-09-15".to_string()),
            original_language: Some("en".to_string()),
            vote_average: Some(7.5),
            vote_count: 100,
            popularity: 10.0,
            adult: false,
            genre_ids: vec![18],
        }
    }

    /// Create a stored search term row.
    pub fn search_term_row(row_id: &str, term: &str, count: u64) -> Row {
        let mut data = Map::new();
        data.insert("searchTerm".to_string(), json!(term));
        data.insert("count".to_string(), json!(count));
        data.insert("movie_id".to_string(), json!(1));
        data.insert(
            "poster_url".to_string(),
            json!(format!("https://image.tmdb.org/t/p/w500/{}.jpg", row_id)),
        );
        Row::new(row_id, data)
    }
}
