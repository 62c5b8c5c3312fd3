//! Search term row types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::TrendError;
use crate::catalog::Movie;
use crate::row_store::Row;

/// Column holding the raw search term.
pub const SEARCH_TERM_FIELD: &str = "searchTerm";
/// Column holding the selection counter.
pub const COUNT_FIELD: &str = "count";

/// A persisted search term with its selection count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchTermRow {
    /// Row identifier assigned at creation.
    #[serde(default)]
    pub row_id: String,
    /// Raw user query.
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    /// Number of searches for this term that returned a result.
    pub count: u64,
    /// Catalog ID of the top result when the row was created.
    pub movie_id: u64,
    /// Absolute poster URL of that result.
    #[serde(default)]
    pub poster_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchTermFields {
    #[serde(rename = "searchTerm")]
    search_term: String,
    count: u64,
    movie_id: u64,
    #[serde(default)]
    poster_url: Option<String>,
}

impl SearchTermRow {
    /// Columns for a first-time search term.
    pub fn new_row_data(term: &str, movie: &Movie, image_base_url: &str) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert(SEARCH_TERM_FIELD.to_string(), json!(term));
        data.insert(COUNT_FIELD.to_string(), json!(1));
        data.insert("movie_id".to_string(), json!(movie.id));
        data.insert(
            "poster_url".to_string(),
            json!(movie.poster_url(image_base_url).unwrap_or_default()),
        );
        data
    }

    /// Read a search term from a stored row.
    pub fn from_row(row: Row) -> Result<Self, TrendError> {
        let fields: SearchTermFields = serde_json::from_value(Value::Object(row.data))
            .map_err(|e| TrendError::InvalidRow {
                row_id: row.id.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            row_id: row.id,
            search_term: fields.search_term,
            count: fields.count,
            movie_id: fields.movie_id,
            poster_url: fields.poster_url.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(poster: Option<&str>) -> Movie {
        serde_json::from_value(json!({ "id": 42, "title": "Dune", "poster_path": poster })).unwrap()
    }

    #[test]
    fn test_new_row_data() {
        let data = SearchTermRow::new_row_data("dune", &movie(Some("/x.jpg")), "https://img/w500");
        assert_eq!(data["searchTerm"], json!("dune"));
        assert_eq!(data["count"], json!(1));
        assert_eq!(data["movie_id"], json!(42));
        assert_eq!(data["poster_url"], json!("https://img/w500/x.jpg"));
    }

    #[test]
    fn test_new_row_data_without_poster() {
        let data = SearchTermRow::new_row_data("dune", &movie(None), "https://img/w500");
        assert_eq!(data["poster_url"], json!(""));
    }

    #[test]
    fn test_from_row_ignores_store_metadata() {
        let mut data = SearchTermRow::new_row_data("dune", &movie(Some("/x.jpg")), "b");
        data.insert("$createdAt".to_string(), json!("2025-01-01T00:00:00Z"));

        let row = SearchTermRow::from_row(Row::new("r1", data)).unwrap();
        assert_eq!(row.row_id, "r1");
        assert_eq!(row.search_term, "dune");
        assert_eq!(row.count, 1);
        assert_eq!(row.poster_url, "b/x.jpg");
    }

    #[test]
    fn test_from_row_missing_count_fails() {
        let mut data = Map::new();
        data.insert("searchTerm".to_string(), json!("dune"));
        data.insert("movie_id".to_string(), json!(1));

        let result = SearchTermRow::from_row(Row::new("r1", data));
        assert!(matches!(result, Err(TrendError::InvalidRow { .. })));
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let row = SearchTermRow {
            row_id: "r1".to_string(),
            search_term: "dune".to_string(),
            count: 2,
            movie_id: 42,
            poster_url: "u".to_string(),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["searchTerm"], json!("dune"));
        assert_eq!(value["movie_id"], json!(42));
    }
}
