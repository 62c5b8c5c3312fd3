//! Hosted row-store access.
//!
//! A row store keeps JSON rows in tables grouped by database. Only three
//! operations are needed: list with filters/ordering/limit, create, and
//! partial update.

mod appwrite;
mod memory;

pub use appwrite::{AppwriteConfig, AppwriteRowStore};
pub use memory::InMemoryRowStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{TrendStoreBackend, TrendStoreConfig};

/// Errors that can occur when talking to a row store.
#[derive(Debug, Error)]
pub enum RowStoreError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Row not found.
    #[error("Row not found: {0}")]
    NotFound(String),

    /// A row with this ID already exists.
    #[error("Row already exists: {0}")]
    Conflict(String),

    /// Store not configured.
    #[error("Row store not configured: {0}")]
    NotConfigured(String),
}

/// A stored row: its identifier plus its column values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub data: Map<String, Value>,
}

impl Row {
    pub fn new(id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Get a column value.
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.data.get(attribute)
    }
}

/// Filter applied when listing rows.
#[derive(Debug, Clone, PartialEq)]
pub enum RowFilter {
    /// Attribute equals any of the given values.
    Equal { attribute: String, values: Vec<Value> },
}

impl RowFilter {
    /// Check whether a row satisfies this filter.
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            RowFilter::Equal { attribute, values } => row
                .get(attribute)
                .is_some_and(|v| values.iter().any(|expected| expected == v)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// Ordering applied when listing rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RowOrder {
    pub attribute: String,
    pub direction: OrderDirection,
}

/// Query for listing rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowQuery {
    pub filters: Vec<RowFilter>,
    pub order: Option<RowOrder>,
    pub limit: Option<u32>,
}

impl RowQuery {
    /// Create an empty query (all rows, store order).
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `attribute == value`.
    pub fn equal(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(RowFilter::Equal {
            attribute: attribute.into(),
            values: vec![value.into()],
        });
        self
    }

    /// Order by `attribute` descending.
    pub fn order_desc(mut self, attribute: impl Into<String>) -> Self {
        self.order = Some(RowOrder {
            attribute: attribute.into(),
            direction: OrderDirection::Desc,
        });
        self
    }

    /// Order by `attribute` ascending.
    pub fn order_asc(mut self, attribute: impl Into<String>) -> Self {
        self.order = Some(RowOrder {
            attribute: attribute.into(),
            direction: OrderDirection::Asc,
        });
        self
    }

    /// Set limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Trait for row store backends.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// List rows matching the query.
    async fn list_rows(
        &self,
        database_id: &str,
        table_id: &str,
        query: &RowQuery,
    ) -> Result<Vec<Row>, RowStoreError>;

    /// Create a row with the given ID.
    async fn create_row(
        &self,
        database_id: &str,
        table_id: &str,
        row_id: &str,
        data: Map<String, Value>,
    ) -> Result<Row, RowStoreError>;

    /// Update the given columns of an existing row.
    async fn update_row(
        &self,
        database_id: &str,
        table_id: &str,
        row_id: &str,
        data: Map<String, Value>,
    ) -> Result<Row, RowStoreError>;

    /// Generate an identifier for a new row.
    fn generate_row_id(&self) -> String {
        unique_id()
    }

    /// Name of this backend.
    fn backend_name(&self) -> &'static str;
}

/// Factory function to create the row store backend from config
pub fn create_row_store(config: &TrendStoreConfig) -> Result<Arc<dyn RowStore>, RowStoreError> {
    match config.backend {
        TrendStoreBackend::Memory => Ok(Arc::new(InMemoryRowStore::new())),
        TrendStoreBackend::Appwrite => {
            let appwrite = config.appwrite.clone().ok_or_else(|| {
                RowStoreError::NotConfigured(
                    "appwrite section must be set when using the appwrite backend".to_string(),
                )
            })?;
            Ok(Arc::new(AppwriteRowStore::new(appwrite)?))
        }
    }
}

/// Generate a unique row ID.
///
/// Hex seconds plus hex microseconds followed by a random suffix, so IDs
/// sort roughly by creation time. Always 20 lowercase hex characters.
pub fn unique_id() -> String {
    let now = chrono::Utc::now();
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{:08x}{:05x}{}",
        now.timestamp(),
        now.timestamp_subsec_micros(),
        &random[..7]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: &str, value: Value) -> Row {
        let mut data = Map::new();
        data.insert("searchTerm".to_string(), value);
        Row::new(id, data)
    }

    fn trend_store_config(backend: TrendStoreBackend) -> TrendStoreConfig {
        TrendStoreConfig {
            backend,
            appwrite: None,
            database_id: "db".to_string(),
            table_id: "metrics".to_string(),
            trending_limit: 5,
        }
    }

    #[test]
    fn test_create_row_store_memory() {
        let store = create_row_store(&trend_store_config(TrendStoreBackend::Memory)).unwrap();
        assert_eq!(store.backend_name(), "memory");
    }

    #[test]
    fn test_create_row_store_appwrite_missing_section() {
        let result = create_row_store(&trend_store_config(TrendStoreBackend::Appwrite));
        assert!(matches!(result, Err(RowStoreError::NotConfigured(_))));
    }

    #[test]
    fn test_create_row_store_appwrite() {
        let mut config = trend_store_config(TrendStoreBackend::Appwrite);
        config.appwrite = Some(AppwriteConfig {
            endpoint: "http://localhost/v1".to_string(),
            project_id: "proj".to_string(),
            api_key: None,
            timeout_secs: 30,
        });
        let store = create_row_store(&config).unwrap();
        assert_eq!(store.backend_name(), "appwrite");
    }

    #[test]
    fn test_unique_id_shape() {
        let id = unique_id();
        assert_eq!(id.len(), 20);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_unique_ids_differ() {
        let ids: std::collections::HashSet<String> = (0..1000).map(|_| unique_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_query_builder() {
        let query = RowQuery::new()
            .equal("searchTerm", "dune")
            .order_desc("count")
            .with_limit(5);

        assert_eq!(
            query.filters,
            vec![RowFilter::Equal {
                attribute: "searchTerm".to_string(),
                values: vec![json!("dune")],
            }]
        );
        assert_eq!(query.order.unwrap().direction, OrderDirection::Desc);
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn test_equal_filter_matches() {
        let filter = RowFilter::Equal {
            attribute: "searchTerm".to_string(),
            values: vec![json!("dune")],
        };
        assert!(filter.matches(&row("a", json!("dune"))));
        assert!(!filter.matches(&row("b", json!("Dune"))));
        assert!(!filter.matches(&Row::new("c", Map::new())));
    }
}
