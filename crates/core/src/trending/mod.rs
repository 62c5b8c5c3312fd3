//! Search term frequency tracking.
//!
//! Each search that returns at least one movie bumps a per-term counter in
//! the row store; the highest counters form the trending list.
//!
//! The find-or-create step is check-then-act. Two concurrent first-time
//! records of the same term can both create a row.

mod types;

pub use types::{SearchTermRow, COUNT_FIELD, SEARCH_TERM_FIELD};

use std::sync::Arc;

use serde_json::{json, Map};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::Movie;
use crate::metrics::{TRENDING_LOADS, TREND_RECORDS};
use crate::row_store::{RowQuery, RowStore, RowStoreError};

/// Number of rows in the trending list.
pub const DEFAULT_TRENDING_LIMIT: u32 = 5;

/// Errors from the trend store.
#[derive(Debug, Error)]
pub enum TrendError {
    #[error("Row store error: {0}")]
    Store(#[from] RowStoreError),

    #[error("Invalid search term row {row_id}: {reason}")]
    InvalidRow { row_id: String, reason: String },

    #[error("Count for search term row {row_id} cannot be incremented past {count}")]
    CountOverflow { row_id: String, count: u64 },
}

/// What a successful record did.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// First search for this term; a row was created with count 1.
    Created(SearchTermRow),
    /// Existing row's count was incremented.
    Incremented(SearchTermRow),
}

impl RecordOutcome {
    pub fn row(&self) -> &SearchTermRow {
        match self {
            RecordOutcome::Created(row) | RecordOutcome::Incremented(row) => row,
        }
    }
}

/// Adapter maintaining search term counters in a row store table.
pub struct TrendStore {
    store: Arc<dyn RowStore>,
    database_id: String,
    table_id: String,
    image_base_url: String,
    limit: u32,
}

impl TrendStore {
    pub fn new(
        store: Arc<dyn RowStore>,
        database_id: impl Into<String>,
        table_id: impl Into<String>,
        image_base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            database_id: database_id.into(),
            table_id: table_id.into(),
            image_base_url: image_base_url.into(),
            limit: DEFAULT_TRENDING_LIMIT,
        }
    }

    /// Set the trending list size.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Record that `term` led to `movie`. Failures are logged and swallowed.
    pub async fn record_search(&self, term: &str, movie: &Movie) -> Option<RecordOutcome> {
        match self.try_record_search(term, movie).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                TREND_RECORDS.with_label_values(&["failed"]).inc();
                warn!("Failed to record search term '{}': {}", term, e);
                None
            }
        }
    }

    /// Record that `term` led to `movie`, returning any error.
    pub async fn try_record_search(
        &self,
        term: &str,
        movie: &Movie,
    ) -> Result<RecordOutcome, TrendError> {
        let query = RowQuery::new().equal(SEARCH_TERM_FIELD, term);
        let existing = self
            .store
            .list_rows(&self.database_id, &self.table_id, &query)
            .await?;

        let outcome = match existing.into_iter().next() {
            Some(row) => {
                let current = SearchTermRow::from_row(row)?;

                let next = current
                    .count
                    .checked_add(1)
                    .ok_or_else(|| TrendError::CountOverflow {
                        row_id: current.row_id.clone(),
                        count: current.count,
                    })?;

                let mut patch = Map::new();
                patch.insert(COUNT_FIELD.to_string(), json!(next));

                let updated = self
                    .store
                    .update_row(&self.database_id, &self.table_id, &current.row_id, patch)
                    .await?;

                RecordOutcome::Incremented(SearchTermRow::from_row(updated)?)
            }
            None => {
                let row_id = self.store.generate_row_id();
                let data = SearchTermRow::new_row_data(term, movie, &self.image_base_url);

                let created = self
                    .store
                    .create_row(&self.database_id, &self.table_id, &row_id, data)
                    .await?;

                RecordOutcome::Created(SearchTermRow::from_row(created)?)
            }
        };

        match &outcome {
            RecordOutcome::Created(row) => {
                TREND_RECORDS.with_label_values(&["created"]).inc();
                info!("New search term '{}' recorded (row {})", term, row.row_id);
            }
            RecordOutcome::Incremented(row) => {
                TREND_RECORDS.with_label_values(&["incremented"]).inc();
                debug!("Search term '{}' count is now {}", term, row.count);
            }
        }

        Ok(outcome)
    }

    /// Top search terms by count. Failures are logged and yield `None`.
    pub async fn fetch_trending(&self) -> Option<Vec<SearchTermRow>> {
        match self.try_fetch_trending().await {
            Ok(rows) => {
                TRENDING_LOADS.with_label_values(&["success"]).inc();
                Some(rows)
            }
            Err(e) => {
                TRENDING_LOADS.with_label_values(&["failed"]).inc();
                warn!("Failed to fetch trending search terms: {}", e);
                None
            }
        }
    }

    /// Top search terms by count, returning any error.
    pub async fn try_fetch_trending(&self) -> Result<Vec<SearchTermRow>, TrendError> {
        let query = RowQuery::new().order_desc(COUNT_FIELD).with_limit(self.limit);
        let rows = self
            .store
            .list_rows(&self.database_id, &self.table_id, &query)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match SearchTermRow::from_row(row) {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!("Skipping unreadable trending row: {}", e);
                    None
                }
            })
            .collect())
    }
}
