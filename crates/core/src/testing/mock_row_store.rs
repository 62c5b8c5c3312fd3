//! Mock row store for testing.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::row_store::{InMemoryRowStore, Row, RowQuery, RowStore, RowStoreError};

/// A recorded row store call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRowCall {
    List { table_id: String, query: RowQuery },
    Create { table_id: String, row_id: String },
    Update { table_id: String, row_id: String },
}

/// Row store wrapping [`InMemoryRowStore`] with call recording, per-operation
/// failure injection and artificial list latency.
#[derive(Debug, Clone, Default)]
pub struct MockRowStore {
    inner: Arc<InMemoryRowStore>,
    calls: Arc<RwLock<Vec<RecordedRowCall>>>,
    /// Pending failures keyed by operation name.
    next_errors: Arc<RwLock<HashMap<String, RowStoreError>>>,
    list_delay: Arc<RwLock<Option<Duration>>>,
}

impl MockRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The backing in-memory store.
    pub fn inner(&self) -> &InMemoryRowStore {
        &self.inner
    }

    /// Fail the next call of `operation` ("list_rows", "create_row",
    /// "update_row") with `error`.
    pub async fn fail_next(&self, operation: &str, error: RowStoreError) {
        self.next_errors
            .write()
            .await
            .insert(operation.to_string(), error);
    }

    /// Delay every `list_rows` call.
    pub async fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.write().await = Some(delay);
    }

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedRowCall> {
        self.calls.read().await.clone()
    }

    /// Number of create calls performed.
    pub async fn create_count(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| matches!(c, RecordedRowCall::Create { .. }))
            .count()
    }

    async fn take_error(&self, operation: &str) -> Option<RowStoreError> {
        self.next_errors.write().await.remove(operation)
    }
}

#[async_trait]
impl RowStore for MockRowStore {
    async fn list_rows(
        &self,
        database_id: &str,
        table_id: &str,
        query: &RowQuery,
    ) -> Result<Vec<Row>, RowStoreError> {
        self.calls.write().await.push(RecordedRowCall::List {
            table_id: table_id.to_string(),
            query: query.clone(),
        });

        let delay = *self.list_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.take_error("list_rows").await {
            return Err(err);
        }
        self.inner.list_rows(database_id, table_id, query).await
    }

    async fn create_row(
        &self,
        database_id: &str,
        table_id: &str,
        row_id: &str,
        data: Map<String, Value>,
    ) -> Result<Row, RowStoreError> {
        self.calls.write().await.push(RecordedRowCall::Create {
            table_id: table_id.to_string(),
            row_id: row_id.to_string(),
        });

        if let Some(err) = self.take_error("create_row").await {
            return Err(err);
        }
        self.inner
            .create_row(database_id, table_id, row_id, data)
            .await
    }

    async fn update_row(
        &self,
        database_id: &str,
        table_id: &str,
        row_id: &str,
        data: Map<String, Value>,
    ) -> Result<Row, RowStoreError> {
        self.calls.write().await.push(RecordedRowCall::Update {
            table_id: table_id.to_string(),
            row_id: row_id.to_string(),
        });

        if let Some(err) = self.take_error("update_row").await {
            return Err(err);
        }
        self.inner
            .update_row(database_id, table_id, row_id, data)
            .await
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
