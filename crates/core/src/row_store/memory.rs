//! In-process row store.
//!
//! Same query semantics as the hosted store, kept in memory. Rows are
//! returned in insertion order unless the query orders them.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{OrderDirection, Row, RowQuery, RowStore, RowStoreError};

type TableKey = (String, String);

/// Row store backed by a process-local map.
#[derive(Debug, Default)]
pub struct InMemoryRowStore {
    tables: RwLock<HashMap<TableKey, Vec<Row>>>,
}

impl InMemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert rows directly, bypassing ID checks (useful for seeding tests).
    pub async fn seed(&self, database_id: &str, table_id: &str, rows: Vec<Row>) {
        self.tables
            .write()
            .await
            .entry(key(database_id, table_id))
            .or_default()
            .extend(rows);
    }

    /// All rows of a table in insertion order.
    pub async fn rows(&self, database_id: &str, table_id: &str) -> Vec<Row> {
        self.tables
            .read()
            .await
            .get(&key(database_id, table_id))
            .cloned()
            .unwrap_or_default()
    }
}

fn key(database_id: &str, table_id: &str) -> TableKey {
    (database_id.to_string(), table_id.to_string())
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl RowStore for InMemoryRowStore {
    async fn list_rows(
        &self,
        database_id: &str,
        table_id: &str,
        query: &RowQuery,
    ) -> Result<Vec<Row>, RowStoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Row> = tables
            .get(&key(database_id, table_id))
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| f.matches(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(ref order) = query.order {
            // Stable sort: ties keep insertion order.
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(&order.attribute), b.get(&order.attribute));
                match order.direction {
                    OrderDirection::Asc => ord,
                    OrderDirection::Desc => ord.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }

        Ok(rows)
    }

    async fn create_row(
        &self,
        database_id: &str,
        table_id: &str,
        row_id: &str,
        mut data: Map<String, Value>,
    ) -> Result<Row, RowStoreError> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(key(database_id, table_id)).or_default();

        if rows.iter().any(|r| r.id == row_id) {
            return Err(RowStoreError::Conflict(row_id.to_string()));
        }

        let now = Value::String(Utc::now().to_rfc3339());
        data.insert("$createdAt".to_string(), now.clone());
        data.insert("$updatedAt".to_string(), now);

        let row = Row::new(row_id, data);
        rows.push(row.clone());
        Ok(row)
    }

    async fn update_row(
        &self,
        database_id: &str,
        table_id: &str,
        row_id: &str,
        data: Map<String, Value>,
    ) -> Result<Row, RowStoreError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(&key(database_id, table_id))
            .and_then(|rows| rows.iter_mut().find(|r| r.id == row_id))
            .ok_or_else(|| RowStoreError::NotFound(row_id.to_string()))?;

        row.data.extend(data);
        row.data.insert(
            "$updatedAt".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        Ok(row.clone())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
