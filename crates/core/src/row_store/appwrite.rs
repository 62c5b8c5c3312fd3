//! Appwrite TablesDB REST client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use super::{OrderDirection, Row, RowFilter, RowQuery, RowStore, RowStoreError};
use crate::metrics::{EXTERNAL_SERVICE_DURATION, EXTERNAL_SERVICE_REQUESTS};

const DEFAULT_ENDPOINT: &str = "https://fra.cloud.appwrite.io/v1";

/// Appwrite connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppwriteConfig {
    /// API endpoint (default: https://fra.cloud.appwrite.io/v1).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Project ID.
    pub project_id: String,
    /// Server API key. Not needed when the table allows guest access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Row store backed by Appwrite TablesDB.
pub struct AppwriteRowStore {
    client: Client,
    endpoint: String,
    project_id: String,
    api_key: Option<String>,
}

impl AppwriteRowStore {
    /// Create a new Appwrite client.
    pub fn new(config: AppwriteConfig) -> Result<Self, RowStoreError> {
        if config.project_id.is_empty() {
            return Err(RowStoreError::NotConfigured(
                "Appwrite project ID is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id,
            api_key: config.api_key.filter(|k| !k.is_empty()),
        })
    }

    fn rows_url(&self, database_id: &str, table_id: &str) -> String {
        format!(
            "{}/tablesdb/{}/tables/{}/rows",
            self.endpoint,
            urlencoding::encode(database_id),
            urlencoding::encode(table_id)
        )
    }

    fn with_headers(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("X-Appwrite-Project", &self.project_id);
        match self.api_key {
            Some(ref key) => request.header("X-Appwrite-Key", key),
            None => request,
        }
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, RowStoreError> {
        let started = Instant::now();
        let result = Self::check_status(self.with_headers(request).send().await).await;

        let outcome = if result.is_ok() { "success" } else { "error" };
        EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&["appwrite", operation, outcome])
            .inc();
        EXTERNAL_SERVICE_DURATION
            .with_label_values(&["appwrite", operation])
            .observe(started.elapsed().as_secs_f64());

        result
    }

    async fn check_status(
        response: Result<Response, reqwest::Error>,
    ) -> Result<Response, RowStoreError> {
        let response = response?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<AppwriteErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or(body);

        Err(match status {
            StatusCode::NOT_FOUND => RowStoreError::NotFound(message),
            StatusCode::CONFLICT => RowStoreError::Conflict(message),
            _ => RowStoreError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }
}

/// Encode a query as Appwrite `queries[]` values.
pub(crate) fn encode_queries(query: &RowQuery) -> Vec<String> {
    let mut encoded: Vec<Value> = query
        .filters
        .iter()
        .map(|filter| match filter {
            RowFilter::Equal { attribute, values } => json!({
                "method": "equal",
                "attribute": attribute,
                "values": values,
            }),
        })
        .collect();

    if let Some(ref order) = query.order {
        let method = match order.direction {
            OrderDirection::Asc => "orderAsc",
            OrderDirection::Desc => "orderDesc",
        };
        encoded.push(json!({ "method": method, "attribute": order.attribute }));
    }

    if let Some(limit) = query.limit {
        encoded.push(json!({ "method": "limit", "values": [limit] }));
    }

    encoded.iter().map(Value::to_string).collect()
}

/// Split an Appwrite row object into its `$id` and remaining columns.
pub(crate) fn parse_row(value: Value) -> Result<Row, RowStoreError> {
    let Value::Object(mut data) = value else {
        return Err(RowStoreError::ParseError(
            "row is not a JSON object".to_string(),
        ));
    };

    match data.remove("$id") {
        Some(Value::String(id)) => Ok(Row::new(id, data)),
        _ => Err(RowStoreError::ParseError(
            "row is missing a string $id".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
struct AppwriteErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RowListResponse {
    #[serde(default)]
    rows: Vec<Value>,
}

#[async_trait]
impl RowStore for AppwriteRowStore {
    async fn list_rows(
        &self,
        database_id: &str,
        table_id: &str,
        query: &RowQuery,
    ) -> Result<Vec<Row>, RowStoreError> {
        let url = self.rows_url(database_id, table_id);
        let params: Vec<(&str, String)> = encode_queries(query)
            .into_iter()
            .map(|q| ("queries[]", q))
            .collect();

        debug!("Appwrite list rows: table={}, queries={:?}", table_id, params);

        let response = self
            .send("list_rows", self.client.get(&url).query(&params))
            .await?;

        let list: RowListResponse = response.json().await.map_err(|e| {
            RowStoreError::ParseError(format!("Failed to parse row list response: {}", e))
        })?;

        list.rows.into_iter().map(parse_row).collect()
    }

    async fn create_row(
        &self,
        database_id: &str,
        table_id: &str,
        row_id: &str,
        data: Map<String, Value>,
    ) -> Result<Row, RowStoreError> {
        let url = self.rows_url(database_id, table_id);

        debug!("Appwrite create row: table={}, id={}", table_id, row_id);

        let body = json!({ "rowId": row_id, "data": data });
        let response = self
            .send("create_row", self.client.post(&url).json(&body))
            .await?;

        let value: Value = response.json().await.map_err(|e| {
            RowStoreError::ParseError(format!("Failed to parse created row: {}", e))
        })?;
        parse_row(value)
    }

    async fn update_row(
        &self,
        database_id: &str,
        table_id: &str,
        row_id: &str,
        data: Map<String, Value>,
    ) -> Result<Row, RowStoreError> {
        let url = format!(
            "{}/{}",
            self.rows_url(database_id, table_id),
            urlencoding::encode(row_id)
        );

        debug!("Appwrite update row: table={}, id={}", table_id, row_id);

        let body = json!({ "data": data });
        let response = self
            .send("update_row", self.client.patch(&url).json(&body))
            .await?;

        let value: Value = response.json().await.map_err(|e| {
            RowStoreError::ParseError(format!("Failed to parse updated row: {}", e))
        })?;
        parse_row(value)
    }

    fn backend_name(&self) -> &'static str {
        "appwrite"
    }
}
