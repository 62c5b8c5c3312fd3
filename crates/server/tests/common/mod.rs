//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock dependencies injected, enabling E2E testing of the API without
//! TMDB or Appwrite.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use reelscout_core::{
    load_config_from_str,
    testing::{MockMovieCatalog, MockRowStore},
    Config, RowStore, SearchCoordinator, TrendStore,
};
use reelscout_server::state::AppState;

/// Re-export fixtures for test convenience
pub use reelscout_core::testing::fixtures;

pub const DATABASE_ID: &str = "reelscout";
pub const TABLE_ID: &str = "metrics";
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

const TEST_CONFIG: &str = r#"
[catalog]
api_key = "tmdb-secret"

[trend_store]
backend = "memory"
database_id = "reelscout"
table_id = "metrics"

[server]
host = "127.0.0.1"
port = 8080
"#;

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with fully controllable mocks for:
/// - Movie catalog (MockMovieCatalog)
/// - Trend row store (MockRowStore)
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog - configure movies, delays and failures
    pub catalog: MockMovieCatalog,
    /// Mock row store - inspect and seed search term rows
    pub store: MockRowStore,
    /// Coordinator behind the router
    pub coordinator: SearchCoordinator,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a started fixture with a small default catalog.
    pub async fn new() -> Self {
        let fixture = Self::unstarted().await;
        fixture.coordinator.start().await;
        fixture
    }

    /// Create a fixture without starting the coordinator.
    pub async fn unstarted() -> Self {
        let catalog = MockMovieCatalog::new();
        catalog
            .set_movies(vec![
                fixtures::movie(438631, "Dune", Some("/dune.jpg")),
                fixtures::movie(348, "Alien", Some("/alien.jpg")),
                fixtures::movie(11, "Star Wars", None),
            ])
            .await;

        let store = MockRowStore::new();
        let trends = TrendStore::new(
            Arc::new(store.clone()) as Arc<dyn RowStore>,
            DATABASE_ID,
            TABLE_ID,
            IMAGE_BASE_URL,
        );

        let config = test_config();
        let coordinator = SearchCoordinator::new(
            Arc::new(catalog.clone()),
            Arc::new(trends),
            config.search.clone(),
        );

        let state = Arc::new(AppState::new(config, coordinator.clone()));
        let router = reelscout_server::api::create_router(state);

        Self {
            router,
            catalog,
            store,
            coordinator,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await.0
    }

    /// Send a GET request and return the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let (response, text) = self.send(request).await;
        (response.status, text)
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();
        self.send(request).await.0
    }

    async fn send(&self, request: Request<Body>) -> (TestResponse, String) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        (TestResponse { status, body }, text)
    }
}

pub fn test_config() -> Config {
    load_config_from_str(TEST_CONFIG).expect("test config should parse")
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
