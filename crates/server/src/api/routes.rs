use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, middleware::metrics_middleware, ws};
use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Search page
        .route("/state", get(handlers::get_state))
        .route("/query", post(handlers::change_query))
        .route("/movies", get(handlers::get_movies))
        .route("/trending", get(handlers::get_trending))
        .route("/trending/refresh", post(handlers::refresh_trending))
        // Live updates
        .route("/ws", get(ws::ws_handler))
        .route_layer(middleware::from_fn(metrics_middleware));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    collect_dynamic_metrics(&state);
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
