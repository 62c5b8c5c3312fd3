use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use reelscout_core::{Movie, SanitizedConfig, SearchState, SearchTermRow};

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// Full search page state.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<SearchState> {
    Json(state.coordinator().snapshot())
}

/// Search box input.
#[derive(Debug, Deserialize)]
pub struct QueryChangeRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct QueryChangeResponse {
    pub query: String,
}

/// Feed a search box change. The fetch happens once input settles.
pub async fn change_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryChangeRequest>,
) -> (StatusCode, Json<QueryChangeResponse>) {
    state.coordinator().on_query_change(request.text.clone());
    (
        StatusCode::ACCEPTED,
        Json(QueryChangeResponse {
            query: request.text,
        }),
    )
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub movies: Vec<Movie>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

pub async fn get_movies(State(state): State<Arc<AppState>>) -> Json<MoviesResponse> {
    let snapshot = state.coordinator().snapshot();
    Json(MoviesResponse {
        movies: snapshot.movies,
        is_loading: snapshot.is_loading,
        error_message: snapshot.error_message,
    })
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub trending: Vec<SearchTermRow>,
}

pub async fn get_trending(State(state): State<Arc<AppState>>) -> Json<TrendingResponse> {
    Json(TrendingResponse {
        trending: state.coordinator().snapshot().trending,
    })
}

/// Reload the trending list from the store. A failed reload keeps the
/// current list.
pub async fn refresh_trending(State(state): State<Arc<AppState>>) -> Json<TrendingResponse> {
    state.coordinator().load_trending_movies().await;
    get_trending(State(state)).await
}
