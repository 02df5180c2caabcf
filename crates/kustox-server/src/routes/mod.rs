//! HTTP route handlers.

pub mod fs;
pub mod results;
pub mod tree;
pub mod ws;

use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub has_result: bool,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        has_result: state.store.has_result(),
    })
}

/// All API and WebSocket routes, without outer layers.
pub fn router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Result store
        .route(
            "/results",
            get(results::list).post(results::add).delete(results::clear),
        )
        .route("/results/current", get(results::current))
        .route("/results/stats", get(results::stats))
        .route("/results/{id}", get(results::get))
        // File-system provider
        .route("/fs/stat", get(fs::stat))
        .route(
            "/fs/dir",
            get(fs::read_directory).post(fs::create_directory),
        )
        .route(
            "/fs/file",
            get(fs::read_file).put(fs::write_file).delete(fs::delete_file),
        )
        .route("/fs/rename", post(fs::rename))
        // Tree
        .route("/tree", get(tree::children))
        .route("/health", get(health));

    let ws_routes = Router::new().route("/events", get(ws::upgrade));

    Router::new()
        .nest("/api", api_routes)
        .nest("/ws", ws_routes)
        .with_state(state)
}
