//! Domain routes over the result store.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use kustox_types::{QueryResult, ResultEntry, StorageStats};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddResultRequest {
    #[serde(default)]
    pub query: String,
    pub result: QueryResult,
    #[serde(default)]
    pub cluster: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub webview_uri: Option<String>,
}

#[derive(Serialize)]
pub struct AddResultResponse {
    pub id: String,
}

#[derive(Serialize)]
pub struct ResultListResponse {
    pub results: Vec<ResultEntry>,
}

pub async fn add(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddResultRequest>,
) -> Json<AddResultResponse> {
    let id = state.store.add_query_result(
        req.query,
        req.result,
        req.cluster,
        req.database,
        req.webview_uri,
    );
    info!(target: "kustox::api", "Added result {}", id);
    Json(AddResultResponse { id })
}

pub async fn list(State(state): State<Arc<AppState>>) -> Json<ResultListResponse> {
    Json(ResultListResponse {
        results: state.store.get_all_results(),
    })
}

pub async fn current(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ResultEntry>, (StatusCode, String)> {
    state
        .store
        .get_current_result()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "No result stored".to_string()))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ResultEntry>, (StatusCode, String)> {
    state
        .store
        .get_result(&id)
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Result not found: {}", id)))
}

pub async fn clear(State(state): State<Arc<AppState>>) -> StatusCode {
    state.store.clear_cache();
    info!(target: "kustox::api", "Cleared result cache");
    StatusCode::NO_CONTENT
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StorageStats> {
    Json(state.store.get_storage_stats())
}
