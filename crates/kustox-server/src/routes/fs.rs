//! File-system provider routes for the `kustox-ai://results` space.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use kustox_core::{FileSystemProvider, KustoxError};
use kustox_types::{FileStat, FileType, ResultUri};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

type ApiError = (StatusCode, String);

#[derive(Deserialize)]
pub struct UriQuery {
    pub uri: String,
}

#[derive(Deserialize)]
pub struct RenameRequest {
    pub from: String,
    pub to: String,
}

fn parse_uri(raw: &str) -> Result<ResultUri, ApiError> {
    ResultUri::parse(raw).map_err(|e| to_api_error(e.into()))
}

fn to_api_error(err: KustoxError) -> ApiError {
    let status = match &err {
        KustoxError::NotFound(_) => StatusCode::NOT_FOUND,
        KustoxError::InvalidUri(_) => StatusCode::BAD_REQUEST,
    };
    (status, err.to_string())
}

pub async fn stat(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UriQuery>,
) -> Result<Json<FileStat>, ApiError> {
    let uri = parse_uri(&query.uri)?;
    state.store.stat(&uri).map(Json).map_err(to_api_error)
}

pub async fn read_directory(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UriQuery>,
) -> Result<Json<Vec<(String, FileType)>>, ApiError> {
    let uri = parse_uri(&query.uri)?;
    state.store.read_directory(&uri).map(Json).map_err(to_api_error)
}

pub async fn read_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UriQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let uri = parse_uri(&query.uri)?;
    let content = state.store.read_file(&uri).map_err(to_api_error)?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], content))
}

pub async fn write_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UriQuery>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let uri = parse_uri(&query.uri)?;
    debug!(target: "kustox::api", "PUT {} ({} bytes)", uri, body.len());
    state.store.write_file(&uri, &body).map_err(to_api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UriQuery>,
) -> Result<StatusCode, ApiError> {
    let uri = parse_uri(&query.uri)?;
    state.store.delete(&uri).map_err(to_api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_directory(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UriQuery>,
) -> Result<StatusCode, ApiError> {
    let uri = parse_uri(&query.uri)?;
    state.store.create_directory(&uri).map_err(to_api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn rename(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenameRequest>,
) -> Result<StatusCode, ApiError> {
    let from = parse_uri(&req.from)?;
    let to = parse_uri(&req.to)?;
    state.store.rename(&from, &to).map_err(to_api_error)?;
    Ok(StatusCode::NO_CONTENT)
}
