//! Tree listing route.

use crate::state::AppState;
use axum::{extract::State, Json};
use kustox_types::TreeItem;
use std::sync::Arc;

/// Root listing: the current result or the empty-state placeholder.
pub async fn children(State(state): State<Arc<AppState>>) -> Json<Vec<TreeItem>> {
    Json(state.tree.get_children(None))
}
