//! Common helpers for server integration tests.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use kustox_server::{config::Config, routes, state::AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Router plus the state behind it.
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let config = Config {
        port: 0,
        host: "127.0.0.1".to_string(),
        event_buffer: 16,
    };
    let state = Arc::new(AppState::new(config));
    (routes::router(state.clone()), state)
}

/// Send a request and return status plus raw body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Vec<u8>) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// Body for POST /api/results matching the "take 5" scenario.
pub fn take_five_request() -> Value {
    json!({
        "query": "T | take 5",
        "result": {
            "columns": ["A", "B"],
            "rows": [[1, "x"], [2, "y"]],
            "rowCount": 2,
            "executionTime": "0.1s",
            "hasData": true
        },
        "cluster": "clusterX",
        "database": "dbY"
    })
}

/// Percent-encode a URI for use as a query-string value.
pub fn encode(uri: &str) -> String {
    uri.replace(':', "%3A").replace('/', "%2F")
}
