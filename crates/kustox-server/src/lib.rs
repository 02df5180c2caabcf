//! Kustox server library - HTTP/WebSocket host for the ephemeral result store.
//!
//! Exposes the store's domain operations, its file-system provider contract and
//! the tree listing over HTTP, and pushes change notifications over WebSocket.
//! Kept apart from main.rs so the router can be driven from integration tests.

pub mod config;
pub mod logging;
pub mod routes;
pub mod state;
