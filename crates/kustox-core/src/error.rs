//! Error types for Kustox.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KustoxError {
    /// The path does not resolve in the result space.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid URI: {0}")]
    InvalidUri(#[from] kustox_types::UriParseError),
}

impl KustoxError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, KustoxError::NotFound(_))
    }
}
