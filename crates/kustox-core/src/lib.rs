//! Core result store and tree projection for Kustox.

mod error;
mod events;
mod provider;
mod store;
mod tree;

pub use error::KustoxError;
pub use events::{EventEmitter, Subscription};
pub use provider::FileSystemProvider;
pub use store::{ResultStore, SlotState};
pub use tree::{TreeState, TreeSynchronizer, OPEN_RESULT_COMMAND};

/// Result type for Kustox operations.
pub type Result<T> = std::result::Result<T, KustoxError>;
