//! Shared types for the Kustox result explorer.

mod entry;
mod fs;
mod query;
mod tree;
mod ws;

pub use entry::*;
pub use fs::*;
pub use query::*;
pub use tree::*;
pub use ws::*;
