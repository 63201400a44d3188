pub mod api;
pub mod config;
pub mod credential;
pub mod error;
pub mod feed;
pub mod logging;
pub mod page;
pub mod render;
pub mod select;
pub mod storage;
pub mod types;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::api::{GraphClient, MediaSource};
    pub use crate::config::FeedConfig;
    pub use crate::credential::{resolve_credential, CredentialKeys, PageLocation};
    pub use crate::error::{FeedError, FeedResult};
    pub use crate::feed::{Container, Document, FeedOutcome, MediaFeed};
    pub use crate::page::{Effect, Enhancer, PageEvent};
    pub use crate::storage::CredentialStore;
    pub use crate::types::{Card, MediaBatch, MediaItem, MediaType};
}
