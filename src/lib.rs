//! settly: suburb search typeahead
//!
//! Debounced, cancellable suggestion fetching against the settly REST API,
//! with the user's last pick persisted between runs.

pub mod autocomplete;
pub mod config;
pub mod error;
pub mod network;
pub mod search;
pub mod storage;
pub mod suburbs;

pub use autocomplete::{SuggestionSession, SuggestionSource};
pub use config::Settings;
pub use error::{FetchError, StorageError};
pub use search::{Route, SearchBox};
pub use suburbs::{StoredSelection, Suggestion};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Queries shorter than this (after trimming) are never fetched
pub const MIN_QUERY_LEN: usize = 3;

/// Default quiet period before a query is fetched, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
