//! Typeahead suggestions for suburb search
//!
//! Input is debounced, short queries are ignored, and each new query cancels
//! the fetch before it so that only the latest response reaches the store.

mod debounce;
mod session;
mod source;
mod store;

pub use debounce::Debouncer;
pub use session::{PendingFetch, RefreshOutcome, SuggestionSession};
pub use source::{ApiSuggestions, SuggestionSource};
pub use store::{FetchStatus, SuggestionState, SuggestionStore};
