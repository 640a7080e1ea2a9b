//! Suggestion state store

use crate::suburbs::Suggestion;
use serde::Serialize;
use tokio::sync::watch;

/// Fetch status of the suggestion list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    /// Query below threshold, nothing requested
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Snapshot of the store
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionState {
    pub suggestions: Vec<Suggestion>,
    pub status: FetchStatus,
    pub error: Option<String>,
}

impl SuggestionState {
    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }
}

/// Single mutable projection of {list, loading, error}
///
/// The transition methods are the only write path. The store applies them in
/// call order; discarding superseded requests is the caller's job.
#[derive(Debug)]
pub struct SuggestionStore {
    state: watch::Sender<SuggestionState>,
}

impl Default for SuggestionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SuggestionState::default());
        Self { state }
    }

    pub fn fetch_started(&self) {
        self.state.send_modify(|state| {
            state.status = FetchStatus::Loading;
            state.error = None;
        });
    }

    /// Replace the list wholesale, in server order
    pub fn fetch_succeeded(&self, suggestions: Vec<Suggestion>) {
        self.state.send_modify(|state| {
            state.suggestions = suggestions;
            state.status = FetchStatus::Success;
            state.error = None;
        });
    }

    /// Record a failure; no stale options survive it
    pub fn fetch_failed(&self, message: impl Into<String>) {
        let message = message.into();
        self.state.send_modify(|state| {
            state.suggestions.clear();
            state.status = FetchStatus::Error;
            state.error = Some(message);
        });
    }

    /// Back to idle with an empty list
    pub fn reset(&self) {
        self.state.send_replace(SuggestionState::default());
    }

    /// A fetch was cancelled with nothing to replace it; leave loading
    pub fn fetch_abandoned(&self) {
        self.state.send_if_modified(|state| {
            if state.status != FetchStatus::Loading {
                return false;
            }
            *state = SuggestionState::default();
            true
        });
    }

    pub fn snapshot(&self) -> SuggestionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every transition
    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.state.subscribe()
    }
}
