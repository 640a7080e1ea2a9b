//! Suggestion orchestration
//!
//! Applies the minimum-length gate, cancels superseded fetches, and only lets
//! the most recently issued request commit to the store.

use super::source::SuggestionSource;
use super::store::{SuggestionState, SuggestionStore};
use crate::error::FetchError;
use crate::suburbs::Suggestion;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc::UnboundedReceiver, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// What happened to one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Query too short; store reset to idle
    BelowThreshold,
    /// Store now holds this many suggestions
    Updated(usize),
    /// Store recorded an error
    Failed,
    /// A newer query took over; nothing was committed
    Superseded,
}

/// Identity of the request allowed to commit
struct Current {
    id: u64,
    token: CancellationToken,
}

struct SessionInner {
    source: Arc<dyn SuggestionSource>,
    store: SuggestionStore,
    current: Mutex<Current>,
    min_query_len: usize,
    timeout: Option<Duration>,
}

/// Session-scoped suggestion state plus the request bookkeeping around it
#[derive(Clone)]
pub struct SuggestionSession {
    inner: Arc<SessionInner>,
}

impl SuggestionSession {
    pub fn new(source: Arc<dyn SuggestionSource>) -> Self {
        Self::with_options(source, crate::MIN_QUERY_LEN, None)
    }

    /// Build with explicit threshold and optional fetch timeout
    pub fn with_options(
        source: Arc<dyn SuggestionSource>,
        min_query_len: usize,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                source,
                store: SuggestionStore::new(),
                current: Mutex::new(Current {
                    id: 0,
                    token: CancellationToken::new(),
                }),
                min_query_len,
                timeout,
            }),
        }
    }

    pub fn min_query_len(&self) -> usize {
        self.inner.min_query_len
    }

    /// Whether a (trimmed) query is long enough to be fetched
    pub fn meets_threshold(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.inner.min_query_len
    }

    pub fn snapshot(&self) -> SuggestionState {
        self.inner.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.inner.store.subscribe()
    }

    /// Register a query change; the order of calls is the issuance order
    ///
    /// Cancels whatever fetch was in flight. Returns the fetch to run, or `None`
    /// when the query is below the threshold and the store was reset.
    pub fn issue(&self, raw: &str) -> Option<PendingFetch> {
        let query = raw.trim();
        let mut current = self.inner.current.lock().unwrap();

        current.token.cancel();
        current.id += 1;
        current.token = CancellationToken::new();

        if !self.meets_threshold(query) {
            self.inner.store.reset();
            return None;
        }

        debug!("Issuing suggestion fetch #{} for '{}'", current.id, query);
        self.inner.store.fetch_started();

        Some(PendingFetch {
            session: self.clone(),
            id: current.id,
            token: current.token.clone(),
            query: query.to_string(),
        })
    }

    /// Issue a query and wait for its fetch
    pub async fn refresh(&self, raw: &str) -> RefreshOutcome {
        match self.issue(raw) {
            Some(pending) => pending.run().await,
            None => RefreshOutcome::BelowThreshold,
        }
    }

    /// Cancel the in-flight fetch without issuing a new one
    ///
    /// A store left loading by the cancelled fetch drops back to idle.
    pub fn cancel(&self) {
        let mut current = self.inner.current.lock().unwrap();
        current.token.cancel();
        current.id += 1;
        self.inner.store.fetch_abandoned();
    }

    /// Cancel any fetch and empty the list
    pub fn clear(&self) {
        let mut current = self.inner.current.lock().unwrap();
        current.token.cancel();
        current.id += 1;
        self.inner.store.reset();
    }

    /// Feed debounced queries into the session until the sender side closes
    ///
    /// Each query is issued in arrival order; its fetch runs on its own task so a
    /// newer query can cancel it.
    pub fn spawn_driver(&self, mut queries: UnboundedReceiver<String>) -> JoinHandle<()> {
        let session = self.clone();
        tokio::spawn(async move {
            while let Some(query) = queries.recv().await {
                if let Some(pending) = session.issue(&query) {
                    tokio::spawn(pending.run());
                }
            }
            session.cancel();
        })
    }

    /// Commit a finished fetch if it is still the current one
    fn commit(&self, id: u64, result: Result<Vec<Suggestion>, FetchError>) -> RefreshOutcome {
        let current = self.inner.current.lock().unwrap();
        if current.id != id {
            debug!("Discarding stale suggestion response #{} (current #{})", id, current.id);
            return RefreshOutcome::Superseded;
        }

        match result {
            Ok(suggestions) => {
                let count = suggestions.len();
                self.inner.store.fetch_succeeded(suggestions);
                RefreshOutcome::Updated(count)
            }
            Err(e) if e.is_cancelled() => RefreshOutcome::Superseded,
            Err(e) => {
                warn!("Suggestion fetch #{} failed: {}", id, e);
                self.inner.store.fetch_failed(e.to_string());
                RefreshOutcome::Failed
            }
        }
    }
}

/// A fetch that has been issued but not yet run
pub struct PendingFetch {
    session: SuggestionSession,
    id: u64,
    token: CancellationToken,
    query: String,
}

impl PendingFetch {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Run the fetch and commit its result unless it was superseded
    pub async fn run(self) -> RefreshOutcome {
        let source = self.session.inner.source.clone();
        let timeout = self.session.inner.timeout;

        let fetch = async {
            match timeout {
                Some(limit) => tokio::time::timeout(limit, source.suggest(&self.query, &self.token))
                    .await
                    .unwrap_or(Err(FetchError::Timeout)),
                None => source.suggest(&self.query, &self.token).await,
            }
        };

        let result = tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                debug!("Suggestion fetch #{} cancelled", self.id);
                return RefreshOutcome::Superseded;
            }
            result = fetch => result,
        };

        self.session.commit(self.id, result)
    }
}
