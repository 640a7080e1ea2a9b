//! Search input bound to the suggestion pipeline

use super::navigation::Route;
use crate::autocomplete::{Debouncer, FetchStatus, SuggestionSession};
use crate::storage::{KeyValueStore, SelectionStore};
use crate::suburbs::{StoredSelection, Suggestion};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub type SelectedCallback = Box<dyn FnMut(&Suggestion) + Send>;
pub type ExploreCallback = Box<dyn FnMut(&str) + Send>;

/// One selectable entry of the suggestion list
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionOption {
    pub label: String,
    pub suggestion: Suggestion,
}

/// Search box state: input text, focus, and the options it currently shows
pub struct SearchBox<S> {
    input: String,
    focused: bool,
    session: SuggestionSession,
    debouncer: Debouncer<String>,
    driver: JoinHandle<()>,
    selections: SelectionStore<S>,
    on_selected: Option<SelectedCallback>,
    on_explore: Option<ExploreCallback>,
}

impl<S: KeyValueStore> SearchBox<S> {
    /// Create a search box; must be called from within a tokio runtime
    pub fn new(session: SuggestionSession, selections: SelectionStore<S>, debounce: Duration) -> Self {
        let (debouncer, settled) = Debouncer::new(debounce);
        let driver = session.spawn_driver(settled);

        Self {
            input: String::new(),
            focused: false,
            session,
            debouncer,
            driver,
            selections,
            on_selected: None,
            on_explore: None,
        }
    }

    /// Called with the full record whenever a suggestion is picked
    pub fn on_selected(mut self, callback: impl FnMut(&Suggestion) + Send + 'static) -> Self {
        self.on_selected = Some(Box::new(callback));
        self
    }

    /// Called with the current query when the explore action fires
    pub fn on_explore(mut self, callback: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_explore = Some(Box::new(callback));
        self
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input text; suggestions follow once it settles
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.debouncer.push(self.input.clone());
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn session(&self) -> &SuggestionSession {
        &self.session
    }

    /// Options to render right now
    ///
    /// Empty unless the box has focus, the input meets the threshold, and the
    /// last fetch produced a non-empty list.
    pub fn options(&self) -> Vec<SuggestionOption> {
        if !self.focused || !self.session.meets_threshold(&self.input) {
            return Vec::new();
        }

        let state = self.session.snapshot();
        if state.status == FetchStatus::Error {
            return Vec::new();
        }

        state
            .suggestions
            .into_iter()
            .map(|suggestion| SuggestionOption {
                label: suggestion.label(),
                suggestion,
            })
            .collect()
    }

    /// Persist the pick, notify the caller, and return where to go next
    pub fn select(&mut self, suggestion: &Suggestion) -> Route {
        let selection = StoredSelection::from_suggestion(suggestion);
        debug!("Selected '{}'", selection.label);

        if let Err(e) = self.selections.save(&selection) {
            warn!("Failed to persist selection '{}': {}", selection.label, e);
        }

        // Picking closes the list
        self.debouncer.cancel();
        self.session.clear();
        self.input = selection.label;

        if let Some(callback) = self.on_selected.as_mut() {
            callback(suggestion);
        }

        Route::for_selection(suggestion)
    }

    /// Select the `index`-th visible option
    pub fn select_index(&mut self, index: usize) -> Option<Route> {
        let option = self.options().into_iter().nth(index)?;
        Some(self.select(&option.suggestion))
    }

    /// Explicit call to action; fires even when no suggestions are shown
    pub fn explore(&mut self) -> Route {
        let query = self.input.trim().to_string();
        if let Some(callback) = self.on_explore.as_mut() {
            callback(&query);
        }
        Route::Explore(query)
    }

    /// Last persisted selection, if any
    pub fn stored_selection(&self) -> Option<StoredSelection> {
        self.selections.load()
    }
}

impl<S> Drop for SearchBox<S> {
    fn drop(&mut self) {
        self.debouncer.cancel();
        self.driver.abort();
        self.session.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autocomplete::SuggestionSource;
    use crate::error::FetchError;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tokio::time::sleep;
    use tokio_util::sync::CancellationToken;

    fn sydney() -> Suggestion {
        Suggestion {
            suburb_id: Some(101),
            address: Some("Sydney (CBD)".to_string()),
            name: Some("Sydney".to_string()),
            state: Some("NSW".to_string()),
            postcode: Some("2000".to_string()),
        }
    }

    struct FixedSource {
        result: Result<Vec<Suggestion>, u16>,
        calls: Mutex<Vec<String>>,
    }

    impl FixedSource {
        fn ok(suggestions: Vec<Suggestion>) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(suggestions),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                result: Err(502),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SuggestionSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn suggest(
            &self,
            query: &str,
            _cancel: &CancellationToken,
        ) -> Result<Vec<Suggestion>, FetchError> {
            self.calls.lock().unwrap().push(query.to_string());
            self.result.clone().map_err(FetchError::Status)
        }
    }

    fn search_box(source: Arc<FixedSource>, storage: Arc<MemoryStore>) -> SearchBox<Arc<MemoryStore>> {
        SearchBox::new(
            SuggestionSession::new(source),
            SelectionStore::new(storage),
            Duration::from_millis(300),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_shows_options_after_quiet_period() {
        let source = FixedSource::ok(vec![sydney()]);
        let mut search = search_box(source.clone(), Arc::new(MemoryStore::new()));
        search.focus();

        for text in ["s", "sy", "syd"] {
            search.set_input(text);
            sleep(Duration::from_millis(100)).await;
        }
        assert!(search.options().is_empty());

        sleep(Duration::from_millis(400)).await;
        let options = search.options();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].label, "Sydney (CBD), Sydney, NSW 2000");
        assert_eq!(*source.calls.lock().unwrap(), vec!["syd".to_string()]);
    }

    #[tokio::test]
    async fn test_options_hidden_without_focus_or_short_input() {
        let mut search = search_box(FixedSource::ok(vec![sydney()]), Arc::new(MemoryStore::new()));
        search.set_input("syd");
        search.session().refresh("syd").await;

        assert!(search.options().is_empty());

        search.focus();
        assert_eq!(search.options().len(), 1);

        search.set_input("sy");
        assert!(search.options().is_empty());

        search.set_input("syd");
        search.blur();
        assert!(search.options().is_empty());
    }

    #[tokio::test]
    async fn test_options_hidden_when_list_empty_or_failed() {
        let mut empty = search_box(FixedSource::ok(vec![]), Arc::new(MemoryStore::new()));
        empty.focus();
        empty.set_input("zzz");
        empty.session().refresh("zzz").await;
        assert!(empty.options().is_empty());

        let mut failed = search_box(FixedSource::failing(), Arc::new(MemoryStore::new()));
        failed.focus();
        failed.set_input("syd");
        failed.session().refresh("syd").await;
        assert!(failed.options().is_empty());
        assert_eq!(failed.session().snapshot().status, FetchStatus::Error);
    }

    #[tokio::test]
    async fn test_select_persists_and_notifies_once() {
        let storage = Arc::new(MemoryStore::new());
        let picked = Arc::new(Mutex::new(Vec::new()));
        let sink = picked.clone();

        let mut search = search_box(FixedSource::ok(vec![sydney()]), storage.clone())
            .on_selected(move |s| sink.lock().unwrap().push(s.clone()));
        search.focus();
        search.set_input("syd");
        search.session().refresh("syd").await;

        let route = search.select_index(0).unwrap();
        assert_eq!(route, Route::Suburb(101));
        assert_eq!(route.path(), "/suburb/101");

        assert_eq!(*picked.lock().unwrap(), vec![sydney()]);

        let stored = SelectionStore::new(storage).load().unwrap();
        assert_eq!(
            stored,
            StoredSelection {
                label: "Sydney (CBD), Sydney, NSW 2000".to_string(),
                option: sydney(),
            }
        );
        assert_eq!(search.input(), "Sydney (CBD), Sydney, NSW 2000");
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_closes_list() {
        let source = FixedSource::ok(vec![sydney()]);
        let mut search = search_box(source.clone(), Arc::new(MemoryStore::new()));
        search.focus();
        search.set_input("syd");
        sleep(Duration::from_millis(400)).await;
        assert_eq!(search.options().len(), 1);

        assert!(search.select_index(0).is_some());
        assert!(search.is_focused());
        assert!(search.options().is_empty());
        assert_eq!(search.session().snapshot().status, FetchStatus::Idle);

        // The label set by the pick is not fetched
        sleep(Duration::from_secs(1)).await;
        assert_eq!(*source.calls.lock().unwrap(), vec!["syd".to_string()]);
    }

    #[tokio::test]
    async fn test_select_index_out_of_range() {
        let mut search = search_box(FixedSource::ok(vec![]), Arc::new(MemoryStore::new()));
        search.focus();
        assert!(search.select_index(0).is_none());
        assert!(search.stored_selection().is_none());
    }

    #[tokio::test]
    async fn test_explore_fires_once_with_empty_list() {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = fired.clone();

        let mut search = search_box(FixedSource::ok(vec![]), Arc::new(MemoryStore::new()))
            .on_explore(move |q| sink.lock().unwrap().push(q.to_string()));
        search.set_input("  st kilda ");

        let route = search.explore();
        assert_eq!(route.path(), "/explore/st%20kilda");
        assert_eq!(*fired.lock().unwrap(), vec!["st kilda".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_fetch() {
        let source = FixedSource::ok(vec![sydney()]);
        let mut search = search_box(source.clone(), Arc::new(MemoryStore::new()));
        search.set_input("syd");
        drop(search);

        sleep(Duration::from_secs(1)).await;
        assert!(source.calls.lock().unwrap().is_empty());
    }
}
