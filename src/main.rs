//! settly: interactive suburb search in the terminal
//!
//! Each input line replaces the search text; suggestions are printed as they
//! arrive. Lines starting with `:` are commands (see `:help`).

use anyhow::Result;
use settly::{
    autocomplete::{ApiSuggestions, FetchStatus, SuggestionSession, SuggestionState},
    config,
    network::ApiClient,
    search::{Route, SearchBox},
    storage::{FileStore, SelectionStore},
    suburbs::{ReportSection, SuburbApi},
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = config::load_settings()?;

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(if settings.general.debug {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting settly v{}", settly::VERSION);
    match settings.source {
        Some(ref path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }

    let client = ApiClient::with_settings(&settings.api)?;
    info!("API client initialized for {}", client.base_url());

    let source = Arc::new(ApiSuggestions::new(client.clone(), &settings.api));
    let session = SuggestionSession::with_options(
        source,
        settings.search.min_query_len,
        settings.api.suggest_timeout()?,
    );
    let suburbs = SuburbApi::new(client, &settings.api);

    let storage_path = settings.storage.resolve_path();
    info!("Persisting selections to {}", storage_path.display());

    let mut search = SearchBox::new(
        session.clone(),
        SelectionStore::new(FileStore::new(storage_path)),
        settings.search.debounce(),
    )
    .on_selected(|s| info!("Selected {}", s.label()))
    .on_explore(|q| info!("Exploring '{}'", q));
    search.focus();

    let mut updates = session.subscribe();
    let render = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            render_state(&state);
        }
    });

    print_usage();
    if let Some(last) = search.stored_selection() {
        println!("Last selection: {}", last.label);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end();

        match line {
            ":quit" | ":q" => break,
            ":help" => print_usage(),
            ":last" => match search.stored_selection() {
                Some(selection) => println!(
                    "{}\n{}",
                    selection.label,
                    serde_json::to_string_pretty(&selection.option)?
                ),
                None => println!("No stored selection"),
            },
            ":explore" => {
                let route = search.explore();
                println!("-> {}", route);
                if let Route::Explore(query) = route {
                    match suburbs.explore(&query, &CancellationToken::new()).await {
                        Ok(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
                        Err(e) => warn!("Explore request failed: {}", e),
                    }
                }
            }
            ":report" => {
                let suburb_id = search.stored_selection().and_then(|s| s.option.suburb_id);
                match suburb_id {
                    Some(id) => {
                        let reports = suburbs.fetch_all_reports(id, &CancellationToken::new()).await;
                        info!(
                            "Loaded {}/{} report sections for suburb {}",
                            reports.loaded(),
                            ReportSection::ALL.len(),
                            id
                        );
                        println!("{}", serde_json::to_string_pretty(&reports)?);
                    }
                    None => println!("No stored selection with a suburb id"),
                }
            }
            command if command.starts_with(':') => match command[1..].parse::<usize>() {
                Ok(n) if n > 0 => match search.select_index(n - 1) {
                    Some(route) => println!("-> {}", route),
                    None => println!("No option {}", n),
                },
                _ => println!("Unknown command: {}", command),
            },
            text => search.set_input(text),
        }
    }

    drop(search);
    render.abort();
    Ok(())
}

fn render_state(state: &SuggestionState) {
    match state.status {
        FetchStatus::Idle => {}
        FetchStatus::Loading => println!("  searching..."),
        FetchStatus::Error => println!("  (no suggestions)"),
        FetchStatus::Success if state.suggestions.is_empty() => println!("  (no matches)"),
        FetchStatus::Success => {
            for (i, suggestion) in state.suggestions.iter().enumerate() {
                println!("  {:>2}. {}", i + 1, suggestion.label());
            }
        }
    }
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
settly v{}
Suburb search typeahead

Type to search (at least 3 characters). Commands:
    :N          Select suggestion N
    :explore    Explore the current text
    :report     Fetch reports for the last selected suburb
    :last       Show the stored selection
    :help       Show this help
    :quit       Exit

ENVIRONMENT VARIABLES:
    SETTLY_SETTINGS_PATH  Path to settly.yml
    SETTLY_API_BASE_URL   Base URL of the settly API
    SETTLY_DEBOUNCE_MS    Quiet period before fetching suggestions
    SETTLY_STORAGE_PATH   File used to persist the selection
    SETTLY_DEBUG          Enable debug logging (true/false)
"#,
        settly::VERSION
    );
}
