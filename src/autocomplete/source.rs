//! Suggestion sources

use crate::config::ApiSettings;
use crate::error::FetchError;
use crate::network::ApiClient;
use crate::suburbs::Suggestion;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Trait for suggestion backends
///
/// Implementations perform the request only. They never touch session state,
/// and must return `FetchError::Cancelled` once `cancel` fires.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Backend name
    fn name(&self) -> &str;

    /// Fetch suggestions for an already-trimmed query
    async fn suggest(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Suggestion>, FetchError>;
}

/// Suggestions from the settly REST API
pub struct ApiSuggestions {
    client: ApiClient,
    path: String,
    query_param: String,
}

impl ApiSuggestions {
    pub fn new(client: ApiClient, settings: &ApiSettings) -> Self {
        Self {
            client,
            path: settings.suggest_path.clone(),
            query_param: settings.query_param.clone(),
        }
    }
}

#[async_trait]
impl SuggestionSource for ApiSuggestions {
    fn name(&self) -> &str {
        "api"
    }

    async fn suggest(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Suggestion>, FetchError> {
        // A null body means no matches
        let suggestions: Option<Vec<Suggestion>> = self
            .client
            .get_json(&self.path, &[(self.query_param.as_str(), query)], cancel)
            .await?;

        Ok(suggestions.unwrap_or_default())
    }
}
