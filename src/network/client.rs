//! HTTP client for the settly REST API

use crate::config::ApiSettings;
use crate::error::FetchError;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// Standard accept header for JSON requests
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}

/// HTTP client wrapper bound to one API base URL
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl ApiClient {
    /// Create a client for `base_url` with default settings
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::with_settings(&ApiSettings {
            base_url: base_url.to_string(),
            ..ApiSettings::default()
        })
    }

    /// Create a client from API settings
    pub fn with_settings(settings: &ApiSettings) -> Result<Self, FetchError> {
        // Reject a malformed base URL up front
        Url::parse(&settings.base_url)?;

        let mut builder = Client::builder().gzip(true).brotli(true);
        if let Some(timeout) = settings.request_timeout()? {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            user_agent: format!("settly/{}", crate::VERSION),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL, keeping any base path prefix
    pub fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", self.base_url, path))?)
    }

    /// GET a JSON document, aborting the request as soon as `cancel` fires
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<T, FetchError> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);

        let request = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, accept_json())
            .query(params);

        let send = async move {
            let response = request.send().await.map_err(classify)?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }
            let text = response.text().await.map_err(classify)?;
            Ok::<T, FetchError>(serde_json::from_str(&text)?)
        };

        // Dropping the in-flight future aborts the underlying request
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = send => result,
        }
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_prefix() {
        let client = ApiClient::new("https://api.settly.example/v1/").unwrap();
        let url = client.endpoint("/api/suburbs/suggestions").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.settly.example/v1/api/suburbs/suggestions"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ApiClient::new("not a url");
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_negative_timeout_rejected() {
        let settings = ApiSettings {
            request_timeout_secs: Some(-5.0),
            ..ApiSettings::default()
        };
        let result = ApiClient::with_settings(&settings);
        assert!(matches!(result, Err(FetchError::InvalidTimeout(_))));
    }

    #[tokio::test]
    async fn test_cancelled_before_send() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result: Result<serde_json::Value, _> =
            client.get_json("/anything", &[], &cancel).await;
        assert!(matches!(result, Err(FetchError::Cancelled)));
    }
}
