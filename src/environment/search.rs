//! Web research environment: search the web and read pages.

use std::collections::BTreeSet;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use super::{Environment, PageContent};
use crate::config::{resolve_api_key, ConfigError};
use crate::llm::ResponseSchema;
use crate::types::EnvironmentResponse;

/// SerpApi JSON endpoint.
const DEFAULT_SEARCH_ENDPOINT: &str = "https://serpapi.com/search.json";

const SERP_API_KEY_ENV: &str = "SERP_API_KEY";
const ALREADY_VISITED: &str = "You have already visited this URL.";

/// The action record the model fills in for this environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchAction {
    /// One of `search`, `visit_url`, `done`
    #[serde(default)]
    pub action: Option<String>,

    /// Search engine query, for `search`
    #[serde(default)]
    pub query: Option<String>,

    /// Page to read, for `visit_url`
    #[serde(default)]
    pub url: Option<String>,
}

impl SearchAction {
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            action: Some("search".to_string()),
            query: Some(query.into()),
            url: None,
        }
    }

    pub fn visit_url(url: impl Into<String>) -> Self {
        Self {
            action: Some("visit_url".to_string()),
            query: None,
            url: Some(url.into()),
        }
    }

    pub fn done() -> Self {
        Self {
            action: Some("done".to_string()),
            ..Self::default()
        }
    }
}

/// One organic search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

/// Searches through SerpApi and scrapes pages over plain HTTP GET.
///
/// Keeps every batch of search results and the set of pages already read.
/// A page can be visited once per environment; asking again is an error so
/// the model has to keep track of what it has read.
pub struct SearchEnvironment {
    api_key: String,
    endpoint: String,
    http_client: Client,
    search_results: Vec<Vec<SearchResult>>,
    visited_urls: BTreeSet<String>,
}

impl SearchEnvironment {
    /// Create an environment using `api_key`, or `SERP_API_KEY` when it is
    /// absent or blank.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if neither source provides a key.
    pub fn new(api_key: Option<String>) -> Result<Self, ConfigError> {
        let api_key = resolve_api_key(api_key, SERP_API_KEY_ENV, |key| std::env::var(key).ok())
            .ok_or_else(|| ConfigError::MissingEnvVar(SERP_API_KEY_ENV.to_string()))?;
        Self::with_api_key(api_key)
    }

    /// Create an environment with an explicit key, ignoring the environment.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar(SERP_API_KEY_ENV.to_string()));
        }

        let http_client = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; agentica/0.1)")
            .build()
            .map_err(|e| ConfigError::InvalidValue("http client".to_string(), e.to_string()))?;

        Ok(Self {
            api_key,
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            http_client,
            search_results: Vec::new(),
            visited_urls: BTreeSet::new(),
        })
    }

    /// Point searches at a different SerpApi-compatible endpoint.
    pub fn with_search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Every successful batch of search results, oldest first.
    pub fn search_history(&self) -> &[Vec<SearchResult>] {
        &self.search_results
    }

    pub fn visited_urls(&self) -> &BTreeSet<String> {
        &self.visited_urls
    }

    async fn search(&mut self, query: &str) -> EnvironmentResponse {
        debug!(query, "Searching");
        match self.fetch_search_results(query).await {
            Ok(results) => {
                let value = json!(results);
                self.search_results.push(results);
                EnvironmentResponse::success("Search Executed", value)
            }
            Err(error) => {
                warn!(query, %error, "Search failed");
                EnvironmentResponse::failure("error", error)
            }
        }
    }

    /// Run one query; the error is whatever the model should see.
    async fn fetch_search_results(&self, query: &str) -> Result<Vec<SearchResult>, Value> {
        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Value::String(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Value::String(e.to_string()))?;

        let payload: Value = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(_) if !status.is_success() => {
                return Err(Value::String(format!("Search request failed with status {}", status)));
            }
            Err(e) => return Err(Value::String(format!("Search response is not JSON: {}", e))),
        };

        // The provider's own error message wins over the HTTP status.
        if let Some(error) = payload.get("error") {
            return Err(error.clone());
        }
        if !status.is_success() {
            return Err(Value::String(format!("Search request failed with status {}", status)));
        }

        let organic = payload
            .get("organic_results")
            .cloned()
            .ok_or_else(|| {
                Value::String("Search response did not contain `organic_results`".to_string())
            })?;

        serde_json::from_value(organic)
            .map_err(|e| Value::String(format!("Unexpected `organic_results` format: {}", e)))
    }

    async fn visit_url(&mut self, url: &str) -> EnvironmentResponse {
        if self.visited_urls.contains(url) {
            return EnvironmentResponse::failure("error", ALREADY_VISITED);
        }

        debug!(url, "Visiting");
        match self.fetch_page(url).await {
            Ok(content) => {
                self.visited_urls.insert(url.to_string());
                EnvironmentResponse::success("URL Visited", json!(content))
            }
            Err(error) => {
                warn!(url, %error, "Visit failed");
                EnvironmentResponse::failure("error", error)
            }
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<PageContent, String> {
        let parsed = Url::parse(url).map_err(|e| format!("Invalid URL `{}`: {}", url, e))?;

        let response = self
            .http_client
            .get(parsed)
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        let html = response.text().await.map_err(|e| e.to_string())?;
        Ok(PageContent::from_html(&html))
    }
}

#[async_trait]
impl Environment for SearchEnvironment {
    type Action = SearchAction;

    fn build_action_schema(&self) -> ResponseSchema {
        ResponseSchema::new(
            "SearchAction",
            "The next step of the web research task.",
            json!({
                "type": "object",
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": ["search", "visit_url", "done"],
                        "description":
                            "The action to take, must be one of [`search`, `visit_url`, `done`]."
                    },
                    "query": {
                        "type": "string",
                        "description": "The query for a search engine. Use this if you want to \
                            search for something and don't have a URL."
                    },
                    "url": {
                        "type": "string",
                        "description": "The full, valid URL of a site you would like to visit \
                            to learn more. Each URL can only be visited once."
                    }
                },
                "required": ["action"]
            }),
        )
    }

    fn describe_state(&self) -> String {
        format!(
            "Search Results: {}\nVisited URLs: {}",
            json!(self.search_results),
            json!(self.visited_urls)
        )
    }

    async fn execute(&mut self, action: &SearchAction) -> EnvironmentResponse {
        match action.action.as_deref().map(str::trim) {
            None | Some("") => EnvironmentResponse::failure(
                "Error",
                format!(
                    "Action not provided within the `action` field, found {}",
                    json!(action)
                ),
            ),
            Some("search") => match non_blank(&action.query) {
                Some(query) => self.search(query).await,
                None => EnvironmentResponse::failure(
                    "error",
                    "A `query` is required for the `search` action.",
                ),
            },
            Some("visit_url") => match non_blank(&action.url) {
                Some(url) => self.visit_url(url).await,
                None => EnvironmentResponse::failure(
                    "error",
                    "A `url` is required for the `visit_url` action.",
                ),
            },
            Some("done") => EnvironmentResponse::status("Done"),
            Some(other) => EnvironmentResponse::failure(
                "Unknown Action Error",
                format!(
                    "Unknown action error, got: {}. \
                     Expected one of: [`search`, `visit_url`, `done`]",
                    other
                ),
            ),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
