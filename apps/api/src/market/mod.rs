//! Market Context Provider: short public snippets about the hiring company.
//!
//! `fetch_context` never fails. Missing credentials, transport errors, bad
//! status codes, malformed bodies and empty result sets all collapse into
//! [`MARKET_UNAVAILABLE`], which the prompt then carries as ordinary text.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Substituted whenever market context cannot be obtained.
pub const MARKET_UNAVAILABLE: &str = "Sem dados de mercado disponíveis.";

/// Bound on the search call. Other provider calls use transport defaults.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);
const RESULT_COUNT: u8 = 5;

#[derive(Debug, Error)]
enum MarketError {
    #[error("search credentials not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search API returned status {0}")]
    Status(u16),

    #[error("search returned no usable snippets")]
    NoSnippets,
}

#[derive(Debug, Clone)]
struct SearchCredentials {
    api_key: String,
    cx: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    snippet: String,
}

/// Google Custom Search backed context source.
#[derive(Clone)]
pub struct MarketContextClient {
    client: Client,
    credentials: Option<SearchCredentials>,
    endpoint: String,
}

impl MarketContextClient {
    /// Both the API key and the search-scope id are required; with either absent
    /// the client never touches the network.
    pub fn new(api_key: Option<String>, cx: Option<String>, endpoint: impl Into<String>) -> Self {
        let credentials = match (api_key, cx) {
            (Some(api_key), Some(cx)) => Some(SearchCredentials { api_key, cx }),
            _ => None,
        };
        Self {
            client: Client::new(),
            credentials,
            endpoint: endpoint.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Returns newline-joined snippets for the company, or the unavailable message.
    pub async fn fetch_context(&self, company: &str) -> String {
        match self.try_fetch(company).await {
            Ok(context) => context,
            Err(MarketError::NotConfigured) => {
                debug!("Market search not configured, using fallback context");
                MARKET_UNAVAILABLE.to_string()
            }
            Err(e) => {
                warn!("Market context unavailable for company: {e}");
                MARKET_UNAVAILABLE.to_string()
            }
        }
    }

    async fn try_fetch(&self, company: &str) -> Result<String, MarketError> {
        let credentials = self.credentials.as_ref().ok_or(MarketError::NotConfigured)?;
        let query = search_query(company);
        let num = RESULT_COUNT.to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", credentials.api_key.as_str()),
                ("cx", credentials.cx.as_str()),
                ("q", query.as_str()),
                ("num", num.as_str()),
            ])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::Status(status.as_u16()));
        }

        let parsed: SearchResponse = response.json().await?;
        join_snippets(parsed.items).ok_or(MarketError::NoSnippets)
    }
}

/// Search phrase pairing the company with hiring/skills terms.
pub fn search_query(company: &str) -> String {
    format!("{} requisitos vaga competências mercado", company.trim())
}

fn join_snippets(items: Vec<SearchItem>) -> Option<String> {
    let snippets: Vec<String> = items
        .into_iter()
        .map(|item| item.snippet.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if snippets.is_empty() {
        None
    } else {
        Some(snippets.join("\n"))
    }
}
