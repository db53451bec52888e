use std::time::Duration;

use anyhow::{Context, Result};

use crate::coaching::classifier::CaseKeywords;
use crate::session::DEFAULT_IDLE_TTL;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    /// Both search settings are optional. Without them market context falls back
    /// to the unavailable message and no search request is made.
    pub google_cse_api_key: Option<String>,
    pub google_cse_cx: Option<String>,
    pub search_endpoint: String,
    pub case_keywords: CaseKeywords,
    /// Set when `CASE_KEYWORDS` was given but held no usable entry, so the
    /// built-in list is in use. Reported once logging is up.
    pub case_keywords_fell_back: bool,
    pub session_idle_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let (case_keywords, case_keywords_fell_back) =
            case_keywords_from(optional_env("CASE_KEYWORDS"));

        let session_idle_ttl = match optional_env("SESSION_IDLE_TTL_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .context("SESSION_IDLE_TTL_SECS must be a whole number of seconds")?,
            ),
            None => DEFAULT_IDLE_TTL,
        };

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            google_cse_api_key: optional_env("GOOGLE_CSE_API_KEY"),
            google_cse_cx: optional_env("GOOGLE_CSE_CX"),
            search_endpoint: optional_env("GOOGLE_CSE_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_SEARCH_ENDPOINT.to_string()),
            case_keywords,
            case_keywords_fell_back,
            session_idle_ttl,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn market_context_configured(&self) -> bool {
        self.google_cse_api_key.is_some() && self.google_cse_cx.is_some()
    }
}

/// Resolves the case keyword list. The flag is true when an override was
/// supplied but nothing usable was left after parsing.
fn case_keywords_from(raw: Option<String>) -> (CaseKeywords, bool) {
    match raw {
        Some(raw) => match CaseKeywords::parse(&raw) {
            Some(keywords) => (keywords, false),
            None => (CaseKeywords::default(), true),
        },
        None => (CaseKeywords::default(), false),
    }
}

fn require_env(key: &str) -> Result<String> {
    optional_env(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an env var, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    non_blank(std::env::var(key).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank_drops_whitespace_only_values() {
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_non_blank_trims_values() {
        assert_eq!(non_blank(Some(" key-123 \n".to_string())), Some("key-123".to_string()));
    }

    #[test]
    fn test_case_keywords_default_when_unset() {
        let (keywords, fell_back) = case_keywords_from(None);
        assert_eq!(keywords.as_slice(), CaseKeywords::default().as_slice());
        assert!(!fell_back);
    }

    #[test]
    fn test_case_keywords_override_is_used() {
        let (keywords, fell_back) = case_keywords_from(Some("estudo de caso, mercado".to_string()));
        assert_eq!(keywords.as_slice(), ["estudo de caso", "mercado"]);
        assert!(!fell_back);
    }

    #[test]
    fn test_unusable_case_keywords_fall_back_and_report_it() {
        let (keywords, fell_back) = case_keywords_from(Some(" , ,".to_string()));
        assert_eq!(keywords.as_slice(), CaseKeywords::default().as_slice());
        assert!(fell_back);
    }
}
