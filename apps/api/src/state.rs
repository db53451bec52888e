use std::sync::Arc;

use crate::coaching::classifier::CaseKeywords;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::market::MarketContextClient;
use crate::session::SessionStore;
use crate::transcription::Transcriber;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub transcriber: Transcriber,
    /// Falls back to the unavailable message when search is not configured.
    pub market: MarketContextClient,
    pub case_keywords: Arc<CaseKeywords>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            llm: LlmClient::new(config.openai_api_key.clone(), &config.openai_base_url),
            transcriber: Transcriber::new(config.openai_api_key.clone(), &config.openai_base_url),
            market: MarketContextClient::new(
                config.google_cse_api_key.clone(),
                config.google_cse_cx.clone(),
                &config.search_endpoint,
            ),
            case_keywords: Arc::new(config.case_keywords.clone()),
            sessions: SessionStore::new(config.session_idle_ttl),
        }
    }
}
