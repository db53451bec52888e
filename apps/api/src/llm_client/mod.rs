/// LLM Client: the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call the generation API directly.
/// All answer synthesis and refinement MUST go through this module.
///
/// One blocking call per turn. No retries: a provider failure is returned to the
/// caller and the user repeats the action.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const RESPONSES_PATH: &str = "/v1/responses";
/// The model used for all generation calls.
pub const MODEL: &str = "gpt-5.2";
/// Low effort keeps latency down while the recruiter waits for the answer.
const REASONING_EFFORT: &str = "low";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
    reasoning: Reasoning<'a>,
}

#[derive(Debug, Serialize)]
struct InputMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct Reasoning<'a> {
    effort: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    #[serde(default)]
    pub output: Vec<OutputItem>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct OutputItem {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub part_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Concatenates every `output_text` part of every message item.
    /// Reasoning items carry no text content and are skipped.
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.item_type == "message")
            .flat_map(|item| item.content.iter())
            .filter(|part| part.part_type == "output_text")
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The single generation client used by the coaching pipeline.
/// Sends a developer (rules) message plus a user (data) message and returns the reply.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Makes a raw call to the Responses API, returning the full response object.
    pub async fn call(&self, developer: &str, user: &str) -> Result<LlmResponse, LlmError> {
        let request_body = ResponsesRequest {
            model: MODEL,
            input: vec![
                InputMessage {
                    role: "developer",
                    content: developer,
                },
                InputMessage {
                    role: "user",
                    content: user,
                },
            ],
            reasoning: Reasoning {
                effort: REASONING_EFFORT,
            },
        };

        let response = self
            .client
            .post(format!("{}{RESPONSES_PATH}", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        if let Some(usage) = &llm_response.usage {
            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        Ok(llm_response)
    }

    /// Calls the model and returns its reply with surrounding whitespace removed.
    /// A reply with no text is an error, never an empty answer.
    pub async fn complete(&self, developer: &str, user: &str) -> Result<String, LlmError> {
        let response = self.call(developer, user).await?;
        let text = response.output_text().trim().to_string();
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text)
    }
}

/// Pulls `error.message` out of an OpenAI-style error body, else returns the body as-is.
pub(crate) fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn response_body(text: &str) -> serde_json::Value {
        json!({
            "output": [
                { "type": "reasoning", "summary": [] },
                {
                    "type": "message",
                    "role": "assistant",
                    "content": [{ "type": "output_text", "text": text, "annotations": [] }]
                }
            ],
            "usage": { "input_tokens": 120, "output_tokens": 40 }
        })
    }

    #[test]
    fn test_output_text_skips_reasoning_and_joins_parts() {
        let parsed: LlmResponse = serde_json::from_value(json!({
            "output": [
                { "type": "reasoning", "summary": [] },
                {
                    "type": "message",
                    "content": [
                        { "type": "output_text", "text": "Primeira parte. " },
                        { "type": "refusal", "refusal": "no" },
                        { "type": "output_text", "text": "Segunda parte." }
                    ]
                }
            ]
        }))
        .unwrap();
        assert_eq!(parsed.output_text(), "Primeira parte. Segunda parte.");
    }

    #[test]
    fn test_api_error_message_extracts_nested_message() {
        let body = r#"{"error":{"message":"Incorrect API key","type":"invalid_request_error"}}"#;
        assert_eq!(api_error_message(body.to_string()), "Incorrect API key");
        assert_eq!(api_error_message("bad gateway".to_string()), "bad gateway");
    }

    #[tokio::test]
    async fn test_complete_sends_both_roles_and_low_effort() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": MODEL,
                "reasoning": { "effort": "low" },
                "input": [
                    { "role": "developer", "content": "rules" },
                    { "role": "user", "content": "data" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body("  resposta \n")))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::new("test-key".to_string(), server.uri());
        let text = client.complete("rules", "data").await.unwrap();
        assert_eq!(text, "resposta");
    }

    #[tokio::test]
    async fn test_provider_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(json!({ "error": { "message": "quota exceeded" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::new("test-key".to_string(), server.uri());
        let err = client.complete("rules", "data").await.unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_reply_is_empty_content_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body("   ")))
            .mount(&server)
            .await;

        let client = LlmClient::new("test-key".to_string(), server.uri());
        let err = client.complete("rules", "data").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }
}
