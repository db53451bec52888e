//! Speech Transcriber: one complete audio clip in, one complete transcript out.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::llm_client::api_error_message;

const TRANSCRIPTIONS_PATH: &str = "/v1/audio/transcriptions";
pub const TRANSCRIPTION_MODEL: &str = "gpt-4o-mini-transcribe";

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("transcript was empty")]
    EmptyTranscript,
}

/// An uploaded recording. The file name is the only format hint the provider gets.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub file_name: String,
    pub bytes: Bytes,
}

impl AudioClip {
    /// Returns `None` when the extension is not an accepted audio format.
    pub fn new(file_name: impl Into<String>, bytes: Bytes) -> Option<Self> {
        let file_name = file_name.into();
        audio_mime_type(&file_name)?;
        Some(Self { file_name, bytes })
    }

    fn mime_type(&self) -> &'static str {
        audio_mime_type(&self.file_name).unwrap_or("application/octet-stream")
    }
}

/// Maps an audio file name to its MIME type by extension.
pub fn audio_mime_type(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "mp3" | "mpga" | "mpeg" => Some("audio/mpeg"),
        "wav" => Some("audio/wav"),
        "m4a" | "mp4" => Some("audio/mp4"),
        "webm" => Some("audio/webm"),
        "ogg" | "oga" => Some("audio/ogg"),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Clone)]
pub struct Transcriber {
    client: Client,
    api_key: String,
    base_url: String,
}

impl Transcriber {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Sends the clip for recognition and returns the trimmed transcript.
    /// Failures are returned as-is; nothing is retried.
    pub async fn transcribe(&self, clip: AudioClip) -> Result<String, TranscriptionError> {
        let mime = clip.mime_type();
        let size = clip.bytes.len();
        let part = Part::bytes(clip.bytes.to_vec())
            .file_name(clip.file_name)
            .mime_str(mime)?;
        let form = Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .part("file", part);

        let response = self
            .client
            .post(format!("{}{TRANSCRIPTIONS_PATH}", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let parsed: TranscriptionResponse = response.json().await?;
        let text = parsed.text.trim().to_string();
        if text.is_empty() {
            return Err(TranscriptionError::EmptyTranscript);
        }

        debug!("Transcribed {size} bytes of audio into {} chars", text.len());
        Ok(text)
    }
}
