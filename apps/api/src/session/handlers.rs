//! Axum route handlers for the session lifecycle, profile loading and questions.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::coaching::classifier::QuestionKind;
use crate::coaching::synthesizer::{require_inputs, FIELD_QUESTION};
use crate::errors::AppError;
use crate::extraction::{extract_text, DocumentKind};
use crate::models::profile::CandidateProfile;
use crate::session::SessionSnapshot;
use crate::state::AppState;
use crate::transcription::AudioClip;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SetQuestionRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub question: String,
    pub question_kind: QuestionKind,
}

struct UploadedFile {
    file_name: String,
    bytes: Bytes,
}

#[derive(Default)]
struct ProfileForm {
    company: String,
    job_description: String,
    resume: Option<UploadedFile>,
}

fn invalid_multipart(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart body: {e}"))
}

async fn read_profile_form(mut multipart: Multipart) -> Result<ProfileForm, AppError> {
    let mut form = ProfileForm::default();
    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "company" => form.company = field.text().await.map_err(invalid_multipart)?,
            "job_description" => {
                form.job_description = field.text().await.map_err(invalid_multipart)?
            }
            "resume" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(invalid_multipart)?;
                form.resume = Some(UploadedFile { file_name, bytes });
            }
            other => debug!("Ignoring unexpected form field '{other}'"),
        }
    }
    Ok(form)
}

async fn read_audio_field(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        if field.name() == Some("audio") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(invalid_multipart)?;
            return Ok(UploadedFile { file_name, bytes });
        }
    }
    Err(AppError::Validation("audio file is required".to_string()))
}

/// Runs extraction off the async runtime. Missing or empty uploads give "".
async fn resume_text(upload: Option<UploadedFile>) -> Result<String, AppError> {
    let Some(file) = upload.filter(|f| !f.bytes.is_empty()) else {
        return Ok(String::new());
    };
    let kind = DocumentKind::from_file_name(&file.file_name);
    tokio::task::spawn_blocking(move || extract_text(&file.bytes, kind))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Extraction task failed: {e}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_start_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    let handle = state.sessions.create().await;
    let snapshot = handle.lock().await.snapshot();
    (StatusCode::CREATED, Json(snapshot))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let snapshot = handle.lock().await.snapshot();
    Ok(Json(snapshot))
}

/// DELETE /api/v1/sessions/:id
///
/// Ends the session. Résumé, job description, question and answer are discarded.
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.end(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.reset();
    info!("Session {id} reset");
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/profile
///
/// Multipart fields: `company`, `job_description`, `resume` (file).
/// An unreadable résumé is not an error: the profile is stored with an empty
/// résumé and the response lists it under `profile.missing`.
pub async fn handle_load_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;

    let form = read_profile_form(multipart).await?;
    let resume = resume_text(form.resume).await?;
    let profile = CandidateProfile::new(resume, form.job_description, form.company);

    info!(
        "Session {id} profile loaded: resume_chars={}, job_chars={}, missing={:?}",
        profile.resume.len(),
        profile.job_description.len(),
        profile.missing_fields()
    );
    session.load_profile(profile);
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/question/audio
///
/// Multipart field `audio` (mp3/wav/m4a/webm/ogg). The transcript becomes the
/// session's current question.
pub async fn handle_transcribe_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<QuestionResponse>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    require_inputs(&session.profile, &[])?;

    let upload = read_audio_field(multipart).await?;
    if upload.bytes.is_empty() {
        return Err(AppError::Validation("audio file is empty".to_string()));
    }
    let clip = AudioClip::new(upload.file_name.clone(), upload.bytes).ok_or_else(|| {
        AppError::Validation(format!(
            "Unsupported audio format '{}'. Use mp3, wav or m4a.",
            upload.file_name
        ))
    })?;

    let question = state.transcriber.transcribe(clip).await?;
    let question_kind = state.case_keywords.classify(&question);
    info!("Session {id} question transcribed: kind={question_kind:?}");

    session.set_question(question.clone());
    Ok(Json(QuestionResponse {
        question,
        question_kind,
    }))
}

/// PUT /api/v1/sessions/:id/question
pub async fn handle_set_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetQuestionRequest>,
) -> Result<Json<QuestionResponse>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    require_inputs(&session.profile, &[(FIELD_QUESTION, request.text.as_str())])?;

    let question = request.text.trim().to_string();
    let question_kind = state.case_keywords.classify(&question);
    session.set_question(question.clone());
    Ok(Json(QuestionResponse {
        question,
        question_kind,
    }))
}
