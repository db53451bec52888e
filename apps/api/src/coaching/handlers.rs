//! Axum route handlers for answer generation and refinement.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::coaching::synthesizer::{answer_question, refine_answer, CoachedAnswer};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    pub edited_text: String,
}

/// POST /api/v1/sessions/:id/answer
///
/// Synthesizes and shapes the answer to the session's current question.
/// Responds 422 `MISSING_INPUT` instead of calling the model when the profile
/// or the question is incomplete.
pub async fn handle_generate_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CoachedAnswer>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;

    let answer = answer_question(
        &state.llm,
        &state.market,
        &state.case_keywords,
        &session.profile,
        session.question_text(),
    )
    .await?;

    session.answer = Some(answer.clone());
    Ok(Json(answer))
}

/// POST /api/v1/sessions/:id/answer/refine
///
/// Polishes the candidate's hand-edited version of the answer.
pub async fn handle_refine_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RefineRequest>,
) -> Result<Json<CoachedAnswer>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;

    let answer = refine_answer(
        &state.llm,
        &state.case_keywords,
        &session.profile,
        session.question_text(),
        &request.edited_text,
    )
    .await?;

    session.answer = Some(answer.clone());
    Ok(Json(answer))
}
