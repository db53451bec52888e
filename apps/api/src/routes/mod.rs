pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::coaching::handlers as coaching;
use crate::session::handlers as session;
use crate::state::AppState;

/// Résumé and audio uploads. Matches the transcription provider's file cap.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(session::handle_start_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_end_session),
        )
        .route(
            "/api/v1/sessions/:id/reset",
            post(session::handle_reset_session),
        )
        .route(
            "/api/v1/sessions/:id/profile",
            post(session::handle_load_profile),
        )
        // Questions
        .route(
            "/api/v1/sessions/:id/question",
            put(session::handle_set_question),
        )
        .route(
            "/api/v1/sessions/:id/question/audio",
            post(session::handle_transcribe_question),
        )
        // Answers
        .route(
            "/api/v1/sessions/:id/answer",
            post(coaching::handle_generate_answer),
        )
        .route(
            "/api/v1/sessions/:id/answer/refine",
            post(coaching::handle_refine_answer),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
