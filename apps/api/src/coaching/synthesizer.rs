//! Answer Synthesizer: the coaching pipeline for one turn.
//!
//! Flow: input guard → market context → prompt → LLM → shape.
//! Refinement skips market context and polishes a user-edited draft instead.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::coaching::classifier::{CaseKeywords, QuestionKind};
use crate::coaching::prompts::{build_refinement_prompt, build_synthesis_prompt};
use crate::coaching::shaper::{line_count, shape};
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::market::MarketContextClient;
use crate::models::profile::CandidateProfile;

pub const FIELD_QUESTION: &str = "question";
pub const FIELD_EDITED_TEXT: &str = "edited_text";

/// Everything one synthesis call sees. Built fresh per question, never cached.
#[derive(Debug, Clone, Copy)]
pub struct ContextBundle<'a> {
    pub profile: &'a CandidateProfile,
    pub market_context: &'a str,
    pub question: &'a str,
}

/// A shaped answer as shown to the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoachedAnswer {
    pub question: String,
    pub question_kind: QuestionKind,
    pub text: String,
    pub line_count: usize,
    /// True when produced from a user-edited draft.
    pub refined: bool,
    pub generated_at: DateTime<Utc>,
}

impl CoachedAnswer {
    fn from_raw(question: &str, kind: QuestionKind, raw: &str, refined: bool) -> Self {
        let text = shape(raw, kind);
        Self {
            question: question.to_string(),
            question_kind: kind,
            line_count: line_count(&text),
            text,
            refined,
            generated_at: Utc::now(),
        }
    }
}

/// Refuses to proceed unless the profile and every extra input are non-blank.
pub fn require_inputs(
    profile: &CandidateProfile,
    extra: &[(&'static str, &str)],
) -> Result<(), AppError> {
    let mut missing = profile.missing_fields();
    missing.extend(
        extra
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name),
    );
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::MissingInput(missing))
    }
}

/// Produces the raw (unshaped) candidate answer to `question`.
pub async fn synthesize(
    llm: &LlmClient,
    market: &MarketContextClient,
    profile: &CandidateProfile,
    question: &str,
) -> Result<String, AppError> {
    require_inputs(profile, &[(FIELD_QUESTION, question)])?;

    let market_context = market.fetch_context(&profile.company).await;
    let bundle = ContextBundle {
        profile,
        market_context: &market_context,
        question: question.trim(),
    };
    let prompt = build_synthesis_prompt(&bundle);

    Ok(llm.complete(&prompt.developer, &prompt.user).await?)
}

/// Produces a polished version of the candidate's own edited draft.
pub async fn refine(
    llm: &LlmClient,
    profile: &CandidateProfile,
    question: &str,
    edited_text: &str,
) -> Result<String, AppError> {
    require_inputs(
        profile,
        &[(FIELD_QUESTION, question), (FIELD_EDITED_TEXT, edited_text)],
    )?;

    let prompt = build_refinement_prompt(profile, question.trim(), edited_text.trim());
    Ok(llm.complete(&prompt.developer, &prompt.user).await?)
}

/// Synthesizes and shapes the answer for one question.
pub async fn answer_question(
    llm: &LlmClient,
    market: &MarketContextClient,
    keywords: &CaseKeywords,
    profile: &CandidateProfile,
    question: &str,
) -> Result<CoachedAnswer, AppError> {
    let raw = synthesize(llm, market, profile, question).await?;
    let kind = keywords.classify(question);
    let answer = CoachedAnswer::from_raw(question.trim(), kind, &raw, false);
    info!(
        "Answer generated: kind={:?}, raw_lines={}, shaped_lines={}",
        kind,
        raw.lines().count(),
        answer.line_count
    );
    Ok(answer)
}

/// Refines a user-edited draft and shapes it with the question's line budget.
pub async fn refine_answer(
    llm: &LlmClient,
    keywords: &CaseKeywords,
    profile: &CandidateProfile,
    question: &str,
    edited_text: &str,
) -> Result<CoachedAnswer, AppError> {
    let raw = refine(llm, profile, question, edited_text).await?;
    let kind = keywords.classify(question);
    let answer = CoachedAnswer::from_raw(question.trim(), kind, &raw, true);
    info!(
        "Answer refined: kind={:?}, shaped_lines={}",
        kind, answer.line_count
    );
    Ok(answer)
}
