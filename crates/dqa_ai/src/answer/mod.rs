use dqa_core::domain::{HistoryEntry, Session, Turn, TurnAnswer};
use dqa_core::error::AppError;
use serde::{Deserialize, Serialize};

use crate::chunking::chunk_text_with_min;
use crate::config::RetrievalConfig;
use crate::context::assemble_context;
use crate::guardrails::{enforce_answer, is_refusal};
use crate::llm::Llm;
use crate::retrieve::{rank_with, RankStrategy};

pub mod prompts;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub question: String,
    pub document_content: String,
    /// Messages before the current question, oldest first.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub response: String,
    /// Exact grounding text given to the model.
    pub context: String,
    pub strategy: RankStrategy,
    /// The model answered with the fixed refusal sentence.
    pub refused: bool,
}

/// Retrieve context for the question and ask the model once.
///
/// Input is validated before any chunking or model call. A model failure is logged and
/// surfaced as a single generic `UPSTREAM_MODEL_FAILED`.
pub fn answer_question(
    llm: &dyn Llm,
    config: &RetrievalConfig,
    req: &AnswerRequest,
) -> Result<AnswerResponse, AppError> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(AppError::new(
            "INPUT_QUESTION_MISSING",
            "Question is required",
        ));
    }
    if req.document_content.trim().is_empty() {
        return Err(AppError::new(
            "INPUT_DOCUMENT_MISSING",
            "Document content is required",
        ));
    }

    let chunks = chunk_text_with_min(&req.document_content, config.min_chunk_chars);
    if chunks.is_empty() {
        tracing::warn!(
            content_chars = req.document_content.chars().count(),
            "document content produced no chunks"
        );
        return Err(AppError::new(
            "RETRIEVAL_NO_CHUNKS",
            "No usable text could be derived from the documents",
        )
        .with_details(format!("min_chunk_chars={}", config.min_chunk_chars)));
    }

    let ranking = rank_with(question, &chunks, config)?;
    let context = assemble_context(&ranking.chunks);
    let prompt = prompts::build_prompt_windowed(question, &context, &req.history, config.history_window)?;
    tracing::info!(
        strategy = ?ranking.strategy,
        chunks = chunks.len(),
        selected = ranking.chunks.len(),
        history = req.history.len().min(config.history_window),
        prompt_chars = prompt.len(),
        "invoking model"
    );

    let response = llm
        .complete(&prompt)
        .and_then(|r| enforce_answer(&r).map(|_| r))
        .map_err(|e| {
            tracing::error!(code = %e.code, error = %e, details = ?e.details, "model invocation failed");
            AppError::new("UPSTREAM_MODEL_FAILED", "Failed to get response from AI")
                .with_details(e.to_string())
                .with_retryable(e.retryable)
        })?;

    let refused = is_refusal(&response);
    Ok(AnswerResponse {
        response,
        context,
        strategy: ranking.strategy,
        refused,
    })
}

/// Run one conversation turn against the session's current documents.
///
/// The question is recorded first; the resulting turn is `Answered` (with the context attached
/// to that same message) or `Failed` (with one assistant error message appended).
pub fn run_turn(
    session: &mut Session,
    llm: &dyn Llm,
    config: &RetrievalConfig,
    question: &str,
) -> Result<Turn, AppError> {
    let turn = session.conversation_mut().begin_turn(question);
    let history = session
        .conversation()
        .history_before(turn.message_id(), config.history_window)?;
    let req = AnswerRequest {
        question: question.to_string(),
        document_content: session.documents().combined_content(),
        history,
    };

    let outcome = answer_question(llm, config, &req).map(|r| TurnAnswer {
        context: r.context,
        answer: r.response,
    });
    if let Err(e) = &outcome {
        tracing::warn!(code = %e.code, class = ?e.class(), "turn failed");
    }
    session.conversation_mut().resolve(turn, outcome)
}
