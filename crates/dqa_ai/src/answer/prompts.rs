use dqa_core::domain::HistoryEntry;
use dqa_core::error::AppError;

use crate::config::RetrievalConfig;

pub const SECTION_SEPARATOR: &str = "----------------";
pub const ANSWER_CUE: &str = "ANSWER:";

/// Fixed instructions. Must stay free of anything time- or request-dependent so that prompts are
/// reproducible.
pub const PERSONA: &str = r#"You are a document research assistant. You answer questions about documents the user has uploaded, and you operate in exactly one of two modes per question.

Mode 1: Conversational
Use this mode for greetings, thanks, small talk, or questions about yourself ("hi", "who are you?", "what can you do?").
- Reply briefly and politely.
- Do not cite or summarise the CONTEXT.

Mode 2: Research
Use this mode for every informational question.
- Your answer MUST be derived solely from the CONTEXT below. Do not use outside knowledge.
- If the CONTEXT does not contain the answer, reply with exactly this sentence and nothing else:
  "The provided documents do not contain information on this topic."
- Be concise. Quote or paraphrase the relevant passage rather than speculating.

Examples

CONTEXT: The warranty covers manufacturing defects for 24 months from the date of purchase.
QUESTION: Hello there!
ANSWER: Hello! Ask me anything about your uploaded documents.

CONTEXT: The warranty covers manufacturing defects for 24 months from the date of purchase.
QUESTION: How long is the warranty?
ANSWER: The warranty covers manufacturing defects for 24 months from the date of purchase.

CONTEXT: The warranty covers manufacturing defects for 24 months from the date of purchase.
QUESTION: What is the return shipping address?
ANSWER: The provided documents do not contain information on this topic."#;

pub fn build_prompt(
    question: &str,
    context: &str,
    history: &[HistoryEntry],
) -> Result<String, AppError> {
    build_prompt_windowed(
        question,
        context,
        history,
        RetrievalConfig::default().history_window,
    )
}

/// Persona, separator, context, optional history, separator, question, then the answer cue.
///
/// `history` holds the messages before the current question; only the last `window` are used.
pub fn build_prompt_windowed(
    question: &str,
    context: &str,
    history: &[HistoryEntry],
    window: usize,
) -> Result<String, AppError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AppError::new(
            "INPUT_QUESTION_MISSING",
            "Question is required",
        ));
    }

    let start = history.len().saturating_sub(window);
    let recent = &history[start..];

    let mut out = String::with_capacity(PERSONA.len() + context.len() + question.len() + 256);
    out.push_str(PERSONA);
    out.push_str("\n\n");
    out.push_str(SECTION_SEPARATOR);
    out.push_str("\n\nCONTEXT:\n");
    out.push_str(context);
    out.push_str("\n\n");

    if !recent.is_empty() {
        out.push_str("CONVERSATION HISTORY:\n");
        for entry in recent {
            out.push_str(entry.role.label());
            out.push_str(": ");
            out.push_str(&entry.content);
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str(SECTION_SEPARATOR);
    out.push_str("\n\nQUESTION: ");
    out.push_str(question);
    out.push_str("\n\n");
    out.push_str(ANSWER_CUE);
    Ok(out)
}
