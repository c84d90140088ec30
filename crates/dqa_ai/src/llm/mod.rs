use dqa_core::error::AppError;

/// Language model boundary: one prompt in, one completion out. Called once per turn.
pub trait Llm {
    fn complete(&self, prompt: &str) -> Result<String, AppError>;
}

pub mod gemini;
