use serde::{Deserialize, Serialize};
use std::fmt;

/// Single structured error shape used across the pipeline and exposed to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Classify by code prefix. Unknown prefixes are treated as upstream failures.
    pub fn class(&self) -> ErrorClass {
        if self.code.starts_with("INPUT_") || self.code.starts_with("CONVERSATION_") {
            ErrorClass::Input
        } else if self.code.starts_with("RETRIEVAL_") {
            ErrorClass::RetrievalExhausted
        } else {
            ErrorClass::Upstream
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

/// Terminal failure categories for a single question/answer turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Question or document content missing; the pipeline never ran.
    Input,
    /// No chunk survived chunking.
    RetrievalExhausted,
    /// Text extraction or model invocation failed.
    Upstream,
}

impl ErrorClass {
    /// HTTP-equivalent status for transport layers.
    pub fn status(self) -> u16 {
        match self {
            ErrorClass::Input => 400,
            ErrorClass::RetrievalExhausted => 422,
            ErrorClass::Upstream => 500,
        }
    }

    pub fn is_client_error(self) -> bool {
        self.status() < 500
    }
}
