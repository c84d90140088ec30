pub mod domain;
pub mod error;
pub mod extract;

#[cfg(test)]
mod tests {
    use super::error::{AppError, ErrorClass};

    #[test]
    fn app_error_is_structured() {
        let err = AppError::new("INPUT_QUESTION_MISSING", "question missing").with_retryable(false);
        assert_eq!(err.code, "INPUT_QUESTION_MISSING");
        assert_eq!(err.message, "question missing");
        assert_eq!(err.retryable, false);
        assert_eq!(err.to_string(), "[INPUT_QUESTION_MISSING] question missing");
    }

    #[test]
    fn error_codes_classify_to_statuses() {
        let input = AppError::new("INPUT_DOCUMENT_MISSING", "x");
        let exhausted = AppError::new("RETRIEVAL_NO_CHUNKS", "x");
        let upstream = AppError::new("UPSTREAM_MODEL_FAILED", "x");

        assert_eq!(input.class(), ErrorClass::Input);
        assert_eq!(exhausted.class(), ErrorClass::RetrievalExhausted);
        assert_eq!(upstream.class(), ErrorClass::Upstream);

        assert_eq!(input.class().status(), 400);
        assert!(exhausted.class().is_client_error());
        assert!(!upstream.class().is_client_error());
    }
}
