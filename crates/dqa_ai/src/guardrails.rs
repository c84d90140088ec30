use dqa_core::error::AppError;

/// Sentence the model must emit when the context cannot answer an informational question.
pub const REFUSAL_SENTENCE: &str = "The provided documents do not contain information on this topic.";

/// True when the answer is the fixed refusal, ignoring case and surrounding whitespace.
pub fn is_refusal(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case(REFUSAL_SENTENCE)
}

/// Reject a blank model completion.
pub fn enforce_answer(answer: &str) -> Result<(), AppError> {
    if answer.trim().is_empty() {
        return Err(AppError::new(
            "UPSTREAM_MODEL_FAILED",
            "Model returned an empty answer",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusal_detection_tolerates_case_and_whitespace() {
        assert!(is_refusal(REFUSAL_SENTENCE));
        assert!(is_refusal("  the provided documents do not contain information on this topic.\n"));
        assert!(!is_refusal("The sky is blue due to Rayleigh scattering."));
    }

    #[test]
    fn blank_answers_are_rejected() {
        assert!(enforce_answer(" \n").is_err());
        assert!(enforce_answer("Hi!").is_ok());
    }
}
