use dqa_core::error::AppError;
use serde::{Deserialize, Serialize};

use super::Llm;
use crate::config::GeminiConfig;

/// Blocking client for `models/{model}:generateContent`.
#[derive(Debug, Clone)]
pub struct GeminiLlm {
    config: GeminiConfig,
}

impl GeminiLlm {
    pub fn new(config: GeminiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url(),
            self.config.model
        )
    }
}

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Clone, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Clone, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect::<String>())
            .unwrap_or_default()
    }
}

impl Llm for GeminiLlm {
    fn complete(&self, prompt: &str) -> Result<String, AppError> {
        let req = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };
        let body = serde_json::to_value(req).map_err(|e| {
            AppError::new("UPSTREAM_MODEL_FAILED", "Failed to encode model request")
                .with_details(e.to_string())
        })?;

        let resp = ureq::post(&self.endpoint())
            .timeout(self.config.timeout)
            .set("x-goog-api-key", self.config.api_key())
            .send_json(body);

        match resp {
            Ok(r) => {
                let v: GenerateResponse = r.into_json().map_err(|e| {
                    AppError::new("UPSTREAM_MODEL_FAILED", "Failed to decode model response")
                        .with_details(e.to_string())
                })?;
                let text = v.text();
                if text.trim().is_empty() {
                    return Err(AppError::new(
                        "UPSTREAM_MODEL_FAILED",
                        "Model response was empty",
                    ));
                }
                Ok(text)
            }
            Err(ureq::Error::Status(status, r)) => {
                let body = r.into_string().unwrap_or_default();
                Err(AppError::new("UPSTREAM_MODEL_FAILED", "Model request failed")
                    .with_details(format!("status={status}; body={}", snippet(&body, 300))))
            }
            Err(e) => Err(
                AppError::new("UPSTREAM_MODEL_FAILED", "Failed to call model endpoint")
                    .with_details(e.to_string())
                    .with_retryable(true),
            ),
        }
    }
}

fn snippet(text: &str, max_chars: usize) -> String {
    let t = text.trim();
    match t.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &t[..cut]),
        None => t.to_string(),
    }
}
