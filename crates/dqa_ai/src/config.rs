use std::fmt;
use std::time::Duration;

use dqa_core::error::AppError;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const ENV_API_KEY: &str = "GOOGLE_AI_API_KEY";
pub const ENV_MODEL: &str = "GEMINI_MODEL";
pub const ENV_BASE_URL: &str = "GEMINI_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "GEMINI_TIMEOUT_SECS";

/// Retrieval and prompt windowing thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalConfig {
    /// Segments whose trimmed length is at or below this many characters are dropped.
    pub min_chunk_chars: usize,
    /// Max chunks kept from weighted scoring.
    pub top_k: usize,
    /// Max chunks kept from keyword matching.
    pub keyword_k: usize,
    /// Chunks returned when nothing matched at all.
    pub fallback_k: usize,
    /// Prior messages included in the prompt.
    pub history_window: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            min_chunk_chars: 10,
            top_k: 3,
            keyword_k: 3,
            fallback_k: 2,
            history_window: 5,
        }
    }
}

/// Connection settings for the Gemini generateContent API.
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    api_key: String,
    pub model: String,
    base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, AppError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(AppError::new(
                "UPSTREAM_MODEL_CONFIG_INVALID",
                "Model API key must not be empty",
            ));
        }
        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Read settings from the environment, honouring a `.env` file.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_key = lookup(ENV_API_KEY).ok_or_else(|| {
            AppError::new(
                "UPSTREAM_MODEL_CONFIG_INVALID",
                "Model API key is not configured",
            )
            .with_details(format!("env={ENV_API_KEY}"))
        })?;
        let mut cfg = Self::new(api_key)?;

        if let Some(model) = lookup(ENV_MODEL).filter(|m| !m.trim().is_empty()) {
            cfg = cfg.with_model(model.trim());
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            cfg = cfg.with_base_url(&url)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                AppError::new(
                    "UPSTREAM_MODEL_CONFIG_INVALID",
                    "Model timeout must be a whole number of seconds",
                )
                .with_details(format!("{ENV_TIMEOUT_SECS}={raw}"))
            })?;
            cfg = cfg.with_timeout(Duration::from_secs(secs.max(1)));
        }
        Ok(cfg)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, AppError> {
        self.base_url = validate_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Accept `https://` anywhere, plain `http://` only on 127.0.0.1 (local stubs).
fn validate_base_url(raw: &str) -> Result<String, AppError> {
    let url = raw.trim().trim_end_matches('/').to_string();
    let invalid = || {
        AppError::new(
            "UPSTREAM_MODEL_CONFIG_INVALID",
            "Model base URL must be https, or http on 127.0.0.1",
        )
        .with_details(format!("base_url={url}"))
    };

    let (scheme, rest) = url.split_once("://").ok_or_else(invalid)?;
    let authority = rest.split('/').next().unwrap_or_default();
    if authority.is_empty() || authority.contains('@') {
        return Err(invalid());
    }

    let allowed = match scheme {
        "https" => true,
        "http" => {
            let (host, port) = match authority.split_once(':') {
                Some((h, p)) => (h, Some(p)),
                None => (authority, None),
            };
            let port_ok = match port {
                Some(p) => matches!(p.parse::<u16>(), Ok(n) if n > 0),
                None => true,
            };
            host == "127.0.0.1" && port_ok
        }
        _ => false,
    };
    if !allowed {
        return Err(invalid());
    }
    Ok(url)
}
