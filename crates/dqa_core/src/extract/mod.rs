use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const EMPTY_PDF_PLACEHOLDER: &str = "[No text content could be extracted from this PDF]";
pub const EMPTY_TEXT_PLACEHOLDER: &str = "[No text content could be extracted from this file]";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Pdf,
    Plain,
}

impl FileKind {
    pub fn from_mime(mime: &str) -> Result<Self, AppError> {
        // Ignore parameters such as `; charset=utf-8`.
        let essence = mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" => Ok(FileKind::Pdf),
            "text/plain" => Ok(FileKind::Plain),
            _ => Err(unsupported(format!("mime={mime}"))),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Ok(FileKind::Pdf),
            "txt" => Ok(FileKind::Plain),
            _ => Err(unsupported(format!("path={}", path.display()))),
        }
    }
}

fn unsupported(details: String) -> AppError {
    AppError::new(
        "INPUT_FILE_TYPE_UNSUPPORTED",
        "Invalid file type. Please upload a PDF or TXT file.",
    )
    .with_details(details)
}

/// Seam for turning uploaded bytes into document text.
pub trait TextExtractor {
    fn extract(&self, bytes: &[u8], kind: FileKind) -> Result<String, AppError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExtractor;

impl TextExtractor for DefaultExtractor {
    fn extract(&self, bytes: &[u8], kind: FileKind) -> Result<String, AppError> {
        extract_text(bytes, kind)
    }
}

/// Decode an uploaded file. Succeeding with no text yields a visible placeholder instead of
/// an empty string.
pub fn extract_text(bytes: &[u8], kind: FileKind) -> Result<String, AppError> {
    let text = match kind {
        FileKind::Plain => String::from_utf8_lossy(bytes).into_owned(),
        FileKind::Pdf => pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            tracing::error!(error = %e, bytes = bytes.len(), "pdf extraction failed");
            AppError::new("UPSTREAM_EXTRACT_FAILED", "Failed to process the PDF file.")
                .with_details(e.to_string())
        })?,
    };

    if text.trim().is_empty() {
        tracing::warn!(?kind, "file parsed but no text content was extracted");
        return Ok(match kind {
            FileKind::Pdf => EMPTY_PDF_PLACEHOLDER.to_string(),
            FileKind::Plain => EMPTY_TEXT_PLACEHOLDER.to_string(),
        });
    }
    Ok(text)
}
