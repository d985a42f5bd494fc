//! Text extraction from a staged PDF.
//!
//! `pdf-extract` runs on the blocking pool. When it fails, panics, or finds
//! no text, the raw bytes are decoded as lossy UTF-8 instead, so the model
//! still receives whatever text the file carries.

use std::path::Path;

use anyhow::Context;
use tracing::{debug, warn};

use crate::errors::AppError;

/// Plain text decoded from one upload. Lives only for the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Reads the staged file and extracts its text.
pub async fn extract_text(path: &Path) -> Result<ExtractedText, AppError> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read staged file {}", path.display()))?;

    let parsed = tokio::task::spawn_blocking({
        let bytes = bytes.clone();
        move || pdf_extract::extract_text_from_mem(&bytes)
    })
    .await;

    let text = match parsed {
        Ok(Ok(text)) if !text.trim().is_empty() => {
            debug!(chars = text.len(), "Extracted PDF text");
            text
        }
        Ok(Ok(_)) => {
            warn!("PDF contained no extractable text, falling back to raw decode");
            decode_lossy(&bytes)
        }
        Ok(Err(e)) => {
            warn!(error = %e, "PDF text extraction failed, falling back to raw decode");
            decode_lossy(&bytes)
        }
        Err(e) => {
            warn!(error = %e, "PDF text extraction panicked, falling back to raw decode");
            decode_lossy(&bytes)
        }
    };

    Ok(ExtractedText::new(text))
}

/// Decodes bytes as UTF-8, replacing invalid sequences and dropping NULs.
fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|c| *c != '\0')
        .collect::<String>()
        .trim()
        .to_string()
}
