//! Response Normalizer: turns raw model output into an `AnalysisResult`.
//!
//! Two explicit steps: `strip_fences` removes incidental markdown wrapping,
//! then `parse_analysis` deserializes against the strict schema.

use thiserror::Error;

use crate::analysis::models::AnalysisResult;

const FENCE: &str = "```";
const JSON_TAG: &str = "json";

/// Model output was not valid JSON or did not match the analysis schema.
/// Carries the underlying parser message.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SchemaParseError(String);

impl SchemaParseError {
    pub fn new(source: serde_json::Error) -> Self {
        Self(source.to_string())
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
///
/// Order matters: trim, drop the leading fence (with optional `json` tag),
/// drop the trailing fence, trim again. Either fence may be absent.
pub fn strip_fences(raw: &str) -> &str {
    let text = raw.trim();

    let text = match text.strip_prefix(FENCE) {
        Some(rest) => strip_json_tag(rest),
        None => text,
    };

    let text = text.strip_suffix(FENCE).unwrap_or(text);

    text.trim()
}

/// Drops a case-insensitive `json` info string right after an opening fence.
fn strip_json_tag(rest: &str) -> &str {
    match rest.get(..JSON_TAG.len()) {
        Some(tag) if tag.eq_ignore_ascii_case(JSON_TAG) => &rest[JSON_TAG.len()..],
        _ => rest,
    }
}

/// Parses already-cleaned text against the analysis schema.
pub fn parse_analysis(cleaned: &str) -> Result<AnalysisResult, SchemaParseError> {
    serde_json::from_str(cleaned).map_err(SchemaParseError::new)
}

/// Full normalization: strip, then parse.
pub fn normalize(raw: &str) -> Result<AnalysisResult, SchemaParseError> {
    parse_analysis(strip_fences(raw))
}
