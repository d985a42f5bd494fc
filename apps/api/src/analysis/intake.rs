//! Intake Validator: accepts the uploaded resume and stages it.
//!
//! Checks run cheapest first: declared type before any body byte is read,
//! the size ceiling while chunks stream in, the PDF signature once the bytes
//! are complete. Nothing touches disk until all three pass.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::BytesMut;

use crate::analysis::staging::{StagedFile, StagingArea};
use crate::errors::AppError;

/// Multipart field carrying the document.
pub const UPLOAD_FIELD: &str = "resume";
/// The single accepted document format.
pub const ACCEPTED_CONTENT_TYPE: &str = "application/pdf";
/// Upload ceiling: 5 MiB.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
/// Request body limit: the upload ceiling plus room for multipart framing.
pub const REQUEST_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

const PDF_SIGNATURE: &[u8] = b"%PDF-";
const DEFAULT_UPLOAD_NAME: &str = "resume.pdf";

/// Pulls the `resume` field out of the form, validates it and stages it.
/// Other fields are drained and ignored.
pub async fn receive_upload(
    mut multipart: Multipart,
    staging: &StagingArea,
) -> Result<StagedFile, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        return accept_field(field, staging).await;
    }
    Err(AppError::MissingFile)
}

async fn accept_field(mut field: Field<'_>, staging: &StagingArea) -> Result<StagedFile, AppError> {
    let declared = field.content_type().unwrap_or_default().to_string();
    check_declared_type(&declared)?;

    let original_name = field
        .file_name()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(DEFAULT_UPLOAD_NAME)
        .to_string();

    let mut buf = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        check_size(buf.len() + chunk.len())?;
        buf.extend_from_slice(&chunk);
    }

    if buf.is_empty() {
        return Err(AppError::MissingFile);
    }
    check_signature(&buf)?;

    Ok(staging.stage(&original_name, &declared, &buf).await?)
}

/// Compares the media type essence, ignoring parameters and case.
pub fn check_declared_type(content_type: &str) -> Result<(), AppError> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case(ACCEPTED_CONTENT_TYPE) {
        Ok(())
    } else if essence.is_empty() {
        Err(AppError::UnsupportedType("no content type".to_string()))
    } else {
        Err(AppError::UnsupportedType(essence.to_string()))
    }
}

pub fn check_size(len: usize) -> Result<(), AppError> {
    if len > MAX_UPLOAD_BYTES {
        Err(AppError::SizeLimitExceeded {
            limit_mib: MAX_UPLOAD_BYTES / (1024 * 1024),
        })
    } else {
        Ok(())
    }
}

/// The bytes must actually start like a PDF, whatever the client declared.
pub fn check_signature(bytes: &[u8]) -> Result<(), AppError> {
    if bytes.starts_with(PDF_SIGNATURE) {
        Ok(())
    } else {
        Err(AppError::UnsupportedType(
            "content is not a PDF document".to_string(),
        ))
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::SizeLimitExceeded {
            limit_mib: MAX_UPLOAD_BYTES / (1024 * 1024),
        }
    } else {
        AppError::BadRequest(e.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_type_accepts_pdf_variants() {
        assert!(check_declared_type("application/pdf").is_ok());
        assert!(check_declared_type("Application/PDF").is_ok());
        assert!(check_declared_type("application/pdf; charset=binary").is_ok());
    }

    #[test]
    fn test_declared_type_rejects_others() {
        for ct in ["image/png", "text/plain", "application/pdfx", ""] {
            assert!(
                matches!(check_declared_type(ct), Err(AppError::UnsupportedType(_))),
                "{ct} should be rejected"
            );
        }
    }

    #[test]
    fn test_size_ceiling_is_inclusive() {
        assert!(check_size(MAX_UPLOAD_BYTES).is_ok());
        assert!(matches!(
            check_size(MAX_UPLOAD_BYTES + 1),
            Err(AppError::SizeLimitExceeded { limit_mib: 5 })
        ));
    }

    #[test]
    fn test_signature_check() {
        assert!(check_signature(b"%PDF-1.7\n...").is_ok());
        assert!(matches!(
            check_signature(b"PK\x03\x04 docx"),
            Err(AppError::UnsupportedType(_))
        ));
    }
}
