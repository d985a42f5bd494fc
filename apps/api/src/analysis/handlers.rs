//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::intake::receive_upload;
use crate::analysis::models::AnalysisResult;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub data: AnalysisResult,
}

/// POST /generate
///
/// Multipart upload with a `resume` PDF field. Returns the candidate profile
/// and interview questions generated from the resume text. A request that is
/// not a multipart form carries no file at all.
pub async fn handle_generate(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let multipart = multipart.map_err(|rejection| {
        debug!(reason = %rejection.body_text(), "Rejected non-multipart upload");
        AppError::MissingFile
    })?;
    let staged = receive_upload(multipart, state.analysis.staging()).await?;
    info!(
        file = staged.original_name(),
        content_type = staged.content_type(),
        size = staged.size(),
        "Processing resume upload"
    );

    let data = state.analysis.analyze(staged).await?;

    Ok(Json(GenerateResponse {
        success: true,
        data,
    }))
}
