use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::UserProfile;
use crate::state::AppState;

/// GET /profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<AuthUser>>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state
        .users
        .find_profile(user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(profile))
}
