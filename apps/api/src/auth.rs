//! Caller identity. Authentication itself happens upstream: the gateway
//! verifies the session and forwards the user id in `x-user-id`.

use std::sync::Arc;

use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use uuid::Uuid;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated caller, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Rejects requests without a valid forwarded identity.
pub async fn require_user(mut request: Request, next: Next) -> Result<Response, AppError> {
    let user_id = user_id_from_headers(request.headers()).ok_or_else(|| {
        tracing::warn!("identity header missing or invalid, authentication denied");
        AppError::Unauthorized
    })?;

    request
        .extensions_mut()
        .insert(Arc::new(AuthUser { user_id }));
    Ok(next.run(request).await)
}

fn user_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(USER_ID_HEADER)?
        .to_str()
        .ok()
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
}
