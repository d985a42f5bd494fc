pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::analysis::intake::REQUEST_BODY_LIMIT;
use crate::auth::require_user;
use crate::profile::handlers::handle_get_profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let authenticated = Router::new()
        .route("/profile", get(handle_get_profile))
        .route_layer(middleware::from_fn(require_user));

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/generate",
            post(handlers::handle_generate).layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT)),
        )
        .merge(authenticated)
        .with_state(state)
}
