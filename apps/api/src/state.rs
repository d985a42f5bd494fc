use std::sync::Arc;

use crate::analysis::pipeline::AnalysisService;
use crate::profile::store::UserStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Upload staging + model invocation for `/generate`.
    pub analysis: AnalysisService,
    pub users: Arc<dyn UserStore>,
}
