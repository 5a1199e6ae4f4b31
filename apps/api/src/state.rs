use std::sync::Arc;

use crate::pipeline::ResumeProcessor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Extraction, skill reconciliation and collaborator calls. Holds no per-request state.
    pub processor: Arc<ResumeProcessor>,
}
