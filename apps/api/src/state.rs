use std::sync::Arc;

use crate::config::Config;
use crate::resumes::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable document store. Postgres by default, in-memory via RESUME_STORE=memory.
    pub store: Arc<dyn ResumeStore>,
    pub config: Config,
}
