use std::sync::Arc;

use crate::config::Config;
use crate::layout::{LayoutEngine, TemplateCache};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Published templates, loaded once per id and shared read-only.
    pub templates: Arc<TemplateCache>,
    pub engine: LayoutEngine,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let engine = LayoutEngine::new(config.validate_layouts);
        AppState {
            config,
            templates: Arc::new(TemplateCache::new()),
            engine,
        }
    }
}
