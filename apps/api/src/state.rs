use std::sync::Arc;

use crate::config::Config;
use crate::extraction::{StructuredExtractor, TextExtractor};
use crate::lifecycle::SessionStore;
use crate::render::RenderOptions;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    /// Pluggable document-to-text backend. Default: DocumentTextExtractor.
    pub text_extractor: Arc<dyn TextExtractor>,
    /// Pluggable structuring backend. Default: LlmExtractor.
    pub extractor: Arc<dyn StructuredExtractor>,
    pub render_options: RenderOptions,
    pub config: Config,
}
