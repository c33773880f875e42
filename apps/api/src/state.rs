use std::sync::Arc;

use crate::access::AccessGate;
use crate::config::Config;
use crate::extract::DocumentExtractor;
use crate::matching::jd_analyzer::JdAnalyzer;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// JD analyzer with the keyword catalog loaded at startup.
    pub analyzer: Arc<JdAnalyzer>,
    pub extractor: Arc<DocumentExtractor>,
    pub sessions: SessionStore,
    /// Pluggable history-view gate. Default: SharedSecretGate.
    pub access_gate: Arc<dyn AccessGate>,
}
