use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Model gateway. Default: `LlmClient`; tests swap in a scripted stub.
    pub llm: Arc<dyn TextGenerator>,
    /// Live training sessions. In memory only.
    pub sessions: SessionStore,
    pub config: Config,
}
