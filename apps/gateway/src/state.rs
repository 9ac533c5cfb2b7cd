use std::sync::Arc;

use crate::config::PromptVariant;
use crate::llm_client::GenerativeProvider;

/// Per-deployment prompt behaviour, fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct GatewaySettings {
    pub variant: PromptVariant,
    pub shuffle_options: bool,
}

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Generative backend. `LlmClient` in production, scripted in tests.
    pub provider: Arc<dyn GenerativeProvider>,
    pub settings: GatewaySettings,
}
