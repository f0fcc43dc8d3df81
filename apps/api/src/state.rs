use std::sync::Arc;

use crate::llm_client::ModelGateway;
use crate::screening::prompts::PromptStore;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. The gateway sits behind a trait object so tests (and any
/// future provider swap) never touch the concrete Gemini client.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn ModelGateway>,
    pub prompts: PromptStore,
    pub store: SessionStore,
}
