//! Shared application state.

use std::sync::Arc;

use verdant_ai::{ModelClient, SessionRegistry};

/// State owned by the serve loop and handed to every handler.
///
/// The system instruction and the model client are built once at startup
/// and read-only afterwards; the registry holds one chat session per
/// browser scope.
pub struct AppState {
    pub instruction: Arc<str>,
    pub client: Arc<dyn ModelClient>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(
        instruction: Arc<str>,
        client: Arc<dyn ModelClient>,
        sessions: Arc<SessionRegistry>,
    ) -> Self {
        Self {
            instruction,
            client,
            sessions,
        }
    }
}
