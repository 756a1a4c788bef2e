//! Scope-keyed session registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::manager::ChatSession;

/// Explicit mapping from browser scope id to its chat session.
///
/// Creation is idempotent per scope: the first call wins and later calls
/// return the same instance, so a session's system instruction can never
/// change after creation. Sessions are dropped only through [`remove`],
/// the explicit teardown for a scope.
///
/// [`remove`]: SessionRegistry::remove
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<tokio::sync::Mutex<ChatSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session for a scope, creating it on first touch.
    pub fn get_or_create(
        &self,
        scope_id: &str,
        system_instruction: &Arc<str>,
    ) -> Arc<tokio::sync::Mutex<ChatSession>> {
        let mut sessions = self.sessions.lock().expect("session registry poisoned");
        sessions
            .entry(scope_id.to_string())
            .or_insert_with(|| {
                debug!(scope_id, "chat session created");
                Arc::new(tokio::sync::Mutex::new(ChatSession::new(Arc::clone(
                    system_instruction,
                ))))
            })
            .clone()
    }

    /// Look up an existing session without creating one.
    pub fn get(&self, scope_id: &str) -> Option<Arc<tokio::sync::Mutex<ChatSession>>> {
        let sessions = self.sessions.lock().expect("session registry poisoned");
        sessions.get(scope_id).cloned()
    }

    /// Drop the session for a scope. Returns whether one existed.
    pub fn remove(&self, scope_id: &str) -> bool {
        let mut sessions = self.sessions.lock().expect("session registry poisoned");
        sessions.remove(scope_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().expect("session registry poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
