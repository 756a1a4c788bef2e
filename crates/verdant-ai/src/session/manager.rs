//! Session struct and history access.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::Turn;

/// A conversation session bound to one immutable system instruction.
///
/// History is append-only and owned exclusively by the session; it is
/// never reordered or truncated. The session moves from created to
/// dropped with no intermediate teardown state.
pub struct ChatSession {
    /// Ordered turn history.
    pub(super) turns: Vec<Turn>,
    /// System instruction, fixed at creation and shared across sessions.
    pub(super) system_instruction: Arc<str>,
    /// Whether a relay call is currently in flight.
    pub(super) busy: AtomicBool,
}

impl ChatSession {
    pub fn new(system_instruction: Arc<str>) -> Self {
        Self {
            turns: Vec::new(),
            system_instruction,
            busy: AtomicBool::new(false),
        }
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Read-only snapshot of the turn history.
    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns in history.
    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }
}
