//! Knowledge file loading.
//!
//! The knowledge file is operator-supplied reference text (stock lists,
//! prices) read once at startup and embedded into the system instruction.
//! Absence is a normal state, not an error.

use std::path::Path;

use tracing::{info, warn};

/// Returned when the knowledge file is absent or unreadable.
pub const NO_KNOWLEDGE_PLACEHOLDER: &str = "No knowledge base found.";

/// Read the knowledge file as UTF-8 text.
///
/// Never fails: a missing or unreadable file (including non-UTF-8
/// content) degrades to [`NO_KNOWLEDGE_PLACEHOLDER`]. One filesystem
/// read at most, at startup; the result is immutable for the process
/// lifetime.
pub fn load(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            info!(path = %path.display(), bytes = text.len(), "knowledge base loaded");
            text
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "no knowledge base, using placeholder");
            NO_KNOWLEDGE_PLACEHOLDER.to_string()
        }
    }
}
