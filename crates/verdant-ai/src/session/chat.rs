//! Turn relay: optimistic append plus the blocking reply call.

use tracing::debug;

use crate::{AiError, ImageAttachment, ModelClient, Turn};

use super::manager::ChatSession;
use super::types::BusyGuard;

impl ChatSession {
    /// Append a user turn to history immediately, before any network I/O.
    ///
    /// Text and image are merged into one logical turn; the UI can render
    /// the turn from history without waiting on the reply.
    pub fn append_user_turn(&mut self, text: String, image: Option<ImageAttachment>) -> &Turn {
        debug!(
            len = text.len(),
            with_image = image.is_some(),
            "user turn appended"
        );
        self.turns.push(Turn::user(text, image));
        self.turns.last().expect("turn was just pushed")
    }

    /// Relay the accumulated history to the model and append its reply.
    ///
    /// Blocks the caller until the collaborator responds or fails. On
    /// success the assistant turn is appended and its text returned. On
    /// failure nothing is appended: history keeps the dangling user turn
    /// and the session stays usable for the next call. A retry is a fresh
    /// call, never an automatic resend.
    pub async fn request_reply(&mut self, client: &dyn ModelClient) -> Result<String, AiError> {
        let _guard = BusyGuard::acquire(&self.busy)?;

        let reply = client
            .generate(&self.system_instruction, &self.turns)
            .await?;

        self.turns.push(Turn::assistant(reply.clone()));
        Ok(reply)
    }

    /// Append a user turn and request the reply in one step.
    pub async fn send(
        &mut self,
        client: &dyn ModelClient,
        text: String,
        image: Option<ImageAttachment>,
    ) -> Result<String, AiError> {
        self.append_user_turn(text, image);
        self.request_reply(client).await
    }
}
