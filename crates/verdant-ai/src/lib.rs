//! AI core for Verdant.
//!
//! Provides the Gemini API client and conversation plumbing:
//! - Knowledge file loading with graceful fallback
//! - System-instruction composition
//! - Multimodal turns (text plus an optional image)
//! - Per-scope chat sessions with append-only history

pub mod gemini;
pub mod knowledge;
pub mod prompt;
pub mod session;

use async_trait::async_trait;

pub use gemini::{GeminiClient, GeminiConfig};
pub use session::{ChatSession, SessionRegistry};

/// The external model collaborator seam.
///
/// A client receives the immutable system instruction and the full turn
/// history on every call; the collaborator itself holds no conversation
/// state between calls.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, system_instruction: &str, turns: &[Turn]) -> Result<String, AiError>;
}

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One piece of a turn: a text blob or an encoded image.
#[derive(Debug, Clone)]
pub enum Part {
    Text(String),
    Image { bytes: Vec<u8>, mime_type: String },
}

impl Part {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(t) => Some(t),
            Part::Image { .. } => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Part::Image { .. })
    }
}

/// One exchange unit in a conversation.
///
/// The constructors enforce the part invariants: an assistant turn carries
/// exactly one text part; a user turn carries one text part and at most
/// one image part.
#[derive(Debug, Clone)]
pub struct Turn {
    role: Role,
    parts: Vec<Part>,
}

impl Turn {
    /// A user turn. Text and image travel together as one logical turn.
    pub fn user(text: String, image: Option<ImageAttachment>) -> Self {
        let mut parts = vec![Part::Text(text)];
        if let Some(image) = image {
            parts.push(Part::Image {
                bytes: image.bytes,
                mime_type: image.mime_type,
            });
        }
        Self {
            role: Role::User,
            parts,
        }
    }

    /// An assistant turn, always a single text part.
    pub fn assistant(text: String) -> Self {
        Self {
            role: Role::Assistant,
            parts: vec![Part::Text(text)],
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// The turn's text content (every turn has exactly one text part).
    pub fn text(&self) -> &str {
        self.parts
            .iter()
            .find_map(Part::as_text)
            .unwrap_or_default()
    }

    pub fn has_image(&self) -> bool {
        self.parts.iter().any(Part::is_image)
    }
}

/// Upper bound on uploaded image size.
pub const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// MIME types the upload widget may submit.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// A validated image upload, ready to merge into a user turn.
///
/// Validation is CPU-local and happens before any turn is constructed,
/// so a rejected upload never touches session history.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    bytes: Vec<u8>,
    mime_type: String,
}

impl ImageAttachment {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Result<Self, AttachmentError> {
        let mime_type = mime_type.into();
        if bytes.is_empty() {
            return Err(AttachmentError::Empty);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AttachmentError::TooLarge(bytes.len()));
        }
        if !ALLOWED_IMAGE_TYPES.contains(&mime_type.as_str()) {
            return Err(AttachmentError::UnsupportedType(mime_type));
        }
        Ok(Self { bytes, mime_type })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("image upload is empty")]
    Empty,

    #[error("image upload is too large ({0} bytes)")]
    TooLarge(usize),

    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
}

/// Remote-call failure kinds.
///
/// All variants are non-fatal to a session: the session stays active and
/// accepts further turns after any of these.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    Api(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("session is busy with another request")]
    Busy,
}
