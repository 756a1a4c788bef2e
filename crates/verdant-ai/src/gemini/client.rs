//! Gemini API client struct, request building, and response parsing.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use crate::{AiError, Part, Role, Turn};

use super::config::GeminiConfig;

pub(crate) const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    pub(crate) fn api_url(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.config.model)
    }

    /// Build the JSON request body for the Gemini API.
    ///
    /// Image parts travel as base64 `inlineData`; the system instruction
    /// is carried out-of-band from the turn contents.
    pub(crate) fn build_request_body(
        &self,
        system_instruction: &str,
        turns: &[Turn],
    ) -> serde_json::Value {
        let mut contents = Vec::new();

        for turn in turns {
            let role = match turn.role() {
                Role::User => "user",
                Role::Assistant => "model",
            };

            let parts: Vec<serde_json::Value> = turn
                .parts()
                .iter()
                .map(|part| match part {
                    Part::Text(text) => serde_json::json!({ "text": text }),
                    Part::Image { bytes, mime_type } => serde_json::json!({
                        "inlineData": {
                            "mimeType": mime_type,
                            "data": BASE64_STANDARD.encode(bytes),
                        }
                    }),
                })
                .collect();

            contents.push(serde_json::json!({
                "role": role,
                "parts": parts,
            }));
        }

        let mut body = serde_json::json!({
            "contents": contents,
            "systemInstruction": {
                "parts": [{ "text": system_instruction }]
            },
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            }
        });

        if self.config.enable_search {
            body["tools"] = serde_json::json!([{ "google_search": {} }]);
        }

        body
    }

    /// Parse a Gemini response into the assistant's reply text.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<String, AiError> {
        let candidates = json["candidates"]
            .as_array()
            .ok_or_else(|| AiError::Parse("no candidates in response".to_string()))?;

        let first = candidates
            .first()
            .ok_or_else(|| AiError::Parse("empty candidates".to_string()))?;

        let parts = first["content"]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut text = String::new();
        for part in &parts {
            if let Some(t) = part["text"].as_str() {
                text.push_str(t);
            }
        }

        if text.is_empty() {
            return Err(AiError::Parse("no text in response candidates".to_string()));
        }

        Ok(text)
    }
}
