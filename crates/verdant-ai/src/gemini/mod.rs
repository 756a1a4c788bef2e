//! Google Gemini API client.
//!
//! Implements the `ModelClient` trait for Gemini models via the
//! Generative Language API, including inline image parts and the
//! Google Search tool grant.

mod api;
mod client;
mod config;

pub use client::GeminiClient;
pub use config::GeminiConfig;
