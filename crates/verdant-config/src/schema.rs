//! Configuration schema types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8787".into(),
        }
    }
}

/// Model settings for the Gemini collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Grants the model the Google Search tool for the whole session.
    pub enable_search: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            temperature: 0.7,
            max_tokens: 4096,
            enable_search: true,
        }
    }
}

/// Knowledge file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub path: PathBuf,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("plant_stock.txt"),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdantConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub knowledge: KnowledgeConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_values() {
        let config = VerdantConfig::default();
        assert_eq!(config.server.bind_addr, "127.0.0.1:8787");
        assert_eq!(config.model.model, "gemini-2.5-flash");
        assert_eq!(config.model.temperature, 0.7);
        assert_eq!(config.model.max_tokens, 4096);
        assert!(config.model.enable_search);
        assert_eq!(config.knowledge.path, PathBuf::from("plant_stock.txt"));
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_sections() {
        let config: VerdantConfig = toml::from_str(
            r#"
[model]
temperature = 0.2
"#,
        )
        .unwrap();
        assert_eq!(config.model.temperature, 0.2);
        // Untouched fields and sections fall back to defaults
        assert_eq!(config.model.model, "gemini-2.5-flash");
        assert_eq!(config.server.bind_addr, "127.0.0.1:8787");
    }

    #[test]
    fn round_trips_through_toml() {
        let config = VerdantConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: VerdantConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.server.bind_addr, config.server.bind_addr);
        assert_eq!(parsed.model.model, config.model.model);
    }
}
