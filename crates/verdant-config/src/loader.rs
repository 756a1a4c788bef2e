//! Config file loading and credential resolution.

use std::path::Path;

use tracing::{info, warn};
use verdant_common::ConfigError;

use crate::schema::VerdantConfig;
use crate::validation;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Load config from a TOML file path.
///
/// An absent file is not an error: the shipped defaults apply. A present
/// but unparseable or invalid file is an error, never a silent fallback
/// to defaults.
pub fn load(path: &Path) -> Result<VerdantConfig, ConfigError> {
    if !path.exists() {
        info!("no config found at {}, using defaults", path.display());
        return Ok(VerdantConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: VerdantConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    validation::validate(&config)?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// API credentials, resolved from the environment at startup.
///
/// Held as an owned value by the startup sequence and passed where needed;
/// the key never lives in the config file.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Read the API key from the environment.
    ///
    /// Missing or empty values are a `MissingCredential` error; the caller
    /// treats this as fatal before any session can exist.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_var(API_KEY_ENV)
    }

    fn from_env_var(name: &'static str) -> Result<Self, ConfigError> {
        match std::env::var(name) {
            Ok(key) if !key.trim().is_empty() => Ok(Self { api_key: key }),
            Ok(_) => {
                warn!("{name} is set but empty");
                Err(ConfigError::MissingCredential(name))
            }
            Err(_) => Err(ConfigError::MissingCredential(name)),
        }
    }
}
