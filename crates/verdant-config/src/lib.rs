//! Verdant configuration system.
//!
//! Provides a TOML-based configuration with per-section serde defaults,
//! so a partial (or absent) config file works out of the box. The API
//! credential is deliberately excluded from the file: it is sourced from
//! the environment only, and its absence is a fatal startup condition.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, Credentials};
pub use schema::VerdantConfig;

pub use verdant_common::ConfigError;
