pub mod errors;

pub use errors::{ConfigError, VerdantError};

pub type Result<T> = std::result::Result<T, VerdantError>;
