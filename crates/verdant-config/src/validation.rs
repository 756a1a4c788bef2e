//! Configuration validation.

use verdant_common::ConfigError;

use crate::schema::VerdantConfig;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &VerdantConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if config.server.bind_addr.trim().is_empty() {
        errors.push("server.bind_addr must not be empty".into());
    }

    if config.model.model.trim().is_empty() {
        errors.push("model.model must not be empty".into());
    }
    validate_range_f64(
        &mut errors,
        "model.temperature",
        config.model.temperature,
        0.0,
        2.0,
    );
    if config.model.max_tokens == 0 {
        errors.push("model.max_tokens must be greater than zero".into());
    }

    if config.knowledge.path.as_os_str().is_empty() {
        errors.push("knowledge.path must not be empty".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range_f64(errors: &mut Vec<String>, name: &str, value: f64, min: f64, max: f64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}
