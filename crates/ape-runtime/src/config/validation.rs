//! Configuration validation utilities.

use std::collections::HashSet;

use super::error::{ConfigError, ConfigResult};
use super::schema::{ApeConfig, LogOutput, LoggingConfig};
use ape_core::BotIdentity;

/// Validates the entire configuration.
pub fn validate_config(config: &ApeConfig) -> ConfigResult<()> {
    validate_identity(&config.bot)?;
    validate_logging(&config.logging)?;
    Ok(())
}

/// Validates the bot's names.
///
/// Names are compared case-insensitively, the same way address detection
/// compares them.
fn validate_identity(bot: &BotIdentity) -> ConfigResult<()> {
    if bot.name.trim().is_empty() {
        return Err(ConfigError::missing_field("bot.name"));
    }

    let mut seen = HashSet::new();
    for name in bot.names() {
        if name.trim().is_empty() {
            return Err(ConfigError::validation("Bot aliases must not be empty"));
        }
        if name.contains(':') {
            return Err(ConfigError::validation(format!(
                "Bot name '{name}' must not contain ':'"
            )));
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(ConfigError::DuplicateName(name.to_string()));
        }
    }

    Ok(())
}

/// Validates logging settings.
fn validate_logging(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if logging.filters.keys().any(|module| module.trim().is_empty()) {
        return Err(ConfigError::validation(
            "Logging filter module names must not be empty",
        ));
    }

    Ok(())
}
