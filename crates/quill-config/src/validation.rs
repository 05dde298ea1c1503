// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty identifiers, non-zero limits, and known catalog codes.

use quill_core::catalog::{Audience, CatalogItem};

use crate::diagnostic::ConfigError;
use crate::loader::SECRET_ENV_VARS;
use crate::model::QuillConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Largest supported zero-padding width for content IDs.
const MAX_ID_WIDTH: usize = 12;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &QuillConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level `{}` must be one of: {}",
                config.agent.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    for (key, value) in [
        ("airtable.base_id", &config.airtable.base_id),
        ("airtable.table_id", &config.airtable.table_id),
        ("content.id_prefix", &config.content.id_prefix),
    ] {
        if value.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        }
    }

    let base_url = config.airtable.base_url.trim();
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        errors.push(ConfigError::Validation {
            message: format!("airtable.base_url `{base_url}` must start with http:// or https://"),
        });
    }

    if config.airtable.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "airtable.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.content.id_width == 0 || config.content.id_width > MAX_ID_WIDTH {
        errors.push(ConfigError::Validation {
            message: format!(
                "content.id_width must be between 1 and {MAX_ID_WIDTH}, got {}",
                config.content.id_width
            ),
        });
    }

    for (key, value) in [
        ("content.title_max_chars", config.content.title_max_chars),
        ("content.summary_max_chars", config.content.summary_max_chars),
        ("content.preview_max_chars", config.content.preview_max_chars),
    ] {
        if value == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be at least 1"),
            });
        }
    }

    if Audience::from_code(&config.content.default_audience).is_none() {
        let codes: Vec<&str> = quill_core::catalog::entries::<Audience>()
            .iter()
            .map(|e| e.code)
            .collect();
        errors.push(ConfigError::Validation {
            message: format!(
                "content.default_audience `{}` is not a known audience code (expected one of: {})",
                config.content.default_audience,
                codes.join(", ")
            ),
        });
    }

    if let Some(path) = &config.content.counter_path
        && path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "content.counter_path must not be empty when set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks that both startup secrets are present and non-blank.
///
/// Kept separate from [`validate_config`] so that commands which never talk
/// to Telegram or Airtable (e.g. `quill config`) still work without them.
pub fn require_credentials(config: &QuillConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    for (env_var, key) in SECRET_ENV_VARS {
        let value = match *key {
            "telegram.bot_token" => config.telegram.bot_token.as_deref(),
            "airtable.api_token" => config.airtable.api_token.as_deref(),
            _ => None,
        };
        if value.is_none_or(|v| v.trim().is_empty()) {
            errors.push(ConfigError::MissingCredential {
                key: (*key).to_string(),
                env_var: (*env_var).to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
