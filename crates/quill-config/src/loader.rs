// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./quill.toml` > `~/.config/quill/quill.toml` > `/etc/quill/quill.toml`
//! with environment variable overrides via the `QUILL_` prefix and the two
//! well-known secrets `TELEGRAM_BOT_TOKEN` and `AIRTABLE_TOKEN`.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::QuillConfig;

/// Unprefixed secret variables and the config keys they populate.
pub const SECRET_ENV_VARS: &[(&str, &str)] = &[
    ("TELEGRAM_BOT_TOKEN", "telegram.bot_token"),
    ("AIRTABLE_TOKEN", "airtable.api_token"),
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/quill/quill.toml` (system-wide)
/// 3. `~/.config/quill/quill.toml` (user XDG config)
/// 4. `./quill.toml` (local directory)
/// 5. `TELEGRAM_BOT_TOKEN` / `AIRTABLE_TOKEN`
/// 6. `QUILL_*` environment variables
pub fn load_config() -> Result<QuillConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<QuillConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuillConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<QuillConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuillConfig::default()))
        .merge(Toml::file(path))
        .merge(secret_env_provider())
        .merge(env_provider())
        .extract()
}

/// Config files in merge order, lowest priority first.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/quill/quill.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("quill/quill.toml"));
    }
    paths.push(PathBuf::from("quill.toml"));
    paths
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    search_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(QuillConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(secret_env_provider())
        .merge(env_provider())
}

/// Maps the unprefixed secret variables onto their config keys.
fn secret_env_provider() -> Env {
    let names: Vec<&str> = SECRET_ENV_VARS.iter().map(|(var, _)| *var).collect();
    Env::raw().only(&names).map(|key| {
        let key_str = key.as_str();
        SECRET_ENV_VARS
            .iter()
            .find(|(var, _)| var.eq_ignore_ascii_case(key_str))
            .map(|(_, target)| (*target).to_string())
            .unwrap_or_else(|| key_str.to_string())
            .into()
    })
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `QUILL_CONTENT_ID_PREFIX` must
/// map to `content.id_prefix`, not `content.id.prefix`.
fn env_provider() -> Env {
    Env::prefixed("QUILL_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("airtable_", "airtable.", 1)
            .replacen("content_", "content.", 1);
        mapped.into()
    })
}
