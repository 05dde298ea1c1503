// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for Quill.
//!
//! `quill.toml` has four tables: `[agent]`, `[telegram]`, `[airtable]` and
//! `[content]`. Files are merged from the search path in [`loader`], then
//! `TELEGRAM_BOT_TOKEN`, `AIRTABLE_TOKEN` and `QUILL_*` variables override
//! them. Unknown keys are rejected.
//!
//! ```no_run
//! let config = quill_config::load_and_validate().expect("config errors");
//! println!("Content IDs start at {}", config.content.id_start);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, SourceFile, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::QuillConfig;
pub use validation::require_credentials;

/// Loads from the search path and environment, then validates.
pub fn load_and_validate() -> Result<QuillConfig, Vec<ConfigError>> {
    checked(loader::load_config(), || {
        loader::search_paths()
            .iter()
            .filter_map(|path| SourceFile::read(path))
            .collect()
    })
}

/// Loads one explicit file plus environment overrides, then validates.
pub fn load_and_validate_path(path: &Path) -> Result<QuillConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        SourceFile::read(path).into_iter().collect()
    })
}

/// Loads a TOML string with no file lookup or environment, then validates.
pub fn load_and_validate_str(toml_content: &str) -> Result<QuillConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![SourceFile::inline(toml_content)]
    })
}

/// Sources are only read back from disk when extraction failed.
fn checked(
    loaded: Result<QuillConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<SourceFile>,
) -> Result<QuillConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::from_figment(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}
