// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostics for `quill.toml` problems.
//!
//! Figment reports what went wrong; this module turns it into miette reports
//! that point at the offending line, name the `QUILL_*` override for the key,
//! and suggest the closest valid key for typos.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::path::{Path, PathBuf};

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a valid key needs before it is offered as a fix.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A config file read from disk (or an inline string) for span lookup.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

impl SourceFile {
    /// Reads `path`, returning `None` when it does not exist or is unreadable.
    pub fn read(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        Some(Self { path, content })
    }

    pub fn inline(content: &str) -> Self {
        Self {
            path: PathBuf::from("<inline>"),
            content: content.to_string(),
        }
    }

    fn named(&self) -> NamedSource<String> {
        NamedSource::new(self.path.display().to_string(), self.content.clone())
    }
}

/// A problem with Quill's configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key or section that `quill.toml` does not define.
    #[error("unknown key `{}`", dotted(.section.as_deref(), .key))]
    #[diagnostic(
        code(quill::config::unknown_key),
        help("{}", unknown_key_help(section.as_deref(), suggestion.as_deref(), accepted))
    )]
    UnknownKey {
        section: Option<String>,
        key: String,
        suggestion: Option<String>,
        /// Comma-separated keys the section does accept.
        accepted: String,
        #[label("not a Quill setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that does not deserialize into the key's type.
    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(
        code(quill::config::invalid_type),
        help("`{key}` takes {expected}; it can also be set with {env_var}")
    )]
    InvalidType {
        key: String,
        found: String,
        expected: String,
        env_var: String,
        #[label("expected {expected}")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A secret required to start the bot is missing or blank.
    #[error("missing credential `{key}`")]
    #[diagnostic(
        code(quill::config::missing_credential),
        help("export {env_var}=<value> or set `{key}` in quill.toml")
    )]
    MissingCredential {
        /// Dotted config key, e.g. `airtable.api_token`.
        key: String,
        /// Environment variable that can provide it.
        env_var: String,
    },

    /// A value that parsed but is out of range or unknown.
    #[error("validation error: {message}")]
    #[diagnostic(code(quill::config::validation))]
    Validation { message: String },

    /// The file could not be parsed at all, or figment failed in a way
    /// that has no key attached.
    #[error("cannot read configuration from {origin}: {message}")]
    #[diagnostic(
        code(quill::config::unreadable),
        help("check the TOML syntax; tables are [agent], [telegram], [airtable] and [content]")
    )]
    Unreadable { origin: String, message: String },
}

fn dotted(section: Option<&str>, key: &str) -> String {
    match section {
        Some(section) => format!("{section}.{key}"),
        None => key.to_string(),
    }
}

fn unknown_key_help(section: Option<&str>, suggestion: Option<&str>, accepted: &str) -> String {
    let scope = match section {
        Some(section) => format!("[{section}] accepts: {accepted}"),
        None => format!("quill.toml has the tables: {accepted}"),
    };
    match suggestion {
        Some(fix) => format!("did you mean `{fix}`? {scope}"),
        None => scope,
    }
}

/// The `QUILL_*` variable that overrides a dotted key.
pub fn env_override(key: &str) -> String {
    format!("QUILL_{}", key.replace('.', "_").to_ascii_uppercase())
}

/// Converts a figment error into diagnostics, one per underlying failure.
///
/// `sources` are the files that were merged; a diagnostic gets a source span
/// when its key can be found in the file it came from. Errors whose provider
/// is not a file fall back to the single source, if only one was given.
pub fn from_figment(err: figment::Error, sources: &[SourceFile]) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| {
            let source = source_for(&error, sources);
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let section = error.path.first().cloned();
                    let span = source.and_then(|s| {
                        locate_key(&s.content, section.as_deref(), field)
                            .map(|offset| SourceSpan::new(offset.into(), field.len()))
                    });
                    ConfigError::UnknownKey {
                        suggestion: suggest_key(field, expected),
                        accepted: expected.join(", "),
                        key: field.clone(),
                        section,
                        src: span.and(source.map(SourceFile::named)),
                        span,
                    }
                }
                Kind::InvalidType(found, expected) | Kind::InvalidValue(found, expected) => {
                    let key = error.path.join(".");
                    let span = source.and_then(|s| {
                        let (field, section) = error.path.split_last()?;
                        locate_key(&s.content, section.first().map(String::as_str), field)
                            .map(|offset| SourceSpan::new(offset.into(), field.len()))
                    });
                    ConfigError::InvalidType {
                        env_var: env_override(&key),
                        found: found.to_string(),
                        expected: expected.clone(),
                        key,
                        src: span.and(source.map(SourceFile::named)),
                        span,
                    }
                }
                _ => ConfigError::Unreadable {
                    origin: source
                        .map(|s| s.path.display().to_string())
                        .unwrap_or_else(|| "the merged configuration".to_string()),
                    message: error.kind.to_string(),
                },
            }
        })
        .collect()
}

fn source_for<'a>(error: &figment::Error, sources: &'a [SourceFile]) -> Option<&'a SourceFile> {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| s.file_path());

    match file {
        Some(path) => {
            let canonical = std::fs::canonicalize(path).ok();
            sources
                .iter()
                .find(|s| s.path == path || canonical.as_deref() == Some(s.path.as_path()))
        }
        None if sources.len() == 1 => sources.first(),
        None => None,
    }
}

/// Byte offset of `key` inside `[section]`, or of a `[key]` table header when
/// `section` is `None`.
///
/// Tracks the current table while scanning, so a key of the same name in an
/// earlier table is never reported. Comment lines are skipped.
pub fn locate_key(content: &str, section: Option<&str>, key: &str) -> Option<usize> {
    let mut offset = 0;
    let mut table: Option<&str> = None;

    for line in content.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        if trimmed.starts_with('#') {
            continue;
        }

        if let Some(header) = trimmed.strip_prefix('[') {
            let name = header.split(']').next().unwrap_or_default().trim();
            if section.is_none() && name == key {
                let pad = header.len() - header.trim_start().len();
                return Some(start + indent + 1 + pad);
            }
            table = Some(name);
            continue;
        }

        if table != section {
            continue;
        }
        let name = trimmed.split('=').next().unwrap_or_default().trim_end();
        if name == key {
            return Some(start + indent);
        }
    }

    None
}

/// Best Jaro-Winkler match for `unknown` among `valid_keys`, if one is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (key, strsim::jaro_winkler(unknown, key)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key.to_string())
}

/// Renders each error to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn help_of(err: &ConfigError) -> String {
        err.help().map(|h| h.to_string()).unwrap_or_default()
    }

    #[test]
    fn suggests_closest_key() {
        let valid = &["id_prefix", "id_start", "id_width", "counter_path"];
        assert_eq!(
            suggest_key("id_prefx", valid),
            Some("id_prefix".to_string())
        );
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn env_override_uppercases_dotted_key() {
        assert_eq!(env_override("content.id_start"), "QUILL_CONTENT_ID_START");
        assert_eq!(
            env_override("airtable.timeout_secs"),
            "QUILL_AIRTABLE_TIMEOUT_SECS"
        );
    }

    #[test]
    fn locate_key_stays_inside_its_table() {
        let content = "[agent]\nname = \"a\"\n\n[content]\n# name = \"old\"\n  name = \"b\"\n";
        let offset = locate_key(content, Some("content"), "name").unwrap();
        assert_eq!(&content[offset..offset + 4], "name");
        assert_eq!(&content[offset - 2..offset], "  ");

        let agent = locate_key(content, Some("agent"), "name").unwrap();
        assert_eq!(agent, "[agent]\n".len());
    }

    #[test]
    fn locate_key_finds_unknown_table_header() {
        let content = "[agent]\nname = \"a\"\n[ logging ]\nlevel = 1\n";
        let offset = locate_key(content, None, "logging").unwrap();
        assert_eq!(&content[offset..offset + 7], "logging");
    }

    #[test]
    fn locate_key_misses_absent_table() {
        let content = "[agent]\nname = \"x\"\n";
        assert!(locate_key(content, Some("content"), "name").is_none());
    }

    #[test]
    fn unknown_key_help_names_section_and_fix() {
        let err = ConfigError::UnknownKey {
            section: Some("airtable".into()),
            key: "tabel_id".into(),
            suggestion: Some("table_id".into()),
            accepted: "base_id, table_id".into(),
            span: None,
            src: None,
        };
        assert_eq!(err.to_string(), "unknown key `airtable.tabel_id`");
        assert_eq!(
            help_of(&err),
            "did you mean `table_id`? [airtable] accepts: base_id, table_id"
        );
    }

    #[test]
    fn unknown_table_help_lists_tables() {
        let err = ConfigError::UnknownKey {
            section: None,
            key: "logging".into(),
            suggestion: None,
            accepted: "agent, telegram, airtable, content".into(),
            span: None,
            src: None,
        };
        assert_eq!(err.to_string(), "unknown key `logging`");
        assert!(help_of(&err).starts_with("quill.toml has the tables"));
    }

    #[test]
    fn invalid_type_help_names_env_override() {
        let err = ConfigError::InvalidType {
            key: "content.id_start".into(),
            found: "string \"thirty\"".into(),
            expected: "u64".into(),
            env_var: env_override("content.id_start"),
            span: None,
            src: None,
        };
        assert!(help_of(&err).contains("QUILL_CONTENT_ID_START"));
    }

    #[test]
    fn missing_credential_help_names_env_var() {
        let err = ConfigError::MissingCredential {
            key: "airtable.api_token".into(),
            env_var: "AIRTABLE_TOKEN".into(),
        };
        assert!(help_of(&err).contains("AIRTABLE_TOKEN"));
        assert_eq!(err.to_string(), "missing credential `airtable.api_token`");
    }
}
