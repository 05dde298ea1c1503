// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `quill doctor` command implementation.
//!
//! Runs diagnostic checks against the configuration, the content ID counter,
//! and both remote services, then prints a pass/warn/fail table.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use quill_agent::content_id::FileSequence;
use quill_agent::content_id::IdSequence;
use quill_airtable::AirtableStore;
use quill_config::QuillConfig;
use quill_core::types::HealthStatus;
use quill_core::{PluginAdapter, QuillError};
use quill_telegram::TelegramChannel;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `quill doctor` command.
///
/// With `plain`, or when stdout is not a terminal, disables colored output.
pub async fn run_doctor(
    config: &QuillConfig,
    config_path: Option<&Path>,
    plain: bool,
) -> Result<(), QuillError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_config(config_path),
        check_credentials(config),
        check_counter(config),
        check_telegram(config).await,
        check_airtable(config).await,
    ];

    println!();
    println!("  quill doctor");
    println!("  {}", "-".repeat(50));

    for result in &results {
        println!("{}", render_line(result, use_color));
    }

    println!();

    let issues = results
        .iter()
        .filter(|r| r.status != CheckStatus::Pass)
        .count();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }

    println!();

    Ok(())
}

fn render_line(result: &CheckResult, use_color: bool) -> String {
    use colored::Colorize;

    let duration_ms = result.duration.as_millis();
    if !use_color {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        return format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        );
    }

    let (symbol, message) = match result.status {
        CheckStatus::Pass => ("✓".green(), result.message.normal()),
        CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
        CheckStatus::Fail => ("✗".red(), result.message.red()),
    };
    format!(
        "    {symbol} {:<20} {message} ({duration_ms}ms)",
        result.name
    )
}

/// Check configuration loads without errors.
fn check_config(path: Option<&Path>) -> CheckResult {
    let start = Instant::now();
    let loaded = match path {
        Some(path) => quill_config::load_and_validate_path(path),
        None => quill_config::load_and_validate(),
    };
    match loaded {
        Ok(_) => CheckResult::new("Configuration", CheckStatus::Pass, "valid", start),
        Err(errors) => CheckResult::new(
            "Configuration",
            CheckStatus::Fail,
            format!("{} error(s)", errors.len()),
            start,
        ),
    }
}

/// Check both secrets are present.
fn check_credentials(config: &QuillConfig) -> CheckResult {
    let start = Instant::now();
    match quill_config::require_credentials(config) {
        Ok(()) => CheckResult::new("Credentials", CheckStatus::Pass, "present", start),
        Err(errors) => {
            let missing: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            CheckResult::new("Credentials", CheckStatus::Fail, missing.join("; "), start)
        }
    }
}

/// Check the content ID counter can be read.
fn check_counter(config: &QuillConfig) -> CheckResult {
    let start = Instant::now();
    let content = &config.content;
    let (prefix, width) = (&content.id_prefix, content.id_width);
    let format_id = |n: u64| format!("{prefix}{n:0width$}");

    match content.counter_path.as_deref() {
        None => CheckResult::new(
            "Content IDs",
            CheckStatus::Pass,
            format!("in memory, next {}", format_id(content.id_start)),
            start,
        ),
        Some(path) => match FileSequence::open(path, content.id_start) {
            Ok(sequence) => CheckResult::new(
                "Content IDs",
                CheckStatus::Pass,
                format!("next {} ({path})", format_id(sequence.peek())),
                start,
            ),
            Err(e) => CheckResult::new("Content IDs", CheckStatus::Fail, e.to_string(), start),
        },
    }
}

/// Check the bot token with `getMe`.
async fn check_telegram(config: &QuillConfig) -> CheckResult {
    let start = Instant::now();
    let channel = match TelegramChannel::new(config.telegram.clone()) {
        Ok(channel) => channel,
        Err(e) => return CheckResult::new("Telegram", CheckStatus::Fail, e.to_string(), start),
    };
    health_result("Telegram", channel.health_check().await, start)
}

/// Check the Airtable table can be read with the configured token.
async fn check_airtable(config: &QuillConfig) -> CheckResult {
    let start = Instant::now();
    let store = match AirtableStore::new(&config.airtable) {
        Ok(store) => store,
        Err(e) => return CheckResult::new("Airtable", CheckStatus::Fail, e.to_string(), start),
    };
    health_result("Airtable", store.health_check().await, start)
}

fn health_result(
    name: &str,
    health: Result<HealthStatus, QuillError>,
    start: Instant,
) -> CheckResult {
    match health {
        Ok(HealthStatus::Healthy) => CheckResult::new(name, CheckStatus::Pass, "reachable", start),
        Ok(HealthStatus::Degraded(msg)) => CheckResult::new(name, CheckStatus::Warn, msg, start),
        Ok(HealthStatus::Unhealthy(msg)) => CheckResult::new(name, CheckStatus::Fail, msg, start),
        Err(e) => CheckResult::new(name, CheckStatus::Fail, e.to_string(), start),
    }
}

#[cfg(test)]
mod tests {
    use quill_config::model::{AirtableConfig, ContentConfig, TelegramConfig};

    use super::*;

    fn with_secrets() -> QuillConfig {
        QuillConfig {
            telegram: TelegramConfig {
                bot_token: Some("123:abc".into()),
                allowed_users: vec![],
            },
            airtable: AirtableConfig {
                api_token: Some("pat-test".into()),
                ..AirtableConfig::default()
            },
            ..QuillConfig::default()
        }
    }

    #[test]
    fn plain_line_has_status_tag() {
        let result = CheckResult {
            name: "Airtable".into(),
            status: CheckStatus::Fail,
            message: "NOT_FOUND".into(),
            duration: Duration::from_millis(5),
        };
        let line = render_line(&result, false);
        assert!(line.contains("[FAIL]"));
        assert!(line.contains("NOT_FOUND"));
        assert!(line.contains("(5ms)"));
    }

    #[test]
    fn explicit_config_file_is_checked() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[agent]\nname = \"quill\"\n").unwrap();
        assert_eq!(check_config(Some(&good)).status, CheckStatus::Pass);

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[content]\nid_prefx = \"CC\"\n").unwrap();
        let result = check_config(Some(&bad));
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("error"));
    }

    #[test]
    fn missing_credentials_fail() {
        let result = check_credentials(&QuillConfig::default());
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("telegram.bot_token"));
        assert!(result.message.contains("airtable.api_token"));
    }

    #[test]
    fn present_credentials_pass() {
        assert_eq!(check_credentials(&with_secrets()).status, CheckStatus::Pass);
    }

    #[test]
    fn in_memory_counter_reports_first_id() {
        let result = check_counter(&QuillConfig::default());
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.message.contains("CC30"), "got: {}", result.message);
    }

    #[test]
    fn file_counter_reports_persisted_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counter");
        std::fs::write(&path, "42").unwrap();

        let config = QuillConfig {
            content: ContentConfig {
                counter_path: Some(path.display().to_string()),
                ..ContentConfig::default()
            },
            ..QuillConfig::default()
        };
        let result = check_counter(&config);
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.message.contains("CC42"), "got: {}", result.message);
    }

    #[test]
    fn corrupt_counter_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counter");
        std::fs::write(&path, "not a number").unwrap();

        let config = QuillConfig {
            content: ContentConfig {
                counter_path: Some(path.display().to_string()),
                ..ContentConfig::default()
            },
            ..QuillConfig::default()
        };
        assert_eq!(check_counter(&config).status, CheckStatus::Fail);
    }

    #[tokio::test]
    async fn services_without_tokens_fail_without_network() {
        let config = QuillConfig::default();
        assert_eq!(check_telegram(&config).await.status, CheckStatus::Fail);
        assert_eq!(check_airtable(&config).await.status, CheckStatus::Fail);
    }

    #[test]
    fn health_result_maps_statuses() {
        let start = Instant::now();
        assert_eq!(
            health_result("x", Ok(HealthStatus::Healthy), start).status,
            CheckStatus::Pass
        );
        assert_eq!(
            health_result("x", Ok(HealthStatus::Degraded("slow".into())), start).status,
            CheckStatus::Warn
        );
        assert_eq!(
            health_result("x", Err(QuillError::Internal("boom".into())), start).status,
            CheckStatus::Fail
        );
    }
}
