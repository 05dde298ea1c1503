// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Quill.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Quill configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuillConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Airtable record store settings.
    #[serde(default)]
    pub airtable: AirtableConfig,

    /// Content identifiers, derived fields, and record defaults.
    #[serde(default)]
    pub content: ContentConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in logs and the status command.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "quill".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Also read from `TELEGRAM_BOT_TOKEN`.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Telegram user IDs or usernames allowed to submit stories.
    /// An empty list admits every sender.
    #[serde(default)]
    pub allowed_users: Vec<String>,
}

/// Airtable record store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AirtableConfig {
    /// Personal access token. Also read from `AIRTABLE_TOKEN`.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Base holding the content pipeline table.
    #[serde(default = "default_base_id")]
    pub base_id: String,

    /// Table that receives one row per captured story.
    #[serde(default = "default_table_id")]
    pub table_id: String,

    /// API root, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound for the single record write, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_id: default_base_id(),
            table_id: default_table_id(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_id() -> String {
    "appHuRMaNwz4F49EF".to_string()
}

fn default_table_id() -> String {
    "tblKQuyno76Df8pTH".to_string()
}

fn default_base_url() -> String {
    "https://api.airtable.com/v0".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Content identifier scheme, derived-field limits, and record defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Fixed prefix of every content ID.
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// Number assigned to the first story after a fresh start.
    #[serde(default = "default_id_start")]
    pub id_start: u64,

    /// Minimum digit count; shorter numbers are zero-padded.
    #[serde(default = "default_id_width")]
    pub id_width: usize,

    /// File that persists the next content ID number across restarts.
    /// `None` keeps the counter in memory only.
    #[serde(default)]
    pub counter_path: Option<String>,

    /// Maximum title length, in characters.
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,

    /// Maximum summary length, in characters.
    #[serde(default = "default_summary_max_chars")]
    pub summary_max_chars: usize,

    /// Maximum length of the preview echoed back when a story arrives.
    #[serde(default = "default_preview_max_chars")]
    pub preview_max_chars: usize,

    /// Value of the `Content Status` column.
    #[serde(default = "default_status_label")]
    pub status_label: String,

    /// Audience catalog code written to `Target Audience`.
    #[serde(default = "default_audience")]
    pub default_audience: String,

    /// Value of the `File Type` column.
    #[serde(default = "default_file_type")]
    pub default_file_type: String,

    /// Value of the `Version` column.
    #[serde(default = "default_version_tag")]
    pub version_tag: String,

    /// Value of the `File Link Status` column.
    #[serde(default = "default_link_status")]
    pub link_status: String,

    /// Text appended after the date in the `Status Notes` column.
    #[serde(default = "default_status_note")]
    pub status_note: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            id_start: default_id_start(),
            id_width: default_id_width(),
            counter_path: None,
            title_max_chars: default_title_max_chars(),
            summary_max_chars: default_summary_max_chars(),
            preview_max_chars: default_preview_max_chars(),
            status_label: default_status_label(),
            default_audience: default_audience(),
            default_file_type: default_file_type(),
            version_tag: default_version_tag(),
            link_status: default_link_status(),
            status_note: default_status_note(),
        }
    }
}

fn default_id_prefix() -> String {
    "CC".to_string()
}

fn default_id_start() -> u64 {
    30
}

fn default_id_width() -> usize {
    2
}

fn default_title_max_chars() -> usize {
    50
}

fn default_summary_max_chars() -> usize {
    200
}

fn default_preview_max_chars() -> usize {
    100
}

fn default_status_label() -> String {
    "Telegram Input".to_string()
}

fn default_audience() -> String {
    "all".to_string()
}

fn default_file_type() -> String {
    "PDF/Document".to_string()
}

fn default_version_tag() -> String {
    "v1.0".to_string()
}

fn default_link_status() -> String {
    "Telegram Captured".to_string()
}

fn default_status_note() -> String {
    "Story captured via Telegram bot - Ready for development planning".to_string()
}
