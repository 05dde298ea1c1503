// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The flat field-set written to the record store for a finished story.

use chrono::NaiveDate;
use quill_config::model::ContentConfig;
use quill_core::QuillError;
use quill_core::catalog::{Audience, CatalogItem};
use quill_core::types::RecordFields;
use serde::Serialize;

use crate::submission::CompletedSubmission;

const ELLIPSIS: &str = "...";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fixed values stamped on every record, plus derived-field limits.
#[derive(Debug, Clone)]
pub struct RecordDefaults {
    pub status_label: String,
    pub audience: Audience,
    pub file_type: String,
    pub version: String,
    pub link_status: String,
    pub status_note: String,
    pub title_max_chars: usize,
    pub summary_max_chars: usize,
}

impl RecordDefaults {
    pub fn from_config(config: &ContentConfig) -> Result<Self, QuillError> {
        let audience = Audience::from_code(&config.default_audience).ok_or_else(|| {
            QuillError::Config(format!(
                "unknown default audience `{}`",
                config.default_audience
            ))
        })?;
        Ok(Self {
            status_label: config.status_label.clone(),
            audience,
            file_type: config.default_file_type.clone(),
            version: config.version_tag.clone(),
            link_status: config.link_status.clone(),
            status_note: config.status_note.clone(),
            title_max_chars: config.title_max_chars,
            summary_max_chars: config.summary_max_chars,
        })
    }
}

impl Default for RecordDefaults {
    fn default() -> Self {
        let config = ContentConfig::default();
        Self {
            status_label: config.status_label,
            audience: Audience::default(),
            file_type: config.default_file_type,
            version: config.version_tag,
            link_status: config.link_status,
            status_note: config.status_note,
            title_max_chars: config.title_max_chars,
            summary_max_chars: config.summary_max_chars,
        }
    }
}

/// One row of the content pipeline table. Serialized field names are the
/// column names of the remote table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizedRecord {
    #[serde(rename = "Content ID")]
    pub content_id: String,
    #[serde(rename = "Framework")]
    pub framework: String,
    #[serde(rename = "Module")]
    pub module: String,
    #[serde(rename = "Title/Asset Name")]
    pub title: String,
    #[serde(rename = "Content Status")]
    pub status: String,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "Target Audience")]
    pub audience: String,
    #[serde(rename = "Content Type")]
    pub content_type: String,
    #[serde(rename = "File Type")]
    pub file_type: String,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Status Notes")]
    pub status_notes: String,
    #[serde(rename = "File Link Status")]
    pub link_status: String,
    #[serde(rename = "Created Date")]
    pub created: String,
    #[serde(rename = "Last Updated")]
    pub last_updated: String,
}

impl FinalizedRecord {
    pub fn build(
        submission: &CompletedSubmission,
        content_id: String,
        defaults: &RecordDefaults,
        today: NaiveDate,
    ) -> Self {
        let date = today.format(DATE_FORMAT).to_string();
        Self {
            content_id,
            framework: submission.framework.label().to_string(),
            module: submission.module.label().to_string(),
            title: derive_title(&submission.raw_text, defaults.title_max_chars),
            status: defaults.status_label.clone(),
            summary: derive_summary(&submission.raw_text, defaults.summary_max_chars),
            audience: defaults.audience.label().to_string(),
            content_type: submission.content_type.label().to_string(),
            file_type: defaults.file_type.clone(),
            version: defaults.version.clone(),
            status_notes: format!("{date} - {}", defaults.status_note),
            link_status: defaults.link_status.clone(),
            created: date.clone(),
            last_updated: date,
        }
    }

    /// Converts the record into the field map sent to the store.
    pub fn to_fields(&self) -> Result<RecordFields, QuillError> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(other) => Err(QuillError::Internal(format!(
                "record serialized to non-object: {other}"
            ))),
            Err(e) => Err(QuillError::Internal(format!(
                "failed to serialize record: {e}"
            ))),
        }
    }
}

/// Text before the first `.`, capped at `max` characters.
///
/// A title that ends up exactly `max` characters long gets `...` appended,
/// whether or not anything was cut.
pub fn derive_title(text: &str, max: usize) -> String {
    let sentence = text.split('.').next().unwrap_or(text);
    let mut title: String = sentence.chars().take(max).collect();
    if title.chars().count() == max {
        title.push_str(ELLIPSIS);
    }
    title
}

/// The first `max` characters, with `...` appended only when text was cut.
pub fn derive_summary(text: &str, max: usize) -> String {
    truncate_with_ellipsis(text, max)
}

/// Short echo of an incoming story.
pub fn preview(text: &str, max: usize) -> String {
    truncate_with_ellipsis(text, max)
}

fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}
