// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response types for the Airtable records API.

use quill_core::types::RecordFields;
use serde::{Deserialize, Serialize};

/// Body of `POST /v0/{base}/{table}` for a single record.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRecordRequest<'a> {
    pub fields: &'a RecordFields,
}

/// A created record as echoed back by Airtable.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedRecord {
    pub id: String,
    #[serde(rename = "createdTime", default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub fields: RecordFields,
}

/// Page of records returned by a list call; only used for reachability.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub records: Vec<CreatedRecord>,
}

/// Error envelope. Airtable sends either an object with a type and message
/// or a bare string code such as `"NOT_FOUND"`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiError {
    Detailed {
        #[serde(rename = "type")]
        type_: String,
        #[serde(default)]
        message: Option<String>,
    },
    Code(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Detailed {
                type_,
                message: Some(message),
            } => write!(f, "{type_}: {message}"),
            ApiError::Detailed { type_, message: None } => f.write_str(type_),
            ApiError::Code(code) => f.write_str(code),
        }
    }
}
