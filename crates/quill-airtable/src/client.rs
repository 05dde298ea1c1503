// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Airtable records API.
//!
//! Provides [`AirtableClient`] which handles request construction and
//! bearer authentication. Each call makes exactly one attempt; there is no
//! retry on any status.

use std::time::Duration;

use quill_core::QuillError;
use quill_core::types::RecordFields;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, CreateRecordRequest, CreatedRecord, RecordPage};

/// HTTP client bound to one Airtable table.
#[derive(Debug, Clone)]
pub struct AirtableClient {
    client: reqwest::Client,
    base_url: String,
    base_id: String,
    table_id: String,
}

impl AirtableClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `token` - personal access token sent as `Authorization: Bearer`
    /// * `base_url` - API root such as `https://api.airtable.com/v0`
    /// * `timeout` - upper bound for a single HTTP exchange
    pub fn new(
        token: &SecretString,
        base_url: &str,
        base_id: &str,
        table_id: &str,
        timeout: Duration,
    ) -> Result<Self, QuillError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| QuillError::Config(format!("invalid Airtable token header value: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| QuillError::RemoteWrite {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            base_id: base_id.to_string(),
            table_id: table_id.to_string(),
        })
    }

    /// Overrides the API root (for testing with wiremock).
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// `{base_url}/{base_id}/{table_id}`
    pub fn table_url(&self) -> String {
        format!("{}/{}/{}", self.base_url, self.base_id, self.table_id)
    }

    /// Creates one record. Any 2xx status counts as success.
    ///
    /// The returned record ID is best-effort: an acknowledged write whose
    /// body is empty or lacks an `id` still succeeds with `None`.
    pub async fn create_record(
        &self,
        fields: &RecordFields,
    ) -> Result<Option<String>, QuillError> {
        let response = self
            .client
            .post(self.table_url())
            .json(&CreateRecordRequest { fields })
            .send()
            .await
            .map_err(|e| QuillError::RemoteWrite {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "create record response received");

        if status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Ok(match serde_json::from_str::<CreatedRecord>(&body) {
                Ok(record) => Some(record.id),
                Err(e) => {
                    warn!(
                        status = %status,
                        error = %e,
                        "record created but response carried no record id"
                    );
                    None
                }
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(QuillError::RemoteWrite {
            message: describe_failure(status, &body),
            source: None,
        })
    }

    /// Lists at most one record to confirm the token can read the table.
    pub async fn probe(&self) -> Result<usize, QuillError> {
        let url = format!("{}?maxRecords=1", self.table_url());
        let response = self.client.get(url).send().await.map_err(|e| QuillError::RemoteWrite {
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(QuillError::RemoteWrite {
                message: describe_failure(status, &body),
                source: None,
            });
        }

        let page: RecordPage = serde_json::from_str(&body).map_err(|e| QuillError::RemoteWrite {
            message: format!("failed to parse Airtable response: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(page.records.len())
    }
}

fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => format!("Airtable API error ({status}): {}", api_err.error),
        Err(_) => format!("Airtable returned {status}: {body}"),
    }
}
