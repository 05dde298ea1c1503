// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Airtable record store adapter for Quill.
//!
//! This crate implements [`RecordStore`] over the Airtable REST API: one
//! `POST {base_url}/{base_id}/{table_id}` per captured story.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use quill_config::model::AirtableConfig;
use quill_core::error::QuillError;
use quill_core::traits::{PluginAdapter, RecordStore};
use quill_core::types::{AdapterType, HealthStatus, RecordFields, RecordReceipt};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::client::AirtableClient;

/// Airtable-backed record store implementing [`RecordStore`].
///
/// Token resolution: `airtable.api_token` from config, which the loader
/// also fills from `AIRTABLE_TOKEN`.
pub struct AirtableStore {
    client: AirtableClient,
}

impl AirtableStore {
    /// Creates a new store from the given configuration.
    pub fn new(config: &AirtableConfig) -> Result<Self, QuillError> {
        let token = resolve_token(&config.api_token)?;
        let client = AirtableClient::new(
            &token,
            &config.base_url,
            &config.base_id,
            &config.table_id,
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(
            base_id = config.base_id.as_str(),
            table_id = config.table_id.as_str(),
            "Airtable record store initialized"
        );

        Ok(Self { client })
    }

    /// Creates a store with an existing client (for testing).
    pub fn with_client(client: AirtableClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &AirtableClient {
        &self.client
    }
}

#[async_trait]
impl PluginAdapter for AirtableStore {
    fn name(&self) -> &str {
        "airtable"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::RecordStore
    }

    async fn health_check(&self) -> Result<HealthStatus, QuillError> {
        match self.client.probe().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), QuillError> {
        debug!("Airtable record store shutting down");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for AirtableStore {
    async fn create_record(&self, fields: RecordFields) -> Result<RecordReceipt, QuillError> {
        let remote_id = self.client.create_record(&fields).await?;
        Ok(RecordReceipt { remote_id })
    }
}

fn resolve_token(config_token: &Option<String>) -> Result<SecretString, QuillError> {
    match config_token {
        Some(token) if !token.trim().is_empty() => Ok(SecretString::from(token.clone())),
        _ => Err(QuillError::Config(
            "Airtable token not found. Set airtable.api_token in config or the AIRTABLE_TOKEN \
             environment variable."
                .into(),
        )),
    }
}
