// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns a completed submission into a record and writes it once.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use quill_config::QuillConfig;
use quill_core::catalog::{ContentType, Framework, Module};
use quill_core::{QuillError, RecordStore};
use tracing::{error, info, warn};

use crate::content_id::ContentIdGenerator;
use crate::record::{FinalizedRecord, RecordDefaults};
use crate::submission::CompletedSubmission;

/// Result of one finalization, reported back to the sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeOutcome {
    pub content_id: String,
    pub framework: Framework,
    pub module: Module,
    pub content_type: ContentType,
    /// True when the store acknowledged the write.
    pub synced: bool,
}

/// Assigns identifiers and performs the single store write per story.
pub struct RecordSubmitter {
    ids: ContentIdGenerator,
    store: Arc<dyn RecordStore>,
    defaults: RecordDefaults,
    timeout: Duration,
}

impl RecordSubmitter {
    pub fn new(
        ids: ContentIdGenerator,
        store: Arc<dyn RecordStore>,
        defaults: RecordDefaults,
        timeout: Duration,
    ) -> Self {
        Self {
            ids,
            store,
            defaults,
            timeout,
        }
    }

    pub fn from_config(
        config: &QuillConfig,
        store: Arc<dyn RecordStore>,
    ) -> Result<Self, QuillError> {
        Ok(Self::new(
            ContentIdGenerator::from_config(&config.content)?,
            store,
            RecordDefaults::from_config(&config.content)?,
            Duration::from_secs(config.airtable.timeout_secs),
        ))
    }

    /// The identifier the next finalized story will receive.
    pub fn next_content_id(&self) -> String {
        self.ids.peek()
    }

    /// Finalizes a story dated today in local time.
    pub async fn finalize(&self, submission: CompletedSubmission) -> FinalizeOutcome {
        self.finalize_on(submission, Local::now().date_naive()).await
    }

    /// Finalizes a story with explicit date stamps.
    ///
    /// The identifier is consumed before the write, so a failed write still
    /// advances the sequence.
    pub async fn finalize_on(
        &self,
        submission: CompletedSubmission,
        today: NaiveDate,
    ) -> FinalizeOutcome {
        let content_id = self.ids.next();
        let record =
            FinalizedRecord::build(&submission, content_id.clone(), &self.defaults, today);

        let synced = match self.write(&record).await {
            Ok(receipt) => {
                info!(
                    content_id = %content_id,
                    sender_id = %submission.originator_id,
                    remote_id = receipt.remote_id.as_deref().unwrap_or("-"),
                    "story synced to record store"
                );
                true
            }
            Err(QuillError::Timeout { duration }) => {
                warn!(
                    content_id = %content_id,
                    sender_id = %submission.originator_id,
                    timeout_secs = duration.as_secs(),
                    "record store write timed out"
                );
                false
            }
            Err(e) => {
                error!(
                    content_id = %content_id,
                    sender_id = %submission.originator_id,
                    error = %e,
                    "record store write failed"
                );
                false
            }
        };

        FinalizeOutcome {
            content_id,
            framework: submission.framework,
            module: submission.module,
            content_type: submission.content_type,
            synced,
        }
    }

    async fn write(
        &self,
        record: &FinalizedRecord,
    ) -> Result<quill_core::types::RecordReceipt, QuillError> {
        let fields = record.to_fields()?;
        match tokio::time::timeout(self.timeout, self.store.create_record(fields)).await {
            Ok(result) => result,
            Err(_) => Err(QuillError::Timeout {
                duration: self.timeout,
            }),
        }
    }
}
