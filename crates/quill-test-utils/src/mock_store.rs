// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock record store for deterministic testing.
//!
//! `MockRecordStore` implements `RecordStore` with a configurable outcome
//! and captures every accepted field-set for assertion in tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use quill_core::QuillError;
use quill_core::traits::adapter::PluginAdapter;
use quill_core::traits::record_store::RecordStore;
use quill_core::types::{AdapterType, HealthStatus, RecordFields, RecordReceipt};

/// How the mock responds to `create_record`.
#[derive(Debug, Clone)]
enum Behavior {
    Accept,
    Reject(String),
    Delay(Duration),
}

/// A mock record store for testing.
pub struct MockRecordStore {
    behavior: Behavior,
    records: Mutex<Vec<RecordFields>>,
    attempts: AtomicUsize,
    shut_down: AtomicBool,
}

impl MockRecordStore {
    /// A store that accepts every write.
    pub fn new() -> Self {
        Self::with_behavior(Behavior::Accept)
    }

    /// A store that rejects every write with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Reject(message.into()))
    }

    /// A store that waits `delay` before accepting each write.
    pub fn with_delay(delay: Duration) -> Self {
        Self::with_behavior(Behavior::Delay(delay))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            records: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Field-sets of every accepted write, in order.
    pub async fn records(&self) -> Vec<RecordFields> {
        self.records.lock().await.clone()
    }

    /// Number of `create_record` calls, accepted or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

impl Default for MockRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockRecordStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::RecordStore
    }

    async fn health_check(&self) -> Result<HealthStatus, QuillError> {
        Ok(match &self.behavior {
            Behavior::Reject(message) => HealthStatus::Unhealthy(message.clone()),
            _ => HealthStatus::Healthy,
        })
    }

    async fn shutdown(&self) -> Result<(), QuillError> {
        self.shut_down.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn create_record(&self, fields: RecordFields) -> Result<RecordReceipt, QuillError> {
        let n = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        match &self.behavior {
            Behavior::Accept => {}
            Behavior::Reject(message) => {
                return Err(QuillError::RemoteWrite {
                    message: message.clone(),
                    source: None,
                });
            }
            Behavior::Delay(delay) => tokio::time::sleep(*delay).await,
        }
        self.records.lock().await.push(fields);
        Ok(RecordReceipt {
            remote_id: Some(format!("rec-mock-{n}")),
        })
    }
}
