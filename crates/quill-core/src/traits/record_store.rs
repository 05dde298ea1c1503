// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store trait for the remote table that receives finalized stories.

use async_trait::async_trait;

use crate::error::QuillError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{RecordFields, RecordReceipt};

/// Adapter for a remote tabular store.
///
/// Implementations perform exactly one write attempt per call and never
/// retry. Any non-acknowledged write is reported as
/// [`QuillError::RemoteWrite`].
#[async_trait]
pub trait RecordStore: PluginAdapter {
    /// Creates one row from the given field-set.
    async fn create_record(&self, fields: RecordFields) -> Result<RecordReceipt, QuillError>;
}
