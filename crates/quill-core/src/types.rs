// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by channel adapters, record stores, and the agent loop.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier of a message inside a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    RecordStore,
}

/// Content of an inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// Free text typed by the user.
    Text(String),
    /// A slash command such as `/help`. `name` is stored without the slash
    /// and without any `@botname` suffix.
    Command { name: String, args: String },
    /// A button press on an inline keyboard.
    Callback {
        /// Platform id used to acknowledge the press.
        query_id: String,
        /// Opaque payload attached to the pressed button.
        data: String,
    },
}

/// An inbound event received from a channel adapter.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: String,
    pub channel: String,
    pub sender_id: String,
    pub content: MessageContent,
    /// RFC 3339 timestamp assigned by the platform.
    pub timestamp: String,
    /// JSON metadata used to route replies (`chat_id`, `message_id`).
    pub metadata: Option<String>,
}

impl InboundMessage {
    /// Reads a string field from the JSON metadata.
    pub fn metadata_field(&self, key: &str) -> Option<String> {
        let raw = self.metadata.as_deref()?;
        let value: serde_json::Value = serde_json::from_str(raw).ok()?;
        value.get(key).and_then(|v| v.as_str()).map(str::to_string)
    }
}

/// A single inline button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Rows of inline buttons attached to an outbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<Button>>,
}

impl InlineKeyboard {
    /// Builds a keyboard with one button per row.
    pub fn single_column(buttons: impl IntoIterator<Item = Button>) -> Self {
        Self {
            rows: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }

    /// Iterates over all buttons, row by row.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

/// An outbound message to be sent via a channel adapter.
#[derive(Debug, Clone, Default)]
pub struct OutboundMessage {
    pub channel: String,
    pub content: String,
    pub reply_to: Option<String>,
    pub parse_mode: Option<String>,
    pub metadata: Option<String>,
    pub keyboard: Option<InlineKeyboard>,
}

/// Capabilities reported by a channel adapter.
#[derive(Debug, Clone)]
pub struct ChannelCapabilities {
    pub supports_edit: bool,
    pub supports_inline_keyboards: bool,
    pub max_message_length: Option<usize>,
}

/// Flat field-set written as one row of the remote store.
pub type RecordFields = serde_json::Map<String, serde_json::Value>;

/// Acknowledgement returned by a record store after a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReceipt {
    /// Id assigned by the remote store, when it reports one.
    pub remote_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_field_reads_string_values() {
        let msg = InboundMessage {
            id: "1".into(),
            channel: "telegram".into(),
            sender_id: "42".into(),
            content: MessageContent::Text("hi".into()),
            timestamp: "2026-01-01T00:00:00Z".into(),
            metadata: Some(r#"{"chat_id":"42","message_id":"7"}"#.into()),
        };
        assert_eq!(msg.metadata_field("chat_id").as_deref(), Some("42"));
        assert_eq!(msg.metadata_field("message_id").as_deref(), Some("7"));
        assert!(msg.metadata_field("missing").is_none());
    }

    #[test]
    fn metadata_field_tolerates_missing_or_invalid_json() {
        let mut msg = InboundMessage {
            id: "1".into(),
            channel: "telegram".into(),
            sender_id: "42".into(),
            content: MessageContent::Text("hi".into()),
            timestamp: String::new(),
            metadata: None,
        };
        assert!(msg.metadata_field("chat_id").is_none());
        msg.metadata = Some("not json".into());
        assert!(msg.metadata_field("chat_id").is_none());
    }

    #[test]
    fn single_column_keyboard_has_one_button_per_row() {
        let kb = InlineKeyboard::single_column(vec![
            Button::new("A", "a"),
            Button::new("B", "b"),
        ]);
        assert_eq!(kb.rows.len(), 2);
        assert!(kb.rows.iter().all(|r| r.len() == 1));
        let data: Vec<_> = kb.buttons().map(|b| b.data.as_str()).collect();
        assert_eq!(data, vec!["a", "b"]);
    }
}
