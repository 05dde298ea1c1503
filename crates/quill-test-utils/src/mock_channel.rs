// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound events
//! and captured sends, edits, and callback acknowledgements for assertion
//! in tests. Clones share the same queues.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use quill_core::QuillError;
use quill_core::traits::adapter::PluginAdapter;
use quill_core::traits::channel::ChannelAdapter;
use quill_core::types::{
    AdapterType, ChannelCapabilities, HealthStatus, InboundMessage, InlineKeyboard, MessageId,
    OutboundMessage,
};

/// A captured `edit_message` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedMessage {
    pub chat_id: String,
    pub message_id: String,
    pub text: String,
    pub keyboard: Option<InlineKeyboard>,
}

/// A mock messaging channel for testing.
///
/// - **inbound**: events injected via `inject_message()` are returned by `receive()`
/// - **sent**: messages passed to `send()` are captured and retrievable via `sent_messages()`
/// - **edits**: calls to `edit_message()` are retrievable via `edits()`
///
/// After `close()`, `receive()` drains the queue and then fails with
/// [`QuillError::ChannelClosed`], which ends an agent loop. Errors queued with
/// `inject_receive_error()` are returned first as transient channel errors.
#[derive(Clone)]
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundMessage>>>,
    receive_errors: Arc<Mutex<VecDeque<String>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    edits: Arc<Mutex<Vec<EditedMessage>>>,
    answered: Arc<Mutex<Vec<String>>>,
    notify: Arc<Notify>,
    next_id: Arc<AtomicU64>,
    closed: Arc<AtomicBool>,
    shut_down: Arc<AtomicBool>,
    last_was_edit: Arc<AtomicBool>,
    supports_edit: bool,
}

impl MockChannel {
    /// Create a new mock channel that supports message editing.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            receive_errors: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            edits: Arc::new(Mutex::new(Vec::new())),
            answered: Arc::new(Mutex::new(Vec::new())),
            notify: Arc::new(Notify::new()),
            next_id: Arc::new(AtomicU64::new(1)),
            closed: Arc::new(AtomicBool::new(false)),
            shut_down: Arc::new(AtomicBool::new(false)),
            last_was_edit: Arc::new(AtomicBool::new(false)),
            supports_edit: true,
        }
    }

    /// Create a mock channel that reports no edit support.
    pub fn without_edit() -> Self {
        Self {
            supports_edit: false,
            ..Self::new()
        }
    }

    /// Inject an inbound event into the receive queue.
    pub async fn inject_message(&self, msg: InboundMessage) {
        self.inbound.lock().await.push_back(msg);
        self.notify.notify_one();
    }

    /// Queue a transient error for the next `receive()` call.
    pub async fn inject_receive_error(&self, message: &str) {
        self.receive_errors.lock().await.push_back(message.to_string());
        self.notify.notify_one();
    }

    /// Makes `receive()` fail once the queue is empty.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Get the count of sent messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Text of the most recent send or edit, whichever came last.
    pub async fn last_text(&self) -> Option<String> {
        let sent = self.sent.lock().await;
        let edits = self.edits.lock().await;
        match (sent.last(), edits.last()) {
            (_, Some(edit)) if self.last_was_edit.load(Ordering::SeqCst) => Some(edit.text.clone()),
            (Some(msg), _) => Some(msg.content.clone()),
            (None, Some(edit)) => Some(edit.text.clone()),
            (None, None) => None,
        }
    }

    /// Get all captured `edit_message` calls.
    pub async fn edits(&self) -> Vec<EditedMessage> {
        self.edits.lock().await.clone()
    }

    /// Query ids passed to `answer_callback()`.
    pub async fn answered_callbacks(&self) -> Vec<String> {
        self.answered.lock().await.clone()
    }

    /// Clear all sent messages and edits.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
        self.edits.lock().await.clear();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, QuillError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), QuillError> {
        self.shut_down.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        ChannelCapabilities {
            supports_edit: self.supports_edit,
            supports_inline_keyboards: true,
            max_message_length: None,
        }
    }

    async fn connect(&mut self) -> Result<(), QuillError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, QuillError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().await.push(msg);
        self.last_was_edit.store(false, Ordering::SeqCst);
        Ok(MessageId(format!("mock-msg-{id}")))
    }

    async fn receive(&self) -> Result<InboundMessage, QuillError> {
        loop {
            if let Some(message) = self.receive_errors.lock().await.pop_front() {
                return Err(QuillError::Channel {
                    message,
                    source: None,
                });
            }
            // Try to pop from queue
            {
                let mut queue = self.inbound.lock().await;
                if let Some(msg) = queue.pop_front() {
                    return Ok(msg);
                }
            }
            if self.closed.load(Ordering::SeqCst) {
                return Err(QuillError::ChannelClosed("mock channel closed".to_string()));
            }
            // Wait for notification that a new message was injected
            self.notify.notified().await;
        }
    }

    async fn edit_message(
        &self,
        chat_id: &str,
        message_id: &str,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), QuillError> {
        if !self.supports_edit {
            return Err(QuillError::Channel {
                message: "mock channel does not support editing".to_string(),
                source: None,
            });
        }
        self.edits.lock().await.push(EditedMessage {
            chat_id: chat_id.to_string(),
            message_id: message_id.to_string(),
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        self.last_was_edit.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn answer_callback(&self, query_id: &str) -> Result<(), QuillError> {
        self.answered.lock().await.push(query_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::types::{Button, MessageContent};

    fn make_inbound(text: &str) -> InboundMessage {
        InboundMessage {
            id: "test-1".to_string(),
            channel: "mock".to_string(),
            sender_id: "test-user".to_string(),
            content: MessageContent::Text(text.to_string()),
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            metadata: None,
        }
    }

    fn make_outbound(text: &str) -> OutboundMessage {
        OutboundMessage {
            channel: "mock".to_string(),
            content: text.to_string(),
            ..OutboundMessage::default()
        }
    }

    #[tokio::test]
    async fn receive_returns_injected_messages() {
        let channel = MockChannel::new();
        channel.inject_message(make_inbound("hello")).await;

        let received = channel.receive().await.unwrap();
        assert_eq!(received.sender_id, "test-user");
        assert_eq!(received.content, MessageContent::Text("hello".to_string()));
    }

    #[tokio::test]
    async fn send_captures_outbound_messages() {
        let channel = MockChannel::new();
        let msg_id = channel.send(make_outbound("response text")).await.unwrap();
        assert_eq!(msg_id.0, "mock-msg-1");

        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].content, "response text");
    }

    #[tokio::test]
    async fn clones_share_queues() {
        let channel = MockChannel::new();
        let clone = channel.clone();
        clone.send(make_outbound("via clone")).await.unwrap();
        assert_eq!(channel.sent_count().await, 1);
    }

    #[tokio::test]
    async fn edits_are_captured_with_keyboard() {
        let channel = MockChannel::new();
        let keyboard = InlineKeyboard::single_column([Button::new("A", "fw_cc")]);
        channel
            .edit_message("1", "2", "edited", Some(&keyboard))
            .await
            .unwrap();

        let edits = channel.edits().await;
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].text, "edited");
        assert_eq!(edits[0].keyboard.as_ref(), Some(&keyboard));
        assert_eq!(channel.last_text().await.as_deref(), Some("edited"));
    }

    #[tokio::test]
    async fn without_edit_rejects_edits() {
        let channel = MockChannel::without_edit();
        assert!(!channel.capabilities().supports_edit);
        assert!(channel.edit_message("1", "2", "x", None).await.is_err());
    }

    #[tokio::test]
    async fn last_text_follows_latest_operation() {
        let channel = MockChannel::new();
        assert_eq!(channel.last_text().await, None);
        channel.send(make_outbound("first")).await.unwrap();
        channel.edit_message("1", "1", "second", None).await.unwrap();
        channel.send(make_outbound("third")).await.unwrap();
        assert_eq!(channel.last_text().await.as_deref(), Some("third"));
    }

    #[tokio::test]
    async fn multiple_messages_in_order() {
        let channel = MockChannel::new();
        channel.inject_message(make_inbound("first")).await;
        channel.inject_message(make_inbound("second")).await;

        let msg1 = channel.receive().await.unwrap();
        let msg2 = channel.receive().await.unwrap();
        assert_eq!(msg1.content, MessageContent::Text("first".to_string()));
        assert_eq!(msg2.content, MessageContent::Text("second".to_string()));
    }

    #[tokio::test]
    async fn receive_waits_for_injection() {
        let channel = MockChannel::new();
        let channel_clone = channel.clone();

        // Spawn a task that will inject a message after a short delay
        tokio::spawn(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
            channel_clone.inject_message(make_inbound("delayed")).await;
        });

        // receive() should block until the message is injected
        let received = tokio::time::timeout(
            tokio::time::Duration::from_secs(2),
            channel.receive(),
        )
        .await
        .expect("receive timed out")
        .unwrap();

        assert_eq!(
            received.content,
            MessageContent::Text("delayed".to_string())
        );
    }

    #[tokio::test]
    async fn close_drains_queue_then_errors() {
        let channel = MockChannel::new();
        channel.inject_message(make_inbound("last")).await;
        channel.close();

        assert!(channel.receive().await.is_ok());
        let err = channel.receive().await.unwrap_err();
        assert!(matches!(err, QuillError::ChannelClosed(_)));
    }

    #[tokio::test]
    async fn answer_callback_and_shutdown_are_recorded() {
        let channel = MockChannel::new();
        channel.answer_callback("q-1").await.unwrap();
        channel.shutdown().await.unwrap();
        assert_eq!(channel.answered_callbacks().await, vec!["q-1".to_string()]);
        assert!(channel.is_shut_down());
    }
}
