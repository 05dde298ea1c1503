// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles an [`AgentLoop`] over a [`MockChannel`] and a
//! [`MockRecordStore`]. Tests either drive it one event at a time through
//! `send_text()`, `command()` and `press()`, or queue a script of events and
//! let the real loop consume it with `run_script()`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use quill_agent::AgentLoop;
use quill_config::QuillConfig;
use quill_core::QuillError;
use quill_core::types::{InboundMessage, MessageContent};
use tokio_util::sync::CancellationToken;

use crate::mock_channel::MockChannel;
use crate::mock_store::MockRecordStore;

/// Chat id used in the metadata of every harness event.
pub const TEST_CHAT_ID: &str = "1000";

static EVENT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: QuillConfig,
    store: Option<MockRecordStore>,
    channel: Option<MockChannel>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: QuillConfig::default(),
            store: None,
            channel: None,
        }
    }

    /// Use a custom configuration instead of the defaults.
    pub fn with_config(mut self, config: QuillConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a preconfigured record store (failing, delayed, ...).
    pub fn with_store(mut self, store: MockRecordStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Use a preconfigured channel, e.g. [`MockChannel::without_edit`].
    pub fn with_channel(mut self, channel: MockChannel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Content ids start at `start` for this harness.
    pub fn with_id_start(mut self, start: u64) -> Self {
        self.config.content.id_start = start;
        self
    }

    pub fn build(self) -> Result<TestHarness, QuillError> {
        let channel = self.channel.unwrap_or_default();
        let store = Arc::new(self.store.unwrap_or_default());
        let agent = AgentLoop::new(Box::new(channel.clone()), store.clone(), &self.config)?;

        Ok(TestHarness {
            channel,
            store,
            agent,
            config: self.config,
        })
    }
}

/// A complete test environment with mock adapters.
pub struct TestHarness {
    /// The mock channel adapter; shares its queues with the one inside the loop.
    pub channel: MockChannel,
    /// The mock record store.
    pub store: Arc<MockRecordStore>,
    /// The agent loop under test.
    pub agent: AgentLoop,
    /// Configuration the loop was built from.
    pub config: QuillConfig,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Sends a story and returns the bot's reply text.
    pub async fn send_text(&mut self, sender: &str, text: &str) -> Result<String, QuillError> {
        self.agent.handle_inbound(text_event(sender, text)).await?;
        self.last_reply().await
    }

    /// Runs a slash command (without the slash) and returns the reply text.
    pub async fn command(&mut self, sender: &str, name: &str) -> Result<String, QuillError> {
        self.agent.handle_inbound(command_event(sender, name)).await?;
        self.last_reply().await
    }

    /// Presses a menu button and returns the resulting text, edited or sent.
    pub async fn press(&mut self, sender: &str, data: &str) -> Result<String, QuillError> {
        self.agent.handle_inbound(callback_event(sender, data)).await?;
        self.last_reply().await
    }

    /// Queues `events`, closes the channel, and runs the loop until it has
    /// consumed them all.
    pub async fn run_script(&mut self, events: Vec<InboundMessage>) -> Result<(), QuillError> {
        for event in events {
            self.channel.inject_message(event).await;
        }
        self.channel.close();

        let cancel = CancellationToken::new();
        tokio::time::timeout(Duration::from_secs(10), self.agent.run(cancel))
            .await
            .map_err(|_| QuillError::Timeout {
                duration: Duration::from_secs(10),
            })?
    }

    async fn last_reply(&self) -> Result<String, QuillError> {
        self.channel
            .last_text()
            .await
            .ok_or_else(|| QuillError::Internal("agent produced no reply".to_string()))
    }
}

fn event(sender: &str, content: MessageContent) -> InboundMessage {
    let n = EVENT_SEQ.fetch_add(1, Ordering::SeqCst);
    InboundMessage {
        id: format!("evt-{n}"),
        channel: "mock".to_string(),
        sender_id: sender.to_string(),
        content,
        timestamp: chrono::Utc::now().to_rfc3339(),
        metadata: Some(
            serde_json::json!({ "chat_id": TEST_CHAT_ID, "message_id": n.to_string() }).to_string(),
        ),
    }
}

/// A free-text story from `sender`.
pub fn text_event(sender: &str, text: &str) -> InboundMessage {
    event(sender, MessageContent::Text(text.to_string()))
}

/// A slash command from `sender`, `name` given without the slash.
pub fn command_event(sender: &str, name: &str) -> InboundMessage {
    event(
        sender,
        MessageContent::Command {
            name: name.to_string(),
            args: String::new(),
        },
    )
}

/// A button press carrying `data` from `sender`.
pub fn callback_event(sender: &str, data: &str) -> InboundMessage {
    let n = EVENT_SEQ.load(Ordering::SeqCst);
    event(
        sender,
        MessageContent::Callback {
            query_id: format!("cbq-{n}"),
            data: data.to_string(),
        },
    )
}
