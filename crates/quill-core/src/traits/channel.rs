// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for chat platform integrations.

use async_trait::async_trait;

use crate::error::QuillError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChannelCapabilities, InboundMessage, InlineKeyboard, MessageId, OutboundMessage};

/// Adapter for bidirectional chat platform integrations.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Returns the capabilities supported by this channel.
    fn capabilities(&self) -> ChannelCapabilities;

    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), QuillError>;

    /// Sends a message through the channel.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, QuillError>;

    /// Receives the next inbound event from the channel.
    async fn receive(&self) -> Result<InboundMessage, QuillError>;

    /// Replaces the text and keyboard of a previously sent message.
    async fn edit_message(
        &self,
        _chat_id: &str,
        _message_id: &str,
        _text: &str,
        _keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), QuillError> {
        Err(QuillError::Channel {
            message: format!("{} does not support editing messages", self.name()),
            source: None,
        })
    }

    /// Acknowledges a button press so the client stops its loading indicator.
    async fn answer_callback(&self, _query_id: &str) -> Result<(), QuillError> {
        Ok(())
    }
}
