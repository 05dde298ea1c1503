// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for Quill.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide,
//! providing long polling, inline keyboards, in-place menu edits, and
//! MarkdownV2 formatting.

pub mod handler;
pub mod markdown;

use std::sync::Arc;

use async_trait::async_trait;
use quill_config::model::TelegramConfig;
use quill_core::error::QuillError;
use quill_core::traits::{ChannelAdapter, PluginAdapter};
use quill_core::types::{
    AdapterType, ChannelCapabilities, HealthStatus, InboundMessage, InlineKeyboard, MessageId,
    OutboundMessage,
};
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQuery, CallbackQueryId, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode,
    Recipient,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram channel adapter implementing [`ChannelAdapter`].
///
/// Connects to Telegram via long polling, filters updates by authorization
/// and chat type, and turns both messages and button presses into
/// [`InboundMessage`]s.
pub struct TelegramChannel {
    bot: Bot,
    config: TelegramConfig,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundMessage>>,
    inbound_tx: mpsc::Sender<InboundMessage>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: TelegramConfig) -> Result<Self, QuillError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            QuillError::Config(
                "telegram.bot_token is required (or set TELEGRAM_BOT_TOKEN)".into(),
            )
        })?;

        if token.trim().is_empty() {
            return Err(QuillError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            config,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, QuillError> {
        match self.bot.get_me().await {
            Ok(me) => {
                debug!(username = ?me.username, "Telegram getMe succeeded");
                Ok(HealthStatus::Healthy)
            }
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), QuillError> {
        debug!("Telegram channel shutting down");
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        ChannelCapabilities {
            supports_edit: true,
            supports_inline_keyboards: true,
            max_message_length: Some(4096),
        }
    }

    async fn connect(&mut self) -> Result<(), QuillError> {
        if self.polling_handle.is_some() {
            return Ok(());
        }

        let bot = self.bot.clone();
        let message_tx = self.inbound_tx.clone();
        let callback_tx = self.inbound_tx.clone();
        let allowed_users: Arc<Vec<String>> = Arc::new(self.config.allowed_users.clone());
        let callback_allowed = allowed_users.clone();

        if allowed_users.is_empty() {
            warn!("telegram.allowed_users is empty, every private chat is accepted");
        }
        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let on_message = Update::filter_message().endpoint(move |msg: Message| {
                let tx = message_tx.clone();
                let allowed = allowed_users.clone();
                async move {
                    if !handler::is_dm(&msg) {
                        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
                        return respond(());
                    }

                    if !handler::is_authorized(&msg, &allowed) {
                        debug!(chat_id = msg.chat.id.0, "ignoring unauthorized user");
                        return respond(());
                    }

                    match handler::extract_content(&msg) {
                        Some(content) => {
                            let inbound = handler::to_inbound_message(&msg, content);
                            if tx.send(inbound).await.is_err() {
                                warn!("inbound channel closed, dropping message");
                            }
                        }
                        None => {
                            debug!(msg_id = msg.id.0, "ignoring unsupported message type");
                        }
                    }

                    respond(())
                }
            });

            let on_callback = Update::filter_callback_query().endpoint(move |query: CallbackQuery| {
                let tx = callback_tx.clone();
                let allowed = callback_allowed.clone();
                async move {
                    if !handler::is_user_authorized(Some(&query.from), &allowed) {
                        debug!(
                            user_id = query.from.id.0,
                            "ignoring unauthorized button press"
                        );
                        return respond(());
                    }

                    match handler::callback_to_inbound(&query) {
                        Some(inbound) => {
                            if tx.send(inbound).await.is_err() {
                                warn!("inbound channel closed, dropping button press");
                            }
                        }
                        None => debug!("ignoring button press without data or message"),
                    }

                    respond(())
                }
            });

            let tree = dptree::entry().branch(on_message).branch(on_callback);

            Dispatcher::builder(bot, tree)
                .default_handler(|_| async {})
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, QuillError> {
        let chat_id = extract_chat_id(&msg)?;
        let markup = msg.keyboard.as_ref().map(to_markup);

        let sent = if msg.parse_mode.as_deref().is_none_or(|p| p == "MarkdownV2") {
            let mut request = self
                .bot
                .send_message(
                    Recipient::Id(chat_id),
                    markdown::format_for_telegram(&msg.content),
                )
                .parse_mode(ParseMode::MarkdownV2);
            if let Some(markup) = markup.clone() {
                request = request.reply_markup(markup);
            }
            match request.await {
                Ok(sent) => sent,
                Err(e) => {
                    warn!(error = %e, "MarkdownV2 failed, sending as plain text");
                    self.send_plain(chat_id, &msg.content, markup).await?
                }
            }
        } else {
            self.send_plain(chat_id, &msg.content, markup).await?
        };

        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn receive(&self) -> Result<InboundMessage, QuillError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv()
            .await
            .ok_or_else(|| QuillError::ChannelClosed("Telegram inbound queue dropped".into()))
    }

    async fn edit_message(
        &self,
        chat_id: &str,
        message_id: &str,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), QuillError> {
        let chat_id = parse_chat_id(chat_id)?;
        let msg_id = message_id
            .parse::<i32>()
            .map(teloxide::types::MessageId)
            .map_err(|e| QuillError::Channel {
                message: format!("invalid message_id: {e}"),
                source: None,
            })?;
        let markup = keyboard.map(to_markup);

        let mut request = self
            .bot
            .edit_message_text(chat_id, msg_id, markdown::format_for_telegram(text))
            .parse_mode(ParseMode::MarkdownV2);
        if let Some(markup) = markup.clone() {
            request = request.reply_markup(markup);
        }

        let err = match request.await {
            Ok(_) => return Ok(()),
            Err(e) => e,
        };

        let err_str = err.to_string();
        if err_str.contains("message is not modified") {
            return Ok(());
        }
        if !err_str.contains("can't parse entities") {
            return Err(QuillError::Channel {
                message: format!("failed to edit message: {err}"),
                source: Some(Box::new(err)),
            });
        }

        warn!(error = %err, "MarkdownV2 edit failed, retrying as plain text");
        let mut request = self
            .bot
            .edit_message_text(chat_id, msg_id, markdown::to_plain_text(text));
        if let Some(markup) = markup {
            request = request.reply_markup(markup);
        }
        request.await.map_err(|e| QuillError::Channel {
            message: format!("failed to edit message: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(())
    }

    async fn answer_callback(&self, query_id: &str) -> Result<(), QuillError> {
        self.bot
            .answer_callback_query(CallbackQueryId(query_id.to_string()))
            .await
            .map_err(|e| QuillError::Channel {
                message: format!("failed to answer callback query: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }
}

impl TelegramChannel {
    async fn send_plain(
        &self,
        chat_id: ChatId,
        text: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<Message, QuillError> {
        let mut request = self
            .bot
            .send_message(Recipient::Id(chat_id), markdown::to_plain_text(text));
        if let Some(markup) = markup {
            request = request.reply_markup(markup);
        }
        request.await.map_err(|e| QuillError::Channel {
            message: format!("failed to send message: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

/// Converts a channel-agnostic keyboard into callback buttons.
fn to_markup(keyboard: &InlineKeyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.data.clone()))
            .collect::<Vec<_>>()
    }))
}

fn parse_chat_id(raw: &str) -> Result<ChatId, QuillError> {
    raw.parse::<i64>().map(ChatId).map_err(|e| QuillError::Channel {
        message: format!("invalid chat_id: {e}"),
        source: None,
    })
}

/// Extracts the chat ID from an outbound message's metadata.
fn extract_chat_id(msg: &OutboundMessage) -> Result<ChatId, QuillError> {
    if let Some(ref metadata) = msg.metadata
        && let Ok(meta) = serde_json::from_str::<serde_json::Value>(metadata)
        && let Some(chat_id_str) = meta.get("chat_id").and_then(|v| v.as_str())
    {
        return parse_chat_id(chat_id_str);
    }

    // Fallback: the channel field may carry the chat id directly.
    msg.channel.parse::<i64>().map(ChatId).map_err(|_| QuillError::Channel {
        message: "no valid chat_id in message metadata or channel field".into(),
        source: None,
    })
}
