// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Story capture agent for Quill.
//!
//! The [`AgentLoop`] is the central coordinator that:
//! - Receives text, commands, and button presses from a channel adapter
//! - Drives each sender through the [`Wizard`](wizard::Wizard)
//! - Edits the menu message as selections are made
//! - Reports the finalization outcome back to the sender
//! - Handles graceful shutdown

pub mod content_id;
pub mod record;
pub mod render;
pub mod shutdown;
pub mod submission;
pub mod submitter;
pub mod wizard;

use std::sync::Arc;

use quill_config::QuillConfig;
use quill_core::catalog::{CatalogItem, Framework, Module};
use quill_core::error::QuillError;
use quill_core::types::{InboundMessage, InlineKeyboard, MessageContent, OutboundMessage};
use quill_core::{ChannelAdapter, RecordStore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::render::CallbackChoice;
use crate::submitter::RecordSubmitter;
use crate::wizard::Wizard;

/// Values the loop needs from config when rendering replies.
#[derive(Debug, Clone)]
struct LoopSettings {
    agent_name: String,
    id_prefix: String,
    preview_max_chars: usize,
    status_label: String,
}

impl LoopSettings {
    fn from_config(config: &QuillConfig) -> Self {
        Self {
            agent_name: config.agent.name.clone(),
            id_prefix: config.content.id_prefix.clone(),
            preview_max_chars: config.content.preview_max_chars,
            status_label: config.content.status_label.clone(),
        }
    }
}

/// The event loop that connects a channel to the capture wizard.
///
/// Inbound events are handled one at a time; the only suspension point
/// inside a handler is the record store write.
pub struct AgentLoop {
    channel: Box<dyn ChannelAdapter + Send + Sync>,
    store: Arc<dyn RecordStore>,
    wizard: Wizard,
    settings: LoopSettings,
}

impl AgentLoop {
    /// Creates a new agent loop writing finished stories to `store`.
    pub fn new(
        channel: Box<dyn ChannelAdapter + Send + Sync>,
        store: Arc<dyn RecordStore>,
        config: &QuillConfig,
    ) -> Result<Self, QuillError> {
        let submitter = RecordSubmitter::from_config(config, store.clone())?;

        info!(
            agent_name = config.agent.name.as_str(),
            next_content_id = submitter.next_content_id().as_str(),
            "agent loop initialized"
        );

        Ok(Self {
            channel,
            store,
            wizard: Wizard::new(submitter),
            settings: LoopSettings::from_config(config),
        })
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    /// Runs the loop until the cancellation token is triggered or the
    /// channel closes, then shuts both adapters down.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), QuillError> {
        info!("agent loop running");

        loop {
            tokio::select! {
                msg = self.channel.receive() => {
                    match msg {
                        Ok(inbound) => {
                            if let Err(e) = self.handle_inbound(inbound).await {
                                error!(error = %e, "failed to handle inbound message");
                            }
                        }
                        Err(QuillError::ChannelClosed(reason)) => {
                            info!(reason = %reason, "channel closed, stopping agent loop");
                            break;
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping agent loop");
                    break;
                }
            }
        }

        shutdown::report_abandoned(self.wizard.pending_count());
        shutdown::shutdown_adapters(self.channel.as_ref(), self.store.as_ref()).await;

        info!("agent loop stopped");
        Ok(())
    }

    /// Handles one inbound event.
    ///
    /// Wizard errors caused by the sender are answered with a hint and never
    /// returned; only channel failures surface as `Err`.
    pub async fn handle_inbound(&mut self, inbound: InboundMessage) -> Result<(), QuillError> {
        debug!(
            sender_id = inbound.sender_id.as_str(),
            channel = inbound.channel.as_str(),
            "handling inbound message"
        );

        match inbound.content.clone() {
            MessageContent::Text(text) => self.handle_story(&inbound, &text).await,
            MessageContent::Command { name, .. } => self.handle_command(&inbound, &name).await,
            MessageContent::Callback { query_id, data } => {
                if let Err(e) = self.channel.answer_callback(&query_id).await {
                    debug!(error = %e, "failed to acknowledge button press");
                }
                self.handle_callback(&inbound, &data).await
            }
        }
    }

    async fn handle_story(
        &mut self,
        inbound: &InboundMessage,
        text: &str,
    ) -> Result<(), QuillError> {
        match self.wizard.begin(&inbound.sender_id, text) {
            Ok(frameworks) => {
                info!(
                    sender_id = inbound.sender_id.as_str(),
                    chars = text.chars().count(),
                    "story received"
                );
                let preview = record::preview(text, self.settings.preview_max_chars);
                self.reply(
                    inbound,
                    render::story_received(&preview),
                    Some(render::framework_menu(&frameworks)),
                )
                .await
            }
            Err(e) => self.reject(inbound, e).await,
        }
    }

    async fn handle_command(
        &mut self,
        inbound: &InboundMessage,
        name: &str,
    ) -> Result<(), QuillError> {
        let sender = inbound.sender_id.as_str();
        let text = match name {
            "start" => render::welcome(&self.settings.agent_name),
            "help" => render::help(
                &self.settings.id_prefix,
                &self.wizard.submitter().next_content_id(),
            ),
            "frameworks" => render::frameworks_overview(),
            "status" => render::status(
                &self.settings.agent_name,
                &self.wizard.submitter().next_content_id(),
                self.wizard.state(sender),
            ),
            "cancel" => {
                let had_pending = self.wizard.cancel(sender);
                if had_pending {
                    info!(sender_id = sender, "pending story cancelled");
                }
                render::cancelled(had_pending)
            }
            other => {
                debug!(sender_id = sender, command = other, "unknown command");
                render::unknown_command(other)
            }
        };
        self.reply(inbound, text, None).await
    }

    async fn handle_callback(
        &mut self,
        inbound: &InboundMessage,
        data: &str,
    ) -> Result<(), QuillError> {
        let sender = inbound.sender_id.as_str();
        let Some(choice) = render::parse_callback(data) else {
            warn!(
                sender_id = sender,
                data,
                "ignoring button with unknown payload"
            );
            return Ok(());
        };

        let step = match choice {
            CallbackChoice::Framework(code) => self
                .wizard
                .choose_framework(sender, code)
                .and_then(|modules| {
                    let framework = Framework::from_code(code).ok_or_else(|| {
                        QuillError::Internal(format!("accepted unknown framework `{code}`"))
                    })?;
                    Ok((
                        render::framework_chosen(framework),
                        Some(render::module_menu(modules)),
                    ))
                }),
            CallbackChoice::Module(code) => {
                self.wizard.choose_module(sender, code).and_then(|types| {
                    let module = Module::from_code(code).ok_or_else(|| {
                        QuillError::Internal(format!("accepted unknown module `{code}`"))
                    })?;
                    Ok((
                        render::module_chosen(module),
                        Some(render::content_type_menu(&types)),
                    ))
                })
            }
            CallbackChoice::ContentType(code) => self
                .wizard
                .choose_content_type(sender, code)
                .await
                .map(|outcome| (render::outcome(&outcome, &self.settings.status_label), None)),
        };

        match step {
            Ok((text, keyboard)) => self.present(inbound, text, keyboard).await,
            Err(e) => self.reject(inbound, e).await,
        }
    }

    /// Answers a rejected wizard step with a hint; other errors propagate.
    async fn reject(&self, inbound: &InboundMessage, error: QuillError) -> Result<(), QuillError> {
        if !error.is_user_error() {
            return Err(error);
        }
        debug!(
            sender_id = inbound.sender_id.as_str(),
            error = %error,
            "rejected wizard step"
        );
        self.reply(inbound, render::hint(&error), None).await
    }

    /// Replaces the menu message the button belonged to, or sends a new
    /// message when the channel cannot edit or the edit fails.
    async fn present(
        &self,
        inbound: &InboundMessage,
        text: String,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<(), QuillError> {
        if self.channel.capabilities().supports_edit
            && let (Some(chat_id), Some(message_id)) = (
                inbound.metadata_field("chat_id"),
                inbound.metadata_field("message_id"),
            )
        {
            match self
                .channel
                .edit_message(&chat_id, &message_id, &text, keyboard.as_ref())
                .await
            {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(error = %e, "failed to edit menu message, sending a new one");
                }
            }
        }
        self.reply(inbound, text, keyboard).await
    }

    async fn reply(
        &self,
        inbound: &InboundMessage,
        text: String,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<(), QuillError> {
        let out = OutboundMessage {
            channel: inbound.channel.clone(),
            content: text,
            metadata: inbound.metadata.clone(),
            keyboard,
            ..OutboundMessage::default()
        };
        self.channel.send(out).await.map(|_| ())
    }
}
