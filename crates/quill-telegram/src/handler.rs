// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update routing, authorization filtering, and content extraction.
//!
//! Decides whether an incoming Telegram update should be processed based on
//! authorization rules and chat type, then converts it into a
//! channel-agnostic [`InboundMessage`].

use quill_core::types::{InboundMessage, MessageContent};
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ChatKind, MessageEntityKind, User};

/// Checks whether the sender of a message is authorized.
///
/// See [`is_user_authorized`].
pub fn is_authorized(msg: &Message, allowed_users: &[String]) -> bool {
    is_user_authorized(msg.from.as_ref(), allowed_users)
}

/// Checks a user against the `allowed_users` list.
///
/// An entry matches the user ID (as string) or the username, with or without
/// a leading `@`, compared case-insensitively. An empty list admits every
/// sender. Updates without a sender never pass.
pub fn is_user_authorized(user: Option<&User>, allowed_users: &[String]) -> bool {
    let Some(user) = user else {
        return false;
    };

    if allowed_users.is_empty() {
        return true;
    }

    let user_id_str = user.id.0.to_string();

    allowed_users.iter().any(|allowed| {
        if *allowed == user_id_str {
            return true;
        }
        let allowed_clean = allowed.strip_prefix('@').unwrap_or(allowed);
        user.username
            .as_deref()
            .is_some_and(|username| username.eq_ignore_ascii_case(allowed_clean))
    })
}

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Splits `/name@bot args` into a [`MessageContent::Command`].
///
/// Returns `None` when the text is not a command. Callers decide whether the
/// text is a command at all; see [`starts_with_bot_command`].
pub fn parse_command(text: &str) -> Option<MessageContent> {
    let body = text.trim().strip_prefix('/')?;
    let (head, args) = match body.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (body, ""),
    };
    let name = head.split('@').next().unwrap_or(head);
    if name.is_empty() {
        return None;
    }
    Some(MessageContent::Command {
        name: name.to_ascii_lowercase(),
        args: args.to_string(),
    })
}

/// Whether Telegram tagged the start of the message as a bot command.
///
/// A story that merely begins with `/` (a path, say) carries no such entity.
pub fn starts_with_bot_command(msg: &Message) -> bool {
    msg.entities().is_some_and(|entities| {
        entities
            .iter()
            .any(|e| e.offset == 0 && e.kind == MessageEntityKind::BotCommand)
    })
}

/// Extracts content from a Telegram message.
///
/// Only text is captured. Photos, stickers, voice notes, and other message
/// types return `None`.
pub fn extract_content(msg: &Message) -> Option<MessageContent> {
    let text = msg.text()?;
    if starts_with_bot_command(msg)
        && let Some(command) = parse_command(text)
    {
        return Some(command);
    }
    Some(MessageContent::Text(text.to_string()))
}

/// Converts a Telegram message and extracted content into an [`InboundMessage`].
pub fn to_inbound_message(msg: &Message, content: MessageContent) -> InboundMessage {
    let sender_id = msg
        .from
        .as_ref()
        .map(|u| u.id.0.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    InboundMessage {
        id: msg.id.0.to_string(),
        channel: "telegram".to_string(),
        sender_id,
        content,
        timestamp: msg.date.to_rfc3339(),
        metadata: Some(routing_metadata(msg.chat.id.0, msg.id.0)),
    }
}

/// Converts a button press into an [`InboundMessage`].
///
/// The metadata points at the message that carried the keyboard so the
/// agent can edit it in place. Presses without data or without an
/// accessible message return `None`.
pub fn callback_to_inbound(query: &CallbackQuery) -> Option<InboundMessage> {
    let data = query.data.clone()?;
    let message = query.message.as_ref()?;

    Some(InboundMessage {
        id: query.id.to_string(),
        channel: "telegram".to_string(),
        sender_id: query.from.id.0.to_string(),
        content: MessageContent::Callback {
            query_id: query.id.to_string(),
            data,
        },
        timestamp: chrono::Utc::now().to_rfc3339(),
        metadata: Some(routing_metadata(message.chat().id.0, message.id().0)),
    })
}

fn routing_metadata(chat_id: i64, message_id: i32) -> String {
    serde_json::json!({
        "chat_id": chat_id.to_string(),
        "message_id": message_id.to_string(),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a mock private chat message from JSON, matching Telegram Bot API structure.
    fn make_private_message(user_id: u64, username: Option<&str>, text: &str) -> Message {
        let from = if let Some(uname) = username {
            serde_json::json!({
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
                "username": uname,
            })
        } else {
            serde_json::json!({
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            })
        };

        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": from,
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    fn make_command_message(user_id: u64, text: &str) -> Message {
        let command_len = text.split_whitespace().next().map_or(0, |c| c.encode_utf16().count());
        let json = serde_json::json!({
            "message_id": 3,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            },
            "text": text,
            "entities": [{"type": "bot_command", "offset": 0, "length": command_len}],
        });

        serde_json::from_value(json).expect("failed to deserialize mock command message")
    }

    fn make_group_message(user_id: u64, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": -100123i64,
                "type": "supergroup",
                "title": "Test Group",
            },
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            },
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock group message")
    }

    fn make_no_sender_message(text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": 12345i64,
                "type": "private",
                "first_name": "Test",
            },
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    fn make_location_message(user_id: u64) -> Message {
        let json = serde_json::json!({
            "message_id": 2,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            },
            "location": {"latitude": 52.5, "longitude": 13.4},
        });

        serde_json::from_value(json).expect("failed to deserialize mock location message")
    }

    fn make_callback(user_id: u64, data: Option<&str>) -> CallbackQuery {
        let mut json = serde_json::json!({
            "id": "cbq-77",
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            },
            "chat_instance": "ci-1",
            "message": {
                "message_id": 41,
                "date": 1700000000i64,
                "chat": {
                    "id": user_id as i64,
                    "type": "private",
                    "first_name": "Test",
                },
                "text": "Choose a framework",
            },
        });
        if let Some(data) = data {
            json["data"] = serde_json::Value::String(data.to_string());
        }
        serde_json::from_value(json).expect("failed to deserialize mock callback query")
    }

    #[test]
    fn authorized_by_user_id() {
        let msg = make_private_message(12345, None, "hello");
        assert!(is_authorized(&msg, &["12345".into()]));
    }

    #[test]
    fn authorized_by_username_with_at_case_insensitive() {
        let msg = make_private_message(12345, Some("StoryTeller"), "hello");
        assert!(is_authorized(&msg, &["@storyteller".into()]));
        assert!(is_authorized(&msg, &["storyteller".into()]));
    }

    #[test]
    fn not_authorized_wrong_user() {
        let msg = make_private_message(12345, Some("testuser"), "hello");
        assert!(!is_authorized(&msg, &["99999".into()]));
    }

    #[test]
    fn empty_list_admits_everyone() {
        let msg = make_private_message(12345, Some("testuser"), "hello");
        assert!(is_authorized(&msg, &[]));
    }

    #[test]
    fn not_authorized_no_sender() {
        let msg = make_no_sender_message("hello");
        assert!(!is_authorized(&msg, &[]));
        assert!(!is_authorized(&msg, &["12345".into()]));
    }

    #[test]
    fn is_dm_private_chat() {
        let msg = make_private_message(12345, None, "hello");
        assert!(is_dm(&msg));
    }

    #[test]
    fn is_dm_group_chat() {
        let msg = make_group_message(12345, "hello");
        assert!(!is_dm(&msg));
    }

    #[test]
    fn parse_command_strips_bot_suffix_and_splits_args() {
        assert_eq!(
            parse_command("/Status@quill_bot now please"),
            Some(MessageContent::Command {
                name: "status".into(),
                args: "now please".into(),
            })
        );
        assert_eq!(
            parse_command("/start"),
            Some(MessageContent::Command {
                name: "start".into(),
                args: String::new(),
            })
        );
    }

    #[test]
    fn parse_command_rejects_plain_text() {
        assert_eq!(parse_command("Today a client called"), None);
        assert_eq!(parse_command("/"), None);
        assert_eq!(parse_command("/@quill_bot"), None);
    }

    #[test]
    fn extract_content_distinguishes_text_and_commands() {
        let story = make_private_message(1, None, "The vendor missed the deadline.");
        assert_eq!(
            extract_content(&story),
            Some(MessageContent::Text("The vendor missed the deadline.".into()))
        );

        let help = make_command_message(1, "/help");
        assert!(matches!(
            extract_content(&help),
            Some(MessageContent::Command { ref name, .. }) if name == "help"
        ));
    }

    #[test]
    fn slash_without_command_entity_is_a_story() {
        let msg = make_private_message(1, None, "/etc configs are a mess");
        assert!(!starts_with_bot_command(&msg));
        assert_eq!(
            extract_content(&msg),
            Some(MessageContent::Text("/etc configs are a mess".into()))
        );
    }

    #[test]
    fn command_entity_with_args_is_parsed() {
        let msg = make_command_message(1, "/cancel@quill_bot now");
        assert!(starts_with_bot_command(&msg));
        assert_eq!(
            extract_content(&msg),
            Some(MessageContent::Command {
                name: "cancel".into(),
                args: "now".into(),
            })
        );
    }

    #[test]
    fn extract_content_ignores_non_text() {
        let msg = make_location_message(12345);
        assert_eq!(extract_content(&msg), None);
    }

    #[test]
    fn to_inbound_message_maps_fields() {
        let msg = make_private_message(12345, Some("testuser"), "hello");
        let inbound = to_inbound_message(&msg, MessageContent::Text("hello".into()));

        assert_eq!(inbound.id, "1");
        assert_eq!(inbound.channel, "telegram");
        assert_eq!(inbound.sender_id, "12345");
        assert_eq!(inbound.metadata_field("chat_id").as_deref(), Some("12345"));
        assert_eq!(inbound.metadata_field("message_id").as_deref(), Some("1"));
    }

    #[test]
    fn callback_maps_to_inbound_with_menu_message_id() {
        let query = make_callback(555, Some("fw_chaos"));
        let inbound = callback_to_inbound(&query).unwrap();

        assert_eq!(inbound.sender_id, "555");
        assert_eq!(
            inbound.content,
            MessageContent::Callback {
                query_id: "cbq-77".into(),
                data: "fw_chaos".into(),
            }
        );
        assert_eq!(inbound.metadata_field("chat_id").as_deref(), Some("555"));
        assert_eq!(inbound.metadata_field("message_id").as_deref(), Some("41"));
    }

    #[test]
    fn callback_without_data_is_ignored() {
        let query = make_callback(555, None);
        assert!(callback_to_inbound(&query).is_none());
    }
}
