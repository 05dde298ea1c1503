// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MarkdownV2 formatting for Telegram Bot API.
//!
//! Bot replies mark emphasis with `**double asterisks**`. Telegram's
//! MarkdownV2 uses single asterisks for bold and requires escaping 18
//! special characters plus the backslash everywhere else. Inside inline
//! code (`` ` ``) or fenced code blocks (`` ``` ``) only the backslash is
//! escaped.

/// Characters that must be escaped in MarkdownV2 outside code blocks.
const SPECIAL_CHARS: &[char] = &[
    '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

const BOLD: &str = "**";

/// Escapes text for Telegram MarkdownV2 parse mode.
///
/// Code spans are copied through with only backslashes escaped; everything
/// else has its special characters backslash-escaped.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 2);
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '`' {
            if SPECIAL_CHARS.contains(&ch) {
                result.push('\\');
            }
            result.push(ch);
            continue;
        }

        let mut ticks = 1;
        while chars.next_if_eq(&'`').is_some() {
            ticks += 1;
        }

        match ticks {
            1 => {
                // Inline code runs to the next backtick, or to the end if unclosed.
                result.push('`');
                for c in chars.by_ref() {
                    push_code_char(&mut result, c);
                    if c == '`' {
                        break;
                    }
                }
            }
            2 => result.push_str("\\`\\`"),
            _ => {
                for _ in 0..ticks {
                    result.push('`');
                }
                let mut run = 0;
                for c in chars.by_ref() {
                    push_code_char(&mut result, c);
                    if c == '`' {
                        run += 1;
                        if run >= 3 {
                            break;
                        }
                    } else {
                        run = 0;
                    }
                }
            }
        }
    }

    result
}

fn push_code_char(out: &mut String, c: char) {
    if c == '\\' {
        out.push('\\');
    }
    out.push(c);
}

/// Converts reply text into a MarkdownV2 payload.
///
/// Each closed `**pair**` becomes a bold entity with its contents escaped.
/// An unpaired `**` is escaped literally.
pub fn format_for_telegram(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    let mut rest = text;

    while let Some(start) = rest.find(BOLD) {
        let after = &rest[start + BOLD.len()..];
        let Some(len) = after.find(BOLD) else {
            break;
        };
        out.push_str(&escape_markdown_v2(&rest[..start]));
        if len == 0 {
            out.push_str("\\*\\*\\*\\*");
        } else {
            out.push('*');
            out.push_str(&escape_markdown_v2(&after[..len]));
            out.push('*');
        }
        rest = &after[len + BOLD.len()..];
    }

    out.push_str(&escape_markdown_v2(rest));
    out
}

/// Strips emphasis markers for the plain-text fallback.
pub fn to_plain_text(text: &str) -> String {
    text.replace(BOLD, "")
}
