// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Quill.

use thiserror::Error;

/// The primary error type used across all Quill adapters and core operations.
#[derive(Debug, Error)]
pub enum QuillError {
    /// Configuration errors, including missing startup credentials.
    #[error("configuration error: {0}")]
    Config(String),

    /// Channel adapter errors (connection failure, message format, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The channel's inbound stream ended; no further events will arrive.
    #[error("channel closed: {0}")]
    ChannelClosed(String),

    /// The remote record store did not acknowledge a write.
    #[error("remote write failed: {message}")]
    RemoteWrite {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A wizard step was invoked out of sequence.
    #[error("cannot {operation} while {state}")]
    InvalidState { operation: String, state: String },

    /// A choice code did not match any entry offered at this step.
    #[error("unknown {step} choice `{code}`")]
    InvalidChoice { step: String, code: String },

    /// A story was submitted with no text.
    #[error("story text is empty")]
    EmptyStory,

    /// Local state persistence errors (identifier counter file).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl QuillError {
    /// Returns true for errors caused by user input order or content.
    ///
    /// These are answered with a hint instead of being logged as failures.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            QuillError::InvalidState { .. }
                | QuillError::InvalidChoice { .. }
                | QuillError::EmptyStory
        )
    }
}
