// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Quill.
//!
//! Provides the trait definitions, error type, and common types used
//! throughout the workspace. Channel and record store adapters implement
//! traits defined here.

pub mod catalog;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use catalog::{Audience, CatalogEntry, CatalogItem, ContentType, Framework, Module};
pub use error::QuillError;
pub use types::{AdapterType, HealthStatus, MessageId};

pub use traits::{ChannelAdapter, PluginAdapter, RecordStore};
