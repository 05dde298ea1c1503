// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Quill integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without Telegram or Airtable.
//!
//! # Components
//!
//! - [`MockChannel`] - Mock messaging channel with event injection and capture
//! - [`MockRecordStore`] - Mock record store with configurable outcomes
//! - [`TestHarness`] - Agent loop wired to both mocks

pub mod harness;
pub mod mock_channel;
pub mod mock_store;

pub use harness::{TestHarness, callback_event, command_event, text_event};
pub use mock_channel::{EditedMessage, MockChannel};
pub use mock_store::MockRecordStore;
