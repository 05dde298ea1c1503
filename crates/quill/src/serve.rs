// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `quill serve` command implementation.
//!
//! Checks credentials, builds the Airtable record store and the Telegram
//! channel, then runs the agent loop until SIGINT/SIGTERM.

use std::sync::Arc;

use quill_agent::AgentLoop;
use quill_agent::shutdown;
use quill_airtable::AirtableStore;
use quill_config::QuillConfig;
use quill_core::error::QuillError;
use quill_core::{ChannelAdapter, PluginAdapter};
use quill_telegram::TelegramChannel;
use tracing::{error, info};

/// Runs the `quill serve` command.
///
/// Missing credentials are fatal and reported before any adapter is
/// constructed or connected.
pub async fn run_serve(config: QuillConfig) -> Result<(), QuillError> {
    init_tracing(&config.agent.log_level);

    info!(
        agent_name = config.agent.name.as_str(),
        "starting quill serve"
    );

    if let Err(errors) = quill_config::require_credentials(&config) {
        quill_config::render_errors(&errors);
        let keys: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        error!(
            missing = keys.join(", ").as_str(),
            "credentials missing, refusing to start"
        );
        return Err(QuillError::Config(format!(
            "{} credential(s) missing",
            errors.len()
        )));
    }

    let store = Arc::new(AirtableStore::new(&config.airtable).inspect_err(|e| {
        error!(error = %e, "failed to initialize Airtable record store");
    })?);

    let mut channel = TelegramChannel::new(config.telegram.clone()).inspect_err(|e| {
        error!(error = %e, "failed to initialize Telegram channel");
    })?;
    channel.connect().await?;
    info!(channel = channel.name(), "channel connected");

    let cancel = shutdown::install_signal_handler();

    let mut agent_loop = AgentLoop::new(Box::new(channel), store, &config)?;
    agent_loop.run(cancel).await?;

    info!("quill serve shutdown complete");
    Ok(())
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the `quill` crates log at
/// `log_level` and everything else at `warn`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

const QUILL_TARGETS: &[&str] = &[
    "quill",
    "quill_agent",
    "quill_airtable",
    "quill_telegram",
    "quill_config",
    "quill_core",
];

fn default_directives(log_level: &str) -> String {
    QUILL_TARGETS
        .iter()
        .map(|target| format!("{target}={log_level}"))
        .chain(std::iter::once("warn".to_string()))
        .collect::<Vec<_>>()
        .join(",")
}
