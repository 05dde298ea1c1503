// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graceful shutdown coordination with signal handling.
//!
//! Installs handlers for SIGTERM and SIGINT (Ctrl+C), triggering a
//! [`CancellationToken`] that the agent loop monitors. Pending stories live
//! only in memory and are dropped on exit.

use quill_core::{ChannelAdapter, RecordStore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is received.
/// The signal handler task runs in the background until the token is cancelled.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => {
                            info!("received SIGINT (Ctrl+C), initiating shutdown");
                        }
                        _ = sigterm.recv() => {
                            info!("received SIGTERM, initiating shutdown");
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        "failed to install SIGTERM handler, listening for Ctrl+C only"
                    );
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// Logs how many unfinished stories are dropped by the shutdown.
pub fn report_abandoned(pending: usize) {
    if pending == 0 {
        info!("no pending stories at shutdown");
    } else {
        warn!(
            count = pending,
            "shutting down with unfinished stories; they will not be recorded"
        );
    }
}

/// Shuts down both adapters, logging rather than propagating failures so
/// that one failing adapter does not prevent the other from closing.
pub async fn shutdown_adapters(channel: &dyn ChannelAdapter, store: &dyn RecordStore) {
    if let Err(e) = channel.shutdown().await {
        warn!(adapter = channel.name(), error = %e, "channel shutdown failed");
    }
    if let Err(e) = store.shutdown().await {
        warn!(adapter = store.name(), error = %e, "record store shutdown failed");
    }
}
