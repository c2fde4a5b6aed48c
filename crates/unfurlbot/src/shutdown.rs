// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signal-driven shutdown.
//!
//! SIGINT and SIGTERM both resolve to one [`CancellationToken`] cancel;
//! the ingest server and the worker loop watch the token and drain.

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Spawns the signal watcher and returns the token it will cancel.
///
/// The watcher task lives until the first signal; cancelling the token from
/// elsewhere (tests, fatal startup errors) leaves it harmlessly pending.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();

    let cancel_on_signal = token.clone();
    tokio::spawn(async move {
        let signal_name = wait_for_signal().await;
        info!(signal = signal_name, "shutdown signal received");
        cancel_on_signal.cancel();
    });

    token
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => "SIGINT",
                _ = sigterm.recv() => "SIGTERM",
            }
        }
        // No SIGTERM stream; Ctrl+C alone still shuts the service down.
        Err(_) => {
            let _ = tokio::signal::ctrl_c().await;
            "SIGINT"
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "ctrl-c"
}
