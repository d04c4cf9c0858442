//! # Total Watcher
//!
//! Recomputes the form total once row edits go quiet.
//!
//! ## Timing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Debounced Recalculation                              │
//! │                                                                         │
//! │  edit ─┐   edit ─┐        edit ─┐                                      │
//! │        ▼         ▼              ▼                                       │
//! │  ──────●─────────●──────────────●──────────────────────●────────▶ t    │
//! │        │◄─ <300 ─►│◄──── <300 ──►│◄────── 300ms ──────►│               │
//! │        timer reset  timer reset                  recalculate_total()    │
//! │                                                                         │
//! │  A burst of edits yields exactly one recomputation, 300ms after the    │
//! │  last edit in the burst.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The watcher runs as its own task. Dropping the handle (or calling
//! [`TotalWatcherHandle::shutdown`]) stops it; a pending recomputation is
//! discarded.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::form::FormState;

/// Commands for the watcher.
#[derive(Debug)]
enum WatcherCommand {
    /// A row field changed; restart the quiet period.
    Changed,
    Shutdown,
}

/// Recomputes the total after a quiet period.
pub struct TotalWatcher {
    state: FormState,
    window: Duration,
}

/// Handle for signalling and stopping the watcher.
#[derive(Debug)]
pub struct TotalWatcherHandle {
    cmd_tx: mpsc::UnboundedSender<WatcherCommand>,
    task: JoinHandle<()>,
}

impl TotalWatcherHandle {
    /// Reports a row edit. Never blocks; a stopped watcher ignores it.
    pub fn notify_changed(&self) {
        if self.cmd_tx.send(WatcherCommand::Changed).is_err() {
            debug!("Total watcher stopped, change ignored");
        }
    }

    /// Stops the watcher without running a pending recomputation.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(WatcherCommand::Shutdown);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TotalWatcherHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl TotalWatcher {
    pub fn new(state: FormState, window: Duration) -> Self {
        TotalWatcher { state, window }
    }

    /// Starts the watcher task and returns its handle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self) -> TotalWatcherHandle {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(cmd_rx));
        TotalWatcherHandle { cmd_tx, task }
    }

    async fn run(self, mut cmd_rx: mpsc::UnboundedReceiver<WatcherCommand>) {
        info!(window_ms = self.window.as_millis() as u64, "Total watcher started");

        // Idle until the first edit of a burst.
        while let Some(WatcherCommand::Changed) = cmd_rx.recv().await {
            // Quiet period; every further edit restarts the timer.
            loop {
                tokio::select! {
                    cmd = cmd_rx.recv() => match cmd {
                        Some(WatcherCommand::Changed) => continue,
                        Some(WatcherCommand::Shutdown) | None => {
                            info!("Total watcher shutting down");
                            return;
                        }
                    },
                    _ = tokio::time::sleep(self.window) => {
                        let total = self.state.with_form_mut(|form| form.recalculate_total());
                        debug!(total_cents = total.cents(), "Debounced total recalculated");
                        break;
                    }
                }
            }
        }

        info!("Total watcher shutting down");
    }
}
