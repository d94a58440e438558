//! Repeating, cancellable scheduled callback.
//!
//! Drives the Catan dice spin and the Two Rooms round countdown. A failing
//! callback is logged and the ticker keeps going; stopping is idempotent.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use crate::error::DomainError;

/// What the ticker should do after a callback returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    /// Keep ticking.
    Continue,
    /// Stop after this tick.
    Stop,
}

/// Handle to a running periodic callback.
///
/// Dropping the handle cancels the ticker.
#[derive(Debug)]
pub struct Ticker {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<u32>,
}

impl Ticker {
    /// Spawns a ticker on the current tokio runtime.
    ///
    /// `on_tick` receives the 1-based tick number. The first call happens one
    /// `period` after spawning. When `max_ticks` is set the ticker stops by
    /// itself after that many calls.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, or if `period` is zero.
    pub fn spawn<F>(period: Duration, max_ticks: Option<u32>, mut on_tick: F) -> Self
    where
        F: FnMut(u32) -> Result<TickControl, DomainError> + Send + 'static,
    {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick completes immediately.
            interval.tick().await;

            let mut fired: u32 = 0;
            loop {
                tokio::select! {
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        fired += 1;
                        match on_tick(fired) {
                            Ok(TickControl::Continue) => {}
                            Ok(TickControl::Stop) => break,
                            Err(error) => {
                                warn!(tick = fired, %error, "tick callback failed; continuing");
                            }
                        }
                        if max_ticks.is_some_and(|max| fired >= max) {
                            break;
                        }
                    }
                }
            }
            fired
        });

        Self { stop_tx, handle }
    }

    /// Requests cancellation. Calling it again, or after the ticker already
    /// finished, is a no-op.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    /// Returns `true` once the ticker task has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the ticker to end and returns how many ticks fired.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the ticker task panicked.
    pub async fn join(self) -> Result<u32, DomainError> {
        let Self { stop_tx, handle } = self;
        let fired = handle
            .await
            .map_err(|e| DomainError::Infrastructure(format!("ticker task failed: {e}")));
        drop(stop_tx);
        fired
    }
}
