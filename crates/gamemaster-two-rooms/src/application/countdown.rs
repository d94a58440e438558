//! Drives a round timer once per period on the tokio runtime.

use std::time::Duration;

use gamemaster_core::error::DomainError;
use gamemaster_core::ticker::{TickControl, Ticker};
use tracing::info;

use crate::domain::timer::{SharedTimer, TimerSignal};

/// Wall-clock length of one timer second.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A running countdown. Ends by itself once the round completes; dropping
/// it stops the countdown.
#[derive(Debug)]
pub struct Countdown {
    ticker: Ticker,
}

impl Countdown {
    /// Starts ticking `timer` every `period`. Signals are passed to
    /// `on_signal` as they fire.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime or with a zero period.
    pub fn start<F>(timer: SharedTimer, period: Duration, mut on_signal: F) -> Self
    where
        F: FnMut(TimerSignal) + Send + 'static,
    {
        let ticker = Ticker::spawn(period, None, move |_| {
            let mut guard = timer
                .lock()
                .map_err(|_| DomainError::Infrastructure("round timer mutex poisoned".into()))?;
            let signal = guard.tick();
            let complete = guard.is_complete();
            drop(guard);

            if let Some(signal) = signal {
                info!(?signal, "round timer signal");
                on_signal(signal);
            }
            Ok(if complete {
                TickControl::Stop
            } else {
                TickControl::Continue
            })
        });
        Self { ticker }
    }

    /// Stops the countdown. Idempotent.
    pub fn stop(&self) {
        self.ticker.stop();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.ticker.is_finished()
    }

    /// Waits for the countdown to end and returns how many ticks ran.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the countdown task failed.
    pub async fn join(self) -> Result<u32, DomainError> {
        self.ticker.join().await
    }
}
