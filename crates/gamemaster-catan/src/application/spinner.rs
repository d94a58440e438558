//! Animated dice spin.
//!
//! The spin shows a fixed number of throwaway frames at a fixed period, then
//! settles on the real roll. Only the settled roll is ever recorded.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use gamemaster_core::clock::Clock;
use gamemaster_core::error::DomainError;
use gamemaster_core::rng::DeterministicRng;
use gamemaster_core::ticker::{TickControl, Ticker};
use tracing::debug;

use crate::domain::dice::{EventDie, RollResult, roll_dice};

/// Timing of the spin animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinSettings {
    /// Time between frames.
    pub period: Duration,
    /// Number of animation frames before the roll settles.
    pub frames: u32,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(80),
            frames: 10,
        }
    }
}

/// One animation frame. The faces are cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinFrame {
    pub frame: u32,
    pub die1: u32,
    pub die2: u32,
    pub event_die: Option<EventDie>,
}

/// What the spin reports to its observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinUpdate {
    Frame(SpinFrame),
    Settled(RollResult),
}

/// A running dice spin.
#[derive(Debug)]
pub struct DiceSpinner {
    ticker: Ticker,
    settled: Arc<Mutex<Option<RollResult>>>,
}

impl DiceSpinner {
    /// Starts spinning on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime or with a zero period.
    pub fn start<F>(
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        clock: Arc<dyn Clock>,
        cities_and_knights: bool,
        settings: SpinSettings,
        mut on_update: F,
    ) -> Self
    where
        F: FnMut(SpinUpdate) + Send + 'static,
    {
        let settled = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&settled);
        let frames = settings.frames;
        let ticker = Ticker::spawn(settings.period, Some(frames + 1), move |tick| {
            let mut rng = rng
                .lock()
                .map_err(|_| DomainError::Infrastructure("RNG mutex poisoned".into()))?;
            if tick <= frames {
                let die1 = rng.next_u32_range(1, 6);
                let die2 = rng.next_u32_range(1, 6);
                let event_die = cities_and_knights
                    .then(|| EventDie::from_face(rng.next_u32_range(1, 6)));
                on_update(SpinUpdate::Frame(SpinFrame {
                    frame: tick,
                    die1,
                    die2,
                    event_die,
                }));
                return Ok(TickControl::Continue);
            }
            let roll = roll_dice(&mut *rng, cities_and_knights, clock.now());
            drop(rng);
            *slot
                .lock()
                .map_err(|_| DomainError::Infrastructure("spin result mutex poisoned".into()))? =
                Some(roll);
            debug!(sum = roll.sum, "dice settled");
            on_update(SpinUpdate::Settled(roll));
            Ok(TickControl::Stop)
        });
        Self { ticker, settled }
    }

    /// Cancels the spin. Idempotent.
    pub fn cancel(&self) {
        self.ticker.stop();
    }

    /// Returns `true` once the spin has settled or was cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.ticker.is_finished()
    }

    /// Waits for the spin to settle and returns the roll.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the spin was cancelled before it
    /// settled, and `DomainError::Infrastructure` if the spin task failed.
    pub async fn finish(self) -> Result<RollResult, DomainError> {
        self.ticker.join().await?;
        self.settled
            .lock()
            .map_err(|_| DomainError::Infrastructure("spin result mutex poisoned".into()))?
            .take()
            .ok_or_else(|| DomainError::Validation("dice spin cancelled before settling".into()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use gamemaster_test_support::{FixedClock, MockRng, SequenceRng, fixed_now};

    use super::*;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(fixed_now()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_spin_shows_frames_then_settles_once() {
        // Arrange
        let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
        let frames = Arc::new(AtomicU32::new(0));
        let settled = Arc::new(AtomicU32::new(0));
        let (seen_frames, seen_settled) = (Arc::clone(&frames), Arc::clone(&settled));

        // Act
        let spinner = DiceSpinner::start(rng, clock(), false, SpinSettings::default(), move |update| {
            match update {
                SpinUpdate::Frame(_) => seen_frames.fetch_add(1, Ordering::SeqCst),
                SpinUpdate::Settled(_) => seen_settled.fetch_add(1, Ordering::SeqCst),
            };
        });
        let roll = spinner.finish().await.unwrap();

        // Assert
        assert_eq!(frames.load(Ordering::SeqCst), 10);
        assert_eq!(settled.load(Ordering::SeqCst), 1);
        assert_eq!(roll.sum, 2);
        assert_eq!(roll.rolled_at, fixed_now());
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_roll_comes_after_frame_draws() {
        let mut values = vec![1; 4];
        values.extend([3, 4]);
        let rng: Arc<Mutex<dyn DeterministicRng + Send>> =
            Arc::new(Mutex::new(SequenceRng::new(values)));
        let settings = SpinSettings {
            period: Duration::from_millis(80),
            frames: 2,
        };

        let roll = DiceSpinner::start(rng, clock(), false, settings, |_| {})
            .finish()
            .await
            .unwrap();

        assert!(roll.is_robber());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_spin_has_no_roll() {
        let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
        let spinner = DiceSpinner::start(rng, clock(), true, SpinSettings::default(), |_| {});

        spinner.cancel();
        spinner.cancel();
        let result = spinner.finish().await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
