//! Keeps the round timer and hostage bookkeeping in step with navigation.
//!
//! Entering a round-timer step starts a fresh timer for that round, which
//! holds forward navigation while it runs unpaused. Entering any other step
//! drops the timer. Entering a hostage-swap step records the swap.

use std::collections::BTreeMap;

use gamemaster_core::script::StepMarker;
use gamemaster_core::transition::{GameRuntime, TransitionEvent};
use tracing::{debug, info, warn};

use super::settings::TwoRoomsSettings;
use super::timer::{RoundTimer, SharedTimer, TimerSignal};

#[derive(Debug, Clone)]
pub struct TwoRoomsRuntime {
    settings: TwoRoomsSettings,
    timer: Option<SharedTimer>,
    current_round: Option<u32>,
    swaps: BTreeMap<u32, u32>,
}

impl TwoRoomsRuntime {
    #[must_use]
    pub fn new(settings: TwoRoomsSettings) -> Self {
        Self {
            settings,
            timer: None,
            current_round: None,
            swaps: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &TwoRoomsSettings {
        &self.settings
    }

    /// The timer of the round-timer step the moderator stands on.
    #[must_use]
    pub fn timer(&self) -> Option<&SharedTimer> {
        self.timer.as_ref()
    }

    /// Copy of the current timer state.
    #[must_use]
    pub fn timer_snapshot(&self) -> Option<RoundTimer> {
        let timer = self.timer.as_ref()?;
        match timer.lock() {
            Ok(guard) => Some(guard.clone()),
            Err(poisoned) => Some(poisoned.into_inner().clone()),
        }
    }

    /// The round the moderator is in, if any.
    #[must_use]
    pub fn current_round(&self) -> Option<u32> {
        self.current_round
    }

    /// Hostages swapped, by round number.
    #[must_use]
    pub fn swaps(&self) -> &BTreeMap<u32, u32> {
        &self.swaps
    }

    /// Flips the pause flag of the running timer. Returns the new flag, or
    /// `None` when there is no timer.
    pub fn toggle_pause(&mut self) -> Option<bool> {
        self.with_timer(RoundTimer::toggle_pause)
    }

    /// Ends the current round's countdown now.
    pub fn finish_early(&mut self) -> Option<TimerSignal> {
        self.with_timer(RoundTimer::finish_early).flatten()
    }

    /// Counts the current timer down one second.
    pub fn tick(&mut self) -> Option<TimerSignal> {
        self.with_timer(RoundTimer::tick).flatten()
    }

    fn with_timer<T>(&self, f: impl FnOnce(&mut RoundTimer) -> T) -> Option<T> {
        let timer = self.timer.as_ref()?;
        match timer.lock() {
            Ok(mut guard) => Some(f(&mut *guard)),
            Err(_) => {
                warn!("round timer mutex poisoned");
                None
            }
        }
    }

    fn hostages_for(&self, round: u32) -> u32 {
        usize::try_from(round)
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| self.settings.config.rounds.get(index))
            .map_or(0, |config| config.hostages_to_swap)
    }
}

impl GameRuntime for TwoRoomsRuntime {
    fn on_transition(&mut self, event: &TransitionEvent) {
        let TransitionEvent::StepEntered {
            step,
            in_subflow: false,
            ..
        } = event
        else {
            return;
        };
        if step.round_number.is_some() {
            self.current_round = step.round_number;
        }
        match (step.marker, step.timer_seconds) {
            (Some(StepMarker::RoundTimer), Some(seconds)) => {
                let timer = RoundTimer::new(seconds, self.settings.features.auto_warning_at_60s);
                debug!(round = ?self.current_round, seconds, "round timer started");
                self.timer = Some(timer.shared());
            }
            _ => self.timer = None,
        }
        if step.marker == Some(StepMarker::HostageSwap)
            && let Some(round) = self.current_round
        {
            let hostages = self.hostages_for(round);
            self.swaps.insert(round, hostages);
            info!(round, hostages, "hostages swapped");
        }
    }

    fn holds_advance(&self) -> bool {
        self.timer_snapshot().is_some_and(|timer| timer.is_running())
    }
}
