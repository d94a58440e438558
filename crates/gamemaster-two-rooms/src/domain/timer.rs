//! Round countdown state machine.
//!
//! One call to [`RoundTimer::tick`] is one second. The timer fires the
//! one-minute warning at most once, when a tick moves it from 61 to 60
//! seconds, and the round-complete signal exactly once, when it reaches 0.

use std::sync::{Arc, Mutex};

use serde::Serialize;

/// Remaining seconds at which the one-minute warning fires.
pub const WARNING_AT: u32 = 60;

/// A timer shared between the runtime and the countdown driver.
pub type SharedTimer = Arc<Mutex<RoundTimer>>;

/// Something the moderator should hear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerSignal {
    /// One minute left.
    Warning,
    /// Time is up.
    RoundComplete,
}

/// Colour band for the remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerColor {
    /// More than half left.
    Green,
    /// More than a fifth left.
    Yellow,
    Red,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundTimer {
    total_seconds: u32,
    remaining_seconds: u32,
    paused: bool,
    warning_enabled: bool,
    warning_fired: bool,
    completed: bool,
}

impl RoundTimer {
    /// A running timer for a round of `total_seconds`.
    #[must_use]
    pub fn new(total_seconds: u32, warning_enabled: bool) -> Self {
        Self {
            total_seconds,
            remaining_seconds: total_seconds,
            paused: false,
            warning_enabled,
            warning_fired: false,
            completed: total_seconds == 0,
        }
    }

    #[must_use]
    pub fn shared(self) -> SharedTimer {
        Arc::new(Mutex::new(self))
    }

    #[must_use]
    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Returns `true` while time is counting down.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.paused && !self.completed
    }

    /// Counts down one second.
    pub fn tick(&mut self) -> Option<TimerSignal> {
        if !self.is_running() {
            return None;
        }
        let before = self.remaining_seconds;
        self.remaining_seconds -= 1;
        if self.remaining_seconds == 0 {
            self.completed = true;
            return Some(TimerSignal::RoundComplete);
        }
        if before == WARNING_AT + 1 && self.warning_enabled && !self.warning_fired {
            self.warning_fired = true;
            return Some(TimerSignal::Warning);
        }
        None
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flips between paused and running. Returns the new paused flag.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Ends the round now. Fires the round-complete signal unless the round
    /// had already ended.
    pub fn finish_early(&mut self) -> Option<TimerSignal> {
        self.remaining_seconds = 0;
        if self.completed {
            return None;
        }
        self.completed = true;
        Some(TimerSignal::RoundComplete)
    }

    #[must_use]
    pub fn color(&self) -> TimerColor {
        if self.total_seconds == 0 {
            return TimerColor::Red;
        }
        let ratio = f64::from(self.remaining_seconds) / f64::from(self.total_seconds);
        if ratio > 0.5 {
            TimerColor::Green
        } else if ratio > 0.2 {
            TimerColor::Yellow
        } else {
            TimerColor::Red
        }
    }
}
