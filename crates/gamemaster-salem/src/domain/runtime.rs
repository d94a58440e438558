//! Keeps the Salem table in step with navigation.
//!
//! Primary navigation moves the phase through setup, first night, day and
//! end. Entering an event subflow switches to its phase; leaving it returns
//! to the phase the primary script was in. Completing the night subflow
//! resolves the night, and entering the conspiracy subflow makes the Black
//! Cat holder reveal.

use std::collections::BTreeSet;

use gamemaster_core::transition::{GameRuntime, TransitionEvent};
use tracing::debug;

use super::phase::SalemPhase;
use super::script::SalemEvent;
use super::settings::SalemSettings;
use super::state::{NightResult, SalemGameState, Winner};

#[derive(Debug, Clone)]
pub struct SalemRuntime {
    settings: SalemSettings,
    state: SalemGameState,
    primary_phase: SalemPhase,
    announced_dead: BTreeSet<usize>,
    last_dawn: Option<NightResult>,
    last_conspiracy: Option<String>,
}

impl SalemRuntime {
    #[must_use]
    pub fn new(settings: SalemSettings) -> Self {
        let state = SalemGameState::new(&settings);
        Self {
            settings,
            state,
            primary_phase: SalemPhase::Setup,
            announced_dead: BTreeSet::new(),
            last_dawn: None,
            last_conspiracy: None,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &SalemSettings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> &SalemGameState {
        &self.state
    }

    /// Moderator actions (accusations, reveals, tokens) go through here.
    pub fn state_mut(&mut self) -> &mut SalemGameState {
        &mut self.state
    }

    /// Result of the most recent dawn.
    #[must_use]
    pub fn last_dawn(&self) -> Option<&NightResult> {
        self.last_dawn.as_ref()
    }

    /// Who revealed at the most recent conspiracy.
    #[must_use]
    pub fn last_conspiracy(&self) -> Option<&str> {
        self.last_conspiracy.as_deref()
    }

    /// Seats of players who died without a death sequence yet.
    #[must_use]
    pub fn unannounced_deaths(&self) -> Vec<usize> {
        self.state
            .players
            .iter()
            .enumerate()
            .filter(|(seat, player)| !player.is_alive && !self.announced_dead.contains(seat))
            .map(|(seat, _)| seat)
            .collect()
    }

    #[must_use]
    pub fn winner(&self) -> Option<Winner> {
        self.state.check_win()
    }

    fn event_exited(&mut self, event: SalemEvent, completed: bool) {
        match event {
            SalemEvent::Night if completed => {
                self.last_dawn = Some(self.state.resolve_night());
            }
            SalemEvent::Death => {
                let dead: Vec<usize> = self.unannounced_deaths();
                self.announced_dead.extend(dead);
            }
            SalemEvent::Night | SalemEvent::Conspiracy => {}
        }
        self.state.follow(self.primary_phase);
    }
}

impl GameRuntime for SalemRuntime {
    fn on_transition(&mut self, event: &TransitionEvent) {
        match event {
            TransitionEvent::StepEntered {
                phase_id,
                in_subflow: false,
                ..
            } => {
                if let Some(phase) = SalemPhase::from_script_id(phase_id) {
                    self.primary_phase = phase;
                    self.state.follow(phase);
                }
            }
            TransitionEvent::SubflowEntered { label } => {
                if let Some(event) = SalemEvent::from_label(label) {
                    self.state.follow(event.into());
                    if event == SalemEvent::Conspiracy {
                        self.last_conspiracy = self.state.conspiracy_reveal();
                        debug!(revealed = ?self.last_conspiracy, "conspiracy");
                    }
                }
            }
            TransitionEvent::SubflowExited { label, completed } => {
                if let Some(event) = SalemEvent::from_label(label) {
                    self.event_exited(event, *completed);
                }
            }
            _ => {}
        }
    }
}
