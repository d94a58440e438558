//! Dice state machine that moves in lockstep with navigation.
//!
//! Entering a dice-roll step arms the runtime: forward navigation is held
//! until a roll is recorded. A 7 activates the robber, and the robber stays
//! active until the robber subflow exits.

use std::collections::BTreeMap;

use gamemaster_core::script::{Step, StepMarker};
use gamemaster_core::transition::{GameRuntime, TransitionEvent};
use tracing::{debug, info};

use super::dice::RollResult;
use super::script::{ROBBER_SUBFLOW, robber_subflow};
use super::settings::{CatanSettings, CheckpointFrequency};

/// The dice-roll step the moderator is standing on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRoll {
    /// Seat of the player rolling.
    pub player_index: Option<usize>,
    /// Round of the turn.
    pub round_number: Option<u32>,
}

/// What a recorded roll means for navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollEffect {
    /// Hand out resources and carry on.
    Resources,
    /// A 7: the caller enters the robber subflow with these steps.
    Robber {
        /// Name of the player who rolled.
        player_name: String,
        /// The robber sequence.
        steps: Vec<Step>,
    },
}

/// Catan's auxiliary state: roll history and the robber flag.
#[derive(Debug, Clone)]
pub struct CatanRuntime {
    settings: CatanSettings,
    history: Vec<RollResult>,
    robber_active: bool,
    pending: Option<PendingRoll>,
}

impl CatanRuntime {
    /// Fresh state for a new session.
    #[must_use]
    pub fn new(settings: CatanSettings) -> Self {
        Self {
            settings,
            history: Vec::new(),
            robber_active: false,
            pending: None,
        }
    }

    /// The settings the runtime was built from.
    #[must_use]
    pub fn settings(&self) -> &CatanSettings {
        &self.settings
    }

    /// Most recent roll.
    #[must_use]
    pub fn last_roll(&self) -> Option<&RollResult> {
        self.history.first()
    }

    /// Every roll, newest first.
    #[must_use]
    pub fn history(&self) -> &[RollResult] {
        &self.history
    }

    /// How often each sum from 2 to 12 was rolled.
    #[must_use]
    pub fn histogram(&self) -> BTreeMap<u32, usize> {
        let mut counts: BTreeMap<u32, usize> = (2..=12).map(|sum| (sum, 0)).collect();
        for roll in &self.history {
            *counts.entry(roll.sum).or_default() += 1;
        }
        counts
    }

    /// Returns `true` between a 7 and the end of the robber sequence.
    #[must_use]
    pub fn robber_active(&self) -> bool {
        self.robber_active
    }

    /// The dice-roll step waiting for a roll, if any.
    #[must_use]
    pub fn pending_roll(&self) -> Option<PendingRoll> {
        self.pending
    }

    /// Records a finished roll. A 7 activates the robber and returns the
    /// robber steps for the acting player.
    pub fn record_roll(&mut self, roll: RollResult) -> RollEffect {
        let pending = self.pending.take();
        self.history.insert(0, roll);
        info!(
            die1 = roll.die1,
            die2 = roll.die2,
            sum = roll.sum,
            event_die = ?roll.event_die,
            "dice rolled"
        );
        if !roll.is_robber() {
            return RollEffect::Resources;
        }
        self.robber_active = true;
        let player_name = self
            .settings
            .player_name(pending.and_then(|p| p.player_index).unwrap_or_default());
        let with_checkpoint = self.settings.checkpoints_enabled
            && self.settings.checkpoint_frequency == CheckpointFrequency::AfterRobber;
        let steps = robber_subflow(
            &player_name,
            self.settings.friendly_robber_enabled,
            with_checkpoint,
        );
        RollEffect::Robber { player_name, steps }
    }
}

impl GameRuntime for CatanRuntime {
    fn on_transition(&mut self, event: &TransitionEvent) {
        match event {
            TransitionEvent::StepEntered {
                step,
                in_subflow: false,
                ..
            } => {
                self.pending = (step.marker == Some(StepMarker::DiceRoll)).then_some(PendingRoll {
                    player_index: step.player_index,
                    round_number: step.round_number,
                });
                if self.pending.is_some() {
                    debug!(step_id = %step.id, "waiting for dice roll");
                }
            }
            TransitionEvent::SubflowExited { label, .. } if label == ROBBER_SUBFLOW => {
                self.robber_active = false;
            }
            _ => {}
        }
    }

    fn holds_advance(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use gamemaster_test_support::fixed_now;

    use super::*;

    fn dice_step(seat: usize) -> TransitionEvent {
        TransitionEvent::StepEntered {
            step: Step::instruction(format!("dice-roll-r1-p{seat}"), "Roll")
                .marker(StepMarker::DiceRoll)
                .for_player(seat)
                .in_round(1),
            phase_id: "round-1".into(),
            in_subflow: false,
        }
    }

    #[test]
    fn test_dice_step_holds_until_roll_recorded() {
        // Arrange
        let mut runtime = CatanRuntime::new(CatanSettings::default());

        // Act
        runtime.on_transition(&dice_step(1));
        let held = runtime.holds_advance();
        let effect = runtime.record_roll(RollResult::new(2, 3, None, fixed_now()));

        // Assert
        assert!(held);
        assert_eq!(effect, RollEffect::Resources);
        assert!(!runtime.holds_advance());
        assert!(!runtime.robber_active());
    }

    #[test]
    fn test_seven_activates_robber_for_acting_player() {
        let mut runtime = CatanRuntime::new(CatanSettings::default());
        runtime.on_transition(&dice_step(2));

        let effect = runtime.record_roll(RollResult::new(6, 1, None, fixed_now()));

        match effect {
            RollEffect::Robber { player_name, steps } => {
                assert_eq!(player_name, "Player C");
                assert_eq!(steps.len(), 4);
            }
            RollEffect::Resources => panic!("a 7 must trigger the robber"),
        }
        assert!(runtime.robber_active());

        runtime.on_transition(&TransitionEvent::SubflowExited {
            label: ROBBER_SUBFLOW.into(),
            completed: true,
        });
        assert!(!runtime.robber_active());
    }

    #[test]
    fn test_leaving_dice_step_disarms() {
        let mut runtime = CatanRuntime::new(CatanSettings::default());
        runtime.on_transition(&dice_step(0));

        runtime.on_transition(&TransitionEvent::StepEntered {
            step: Step::instruction("turn-start-r1-p0", "Start"),
            phase_id: "round-1".into(),
            in_subflow: false,
        });

        assert!(!runtime.holds_advance());
    }

    #[test]
    fn test_history_is_newest_first_with_histogram() {
        let mut runtime = CatanRuntime::new(CatanSettings::default());
        runtime.record_roll(RollResult::new(4, 4, None, fixed_now()));
        runtime.record_roll(RollResult::new(1, 1, None, fixed_now()));
        runtime.record_roll(RollResult::new(5, 3, None, fixed_now()));

        assert_eq!(runtime.last_roll().map(|r| r.sum), Some(8));
        let sums: Vec<u32> = runtime.history().iter().map(|r| r.sum).collect();
        assert_eq!(sums, vec![8, 2, 8]);
        let histogram = runtime.histogram();
        assert_eq!(histogram[&8], 2);
        assert_eq!(histogram[&2], 1);
        assert_eq!(histogram[&7], 0);
        assert_eq!(histogram.len(), 11);
    }

    #[test]
    fn test_robber_checkpoint_follows_frequency() {
        let settings = CatanSettings {
            checkpoint_frequency: CheckpointFrequency::AfterRobber,
            ..CatanSettings::default()
        };
        let mut runtime = CatanRuntime::new(settings);

        let RollEffect::Robber { steps, .. } = runtime.record_roll(RollResult::new(3, 4, None, fixed_now()))
        else {
            panic!("expected robber");
        };

        assert!(steps.iter().any(Step::is_checkpoint));
    }
}
