//! Step/phase model shared by every script factory.
//!
//! A script is an ordered list of [`Phase`]s, each an ordered list of
//! [`Step`]s. Factories build scripts as pure functions of settings: step and
//! phase ids are derived from settings and position, never from randomness or
//! the current time, so regenerating a script yields the same sequence.

use serde::{Deserialize, Serialize};

/// Tag that determines how the progression controller treats a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepKind {
    /// A plain instruction read out or performed by the moderator.
    Instruction,
    /// A point where the moderator records a 1-5 rating.
    Checkpoint,
}

/// Structured role of a step that a game runtime reacts to.
///
/// Runtimes match on the marker instead of inspecting display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepMarker {
    /// The acting player rolls the dice.
    DiceRoll,
    /// A timed round is running (the step carries `timer_seconds`).
    RoundTimer,
    /// Leaders exchange hostages between rooms.
    HostageSwap,
}

/// One atomic instruction shown to the moderator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Stable identifier, unique within its script.
    pub id: String,
    /// Instruction or checkpoint.
    pub kind: StepKind,
    /// Display text. Opaque to the engine.
    pub text: String,
    /// Optional secondary display text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    /// Advisory only; navigation is never blocked on it.
    pub can_skip: bool,
    /// The step needs an explicit confirmation rather than a generic "next".
    #[serde(default)]
    pub requires_confirm: bool,
    /// Countdown attached to the step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_seconds: Option<u32>,
    /// Structured role for game runtimes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<StepMarker>,
    /// Seat index of the player the step is about, fixed at generation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_index: Option<usize>,
    /// Round the step belongs to, fixed at generation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_number: Option<u32>,
}

impl Step {
    /// Creates a non-skippable instruction step.
    #[must_use]
    pub fn instruction(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: StepKind::Instruction,
            text: text.into(),
            helper_text: None,
            can_skip: false,
            requires_confirm: false,
            timer_seconds: None,
            marker: None,
            player_index: None,
            round_number: None,
        }
    }

    /// Creates a checkpoint step. Checkpoints are always skippable.
    #[must_use]
    pub fn checkpoint(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: StepKind::Checkpoint,
            can_skip: true,
            ..Self::instruction(id, text)
        }
    }

    /// Sets the helper text.
    #[must_use]
    pub fn helper(mut self, helper: impl Into<String>) -> Self {
        self.helper_text = Some(helper.into());
        self
    }

    /// Sets or clears the helper text.
    #[must_use]
    pub fn maybe_helper(mut self, helper: Option<String>) -> Self {
        self.helper_text = helper;
        self
    }

    /// Marks the step as skippable.
    #[must_use]
    pub fn skippable(mut self) -> Self {
        self.can_skip = true;
        self
    }

    /// Requires an explicit confirmation before moving past the step.
    #[must_use]
    pub fn confirm(mut self) -> Self {
        self.requires_confirm = true;
        self
    }

    /// Attaches a countdown.
    #[must_use]
    pub fn timer(mut self, seconds: u32) -> Self {
        self.timer_seconds = Some(seconds);
        self
    }

    /// Attaches a structured marker.
    #[must_use]
    pub fn marker(mut self, marker: StepMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Records the seat index the step refers to.
    #[must_use]
    pub fn for_player(mut self, player_index: usize) -> Self {
        self.player_index = Some(player_index);
        self
    }

    /// Records the round the step belongs to.
    #[must_use]
    pub fn in_round(mut self, round_number: u32) -> Self {
        self.round_number = Some(round_number);
        self
    }

    /// Returns `true` for checkpoint steps.
    #[must_use]
    pub fn is_checkpoint(&self) -> bool {
        self.kind == StepKind::Checkpoint
    }
}

/// An ordered group of steps with a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Stable identifier, unique within its script.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Short label identifying the round or phase ("Round 3", "Night 2").
    pub turn_label: String,
    /// Round number, when the phase is one iteration of a repeating loop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_number: Option<u32>,
    /// The phase's steps, in order.
    pub steps: Vec<Step>,
}

impl Phase {
    /// Creates a phase.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        turn_label: impl Into<String>,
        steps: Vec<Step>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            turn_label: turn_label.into(),
            round_number: None,
            steps,
        }
    }

    /// Records the round this phase belongs to.
    #[must_use]
    pub fn in_round(mut self, round_number: u32) -> Self {
        self.round_number = Some(round_number);
        self
    }
}

/// A full generated script.
pub type Script = Vec<Phase>;

/// A step that is only kept when its condition holds.
#[derive(Debug, Clone)]
pub struct ConditionalStep<C> {
    /// The candidate step.
    pub step: Step,
    /// Condition that must hold for the step to be kept. `None` always keeps.
    pub condition: Option<C>,
}

impl<C> ConditionalStep<C> {
    /// A step with no condition.
    #[must_use]
    pub fn always(step: Step) -> Self {
        Self {
            step,
            condition: None,
        }
    }

    /// A step kept only when `condition` holds.
    #[must_use]
    pub fn when(condition: C, step: Step) -> Self {
        Self {
            step,
            condition: Some(condition),
        }
    }
}

/// Drops the steps whose condition does not hold, preserving the relative
/// order of the remaining ones.
pub fn filter_steps<C>(
    steps: Vec<ConditionalStep<C>>,
    mut holds: impl FnMut(&C) -> bool,
) -> Vec<Step> {
    steps
        .into_iter()
        .filter(|candidate| candidate.condition.as_ref().is_none_or(&mut holds))
        .map(|candidate| candidate.step)
        .collect()
}

/// Flattened step ids of a script, in navigation order.
#[must_use]
pub fn step_ids(phases: &[Phase]) -> Vec<&str> {
    phases
        .iter()
        .flat_map(|phase| phase.steps.iter().map(|step| step.id.as_str()))
        .collect()
}

/// Total number of steps in a script.
#[must_use]
pub fn step_count(phases: &[Phase]) -> usize {
    phases.iter().map(|phase| phase.steps.len()).sum()
}
