//! Subflow manager: splices a temporary step sequence into navigation.
//!
//! While a subflow is active, navigation walks the subflow's steps instead of
//! the primary script. The session's primary pointer is never touched by the
//! subflow; it is saved on entry and handed back on exit together with a
//! [`ResumePolicy`] telling the caller what to do with it.

use gamemaster_core::error::DomainError;
use gamemaster_core::linearizer::Pointer;
use gamemaster_core::script::Step;
use gamemaster_core::transition::TransitionEvent;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::progression::BlockReason;
use super::session::PointerContext;

/// What happens to the primary pointer when a subflow ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumePolicy {
    /// Restore the saved pointer, then confirm the step it addresses, so the
    /// primary step that triggered the subflow is consumed exactly once.
    #[default]
    AdvancePrimary,
    /// Restore the saved pointer verbatim.
    RestorePrimary,
}

/// Hand-back from an exited subflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubflowExit {
    /// The subflow's label.
    pub label: String,
    /// The primary pointer saved on entry.
    pub return_pointer: Pointer,
    /// What to do with `return_pointer`.
    pub policy: ResumePolicy,
    /// `true` when the last step was walked past; `false` when cancelled.
    pub completed: bool,
}

/// Outcome of a navigation request inside a subflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubflowOutcome {
    /// Now on the subflow step with this index.
    Moved(usize),
    /// Nothing moved.
    Blocked(BlockReason),
    /// Nothing to do (retreat on the first subflow step).
    Unchanged,
    /// The subflow ended.
    Exited(SubflowExit),
}

/// Outcome plus the transition events it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubflowTransition {
    /// What happened.
    pub outcome: SubflowOutcome,
    /// Events for game runtimes, in order.
    pub events: Vec<TransitionEvent>,
}

impl SubflowTransition {
    fn quiet(outcome: SubflowOutcome) -> Self {
        Self {
            outcome,
            events: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct ActiveSubflow {
    label: String,
    title: String,
    steps: Vec<Step>,
    index: usize,
    return_pointer: Pointer,
    policy: ResumePolicy,
}

impl ActiveSubflow {
    fn entered(&self) -> TransitionEvent {
        TransitionEvent::StepEntered {
            step: self.steps[self.index].clone(),
            phase_id: self.label.clone(),
            in_subflow: true,
        }
    }
}

/// Holds at most one active subflow.
#[derive(Debug, Clone, Default)]
pub struct SubflowManager {
    active: Option<ActiveSubflow>,
}

impl SubflowManager {
    /// Creates a manager with no active subflow.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a subflow replaces the primary sequence.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Label of the active subflow.
    #[must_use]
    pub fn active_label(&self) -> Option<&str> {
        self.active.as_ref().map(|s| s.label.as_str())
    }

    /// Display title of the active subflow.
    #[must_use]
    pub fn active_title(&self) -> Option<&str> {
        self.active.as_ref().map(|s| s.title.as_str())
    }

    /// The active subflow step.
    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.active.as_ref().map(|s| &s.steps[s.index])
    }

    /// `(index, len)` inside the active subflow.
    #[must_use]
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.active.as_ref().map(|s| (s.index, s.steps.len()))
    }

    /// Note/checkpoint context for the active subflow step.
    #[must_use]
    pub fn current_context(&self) -> Option<PointerContext> {
        self.active.as_ref().map(|s| PointerContext {
            phase_id: s.label.clone(),
            step_id: s.steps[s.index].id.clone(),
            turn_label: s.title.clone(),
        })
    }

    /// Starts a subflow on its first step, saving `return_pointer`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SubflowConflict` if a subflow is already active,
    /// and `DomainError::Validation` if `steps` is empty.
    pub fn enter(
        &mut self,
        label: impl Into<String>,
        title: impl Into<String>,
        steps: Vec<Step>,
        return_pointer: Pointer,
        policy: ResumePolicy,
    ) -> Result<SubflowTransition, DomainError> {
        if let Some(active) = &self.active {
            return Err(DomainError::SubflowConflict {
                active: active.label.clone(),
            });
        }
        let label = label.into();
        if steps.is_empty() {
            return Err(DomainError::Validation(format!(
                "subflow '{label}' has no steps"
            )));
        }
        debug!(subflow = %label, steps = steps.len(), ?policy, "entering subflow");
        let subflow = ActiveSubflow {
            label: label.clone(),
            title: title.into(),
            steps,
            index: 0,
            return_pointer,
            policy,
        };
        let events = vec![TransitionEvent::SubflowEntered { label }, subflow.entered()];
        self.active = Some(subflow);
        Ok(SubflowTransition {
            outcome: SubflowOutcome::Moved(0),
            events,
        })
    }

    /// Generic "next" inside the subflow, with the same gating as the primary
    /// script. Walking past the last step exits the subflow.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if no subflow is active.
    pub fn advance(&mut self) -> Result<SubflowTransition, DomainError> {
        let step = self.require_step()?;
        if step.requires_confirm {
            return Ok(SubflowTransition::quiet(SubflowOutcome::Blocked(
                BlockReason::RequiresConfirm,
            )));
        }
        if step.is_checkpoint() {
            return Ok(SubflowTransition::quiet(SubflowOutcome::Blocked(
                BlockReason::CheckpointRating,
            )));
        }
        Ok(self.forward())
    }

    /// Explicit confirmation inside the subflow.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if no subflow is active.
    pub fn confirm(&mut self) -> Result<SubflowTransition, DomainError> {
        if self.require_step()?.is_checkpoint() {
            return Ok(SubflowTransition::quiet(SubflowOutcome::Blocked(
                BlockReason::CheckpointRating,
            )));
        }
        Ok(self.forward())
    }

    /// Moves past a subflow checkpoint step once its rating is recorded.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if no subflow is active or the
    /// current subflow step is not a checkpoint.
    pub fn record_checkpoint(&mut self) -> Result<SubflowTransition, DomainError> {
        if !self.require_step()?.is_checkpoint() {
            return Err(DomainError::Validation(
                "current subflow step is not a checkpoint".to_owned(),
            ));
        }
        Ok(self.forward())
    }

    /// Moves past a skippable subflow step.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if no subflow is active or the step
    /// is not skippable.
    pub fn skip(&mut self) -> Result<SubflowTransition, DomainError> {
        let step = self.require_step()?;
        if !step.can_skip {
            return Err(DomainError::Validation(format!(
                "step '{}' cannot be skipped",
                step.id
            )));
        }
        Ok(self.forward())
    }

    /// One step back inside the subflow; a no-op on its first step.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if no subflow is active.
    pub fn retreat(&mut self) -> Result<SubflowTransition, DomainError> {
        let active = self.require_active()?;
        if active.index == 0 {
            return Ok(SubflowTransition::quiet(SubflowOutcome::Unchanged));
        }
        active.index -= 1;
        Ok(SubflowTransition {
            outcome: SubflowOutcome::Moved(active.index),
            events: vec![active.entered()],
        })
    }

    /// Discards the subflow without finishing it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if no subflow is active.
    pub fn exit(&mut self) -> Result<SubflowTransition, DomainError> {
        self.require_active()?;
        Ok(self.close(false))
    }

    fn forward(&mut self) -> SubflowTransition {
        let Some(active) = self.active.as_mut() else {
            return SubflowTransition::quiet(SubflowOutcome::Unchanged);
        };
        if active.index + 1 < active.steps.len() {
            active.index += 1;
            return SubflowTransition {
                outcome: SubflowOutcome::Moved(active.index),
                events: vec![active.entered()],
            };
        }
        self.close(true)
    }

    fn close(&mut self, completed: bool) -> SubflowTransition {
        let Some(active) = self.active.take() else {
            return SubflowTransition::quiet(SubflowOutcome::Unchanged);
        };
        debug!(subflow = %active.label, completed, "leaving subflow");
        SubflowTransition {
            events: vec![TransitionEvent::SubflowExited {
                label: active.label.clone(),
                completed,
            }],
            outcome: SubflowOutcome::Exited(SubflowExit {
                label: active.label,
                return_pointer: active.return_pointer,
                policy: active.policy,
                completed,
            }),
        }
    }

    fn require_active(&mut self) -> Result<&mut ActiveSubflow, DomainError> {
        self.active
            .as_mut()
            .ok_or_else(|| DomainError::Validation("no active subflow".to_owned()))
    }

    fn require_step(&self) -> Result<&Step, DomainError> {
        self.current_step()
            .ok_or_else(|| DomainError::Validation("no active subflow".to_owned()))
    }
}
