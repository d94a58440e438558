//! Progression controller: the navigation state machine over a linearized
//! primary script.
//!
//! The controller never mutates a session. Each operation inspects the current
//! session and returns a [`NavigationPlan`]: the mutations to commit, the
//! outcome to report, and the transition events to hand to game runtimes.

use gamemaster_core::error::DomainError;
use gamemaster_core::linearizer::{Linearizer, Located, Pointer, locate};
use gamemaster_core::script::Phase;
use gamemaster_core::transition::TransitionEvent;
use serde::Serialize;
use tracing::warn;

use super::mutations::SessionMutation;
use super::session::{Checkpoint, PointerContext, Session, SessionStatus};

/// Where the moderator stands in the primary script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The pointer addresses no step (e.g. the script was regenerated with
    /// different settings). Treated as "no active step".
    BeforeStart,
    /// On the step with this global index.
    AtStep(usize),
    /// Past the last step.
    Complete,
}

/// Why a forward move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// The step needs an explicit confirmation.
    RequiresConfirm,
    /// The step is a checkpoint and needs a rating (or an explicit skip).
    CheckpointRating,
    /// A game runtime is holding navigation (e.g. a round timer is running).
    HeldByRuntime,
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The pointer now addresses this global index.
    Moved(usize),
    /// Nothing moved; the reason says what the caller must supply.
    Blocked(BlockReason),
    /// The pointer moved past the last step.
    Completed,
    /// Nothing to do (retreat at the first step, advance when complete).
    Unchanged,
}

/// Mutations, outcome and events produced by one navigation request.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationPlan {
    /// What happened.
    pub outcome: AdvanceOutcome,
    /// Mutations to commit atomically.
    pub mutations: Vec<SessionMutation>,
    /// Events for game runtimes, in order.
    pub events: Vec<TransitionEvent>,
}

impl NavigationPlan {
    fn unchanged() -> Self {
        Self {
            outcome: AdvanceOutcome::Unchanged,
            mutations: Vec::new(),
            events: Vec::new(),
        }
    }

    fn blocked(reason: BlockReason) -> Self {
        Self {
            outcome: AdvanceOutcome::Blocked(reason),
            mutations: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Appends `other`'s mutations and takes over its outcome and events.
    #[must_use]
    pub fn then(mut self, mut other: NavigationPlan) -> Self {
        self.mutations.append(&mut other.mutations);
        self.outcome = other.outcome;
        self.events = other.events;
        self
    }

    /// Returns `true` if committing the plan changes the session.
    #[must_use]
    pub fn has_mutations(&self) -> bool {
        !self.mutations.is_empty()
    }
}

impl Default for NavigationPlan {
    fn default() -> Self {
        Self::unchanged()
    }
}

/// Navigation over one generated primary script.
#[derive(Debug, Clone)]
pub struct ProgressionController<'a> {
    phases: &'a [Phase],
    linearizer: Linearizer,
}

impl<'a> ProgressionController<'a> {
    /// Builds a controller for `phases`.
    #[must_use]
    pub fn new(phases: &'a [Phase]) -> Self {
        Self {
            phases,
            linearizer: Linearizer::new(phases),
        }
    }

    /// The script being navigated.
    #[must_use]
    pub fn phases(&self) -> &'a [Phase] {
        self.phases
    }

    /// The pointer/index mapping for the script.
    #[must_use]
    pub fn linearizer(&self) -> &Linearizer {
        &self.linearizer
    }

    /// Number of steps in the script.
    #[must_use]
    pub fn len(&self) -> usize {
        self.linearizer.len()
    }

    /// Returns `true` when the script has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.linearizer.is_empty()
    }

    /// Resolves the session's pointer against this script.
    #[must_use]
    pub fn position(&self, session: &Session) -> Position {
        if self.linearizer.is_past_end(session.pointer) {
            return Position::Complete;
        }
        match self.linearizer.to_global_index(session.pointer) {
            Some(index) => Position::AtStep(index),
            None => {
                warn!(
                    session_id = %session.id,
                    phase_index = session.pointer.phase_index,
                    step_index = session.pointer.step_index,
                    "pointer does not address a step; treating as no active step"
                );
                Position::BeforeStart
            }
        }
    }

    /// The step at global `index`.
    #[must_use]
    pub fn step_at(&self, index: usize) -> Option<Located<'a>> {
        locate(self.phases, &self.linearizer, index)
    }

    /// The step the session currently stands on, if any.
    #[must_use]
    pub fn current(&self, session: &Session) -> Option<Located<'a>> {
        match self.position(session) {
            Position::AtStep(index) => self.step_at(index),
            Position::BeforeStart | Position::Complete => None,
        }
    }

    /// Note/checkpoint context for the step at `index`.
    #[must_use]
    pub fn context_at(&self, index: usize) -> Option<PointerContext> {
        self.step_at(index).map(|located| PointerContext {
            phase_id: located.phase.id.clone(),
            step_id: located.step.id.clone(),
            turn_label: located.phase.turn_label.clone(),
        })
    }

    /// Note/checkpoint context for the session's current step.
    #[must_use]
    pub fn current_context(&self, session: &Session) -> Option<PointerContext> {
        match self.position(session) {
            Position::AtStep(index) => self.context_at(index),
            Position::BeforeStart | Position::Complete => None,
        }
    }

    /// Generic "next". Refused on confirm-gated and checkpoint steps.
    ///
    /// From [`Position::BeforeStart`] the pointer is clamped to the first step.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionClosed` for abandoned sessions.
    pub fn advance(&self, session: &Session) -> Result<NavigationPlan, DomainError> {
        session.ensure_open()?;
        Ok(match self.position(session) {
            Position::BeforeStart => self.restart(session),
            Position::Complete => NavigationPlan::unchanged(),
            Position::AtStep(index) => match self.step_at(index) {
                Some(located) if located.step.requires_confirm => {
                    NavigationPlan::blocked(BlockReason::RequiresConfirm)
                }
                Some(located) if located.step.is_checkpoint() => {
                    NavigationPlan::blocked(BlockReason::CheckpointRating)
                }
                _ => self.forward(session, index),
            },
        })
    }

    /// Explicit confirmation. Moves past any step except a checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionClosed` for abandoned sessions.
    pub fn confirm(&self, session: &Session) -> Result<NavigationPlan, DomainError> {
        session.ensure_open()?;
        Ok(match self.position(session) {
            Position::BeforeStart => self.restart(session),
            Position::Complete => NavigationPlan::unchanged(),
            Position::AtStep(index) => match self.step_at(index) {
                Some(located) if located.step.is_checkpoint() => {
                    NavigationPlan::blocked(BlockReason::CheckpointRating)
                }
                _ => self.forward(session, index),
            },
        })
    }

    /// Moves past a skippable step without marking it complete.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionClosed` for abandoned sessions and
    /// `DomainError::Validation` if the current step is not skippable.
    pub fn skip(&self, session: &Session) -> Result<NavigationPlan, DomainError> {
        session.ensure_open()?;
        match self.position(session) {
            Position::BeforeStart => Ok(self.restart(session)),
            Position::Complete => Ok(NavigationPlan::unchanged()),
            Position::AtStep(index) => match self.step_at(index) {
                Some(located) if located.step.can_skip => {
                    let mut plan = self.forward(session, index);
                    plan.mutations
                        .retain(|m| !matches!(m, SessionMutation::MarkStepComplete(_)));
                    Ok(plan)
                }
                Some(located) => Err(DomainError::Validation(format!(
                    "step '{}' cannot be skipped",
                    located.step.id
                ))),
                None => Ok(NavigationPlan::unchanged()),
            },
        }
    }

    /// Appends `checkpoint` and moves past the current checkpoint step.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionClosed` for abandoned sessions and
    /// `DomainError::Validation` if the current step is not a checkpoint.
    pub fn record_checkpoint(
        &self,
        session: &Session,
        checkpoint: Checkpoint,
    ) -> Result<NavigationPlan, DomainError> {
        session.ensure_open()?;
        let index = match self.position(session) {
            Position::AtStep(index)
                if self
                    .step_at(index)
                    .is_some_and(|located| located.step.is_checkpoint()) =>
            {
                index
            }
            _ => {
                return Err(DomainError::Validation(
                    "current step is not a checkpoint".to_owned(),
                ));
            }
        };
        let mut plan = self.forward(session, index);
        plan.mutations
            .insert(0, SessionMutation::AddCheckpoint(checkpoint));
        Ok(plan)
    }

    /// Moves one step back. A no-op on the first step. From
    /// [`Position::Complete`] it returns to the last step and reopens the
    /// session.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionClosed` for abandoned sessions.
    pub fn retreat(&self, session: &Session) -> Result<NavigationPlan, DomainError> {
        session.ensure_open()?;
        Ok(match self.position(session) {
            Position::BeforeStart | Position::AtStep(0) => NavigationPlan::unchanged(),
            Position::AtStep(index) => self.move_to(session, index - 1),
            Position::Complete if self.is_empty() => NavigationPlan::unchanged(),
            Position::Complete => self.move_to(session, self.len() - 1),
        })
    }

    /// Unconditional move to `pointer`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionClosed` for abandoned sessions and
    /// `DomainError::InvalidPointer` if `pointer` addresses no step.
    pub fn jump_to(&self, session: &Session, pointer: Pointer) -> Result<NavigationPlan, DomainError> {
        session.ensure_open()?;
        let index = self
            .linearizer
            .to_global_index(pointer)
            .ok_or(DomainError::InvalidPointer {
                phase_index: pointer.phase_index,
                step_index: pointer.step_index,
            })?;
        Ok(self.move_to(session, index))
    }

    /// Unconditional move to the first step of the phase with id `phase_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionClosed` for abandoned sessions and
    /// `DomainError::Validation` if no non-empty phase has that id.
    pub fn jump_to_phase(
        &self,
        session: &Session,
        phase_id: &str,
    ) -> Result<NavigationPlan, DomainError> {
        session.ensure_open()?;
        let index = self
            .phases
            .iter()
            .position(|phase| phase.id == phase_id)
            .and_then(|phase_index| self.linearizer.phase_start(phase_index))
            .ok_or_else(|| DomainError::Validation(format!("no phase with id '{phase_id}'")))?;
        Ok(self.move_to(session, index))
    }

    fn restart(&self, session: &Session) -> NavigationPlan {
        if self.is_empty() {
            return self.finish();
        }
        self.move_to(session, 0)
    }

    fn forward(&self, session: &Session, index: usize) -> NavigationPlan {
        let mut mutations = Vec::with_capacity(3);
        if let Some(located) = self.step_at(index) {
            mutations.push(SessionMutation::MarkStepComplete(located.step.id.clone()));
        }
        let next = index + 1;
        if next < self.len() {
            let mut plan = self.move_to(session, next);
            mutations.append(&mut plan.mutations);
            plan.mutations = mutations;
            plan
        } else {
            let mut plan = self.finish();
            mutations.append(&mut plan.mutations);
            plan.mutations = mutations;
            plan
        }
    }

    fn move_to(&self, session: &Session, index: usize) -> NavigationPlan {
        let Some(located) = self.step_at(index) else {
            return NavigationPlan::unchanged();
        };
        let mut mutations = vec![SessionMutation::MovePointer(located.pointer)];
        if session.status == SessionStatus::Completed {
            mutations.push(SessionMutation::SetStatus(SessionStatus::InProgress));
        }
        NavigationPlan {
            outcome: AdvanceOutcome::Moved(index),
            mutations,
            events: vec![TransitionEvent::StepEntered {
                step: located.step.clone(),
                phase_id: located.phase.id.clone(),
                in_subflow: false,
            }],
        }
    }

    fn finish(&self) -> NavigationPlan {
        NavigationPlan {
            outcome: AdvanceOutcome::Completed,
            mutations: vec![
                SessionMutation::MovePointer(self.linearizer.past_end()),
                SessionMutation::SetStatus(SessionStatus::Completed),
            ],
            events: vec![TransitionEvent::ScriptCompleted],
        }
    }
}

#[cfg(test)]
mod tests {
    use gamemaster_core::game::GameId;
    use gamemaster_core::script::Step;
    use gamemaster_test_support::fixed_now;
    use uuid::Uuid;

    use super::*;
    use crate::domain::mutations::apply;
    use crate::domain::session::Rating;

    fn script() -> Vec<Phase> {
        vec![
            Phase::new(
                "setup",
                "Setup",
                "Setup",
                vec![
                    Step::instruction("s1", "Shuffle"),
                    Step::instruction("s2", "Ready?").confirm(),
                ],
            ),
            Phase::new(
                "round-1",
                "Round 1",
                "Round 1",
                vec![
                    Step::instruction("r1", "Play").skippable(),
                    Step::checkpoint("cp1", "Rate the round"),
                ],
            )
            .in_round(1),
        ]
    }

    fn session() -> Session {
        Session::new(Uuid::new_v4(), GameId::Werewolf, serde_json::json!({}), fixed_now())
    }

    fn commit(session: &Session, plan: &NavigationPlan) -> Session {
        apply(session, &plan.mutations, fixed_now())
    }

    fn checkpoint(controller: &ProgressionController<'_>, session: &Session) -> Checkpoint {
        Checkpoint {
            id: Uuid::new_v4(),
            rating: Rating::new(4).unwrap(),
            note: None,
            created_at: fixed_now(),
            context: controller.current_context(session).unwrap(),
        }
    }

    #[test]
    fn test_advance_moves_and_marks_departed_step_complete() {
        // Arrange
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let session = session();

        // Act
        let plan = controller.advance(&session).unwrap();
        let next = commit(&session, &plan);

        // Assert
        assert_eq!(plan.outcome, AdvanceOutcome::Moved(1));
        assert_eq!(next.pointer, Pointer::new(0, 1));
        assert!(next.completed_step_ids.contains("s1"));
        assert!(matches!(
            &plan.events[..],
            [TransitionEvent::StepEntered { step, .. }] if step.id == "s2"
        ));
    }

    #[test]
    fn test_advance_is_blocked_on_confirm_step_until_confirmed() {
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let mut session = session();
        session.pointer = Pointer::new(0, 1);

        let blocked = controller.advance(&session).unwrap();
        assert_eq!(
            blocked.outcome,
            AdvanceOutcome::Blocked(BlockReason::RequiresConfirm)
        );
        assert!(!blocked.has_mutations());

        let confirmed = controller.confirm(&session).unwrap();
        assert_eq!(confirmed.outcome, AdvanceOutcome::Moved(2));
    }

    #[test]
    fn test_checkpoint_blocks_advance_and_confirm_until_rated() {
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let mut session = session();
        session.pointer = Pointer::new(1, 1);

        assert_eq!(
            controller.advance(&session).unwrap().outcome,
            AdvanceOutcome::Blocked(BlockReason::CheckpointRating)
        );
        assert_eq!(
            controller.confirm(&session).unwrap().outcome,
            AdvanceOutcome::Blocked(BlockReason::CheckpointRating)
        );

        let cp = checkpoint(&controller, &session);
        let plan = controller.record_checkpoint(&session, cp).unwrap();
        let next = commit(&session, &plan);

        assert_eq!(plan.outcome, AdvanceOutcome::Completed);
        assert_eq!(next.checkpoints.len(), 1);
        assert_eq!(next.checkpoints[0].context.step_id, "cp1");
        assert_eq!(next.status, SessionStatus::Completed);
        assert_eq!(next.pointer, controller.linearizer().past_end());
    }

    #[test]
    fn test_record_checkpoint_outside_checkpoint_step_is_rejected() {
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let session = session();
        let cp = checkpoint(&controller, &session);

        let result = controller.record_checkpoint(&session, cp);

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_skip_moves_without_marking_complete() {
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let mut session = session();
        session.pointer = Pointer::new(1, 1);

        let plan = controller.skip(&session).unwrap();
        let next = commit(&session, &plan);

        assert_eq!(plan.outcome, AdvanceOutcome::Completed);
        assert!(!next.completed_step_ids.contains("cp1"));
    }

    #[test]
    fn test_skip_rejects_non_skippable_step() {
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let result = controller.skip(&session());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_retreat_is_noop_on_first_step() {
        let phases = script();
        let controller = ProgressionController::new(&phases);

        let plan = controller.retreat(&session()).unwrap();

        assert_eq!(plan.outcome, AdvanceOutcome::Unchanged);
        assert!(!plan.has_mutations());
    }

    #[test]
    fn test_retreat_from_complete_reopens_on_last_step() {
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let mut session = session();
        session.pointer = controller.linearizer().past_end();
        session.status = SessionStatus::Completed;
        assert_eq!(controller.position(&session), Position::Complete);

        let plan = controller.retreat(&session).unwrap();
        let next = commit(&session, &plan);

        assert_eq!(plan.outcome, AdvanceOutcome::Moved(3));
        assert_eq!(next.pointer, Pointer::new(1, 1));
        assert_eq!(next.status, SessionStatus::InProgress);
    }

    #[test]
    fn test_out_of_range_pointer_resolves_to_before_start_and_clamps() {
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let mut session = session();
        session.pointer = Pointer::new(0, 7);

        assert_eq!(controller.position(&session), Position::BeforeStart);
        assert!(controller.current(&session).is_none());

        let plan = controller.advance(&session).unwrap();

        assert_eq!(plan.outcome, AdvanceOutcome::Moved(0));
        assert_eq!(commit(&session, &plan).pointer, Pointer::START);
    }

    #[test]
    fn test_jump_to_invalid_pointer_is_rejected() {
        let phases = script();
        let controller = ProgressionController::new(&phases);

        let result = controller.jump_to(&session(), Pointer::new(5, 0));

        match result {
            Err(DomainError::InvalidPointer {
                phase_index,
                step_index,
            }) => {
                assert_eq!(phase_index, 5);
                assert_eq!(step_index, 0);
            }
            other => panic!("expected InvalidPointer, got {other:?}"),
        }
    }

    #[test]
    fn test_jump_to_phase_lands_on_first_step() {
        let phases = script();
        let controller = ProgressionController::new(&phases);

        let plan = controller.jump_to_phase(&session(), "round-1").unwrap();

        assert_eq!(plan.outcome, AdvanceOutcome::Moved(2));
        assert!(plan.mutations.contains(&SessionMutation::MovePointer(Pointer::new(1, 0))));
    }

    #[test]
    fn test_abandoned_session_rejects_navigation() {
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let mut session = session();
        session.status = SessionStatus::Abandoned;

        assert!(matches!(
            controller.advance(&session),
            Err(DomainError::SessionClosed(_))
        ));
        assert!(matches!(
            controller.retreat(&session),
            Err(DomainError::SessionClosed(_))
        ));
    }

    #[test]
    fn test_walking_the_whole_script_completes_it() {
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let mut session = session();

        session = commit(&session, &controller.advance(&session).unwrap());
        session = commit(&session, &controller.confirm(&session).unwrap());
        session = commit(&session, &controller.advance(&session).unwrap());
        let cp = checkpoint(&controller, &session);
        let last = controller.record_checkpoint(&session, cp).unwrap();
        session = commit(&session, &last);

        assert_eq!(controller.position(&session), Position::Complete);
        assert_eq!(session.completed_step_ids.len(), 4);
        assert_eq!(last.events, vec![TransitionEvent::ScriptCompleted]);
        assert_eq!(
            controller.advance(&session).unwrap().outcome,
            AdvanceOutcome::Unchanged
        );
    }
}
