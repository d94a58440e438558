//! Command handlers for sessions.
//!
//! Each handler loads the session, asks the [`ProgressionController`] for a
//! navigation plan and commits the plan's mutations as one atomic batch.
//! Blocked or no-op requests commit nothing.

use gamemaster_core::clock::Clock;
use gamemaster_core::error::DomainError;
use gamemaster_core::transition::TransitionEvent;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::commands::{
    AbandonSession, AddNote, AdvanceStep, ConfirmStep, CreateSession, DeleteSession, EndSession,
    JumpToPhase, JumpToStep, RecordCheckpoint, ResumePrimary, RetreatStep, SkipStep,
};
use crate::domain::mutations::{SessionMutation, apply};
use crate::domain::progression::{AdvanceOutcome, NavigationPlan, ProgressionController};
use crate::domain::repository::SessionStore;
use crate::domain::session::{Checkpoint, Note, PointerContext, Rating, Session, SessionStatus};
use crate::domain::subflow::ResumePolicy;

/// The committed session plus what the navigation request did.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCommandResult {
    /// The session after the commit (unchanged if nothing was committed).
    pub session: Session,
    /// What happened.
    pub outcome: AdvanceOutcome,
    /// Events for game runtimes, in order.
    pub events: Vec<TransitionEvent>,
}

/// Loads a session or fails with `DomainError::NotFound`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the session does not exist, or the
/// store's error if loading fails.
pub async fn load_session(store: &dyn SessionStore, session_id: Uuid) -> Result<Session, DomainError> {
    store
        .get(session_id)
        .await?
        .ok_or(DomainError::NotFound(session_id))
}

async fn commit(
    session: Session,
    plan: NavigationPlan,
    clock: &dyn Clock,
    store: &dyn SessionStore,
) -> Result<SessionCommandResult, DomainError> {
    let session = if plan.has_mutations() {
        store.update(session.id, &plan.mutations, clock.now()).await?
    } else {
        debug!(session_id = %session.id, outcome = ?plan.outcome, "nothing to commit");
        session
    };
    Ok(SessionCommandResult {
        session,
        outcome: plan.outcome,
        events: plan.events,
    })
}

/// Handles `CreateSession`: stores a fresh session positioned on the first
/// step and remembers the settings as the game's last-used settings.
///
/// # Errors
///
/// Returns the store's error if creation fails.
pub async fn handle_create_session(
    command: &CreateSession,
    clock: &dyn Clock,
    store: &dyn SessionStore,
) -> Result<Session, DomainError> {
    info!(correlation_id = %command.correlation_id, game_id = %command.game_id, "handling create_session command");
    let id = store
        .create(command.game_id, command.settings.clone(), clock.now())
        .await?;
    load_session(store, id).await
}

/// Handles `AdvanceStep`.
///
/// # Errors
///
/// Returns `DomainError::NotFound`, `DomainError::SessionClosed`, or the
/// store's error.
pub async fn handle_advance_step(
    command: &AdvanceStep,
    clock: &dyn Clock,
    store: &dyn SessionStore,
    controller: &ProgressionController<'_>,
) -> Result<SessionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling advance_step command");
    let session = load_session(store, command.session_id).await?;
    let plan = controller.advance(&session)?;
    commit(session, plan, clock, store).await
}

/// Handles `ConfirmStep`.
///
/// # Errors
///
/// Returns `DomainError::NotFound`, `DomainError::SessionClosed`, or the
/// store's error.
pub async fn handle_confirm_step(
    command: &ConfirmStep,
    clock: &dyn Clock,
    store: &dyn SessionStore,
    controller: &ProgressionController<'_>,
) -> Result<SessionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling confirm_step command");
    let session = load_session(store, command.session_id).await?;
    let plan = controller.confirm(&session)?;
    commit(session, plan, clock, store).await
}

/// Handles `SkipStep`.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the current step is not skippable,
/// plus the errors of [`handle_advance_step`].
pub async fn handle_skip_step(
    command: &SkipStep,
    clock: &dyn Clock,
    store: &dyn SessionStore,
    controller: &ProgressionController<'_>,
) -> Result<SessionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling skip_step command");
    let session = load_session(store, command.session_id).await?;
    let plan = controller.skip(&session)?;
    commit(session, plan, clock, store).await
}

/// Handles `RetreatStep`.
///
/// # Errors
///
/// Returns `DomainError::NotFound`, `DomainError::SessionClosed`, or the
/// store's error.
pub async fn handle_retreat_step(
    command: &RetreatStep,
    clock: &dyn Clock,
    store: &dyn SessionStore,
    controller: &ProgressionController<'_>,
) -> Result<SessionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling retreat_step command");
    let session = load_session(store, command.session_id).await?;
    let plan = controller.retreat(&session)?;
    commit(session, plan, clock, store).await
}

/// Handles `JumpToStep`.
///
/// # Errors
///
/// Returns `DomainError::InvalidPointer` if the pointer addresses no step,
/// plus the errors of [`handle_advance_step`].
pub async fn handle_jump_to_step(
    command: &JumpToStep,
    clock: &dyn Clock,
    store: &dyn SessionStore,
    controller: &ProgressionController<'_>,
) -> Result<SessionCommandResult, DomainError> {
    info!(
        correlation_id = %command.correlation_id,
        phase_index = command.pointer.phase_index,
        step_index = command.pointer.step_index,
        "handling jump_to_step command"
    );
    let session = load_session(store, command.session_id).await?;
    let plan = controller.jump_to(&session, command.pointer)?;
    commit(session, plan, clock, store).await
}

/// Handles `JumpToPhase`.
///
/// # Errors
///
/// Returns `DomainError::Validation` if no phase has the id, plus the errors
/// of [`handle_advance_step`].
pub async fn handle_jump_to_phase(
    command: &JumpToPhase,
    clock: &dyn Clock,
    store: &dyn SessionStore,
    controller: &ProgressionController<'_>,
) -> Result<SessionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, phase_id = %command.phase_id, "handling jump_to_phase command");
    let session = load_session(store, command.session_id).await?;
    let plan = controller.jump_to_phase(&session, &command.phase_id)?;
    commit(session, plan, clock, store).await
}

/// Handles `RecordCheckpoint` on a primary checkpoint step: appends the
/// rating and moves past the step in one commit.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an out-of-range rating or when the
/// current step is not a checkpoint, plus the errors of
/// [`handle_advance_step`].
pub async fn handle_record_checkpoint(
    command: &RecordCheckpoint,
    clock: &dyn Clock,
    store: &dyn SessionStore,
    controller: &ProgressionController<'_>,
) -> Result<SessionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, rating = command.rating, "handling record_checkpoint command");
    let session = load_session(store, command.session_id).await?;
    let context = controller
        .current_context(&session)
        .ok_or_else(|| DomainError::Validation("current step is not a checkpoint".to_owned()))?;
    let checkpoint = new_checkpoint(command, context, clock)?;
    let plan = controller.record_checkpoint(&session, checkpoint)?;
    commit(session, plan, clock, store).await
}

/// Appends a checkpoint taken at `context` without moving the pointer. Used
/// for checkpoint steps inside a subflow, whose position the primary pointer
/// does not track.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an out-of-range rating,
/// `DomainError::SessionClosed` for abandoned sessions, or the store's error.
pub async fn handle_record_subflow_checkpoint(
    command: &RecordCheckpoint,
    context: PointerContext,
    clock: &dyn Clock,
    store: &dyn SessionStore,
) -> Result<Session, DomainError> {
    info!(correlation_id = %command.correlation_id, phase_id = %context.phase_id, "handling record_checkpoint command in subflow");
    let session = load_session(store, command.session_id).await?;
    session.ensure_open()?;
    let checkpoint = new_checkpoint(command, context, clock)?;
    store
        .update(
            session.id,
            &[SessionMutation::AddCheckpoint(checkpoint)],
            clock.now(),
        )
        .await
}

fn new_checkpoint(
    command: &RecordCheckpoint,
    context: PointerContext,
    clock: &dyn Clock,
) -> Result<Checkpoint, DomainError> {
    Ok(Checkpoint {
        id: Uuid::new_v4(),
        rating: Rating::new(command.rating)?,
        note: command
            .note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
            .map(str::to_owned),
        created_at: clock.now(),
        context,
    })
}

/// Handles `AddNote`. The note is tied to the explicit context if given,
/// otherwise to the current primary step.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the text is blank or there is no
/// position to attach the note to, plus the errors of
/// [`handle_advance_step`].
pub async fn handle_add_note(
    command: &AddNote,
    clock: &dyn Clock,
    store: &dyn SessionStore,
    controller: &ProgressionController<'_>,
) -> Result<Session, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling add_note command");
    let text = command.text.trim();
    if text.is_empty() {
        return Err(DomainError::Validation("note text must not be empty".to_owned()));
    }
    let session = load_session(store, command.session_id).await?;
    session.ensure_open()?;
    let context = command
        .context
        .clone()
        .or_else(|| controller.current_context(&session))
        .ok_or_else(|| DomainError::Validation("no active step to attach the note to".to_owned()))?;
    let note = Note {
        id: Uuid::new_v4(),
        text: text.to_owned(),
        player_label: command.player_label.clone(),
        tags: command.tags.clone(),
        created_at: clock.now(),
        context,
    };
    store
        .update(session.id, &[SessionMutation::AddNote(note)], clock.now())
        .await
}

/// Handles `ResumePrimary` after a subflow exits.
///
/// The pointer is restored to the saved position. With
/// [`ResumePolicy::AdvancePrimary`] the step it addresses is then confirmed,
/// so the step that triggered the subflow is consumed exactly once.
///
/// # Errors
///
/// Returns `DomainError::InvalidPointer` if the saved pointer no longer
/// addresses a step, plus the errors of [`handle_advance_step`].
pub async fn handle_resume_primary(
    command: &ResumePrimary,
    clock: &dyn Clock,
    store: &dyn SessionStore,
    controller: &ProgressionController<'_>,
) -> Result<SessionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, policy = ?command.policy, "handling resume_primary command");
    let session = load_session(store, command.session_id).await?;
    let mut plan = if session.pointer == command.return_pointer {
        NavigationPlan::default()
    } else {
        controller.jump_to(&session, command.return_pointer)?
    };
    if command.policy == ResumePolicy::AdvancePrimary {
        let restored = apply(&session, &plan.mutations, clock.now());
        plan = plan.then(controller.confirm(&restored)?);
    }
    commit(session, plan, clock, store).await
}

/// Handles `EndSession`: marks the session completed.
///
/// # Errors
///
/// Returns `DomainError::NotFound`, `DomainError::SessionClosed`, or the
/// store's error.
pub async fn handle_end_session(
    command: &EndSession,
    clock: &dyn Clock,
    store: &dyn SessionStore,
) -> Result<Session, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling end_session command");
    set_status(command.session_id, SessionStatus::Completed, clock, store).await
}

/// Handles `AbandonSession`. Abandoned sessions reject further navigation.
///
/// # Errors
///
/// Returns `DomainError::NotFound`, `DomainError::SessionClosed`, or the
/// store's error.
pub async fn handle_abandon_session(
    command: &AbandonSession,
    clock: &dyn Clock,
    store: &dyn SessionStore,
) -> Result<Session, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling abandon_session command");
    set_status(command.session_id, SessionStatus::Abandoned, clock, store).await
}

async fn set_status(
    session_id: Uuid,
    status: SessionStatus,
    clock: &dyn Clock,
    store: &dyn SessionStore,
) -> Result<Session, DomainError> {
    let session = load_session(store, session_id).await?;
    session.ensure_open()?;
    store
        .update(session_id, &[SessionMutation::SetStatus(status)], clock.now())
        .await
}

/// Handles `DeleteSession`. Returns `true` if the session existed.
///
/// # Errors
///
/// Returns the store's error if deletion fails.
pub async fn handle_delete_session(
    command: &DeleteSession,
    store: &dyn SessionStore,
) -> Result<bool, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling delete_session command");
    store.delete(command.session_id).await
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use gamemaster_core::game::GameId;
    use gamemaster_core::linearizer::Pointer;
    use gamemaster_core::script::{Phase, Step};
    use gamemaster_test_support::{FixedClock, fixed_now};

    use super::*;
    use crate::infrastructure::memory::InMemorySessionStore;

    fn script() -> Vec<Phase> {
        vec![
            Phase::new(
                "turns",
                "Turns",
                "Round 1",
                vec![
                    Step::instruction("turn-start", "Pass the dice"),
                    Step::instruction("dice-roll", "Roll"),
                    Step::instruction("turn-end", "End turn"),
                    Step::checkpoint("checkpoint", "Rate the round"),
                ],
            )
            .in_round(1),
        ]
    }

    async fn create(store: &InMemorySessionStore, clock: &FixedClock) -> Session {
        handle_create_session(
            &CreateSession {
                correlation_id: Uuid::new_v4(),
                game_id: GameId::Catan,
                settings: serde_json::json!({"playerCount": 4}),
            },
            clock,
            store,
        )
        .await
        .unwrap()
    }

    fn advance(session: &Session) -> AdvanceStep {
        AdvanceStep {
            correlation_id: Uuid::new_v4(),
            session_id: session.id,
        }
    }

    #[tokio::test]
    async fn test_handle_advance_step_commits_pointer_and_completion() {
        // Arrange
        let store = InMemorySessionStore::new();
        let clock = FixedClock(fixed_now());
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let session = create(&store, &clock).await;

        // Act
        let result = handle_advance_step(&advance(&session), &clock, &store, &controller)
            .await
            .unwrap();

        // Assert
        assert_eq!(result.outcome, AdvanceOutcome::Moved(1));
        assert_eq!(result.session.pointer, Pointer::new(0, 1));
        assert!(result.session.completed_step_ids.contains("turn-start"));
        assert_eq!(load_session(&store, session.id).await.unwrap(), result.session);
    }

    #[tokio::test]
    async fn test_blocked_advance_commits_nothing() {
        let store = InMemorySessionStore::new();
        let clock = FixedClock(fixed_now());
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let session = create(&store, &clock).await;
        let jump = JumpToStep {
            correlation_id: Uuid::new_v4(),
            session_id: session.id,
            pointer: Pointer::new(0, 3),
        };
        let at_checkpoint = handle_jump_to_step(&jump, &clock, &store, &controller)
            .await
            .unwrap()
            .session;

        let result = handle_advance_step(&advance(&session), &clock, &store, &controller)
            .await
            .unwrap();

        assert!(matches!(result.outcome, AdvanceOutcome::Blocked(_)));
        assert_eq!(result.session.version, at_checkpoint.version);
    }

    #[tokio::test]
    async fn test_record_checkpoint_appends_and_completes_script() {
        let store = InMemorySessionStore::new();
        let clock = FixedClock(fixed_now());
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let session = create(&store, &clock).await;
        handle_jump_to_step(
            &JumpToStep {
                correlation_id: Uuid::new_v4(),
                session_id: session.id,
                pointer: Pointer::new(0, 3),
            },
            &clock,
            &store,
            &controller,
        )
        .await
        .unwrap();

        let result = handle_record_checkpoint(
            &RecordCheckpoint {
                correlation_id: Uuid::new_v4(),
                session_id: session.id,
                rating: 5,
                note: Some("  tense table  ".into()),
            },
            &clock,
            &store,
            &controller,
        )
        .await
        .unwrap();

        assert_eq!(result.outcome, AdvanceOutcome::Completed);
        assert_eq!(result.session.status, SessionStatus::Completed);
        assert_eq!(result.session.checkpoints.len(), 1);
        assert_eq!(result.session.checkpoints[0].note.as_deref(), Some("tense table"));
        assert_eq!(result.session.checkpoints[0].context.step_id, "checkpoint");
    }

    #[tokio::test]
    async fn test_record_checkpoint_rejects_out_of_range_rating() {
        let store = InMemorySessionStore::new();
        let clock = FixedClock(fixed_now());
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let session = create(&store, &clock).await;

        let result = handle_record_checkpoint(
            &RecordCheckpoint {
                correlation_id: Uuid::new_v4(),
                session_id: session.id,
                rating: 6,
                note: None,
            },
            &clock,
            &store,
            &controller,
        )
        .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_note_uses_current_step_context() {
        let store = InMemorySessionStore::new();
        let clock = FixedClock(fixed_now());
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let session = create(&store, &clock).await;
        let add = |text: &str| AddNote {
            correlation_id: Uuid::new_v4(),
            session_id: session.id,
            text: text.to_owned(),
            player_label: Some("Player B".into()),
            tags: vec!["rules".into()],
            context: None,
        };

        handle_add_note(&add("first"), &clock, &store, &controller).await.unwrap();
        let updated = handle_add_note(&add("second"), &clock, &store, &controller)
            .await
            .unwrap();

        assert_eq!(updated.notes[0].text, "second");
        assert_eq!(updated.notes[1].text, "first");
        assert_eq!(updated.notes[0].context.turn_label, "Round 1");
        assert!(matches!(
            handle_add_note(&add("   "), &clock, &store, &controller).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_resume_primary_consumes_triggering_step_once() {
        // Arrange: the robber subflow was entered from the dice-roll step.
        let store = InMemorySessionStore::new();
        let clock = FixedClock(fixed_now());
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let session = create(&store, &clock).await;
        handle_advance_step(&advance(&session), &clock, &store, &controller)
            .await
            .unwrap();

        // Act
        let result = handle_resume_primary(
            &ResumePrimary {
                correlation_id: Uuid::new_v4(),
                session_id: session.id,
                return_pointer: Pointer::new(0, 1),
                policy: ResumePolicy::AdvancePrimary,
            },
            &clock,
            &store,
            &controller,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(result.session.pointer, Pointer::new(0, 2));
        assert!(result.session.completed_step_ids.contains("dice-roll"));
    }

    #[tokio::test]
    async fn test_resume_primary_restore_returns_to_saved_pointer() {
        let store = InMemorySessionStore::new();
        let clock = FixedClock(fixed_now());
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let session = create(&store, &clock).await;

        let result = handle_resume_primary(
            &ResumePrimary {
                correlation_id: Uuid::new_v4(),
                session_id: session.id,
                return_pointer: Pointer::new(0, 2),
                policy: ResumePolicy::RestorePrimary,
            },
            &clock,
            &store,
            &controller,
        )
        .await
        .unwrap();

        assert_eq!(result.session.pointer, Pointer::new(0, 2));
        assert_eq!(result.outcome, AdvanceOutcome::Moved(2));
    }

    #[tokio::test]
    async fn test_abandoned_session_rejects_navigation() {
        let store = InMemorySessionStore::new();
        let clock = FixedClock(fixed_now());
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let session = create(&store, &clock).await;
        handle_abandon_session(
            &AbandonSession {
                correlation_id: Uuid::new_v4(),
                session_id: session.id,
            },
            &clock,
            &store,
        )
        .await
        .unwrap();

        let result = handle_advance_step(&advance(&session), &clock, &store, &controller).await;

        assert!(matches!(result, Err(DomainError::SessionClosed(id)) if id == session.id));
    }

    #[tokio::test]
    async fn test_end_session_marks_completed_with_clock_time() {
        let store = InMemorySessionStore::new();
        let session = create(&store, &FixedClock(fixed_now())).await;
        let later = FixedClock(fixed_now() + Duration::minutes(42));

        let ended = handle_end_session(
            &EndSession {
                correlation_id: Uuid::new_v4(),
                session_id: session.id,
            },
            &later,
            &store,
        )
        .await
        .unwrap();

        assert_eq!(ended.status, SessionStatus::Completed);
        assert_eq!(ended.updated_at, later.0);
    }

    #[tokio::test]
    async fn test_missing_session_is_not_found() {
        let store = InMemorySessionStore::new();
        let clock = FixedClock(fixed_now());
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let missing = Uuid::new_v4();

        let result = handle_advance_step(
            &AdvanceStep {
                correlation_id: Uuid::new_v4(),
                session_id: missing,
            },
            &clock,
            &store,
            &controller,
        )
        .await;

        assert!(matches!(result, Err(DomainError::NotFound(id)) if id == missing));
        assert!(
            !handle_delete_session(
                &DeleteSession {
                    correlation_id: Uuid::new_v4(),
                    session_id: missing,
                },
                &store,
            )
            .await
            .unwrap()
        );
    }
}
