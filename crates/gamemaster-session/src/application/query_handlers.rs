//! Query handlers for sessions.
//!
//! This module contains query handlers that load sessions from the store and
//! return read-only view DTOs.

use chrono::{DateTime, Utc};
use gamemaster_core::clock::Clock;
use gamemaster_core::error::DomainError;
use gamemaster_core::game::GameId;
use gamemaster_core::linearizer::Pointer;
use gamemaster_core::script::Step;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers::load_session;
use crate::domain::progression::{Position, ProgressionController};
use crate::domain::repository::SessionStore;
use crate::domain::session::{Session, SessionStatus};

/// Read-only view of a session, for session lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    /// The session identifier.
    pub session_id: Uuid,
    /// Which game is being played.
    pub game_id: GameId,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Position in the primary script.
    pub pointer: Pointer,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the last mutation.
    pub updated_at: DateTime<Utc>,
    /// Number of steps moved past.
    pub completed_steps: usize,
    /// Number of notes.
    pub note_count: usize,
    /// Number of checkpoints.
    pub checkpoint_count: usize,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            game_id: session.game_id,
            status: session.status,
            pointer: session.pointer,
            created_at: session.created_at,
            updated_at: session.updated_at,
            completed_steps: session.completed_step_ids.len(),
            note_count: session.notes.len(),
            checkpoint_count: session.checkpoints.len(),
        }
    }
}

/// The step the moderator is on, with its surroundings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentStepView {
    /// Id of the enclosing phase.
    pub phase_id: String,
    /// Title of the enclosing phase.
    pub phase_title: String,
    /// Round/phase label.
    pub turn_label: String,
    /// The step itself.
    pub step: Step,
    /// Global index of the step.
    pub index: usize,
    /// Total number of steps in the script.
    pub total: usize,
    /// Whether the moderator moved past this step before.
    pub completed: bool,
}

/// End-of-game statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    /// The session identifier.
    pub session_id: Uuid,
    /// Which game was played.
    pub game_id: GameId,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Seconds between creation and the end of the session (or now, while it
    /// is still in progress).
    pub duration_seconds: i64,
    /// Number of steps moved past.
    pub completed_steps: usize,
    /// Number of steps in the script.
    pub total_steps: usize,
    /// Mean checkpoint rating.
    pub checkpoint_average: Option<f64>,
    /// Number of checkpoints.
    pub checkpoint_count: usize,
    /// Number of notes.
    pub note_count: usize,
}

/// Retrieves a session by its ID.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the session does not exist.
pub async fn get_session_by_id(
    session_id: Uuid,
    store: &dyn SessionStore,
) -> Result<SessionView, DomainError> {
    let session = load_session(store, session_id).await?;
    Ok(SessionView::from(&session))
}

/// Lists every session, newest first.
///
/// # Errors
///
/// Returns the store's error if listing fails.
pub async fn list_sessions(store: &dyn SessionStore) -> Result<Vec<SessionView>, DomainError> {
    Ok(store.list().await?.iter().map(SessionView::from).collect())
}

/// Resolves the session's current step against `controller`'s script.
/// `None` when the pointer addresses no step or the script is complete.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the session does not exist.
pub async fn get_current_step(
    session_id: Uuid,
    store: &dyn SessionStore,
    controller: &ProgressionController<'_>,
) -> Result<Option<CurrentStepView>, DomainError> {
    let session = load_session(store, session_id).await?;
    Ok(current_step_view(&session, controller))
}

/// Builds the current step view for an already loaded session.
#[must_use]
pub fn current_step_view(
    session: &Session,
    controller: &ProgressionController<'_>,
) -> Option<CurrentStepView> {
    let Position::AtStep(index) = controller.position(session) else {
        return None;
    };
    controller.step_at(index).map(|located| CurrentStepView {
        phase_id: located.phase.id.clone(),
        phase_title: located.phase.title.clone(),
        turn_label: located.phase.turn_label.clone(),
        step: located.step.clone(),
        index,
        total: controller.len(),
        completed: session.completed_step_ids.contains(&located.step.id),
    })
}

/// Computes end-of-game statistics.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the session does not exist.
pub async fn summarize_session(
    session_id: Uuid,
    clock: &dyn Clock,
    store: &dyn SessionStore,
    controller: &ProgressionController<'_>,
) -> Result<SessionSummary, DomainError> {
    let session = load_session(store, session_id).await?;
    let ended_at = match session.status {
        SessionStatus::InProgress => clock.now(),
        SessionStatus::Completed | SessionStatus::Abandoned => session.updated_at,
    };
    Ok(SessionSummary {
        session_id,
        game_id: session.game_id,
        status: session.status,
        duration_seconds: (ended_at - session.created_at).num_seconds().max(0),
        completed_steps: session.completed_step_ids.len(),
        total_steps: controller.len(),
        checkpoint_average: session.checkpoint_average(),
        checkpoint_count: session.checkpoints.len(),
        note_count: session.notes.len(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use gamemaster_core::script::Phase;
    use gamemaster_test_support::{FixedClock, fixed_now};
    use serde_json::json;

    use super::*;
    use crate::domain::mutations::SessionMutation;
    use crate::domain::session::{Checkpoint, PointerContext, Rating};
    use crate::infrastructure::memory::InMemorySessionStore;

    fn script() -> Vec<Phase> {
        vec![Phase::new(
            "day",
            "Day",
            "Day 1",
            vec![
                Step::instruction("wake", "Everyone wakes"),
                Step::instruction("vote", "Vote"),
                Step::checkpoint("rate", "Rate the day"),
            ],
        )]
    }

    fn checkpoint(rating: u8) -> SessionMutation {
        SessionMutation::AddCheckpoint(Checkpoint {
            id: Uuid::new_v4(),
            rating: Rating::new(rating).unwrap(),
            note: None,
            created_at: fixed_now(),
            context: PointerContext {
                phase_id: "day".into(),
                step_id: "rate".into(),
                turn_label: "Day 1".into(),
            },
        })
    }

    #[tokio::test]
    async fn test_get_session_by_id_returns_view() {
        // Arrange
        let store = InMemorySessionStore::new();
        let id = store.create(GameId::Werewolf, json!({}), fixed_now()).await.unwrap();

        // Act
        let view = get_session_by_id(id, &store).await.unwrap();

        // Assert
        assert_eq!(view.session_id, id);
        assert_eq!(view.status, SessionStatus::InProgress);
        assert_eq!(view.pointer, Pointer::START);
    }

    #[tokio::test]
    async fn test_get_session_by_id_missing_is_not_found() {
        let store = InMemorySessionStore::new();
        let result = get_session_by_id(Uuid::new_v4(), &store).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_current_step_reports_position_and_total() {
        let store = InMemorySessionStore::new();
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let id = store.create(GameId::Werewolf, json!({}), fixed_now()).await.unwrap();
        store
            .update(id, &[SessionMutation::MovePointer(Pointer::new(0, 1))], fixed_now())
            .await
            .unwrap();

        let view = get_current_step(id, &store, &controller).await.unwrap().unwrap();

        assert_eq!(view.step.id, "vote");
        assert_eq!(view.index, 1);
        assert_eq!(view.total, 3);
        assert_eq!(view.turn_label, "Day 1");
    }

    #[tokio::test]
    async fn test_summarize_session_reports_duration_and_average() {
        // Arrange
        let store = InMemorySessionStore::new();
        let phases = script();
        let controller = ProgressionController::new(&phases);
        let id = store.create(GameId::Werewolf, json!({}), fixed_now()).await.unwrap();
        store
            .update(
                id,
                &[
                    SessionMutation::MarkStepComplete("wake".into()),
                    checkpoint(3),
                    checkpoint(4),
                    SessionMutation::SetStatus(SessionStatus::Completed),
                ],
                fixed_now() + Duration::minutes(25),
            )
            .await
            .unwrap();
        let clock = FixedClock(fixed_now() + Duration::hours(5));

        // Act
        let summary = summarize_session(id, &clock, &store, &controller).await.unwrap();

        // Assert
        assert_eq!(summary.duration_seconds, 25 * 60);
        assert_eq!(summary.completed_steps, 1);
        assert_eq!(summary.total_steps, 3);
        assert_eq!(summary.checkpoint_average, Some(3.5));
        assert_eq!(summary.checkpoint_count, 2);
    }

    #[tokio::test]
    async fn test_list_sessions_is_newest_first() {
        let store = InMemorySessionStore::new();
        let first = store.create(GameId::Salem, json!({}), fixed_now()).await.unwrap();
        let second = store
            .create(GameId::Salem, json!({}), fixed_now() + Duration::seconds(1))
            .await
            .unwrap();

        let ids: Vec<Uuid> = list_sessions(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|view| view.session_id)
            .collect();

        assert_eq!(ids, vec![second, first]);
    }
}
