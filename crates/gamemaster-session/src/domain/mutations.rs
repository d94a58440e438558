//! Session mutations and the pure function that applies them.
//!
//! Every change to a session is expressed as a batch of [`SessionMutation`]s.
//! [`apply`] never touches its input: it clones the session, applies the batch
//! in order, refreshes `updated_at` and bumps `version`.

use chrono::{DateTime, Utc};
use gamemaster_core::linearizer::Pointer;

use super::session::{Checkpoint, Note, Session, SessionStatus};

/// Event type identifier for [`SessionMutation::MovePointer`].
pub const POINTER_MOVED: &str = "session.pointer_moved";
/// Event type identifier for [`SessionMutation::MarkStepComplete`].
pub const STEP_COMPLETED: &str = "session.step_completed";
/// Event type identifier for [`SessionMutation::AddNote`].
pub const NOTE_ADDED: &str = "session.note_added";
/// Event type identifier for [`SessionMutation::AddCheckpoint`].
pub const CHECKPOINT_ADDED: &str = "session.checkpoint_added";
/// Event type identifier for [`SessionMutation::SetStatus`].
pub const STATUS_CHANGED: &str = "session.status_changed";

/// One atomic change to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionMutation {
    /// Moves the progress pointer.
    MovePointer(Pointer),
    /// Records that the moderator moved past a step.
    MarkStepComplete(String),
    /// Prepends a note (notes are kept newest first).
    AddNote(Note),
    /// Appends a checkpoint.
    AddCheckpoint(Checkpoint),
    /// Changes the lifecycle status.
    SetStatus(SessionStatus),
}

impl SessionMutation {
    /// The type name used in log fields.
    #[must_use]
    pub fn mutation_type(&self) -> &'static str {
        match self {
            Self::MovePointer(_) => POINTER_MOVED,
            Self::MarkStepComplete(_) => STEP_COMPLETED,
            Self::AddNote(_) => NOTE_ADDED,
            Self::AddCheckpoint(_) => CHECKPOINT_ADDED,
            Self::SetStatus(_) => STATUS_CHANGED,
        }
    }

    fn apply_to(&self, session: &mut Session) {
        match self {
            Self::MovePointer(pointer) => session.pointer = *pointer,
            Self::MarkStepComplete(step_id) => {
                session.completed_step_ids.insert(step_id.clone());
            }
            Self::AddNote(note) => session.notes.insert(0, note.clone()),
            Self::AddCheckpoint(checkpoint) => session.checkpoints.push(checkpoint.clone()),
            Self::SetStatus(status) => session.status = *status,
        }
    }
}

/// Applies `mutations` to a copy of `session`.
///
/// `updated_at` is always set to `now`, even for an empty batch.
#[must_use]
pub fn apply(session: &Session, mutations: &[SessionMutation], now: DateTime<Utc>) -> Session {
    let mut next = session.clone();
    for mutation in mutations {
        mutation.apply_to(&mut next);
    }
    next.updated_at = now;
    next.version += 1;
    next
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use gamemaster_core::game::GameId;
    use gamemaster_test_support::fixed_now;
    use uuid::Uuid;

    use super::*;
    use crate::domain::session::PointerContext;

    fn session() -> Session {
        Session::new(Uuid::new_v4(), GameId::Catan, serde_json::json!({}), fixed_now())
    }

    fn note(text: &str) -> Note {
        Note {
            id: Uuid::new_v4(),
            text: text.to_owned(),
            player_label: None,
            tags: vec![],
            created_at: fixed_now(),
            context: PointerContext {
                phase_id: "setup".into(),
                step_id: "s1".into(),
                turn_label: "Setup".into(),
            },
        }
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        // Arrange
        let original = session();
        let later = fixed_now() + Duration::minutes(5);

        // Act
        let next = apply(
            &original,
            &[SessionMutation::MovePointer(Pointer::new(1, 2))],
            later,
        );

        // Assert
        assert_eq!(original.pointer, Pointer::START);
        assert_eq!(next.pointer, Pointer::new(1, 2));
        assert_eq!(next.updated_at, later);
        assert_eq!(next.version, original.version + 1);
    }

    #[test]
    fn test_notes_are_prepended() {
        let next = apply(
            &session(),
            &[
                SessionMutation::AddNote(note("first")),
                SessionMutation::AddNote(note("second")),
            ],
            fixed_now(),
        );

        let texts: Vec<&str> = next.notes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[test]
    fn test_completed_step_ids_have_set_semantics() {
        let next = apply(
            &session(),
            &[
                SessionMutation::MarkStepComplete("a".into()),
                SessionMutation::MarkStepComplete("a".into()),
            ],
            fixed_now(),
        );

        assert_eq!(next.completed_step_ids.len(), 1);
    }

    #[test]
    fn test_empty_batch_still_refreshes_updated_at() {
        let later = fixed_now() + Duration::seconds(30);
        let next = apply(&session(), &[], later);
        assert_eq!(next.updated_at, later);
    }

    #[test]
    fn test_mutation_type_names() {
        assert_eq!(
            SessionMutation::SetStatus(SessionStatus::Completed).mutation_type(),
            "session.status_changed"
        );
        assert_eq!(
            SessionMutation::MovePointer(Pointer::START).mutation_type(),
            "session.pointer_moved"
        );
    }
}
