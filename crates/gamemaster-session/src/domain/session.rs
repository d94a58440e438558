//! The session record: one run of a game.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use gamemaster_core::error::DomainError;
use gamemaster_core::game::GameId;
use gamemaster_core::linearizer::Pointer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// The group is still playing.
    InProgress,
    /// Ended explicitly or by walking past the last step.
    Completed,
    /// Given up; navigation is rejected.
    Abandoned,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Abandoned => "ABANDONED",
        };
        f.write_str(name)
    }
}

/// Where in the script a note or checkpoint was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerContext {
    /// Id of the phase (or subflow label) that was active.
    pub phase_id: String,
    /// Id of the step that was active.
    pub step_id: String,
    /// Round/phase label shown at the time.
    pub turn_label: String,
}

/// A free-text moderator note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Note identifier.
    pub id: Uuid,
    /// The note body.
    pub text: String,
    /// Player the note is about, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_label: Option<String>,
    /// Quick tags attached to the note.
    #[serde(default)]
    pub tags: Vec<String>,
    /// When the note was taken.
    pub created_at: DateTime<Utc>,
    /// Script position at the time.
    pub context: PointerContext,
}

/// A 1-5 moderator rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;

    /// Creates a rating.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `value` is outside 1-5.
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::Validation(format!(
                "rating must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// The numeric value.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A situational rating tied to a point in the script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint identifier.
    pub id: Uuid,
    /// The rating.
    pub rating: Rating,
    /// Optional free-text comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// When the rating was recorded.
    pub created_at: DateTime<Utc>,
    /// Script position at the time.
    pub context: PointerContext,
}

/// One run of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier.
    pub id: Uuid,
    /// Which game is being played.
    pub game_id: GameId,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the last mutation.
    pub updated_at: DateTime<Utc>,
    /// Game settings, passed verbatim to the game's script factory.
    pub settings: serde_json::Value,
    /// The moderator's position in the primary script.
    pub pointer: Pointer,
    /// Ids of the steps the moderator has moved past.
    #[serde(default)]
    pub completed_step_ids: BTreeSet<String>,
    /// Notes, newest first.
    #[serde(default)]
    pub notes: Vec<Note>,
    /// Checkpoints, in recording order.
    #[serde(default)]
    pub checkpoints: Vec<Checkpoint>,
    /// Number of mutation batches applied since creation.
    pub version: u64,
}

impl Session {
    /// Creates a fresh session positioned on the first step.
    #[must_use]
    pub fn new(id: Uuid, game_id: GameId, settings: serde_json::Value, now: DateTime<Utc>) -> Self {
        Self {
            id,
            game_id,
            status: SessionStatus::InProgress,
            created_at: now,
            updated_at: now,
            settings,
            pointer: Pointer::START,
            completed_step_ids: BTreeSet::new(),
            notes: Vec::new(),
            checkpoints: Vec::new(),
            version: 1,
        }
    }

    /// Returns `true` once the session no longer accepts navigation.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == SessionStatus::Abandoned
    }

    /// Returns `DomainError::SessionClosed` for abandoned sessions.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn ensure_open(&self) -> Result<(), DomainError> {
        if self.is_closed() {
            Err(DomainError::SessionClosed(self.id))
        } else {
            Ok(())
        }
    }

    /// Mean checkpoint rating, if any checkpoints were recorded.
    #[must_use]
    pub fn checkpoint_average(&self) -> Option<f64> {
        if self.checkpoints.is_empty() {
            return None;
        }
        let total: u32 = self
            .checkpoints
            .iter()
            .map(|cp| u32::from(cp.rating.value()))
            .sum();
        #[allow(clippy::cast_precision_loss)]
        let average = f64::from(total) / self.checkpoints.len() as f64;
        Some(average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamemaster_test_support::fixed_now;

    fn checkpoint(rating: u8) -> Checkpoint {
        Checkpoint {
            id: Uuid::new_v4(),
            rating: Rating::new(rating).unwrap(),
            note: None,
            created_at: fixed_now(),
            context: PointerContext {
                phase_id: "p".into(),
                step_id: "s".into(),
                turn_label: "t".into(),
            },
        }
    }

    #[test]
    fn test_rating_rejects_out_of_range_values() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert_eq!(Rating::new(5).unwrap().value(), 5);
    }

    #[test]
    fn test_rating_deserialization_validates() {
        let result: Result<Rating, _> = serde_json::from_str("9");
        assert!(result.is_err());
    }

    #[test]
    fn test_new_session_starts_in_progress_at_first_step() {
        let session = Session::new(
            Uuid::new_v4(),
            GameId::Catan,
            serde_json::json!({}),
            fixed_now(),
        );
        assert_eq!(session.status, SessionStatus::InProgress);
        assert_eq!(session.pointer, Pointer::START);
        assert_eq!(session.created_at, session.updated_at);
        assert_eq!(session.version, 1);
    }

    #[test]
    fn test_checkpoint_average() {
        let mut session = Session::new(
            Uuid::new_v4(),
            GameId::Werewolf,
            serde_json::json!({}),
            fixed_now(),
        );
        assert_eq!(session.checkpoint_average(), None);

        session.checkpoints = vec![checkpoint(3), checkpoint(4)];

        assert_eq!(session.checkpoint_average(), Some(3.5));
    }

    #[test]
    fn test_status_serializes_with_wire_names() {
        let json = serde_json::to_string(&SessionStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }

    #[test]
    fn test_abandoned_session_is_closed() {
        let mut session = Session::new(
            Uuid::new_v4(),
            GameId::Salem,
            serde_json::json!({}),
            fixed_now(),
        );
        session.status = SessionStatus::Abandoned;

        match session.ensure_open() {
            Err(DomainError::SessionClosed(id)) => assert_eq!(id, session.id),
            other => panic!("expected SessionClosed, got {other:?}"),
        }
    }
}
