//! Moderator commands against a session.

use gamemaster_core::command::Command;
use gamemaster_core::game::GameId;
use gamemaster_core::linearizer::Pointer;
use uuid::Uuid;

use super::session::PointerContext;
use super::subflow::ResumePolicy;

/// Command to create a session for a game.
#[derive(Debug, Clone)]
pub struct CreateSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game to play.
    pub game_id: GameId,
    /// Validated game settings.
    pub settings: serde_json::Value,
}

impl Command for CreateSession {
    fn command_type(&self) -> &'static str {
        "session.create"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command for the generic "next" on the current step.
#[derive(Debug, Clone)]
pub struct AdvanceStep {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to act on.
    pub session_id: Uuid,
}

impl Command for AdvanceStep {
    fn command_type(&self) -> &'static str {
        "session.advance_step"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to confirm a confirm-gated step.
#[derive(Debug, Clone)]
pub struct ConfirmStep {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to act on.
    pub session_id: Uuid,
}

impl Command for ConfirmStep {
    fn command_type(&self) -> &'static str {
        "session.confirm_step"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to skip a skippable step.
#[derive(Debug, Clone)]
pub struct SkipStep {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to act on.
    pub session_id: Uuid,
}

impl Command for SkipStep {
    fn command_type(&self) -> &'static str {
        "session.skip_step"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to move one step back.
#[derive(Debug, Clone)]
pub struct RetreatStep {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to act on.
    pub session_id: Uuid,
}

impl Command for RetreatStep {
    fn command_type(&self) -> &'static str {
        "session.retreat_step"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to jump to an arbitrary step.
#[derive(Debug, Clone)]
pub struct JumpToStep {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to act on.
    pub session_id: Uuid,
    /// Target position in the primary script.
    pub pointer: Pointer,
}

impl Command for JumpToStep {
    fn command_type(&self) -> &'static str {
        "session.jump_to_step"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to jump to the first step of a phase.
#[derive(Debug, Clone)]
pub struct JumpToPhase {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to act on.
    pub session_id: Uuid,
    /// Id of the target phase.
    pub phase_id: String,
}

impl Command for JumpToPhase {
    fn command_type(&self) -> &'static str {
        "session.jump_to_phase"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to rate the current checkpoint step.
#[derive(Debug, Clone)]
pub struct RecordCheckpoint {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to act on.
    pub session_id: Uuid,
    /// Rating between 1 and 5.
    pub rating: u8,
    /// Optional comment.
    pub note: Option<String>,
}

impl Command for RecordCheckpoint {
    fn command_type(&self) -> &'static str {
        "session.record_checkpoint"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to attach a note to the session.
#[derive(Debug, Clone)]
pub struct AddNote {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to act on.
    pub session_id: Uuid,
    /// The note body.
    pub text: String,
    /// Player the note is about.
    pub player_label: Option<String>,
    /// Quick tags.
    pub tags: Vec<String>,
    /// Explicit position; defaults to the current step.
    pub context: Option<PointerContext>,
}

impl Command for AddNote {
    fn command_type(&self) -> &'static str {
        "session.add_note"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to mark a session completed.
#[derive(Debug, Clone)]
pub struct EndSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to act on.
    pub session_id: Uuid,
}

impl Command for EndSession {
    fn command_type(&self) -> &'static str {
        "session.end"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to abandon a session.
#[derive(Debug, Clone)]
pub struct AbandonSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to act on.
    pub session_id: Uuid,
}

impl Command for AbandonSession {
    fn command_type(&self) -> &'static str {
        "session.abandon"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to delete a session.
#[derive(Debug, Clone)]
pub struct DeleteSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to act on.
    pub session_id: Uuid,
}

impl Command for DeleteSession {
    fn command_type(&self) -> &'static str {
        "session.delete"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to hand navigation back to the primary script after a subflow.
#[derive(Debug, Clone)]
pub struct ResumePrimary {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to act on.
    pub session_id: Uuid,
    /// Primary pointer saved when the subflow was entered.
    pub return_pointer: Pointer,
    /// Whether the triggering step is consumed on return.
    pub policy: ResumePolicy,
}

impl Command for ResumePrimary {
    fn command_type(&self) -> &'static str {
        "session.resume_primary"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_types_are_namespaced() {
        let correlation_id = Uuid::new_v4();
        let advance = AdvanceStep {
            correlation_id,
            session_id: Uuid::new_v4(),
        };
        let create = CreateSession {
            correlation_id,
            game_id: GameId::Catan,
            settings: serde_json::json!({}),
        };

        assert_eq!(advance.command_type(), "session.advance_step");
        assert_eq!(create.command_type(), "session.create");
        assert_eq!(advance.correlation_id(), correlation_id);
    }
}
