//! Command abstractions.

use uuid::Uuid;

/// Trait implemented by every moderator command (advance, add note, ...).
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command, used in log fields.
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through its session mutations.
    fn correlation_id(&self) -> Uuid;
}
