//! Session store abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gamemaster_core::error::DomainError;
use gamemaster_core::game::GameId;
use uuid::Uuid;

use super::mutations::SessionMutation;
use super::session::Session;

/// Key-value store holding sessions.
///
/// `update` must apply the whole batch to the freshest copy of the session and
/// commit it atomically, with `updated_at` refreshed in the same commit.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a session and remembers `settings` as the game's last-used
    /// settings. Returns the new session id.
    async fn create(
        &self,
        game_id: GameId,
        settings: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<Uuid, DomainError>;

    /// Loads a session, or `None` if it does not exist.
    async fn get(&self, id: Uuid) -> Result<Option<Session>, DomainError>;

    /// Applies `mutations` atomically and returns the committed session.
    ///
    /// Returns `DomainError::NotFound` if the session does not exist.
    async fn update(
        &self,
        id: Uuid,
        mutations: &[SessionMutation],
        now: DateTime<Utc>,
    ) -> Result<Session, DomainError>;

    /// Deletes a session. Returns `true` if it existed.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Every stored session, newest first.
    async fn list(&self) -> Result<Vec<Session>, DomainError>;

    /// Settings used by the most recent `create` for `game_id`.
    async fn last_settings(&self, game_id: GameId)
    -> Result<Option<serde_json::Value>, DomainError>;

    /// Stores an externally built session (e.g. an imported export).
    ///
    /// Returns `DomainError::Validation` if a session with the same id exists.
    async fn insert(&self, session: Session) -> Result<(), DomainError>;
}
