//! Session store doubles.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gamemaster_core::error::DomainError;
use gamemaster_core::game::GameId;
use gamemaster_session::domain::mutations::SessionMutation;
use gamemaster_session::domain::repository::SessionStore;
use gamemaster_session::domain::session::Session;
use uuid::Uuid;

/// Session store that always returns an infrastructure error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSessionStore;

fn refused<T>() -> Result<T, DomainError> {
    Err(DomainError::Infrastructure("connection refused".into()))
}

#[async_trait]
impl SessionStore for FailingSessionStore {
    async fn create(
        &self,
        _game_id: GameId,
        _settings: serde_json::Value,
        _now: DateTime<Utc>,
    ) -> Result<Uuid, DomainError> {
        refused()
    }

    async fn get(&self, _id: Uuid) -> Result<Option<Session>, DomainError> {
        refused()
    }

    async fn update(
        &self,
        _id: Uuid,
        _mutations: &[SessionMutation],
        _now: DateTime<Utc>,
    ) -> Result<Session, DomainError> {
        refused()
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, DomainError> {
        refused()
    }

    async fn list(&self) -> Result<Vec<Session>, DomainError> {
        refused()
    }

    async fn last_settings(
        &self,
        _game_id: GameId,
    ) -> Result<Option<serde_json::Value>, DomainError> {
        refused()
    }

    async fn insert(&self, _session: Session) -> Result<(), DomainError> {
        refused()
    }
}
