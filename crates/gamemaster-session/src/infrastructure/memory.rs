//! In-process session store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gamemaster_core::error::DomainError;
use gamemaster_core::game::GameId;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::mutations::{SessionMutation, apply};
use crate::domain::repository::SessionStore;
use crate::domain::session::Session;

#[derive(Debug, Default)]
struct Inner {
    sessions: HashMap<Uuid, Session>,
    last_settings: HashMap<GameId, serde_json::Value>,
}

/// A [`SessionStore`] backed by a `HashMap` behind a mutex.
///
/// Each call holds the lock for its whole duration, so an `update` batch is
/// applied and committed without interleaving.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: Mutex<Inner>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, DomainError> {
        self.inner
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("session store mutex poisoned: {e}")))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(
        &self,
        game_id: GameId,
        settings: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        let session = Session::new(id, game_id, settings.clone(), now);
        let mut inner = self.lock()?;
        inner.sessions.insert(id, session);
        inner.last_settings.insert(game_id, settings);
        info!(session_id = %id, game_id = %game_id, "session created");
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Session>, DomainError> {
        Ok(self.lock()?.sessions.get(&id).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        mutations: &[SessionMutation],
        now: DateTime<Utc>,
    ) -> Result<Session, DomainError> {
        let mut inner = self.lock()?;
        let current = inner.sessions.get(&id).ok_or(DomainError::NotFound(id))?;
        let next = apply(current, mutations, now);
        for mutation in mutations {
            debug!(session_id = %id, mutation = mutation.mutation_type(), "mutation applied");
        }
        inner.sessions.insert(id, next.clone());
        Ok(next)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let removed = self.lock()?.sessions.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "session deleted");
        }
        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<Session>, DomainError> {
        let mut sessions: Vec<Session> = self.lock()?.sessions.values().cloned().collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(sessions)
    }

    async fn last_settings(
        &self,
        game_id: GameId,
    ) -> Result<Option<serde_json::Value>, DomainError> {
        Ok(self.lock()?.last_settings.get(&game_id).cloned())
    }

    async fn insert(&self, session: Session) -> Result<(), DomainError> {
        let mut inner = self.lock()?;
        if inner.sessions.contains_key(&session.id) {
            return Err(DomainError::Validation(format!(
                "session {} already exists",
                session.id
            )));
        }
        info!(session_id = %session.id, game_id = %session.game_id, "session inserted");
        inner.sessions.insert(session.id, session);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use gamemaster_core::linearizer::Pointer;
    use gamemaster_test_support::fixed_now;
    use serde_json::json;

    use super::*;
    use crate::domain::session::SessionStatus;

    #[tokio::test]
    async fn test_create_then_get_returns_fresh_session() {
        // Arrange
        let store = InMemorySessionStore::new();

        // Act
        let id = store
            .create(GameId::Werewolf, json!({"numberOfPlayers": 8}), fixed_now())
            .await
            .unwrap();

        // Assert
        let session = store.get(id).await.unwrap().unwrap();
        assert_eq!(session.id, id);
        assert_eq!(session.game_id, GameId::Werewolf);
        assert_eq!(session.status, SessionStatus::InProgress);
        assert_eq!(session.settings["numberOfPlayers"], 8);
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at_with_mutation() {
        let store = InMemorySessionStore::new();
        let id = store.create(GameId::Catan, json!({}), fixed_now()).await.unwrap();
        let later = fixed_now() + Duration::minutes(3);

        let session = store
            .update(id, &[SessionMutation::MovePointer(Pointer::new(0, 1))], later)
            .await
            .unwrap();

        assert_eq!(session.pointer, Pointer::new(0, 1));
        assert_eq!(session.updated_at, later);
        assert_eq!(store.get(id).await.unwrap().unwrap(), session);
    }

    #[tokio::test]
    async fn test_update_missing_session_is_not_found() {
        let store = InMemorySessionStore::new();
        let missing = Uuid::new_v4();

        let result = store.update(missing, &[], fixed_now()).await;

        match result {
            Err(DomainError::NotFound(id)) => assert_eq!(id, missing),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_last_settings_tracks_most_recent_create() {
        let store = InMemorySessionStore::new();
        store.create(GameId::Salem, json!({"playerCount": 5}), fixed_now()).await.unwrap();
        store.create(GameId::Salem, json!({"playerCount": 9}), fixed_now()).await.unwrap();

        let last = store.last_settings(GameId::Salem).await.unwrap();

        assert_eq!(last, Some(json!({"playerCount": 9})));
        assert_eq!(store.last_settings(GameId::Catan).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let store = InMemorySessionStore::new();
        let older = store.create(GameId::Catan, json!({}), fixed_now()).await.unwrap();
        let newer = store
            .create(GameId::Catan, json!({}), fixed_now() + Duration::hours(1))
            .await
            .unwrap();

        let ids: Vec<Uuid> = store.list().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![newer, older]);

        assert!(store.delete(older).await.unwrap());
        assert!(!store.delete(older).await.unwrap());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let store = InMemorySessionStore::new();
        let id = store.create(GameId::TwoRooms, json!({}), fixed_now()).await.unwrap();
        let copy = store.get(id).await.unwrap().unwrap();

        let result = store.insert(copy).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
