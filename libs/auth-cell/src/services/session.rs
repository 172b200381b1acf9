use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::{Organization, User};

use crate::error::AuthError;
use crate::models::SessionContext;

/// Sessions keyed by access token.
///
/// Created on sign-in, removed on sign-out, and evicted lazily once expired.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionContext>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(
        &self,
        user: User,
        access_token: String,
        refresh_token: Option<String>,
        expires_at: DateTime<Utc>,
    ) -> SessionContext {
        let session = SessionContext {
            session_id: Uuid::new_v4(),
            user,
            access_token: access_token.clone(),
            refresh_token,
            organization: None,
            created_at: Utc::now(),
            expires_at,
        };

        debug!("Session {} created for user {}", session.session_id, session.user.id);
        self.sessions.write().await.insert(access_token, session.clone());
        session
    }

    pub async fn get(&self, access_token: &str) -> Result<SessionContext, AuthError> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(access_token) {
                None => return Err(AuthError::SessionNotFound),
                Some(session) if !session.is_expired_at(now) => return Ok(session.clone()),
                Some(_) => {}
            }
        }

        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get(access_token) {
            if session.is_expired_at(now) {
                debug!("Session {} expired", session.session_id);
                sessions.remove(access_token);
                return Err(AuthError::SessionExpired);
            }
            return Ok(session.clone());
        }
        Err(AuthError::SessionNotFound)
    }

    pub async fn set_organization(
        &self,
        access_token: &str,
        organization: Organization,
    ) -> Result<SessionContext, AuthError> {
        // goes through get() so expired sessions are rejected and evicted
        self.get(access_token).await?;

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(access_token)
            .ok_or(AuthError::SessionNotFound)?;

        debug!("Session {} bound to organization {}", session.session_id, organization.id);
        session.organization = Some(organization);
        Ok(session.clone())
    }

    pub async fn invalidate(&self, access_token: &str) -> Option<SessionContext> {
        let removed = self.sessions.write().await.remove(access_token);
        if let Some(session) = &removed {
            debug!("Session {} invalidated", session.session_id);
        }
        removed
    }

    /// Drops every expired session; returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;

    fn user() -> User {
        User {
            id: "user-1".to_string(),
            email: Some("user@example.com".to_string()),
            role: Some("authenticated".to_string()),
            metadata: None,
            created_at: None,
        }
    }

    fn organization() -> Organization {
        Organization {
            id: "org-1".to_string(),
            name: "Central Hospital".to_string(),
            slug: "central".to_string(),
            plan: Some("enterprise".to_string()),
        }
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let store = SessionStore::new();
        let created = store
            .create(user(), "token-1".to_string(), None, Utc::now() + Duration::hours(1))
            .await;

        let fetched = store.get("token-1").await.unwrap();
        assert_eq!(fetched.session_id, created.session_id);
        assert!(fetched.organization.is_none());

        let bound = store.set_organization("token-1", organization()).await.unwrap();
        assert_eq!(bound.organization.unwrap().slug, "central");

        assert!(store.invalidate("token-1").await.is_some());
        assert_matches!(store.get("token-1").await, Err(AuthError::SessionNotFound));
        assert!(store.invalidate("token-1").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_evicted() {
        let store = SessionStore::new();
        store
            .create(user(), "old".to_string(), None, Utc::now() - Duration::seconds(1))
            .await;

        assert_matches!(store.get("old").await, Err(AuthError::SessionExpired));
        assert_matches!(store.get("old").await, Err(AuthError::SessionNotFound));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_organization_on_expired_session() {
        let store = SessionStore::new();
        store
            .create(user(), "old".to_string(), None, Utc::now() - Duration::seconds(1))
            .await;

        assert_matches!(
            store.set_organization("old", organization()).await,
            Err(AuthError::SessionExpired)
        );
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = SessionStore::new();
        store.create(user(), "a".to_string(), None, Utc::now() - Duration::minutes(5)).await;
        store.create(user(), "b".to_string(), None, Utc::now() + Duration::minutes(5)).await;

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 1);
    }
}
