use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::AuthError;
use crate::models::{BackendSession, TwoFactorChallenge};

pub const CODE_LENGTH: usize = 6;
pub const MAX_ATTEMPTS: u32 = 5;

/// Sends a verification code to the user.
#[async_trait]
pub trait CodeDelivery: Send + Sync {
    async fn deliver(&self, email: &str, code: &str) -> Result<(), AuthError>;
}

/// Writes codes to the log. Development only: there is no mail transport here.
pub struct LogDelivery;

#[async_trait]
impl CodeDelivery for LogDelivery {
    async fn deliver(&self, email: &str, code: &str) -> Result<(), AuthError> {
        info!("Two-factor code issued for {}", mask_email(email));
        debug!("Two-factor code for {}: {}", mask_email(email), code);
        Ok(())
    }
}

struct PendingChallenge {
    code: String,
    session: BackendSession,
    expires_at: DateTime<Utc>,
    attempts: u32,
}

/// Sign-ins waiting on a verification code, keyed by challenge id.
pub struct TwoFactorStore {
    challenges: Mutex<HashMap<Uuid, PendingChallenge>>,
    ttl: Duration,
}

impl TwoFactorStore {
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            challenges: Mutex::new(HashMap::new()),
            ttl: Duration::seconds(ttl_seconds.max(1)),
        }
    }

    /// Parks `session` behind a fresh code. Returns the public challenge and the code.
    pub async fn issue(&self, session: BackendSession) -> (TwoFactorChallenge, String) {
        let code = generate_code();
        let challenge_id = Uuid::new_v4();
        let expires_at = Utc::now() + self.ttl;
        let sent_to = mask_email(session.user.email.as_deref().unwrap_or_default());

        self.challenges.lock().await.insert(
            challenge_id,
            PendingChallenge {
                code: code.clone(),
                session,
                expires_at,
                attempts: 0,
            },
        );

        debug!("Two-factor challenge {} issued", challenge_id);
        (
            TwoFactorChallenge {
                challenge_id,
                expires_at,
                sent_to,
            },
            code,
        )
    }

    /// Consumes the challenge on success. A wrong code counts an attempt;
    /// the challenge is dropped after [`MAX_ATTEMPTS`] or once expired.
    pub async fn verify(&self, challenge_id: Uuid, code: &str) -> Result<BackendSession, AuthError> {
        let mut challenges = self.challenges.lock().await;

        let pending = challenges
            .get_mut(&challenge_id)
            .ok_or(AuthError::ChallengeNotFound)?;

        if Utc::now() >= pending.expires_at {
            challenges.remove(&challenge_id);
            return Err(AuthError::ChallengeExpired);
        }

        if pending.code != code.trim() {
            pending.attempts += 1;
            warn!("Wrong two-factor code for challenge {} (attempt {})", challenge_id, pending.attempts);

            if pending.attempts >= MAX_ATTEMPTS {
                challenges.remove(&challenge_id);
                return Err(AuthError::TooManyAttempts);
            }
            return Err(AuthError::InvalidCode);
        }

        challenges
            .remove(&challenge_id)
            .map(|pending| pending.session)
            .ok_or(AuthError::ChallengeNotFound)
    }

    /// Drops a challenge whose code never reached the user.
    pub async fn discard(&self, challenge_id: Uuid) -> bool {
        self.challenges.lock().await.remove(&challenge_id).is_some()
    }

    /// Removes challenges past their TTL. Returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut challenges = self.challenges.lock().await;
        let before = challenges.len();
        challenges.retain(|_, pending| now < pending.expires_at);
        before - challenges.len()
    }

    pub async fn pending_count(&self) -> usize {
        self.challenges.lock().await.len()
    }
}

fn generate_code() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:0width$}", value, width = CODE_LENGTH)
}

/// `jane.doe@example.com` -> `j***@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BackendUser;
    use assert_matches::assert_matches;

    fn backend_session() -> BackendSession {
        BackendSession {
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_in: Some(3600),
            user: BackendUser {
                id: "user-1".to_string(),
                email: Some("jane.doe@example.com".to_string()),
                role: None,
                user_metadata: None,
                created_at: None,
            },
        }
    }

    #[test]
    fn test_code_shape_and_mask() {
        let code = generate_code();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_digit()));

        assert_eq!(mask_email("jane.doe@example.com"), "j***@example.com");
        assert_eq!(mask_email("broken"), "***");
    }

    #[tokio::test]
    async fn test_verify_consumes_challenge() {
        let store = TwoFactorStore::new(300);
        let (challenge, code) = store.issue(backend_session()).await;
        assert_eq!(challenge.sent_to, "j***@example.com");

        let session = store.verify(challenge.challenge_id, &code).await.unwrap();
        assert_eq!(session.access_token, "access");
        assert_matches!(
            store.verify(challenge.challenge_id, &code).await,
            Err(AuthError::ChallengeNotFound)
        );
    }

    #[tokio::test]
    async fn test_attempt_limit() {
        let store = TwoFactorStore::new(300);
        let (challenge, code) = store.issue(backend_session()).await;
        let wrong = if code == "000000" { "111111" } else { "000000" };

        for _ in 0..MAX_ATTEMPTS - 1 {
            assert_matches!(store.verify(challenge.challenge_id, wrong).await, Err(AuthError::InvalidCode));
        }
        assert_matches!(store.verify(challenge.challenge_id, wrong).await, Err(AuthError::TooManyAttempts));
        assert_matches!(store.verify(challenge.challenge_id, &code).await, Err(AuthError::ChallengeNotFound));
        assert_eq!(store.pending_count().await, 0);
    }

    #[tokio::test]
    async fn test_expired_challenge() {
        let store = TwoFactorStore {
            challenges: Mutex::new(HashMap::new()),
            ttl: Duration::seconds(-1),
        };
        let (challenge, code) = store.issue(backend_session()).await;

        assert_matches!(store.verify(challenge.challenge_id, &code).await, Err(AuthError::ChallengeExpired));
    }

    #[tokio::test]
    async fn test_purge_expired_challenges() {
        let expired = TwoFactorStore {
            challenges: Mutex::new(HashMap::new()),
            ttl: Duration::seconds(-1),
        };
        expired.issue(backend_session()).await;
        expired.issue(backend_session()).await;

        assert_eq!(expired.purge_expired().await, 2);
        assert_eq!(expired.pending_count().await, 0);

        let live = TwoFactorStore::new(300);
        live.issue(backend_session()).await;
        assert_eq!(live.purge_expired().await, 0);
        assert_eq!(live.pending_count().await, 1);
    }

    #[tokio::test]
    async fn test_discard() {
        let store = TwoFactorStore::new(300);
        let (challenge, code) = store.issue(backend_session()).await;

        assert!(store.discard(challenge.challenge_id).await);
        assert!(!store.discard(challenge.challenge_id).await);
        assert_matches!(store.verify(challenge.challenge_id, &code).await, Err(AuthError::ChallengeNotFound));
    }
}
