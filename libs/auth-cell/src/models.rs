use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use shared_models::auth::{Organization, User};

// ==============================================================================
// REQUESTS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub organization_id: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectOrganizationRequest {
    pub organization_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTwoFactorRequest {
    pub challenge_id: Uuid,
    pub code: String,
}

// ==============================================================================
// BACKEND PAYLOADS
// ==============================================================================

/// `POST /auth/v1/token?grant_type=password` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: BackendUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendUser {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub user_metadata: Option<Value>,
    pub created_at: Option<DateTime<Utc>>,
}

impl BackendUser {
    pub fn two_factor_enabled(&self) -> bool {
        self.user_metadata
            .as_ref()
            .and_then(|meta| meta.get("two_factor_enabled"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

impl From<BackendUser> for User {
    fn from(user: BackendUser) -> Self {
        User {
            id: user.id,
            email: user.email,
            role: user.role,
            metadata: user.user_metadata,
            created_at: user.created_at,
        }
    }
}

// ==============================================================================
// SESSIONS
// ==============================================================================

/// Server-side record of a signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub user: User,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub organization: Option<Organization>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoFactorChallenge {
    pub challenge_id: Uuid,
    pub expires_at: DateTime<Utc>,
    /// Masked address the code was sent to, e.g. `j***@example.com`.
    pub sent_to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SignInOutcome {
    Authenticated { session: SessionContext },
    ChallengeRequired { challenge: TwoFactorChallenge },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpResult {
    pub user_id: String,
    pub email: Option<String>,
    /// The backend wants the address confirmed before the first sign-in.
    pub confirmation_required: bool,
}
