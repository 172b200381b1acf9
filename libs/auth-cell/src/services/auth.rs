use std::sync::Arc;

use chrono::{Duration, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::Organization;
use shared_utils::jwt::token_expiry;

use crate::error::AuthError;
use crate::models::{
    BackendSession, BackendUser, SessionContext, SignInOutcome, SignInRequest, SignUpRequest,
    SignUpResult,
};
use crate::services::session::SessionStore;
use crate::services::two_factor::{CodeDelivery, TwoFactorStore};
use crate::validation::{validate_email, validate_sign_in, validate_sign_up};

pub struct AuthService {
    supabase: SupabaseClient,
    sessions: Arc<SessionStore>,
    challenges: Arc<TwoFactorStore>,
    delivery: Arc<dyn CodeDelivery>,
    session_ttl: Duration,
    two_factor_required: bool,
}

impl AuthService {
    pub fn new(
        config: &AppConfig,
        sessions: Arc<SessionStore>,
        challenges: Arc<TwoFactorStore>,
        delivery: Arc<dyn CodeDelivery>,
    ) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            sessions,
            challenges,
            delivery,
            session_ttl: Duration::minutes(config.session_ttl_minutes.max(1)),
            two_factor_required: config.two_factor_required,
        }
    }

    /// Password sign-in. Opens a session directly, or parks the backend
    /// session behind a two-factor challenge when the policy asks for one.
    pub async fn sign_in(&self, request: SignInRequest) -> Result<SignInOutcome, AuthError> {
        validate_sign_in(&request)?;
        debug!("Signing in {}", request.email);

        let backend: BackendSession = self
            .supabase
            .request(
                Method::POST,
                "/auth/v1/token?grant_type=password",
                None,
                Some(json!({
                    "email": request.email.trim(),
                    "password": request.password,
                })),
            )
            .await?;

        if self.two_factor_required || backend.user.two_factor_enabled() {
            let email = backend.user.email.clone().unwrap_or_else(|| request.email.trim().to_string());
            let (challenge, code) = self.challenges.issue(backend).await;
            if let Err(err) = self.delivery.deliver(&email, &code).await {
                warn!("Two-factor code delivery failed: {}", err);
                self.challenges.discard(challenge.challenge_id).await;
                return Err(err);
            }

            info!("Two-factor challenge {} required for sign-in", challenge.challenge_id);
            return Ok(SignInOutcome::ChallengeRequired { challenge });
        }

        let session = self.open_session(backend).await;
        info!("User {} signed in", session.user.id);
        Ok(SignInOutcome::Authenticated { session })
    }

    pub async fn confirm_two_factor(&self, challenge_id: Uuid, code: &str) -> Result<SessionContext, AuthError> {
        let backend = self.challenges.verify(challenge_id, code).await?;
        let session = self.open_session(backend).await;

        info!("User {} signed in after two-factor confirmation", session.user.id);
        Ok(session)
    }

    pub async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpResult, AuthError> {
        validate_sign_up(&request)?;
        debug!("Signing up {}", request.email);

        let response: Value = self
            .supabase
            .request(
                Method::POST,
                "/auth/v1/signup",
                None,
                Some(json!({
                    "email": request.email.trim(),
                    "password": request.password,
                    "data": {
                        "full_name": request.full_name.trim(),
                        "phone": request.phone,
                        "organization_id": request.organization_id,
                        "role": request.role,
                    }
                })),
            )
            .await?;

        // with email confirmation on the backend answers with the bare user,
        // otherwise with a full session
        let confirmation_required = response.get("access_token").is_none();
        let user_value = response.get("user").cloned().unwrap_or(response);
        let user: BackendUser = serde_json::from_value(user_value)
            .map_err(|e| AuthError::Backend(format!("Unexpected sign-up response: {}", e)))?;

        info!("User {} signed up", user.id);
        Ok(SignUpResult {
            user_id: user.id,
            email: user.email,
            confirmation_required,
        })
    }

    /// Drops the local session first; a backend failure is still reported.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        match self.sessions.invalidate(access_token).await {
            Some(session) => debug!("Signing out user {}", session.user.id),
            None => warn!("Sign-out for unknown session"),
        }

        let _: Value = self
            .supabase
            .request(Method::POST, "/auth/v1/logout", Some(access_token), None)
            .await?;

        Ok(())
    }

    pub async fn get_organizations(&self, access_token: Option<&str>) -> Result<Vec<Organization>, AuthError> {
        debug!("Fetching organizations");

        let organizations: Vec<Organization> = self
            .supabase
            .request(
                Method::GET,
                "/rest/v1/organizations?select=id,name,slug,plan&order=name.asc",
                access_token,
                None,
            )
            .await?;

        Ok(organizations)
    }

    /// Binds a tenant to the session after checking the backend lists it.
    pub async fn select_organization(
        &self,
        access_token: &str,
        organization_id: &str,
    ) -> Result<SessionContext, AuthError> {
        self.sessions.get(access_token).await?;

        let organization = self
            .get_organizations(Some(access_token))
            .await?
            .into_iter()
            .find(|org| org.id == organization_id)
            .ok_or_else(|| AuthError::OrganizationNotFound(organization_id.to_string()))?;

        info!("Organization {} selected", organization.slug);
        self.sessions.set_organization(access_token, organization).await
    }

    pub async fn get_user_profile(&self, user_id: &str, access_token: &str) -> Result<Value, AuthError> {
        debug!("Fetching profile for user {}", user_id);

        let path = format!("/rest/v1/profiles?id=eq.{}&select=*", user_id);
        let profiles: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(access_token), None)
            .await?;

        profiles
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::ProfileNotFound(user_id.to_string()))
    }

    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        validate_email(email)?;
        debug!("Requesting password reset");

        let _: Value = self
            .supabase
            .request(
                Method::POST,
                "/auth/v1/recover",
                None,
                Some(json!({ "email": email.trim() })),
            )
            .await?;

        Ok(())
    }

    pub async fn current_session(&self, access_token: &str) -> Result<SessionContext, AuthError> {
        self.sessions.get(access_token).await
    }

    /// Session lifetime is the shorter of the token's own expiry and the configured TTL.
    async fn open_session(&self, backend: BackendSession) -> SessionContext {
        let now = Utc::now();
        let configured = now + self.session_ttl;

        let token_expires = token_expiry(&backend.access_token)
            .or_else(|| backend.expires_in.map(|secs| now + Duration::seconds(secs)));
        let expires_at = token_expires.map_or(configured, |exp| exp.min(configured));

        self.sessions
            .create(
                backend.user.into(),
                backend.access_token,
                backend.refresh_token,
                expires_at,
            )
            .await
    }
}
