use std::sync::Arc;

use axum::{
    extract::{Extension, Json, State},
    http::HeaderMap,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::{Organization, TokenResponse, User};
use shared_models::error::AppError;
use shared_models::response::ApiResponse;
use shared_utils::extractor::bearer_token;
use shared_utils::jwt;

use crate::i18n::Locale;
use crate::models::{
    ResetPasswordRequest, SelectOrganizationRequest, SessionContext, SignInOutcome, SignInRequest,
    SignUpRequest, SignUpResult, VerifyTwoFactorRequest,
};
use crate::services::{AuthService, CodeDelivery, LogDelivery, SessionStore, TwoFactorStore};

#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionStore>,
    pub challenges: Arc<TwoFactorStore>,
    pub delivery: Arc<dyn CodeDelivery>,
}

impl AuthState {
    pub fn new(config: Arc<AppConfig>, sessions: Arc<SessionStore>) -> Self {
        Self::with_delivery(config, sessions, Arc::new(LogDelivery))
    }

    pub fn with_delivery(
        config: Arc<AppConfig>,
        sessions: Arc<SessionStore>,
        delivery: Arc<dyn CodeDelivery>,
    ) -> Self {
        let challenges = Arc::new(TwoFactorStore::new(config.two_factor_ttl_seconds));
        Self {
            config,
            sessions,
            challenges,
            delivery,
        }
    }

    fn service(&self) -> AuthService {
        AuthService::new(
            &self.config,
            self.sessions.clone(),
            self.challenges.clone(),
            self.delivery.clone(),
        )
    }

    fn locale(&self, headers: &HeaderMap) -> Locale {
        headers
            .get("accept-language")
            .and_then(|value| value.to_str().ok())
            .and_then(Locale::from_accept_language)
            .or_else(|| Locale::parse(&self.config.default_locale))
            .unwrap_or_default()
    }
}

pub async fn sign_in(
    State(state): State<AuthState>,
    headers: HeaderMap,
    Json(request): Json<SignInRequest>,
) -> Result<Json<ApiResponse<SignInOutcome>>, AppError> {
    let locale = state.locale(&headers);
    let outcome = state
        .service()
        .sign_in(request)
        .await
        .map_err(|e| e.into_app_error(locale))?;

    Ok(Json(ApiResponse::ok(outcome)))
}

pub async fn verify_two_factor(
    State(state): State<AuthState>,
    headers: HeaderMap,
    Json(request): Json<VerifyTwoFactorRequest>,
) -> Result<Json<ApiResponse<SessionContext>>, AppError> {
    let locale = state.locale(&headers);
    let session = state
        .service()
        .confirm_two_factor(request.challenge_id, &request.code)
        .await
        .map_err(|e| e.into_app_error(locale))?;

    Ok(Json(ApiResponse::ok(session)))
}

pub async fn sign_up(
    State(state): State<AuthState>,
    headers: HeaderMap,
    Json(request): Json<SignUpRequest>,
) -> Result<Json<ApiResponse<SignUpResult>>, AppError> {
    let locale = state.locale(&headers);
    let result = state
        .service()
        .sign_up(request)
        .await
        .map_err(|e| e.into_app_error(locale))?;

    Ok(Json(ApiResponse::ok(result)))
}

pub async fn sign_out(
    State(state): State<AuthState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let locale = state.locale(&headers);

    state
        .service()
        .sign_out(auth.token())
        .await
        .map_err(|e| e.into_app_error(locale))?;

    Ok(Json(ApiResponse::empty()))
}

pub async fn reset_password(
    State(state): State<AuthState>,
    headers: HeaderMap,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let locale = state.locale(&headers);
    state
        .service()
        .reset_password(&request.email)
        .await
        .map_err(|e| e.into_app_error(locale))?;

    Ok(Json(ApiResponse::empty()))
}

/// Public so the login screen can list tenants before anyone signs in.
pub async fn get_organizations(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<Organization>>>, AppError> {
    let locale = state.locale(&headers);
    let token = bearer_token(&headers).ok();

    let organizations = state
        .service()
        .get_organizations(token.as_deref())
        .await
        .map_err(|e| e.into_app_error(locale))?;

    Ok(Json(ApiResponse::ok(organizations)))
}

pub async fn select_organization(
    State(state): State<AuthState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    headers: HeaderMap,
    Json(request): Json<SelectOrganizationRequest>,
) -> Result<Json<ApiResponse<SessionContext>>, AppError> {
    let locale = state.locale(&headers);

    let session = state
        .service()
        .select_organization(auth.token(), &request.organization_id)
        .await
        .map_err(|e| e.into_app_error(locale))?;

    Ok(Json(ApiResponse::ok(session)))
}

pub async fn get_session(
    State(state): State<AuthState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<SessionContext>>, AppError> {
    let locale = state.locale(&headers);

    let session = state
        .service()
        .current_session(auth.token())
        .await
        .map_err(|e| e.into_app_error(locale))?;

    Ok(Json(ApiResponse::ok(session)))
}

pub async fn get_profile(
    State(state): State<AuthState>,
    Extension(user): Extension<User>,
    Extension(session): Extension<SessionContext>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let locale = state.locale(&headers);
    debug!("Getting profile for user: {}", user.id);

    let profile = state
        .service()
        .get_user_profile(&user.id, &session.access_token)
        .await
        .map_err(|e| e.into_app_error(locale))?;

    Ok(Json(ApiResponse::ok(json!({
        "user_id": user.id,
        "organization": session.organization,
        "profile": profile
    }))))
}

pub async fn validate_token(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = bearer_token(&headers)?;
    let user = jwt::validate_token(&token, &state.config.supabase_jwt_secret)
        .map_err(|e| AppError::Auth(e.to_string()))?;

    Ok(Json(TokenResponse {
        valid: true,
        user_id: user.id,
        email: user.email,
        role: user.role,
    }))
}
