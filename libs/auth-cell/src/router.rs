use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, AuthState};
use crate::middleware::session_middleware;

pub fn auth_routes(state: AuthState) -> Router {
    let public_routes = Router::new()
        .route("/sign-in", post(handlers::sign_in))
        .route("/sign-up", post(handlers::sign_up))
        .route("/two-factor/verify", post(handlers::verify_two_factor))
        .route("/reset-password", post(handlers::reset_password))
        .route("/organizations", get(handlers::get_organizations))
        .route("/validate", post(handlers::validate_token));

    let protected_routes = Router::new()
        .route("/sign-out", post(handlers::sign_out))
        .route("/session", get(handlers::get_session))
        .route("/organization", post(handlers::select_organization))
        .route("/profile", get(handlers::get_profile))
        .layer(middleware::from_fn_with_state(state.sessions.clone(), session_middleware))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
