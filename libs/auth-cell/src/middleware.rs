use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use shared_models::error::AppError;
use shared_utils::extractor::bearer_token;

use crate::i18n::Locale;
use crate::services::SessionStore;

/// Rejects bearer tokens without a live session, so signed-out or expired
/// sessions stop working before their JWT does. Inserts the
/// [`SessionContext`](crate::models::SessionContext) into request extensions.
pub async fn session_middleware(
    State(sessions): State<Arc<SessionStore>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;

    let session = match sessions.get(&token).await {
        Ok(session) => session,
        Err(err) => {
            debug!("Rejected request without live session: {}", err);
            let locale = request
                .headers()
                .get("accept-language")
                .and_then(|value| value.to_str().ok())
                .and_then(Locale::from_accept_language)
                .unwrap_or_default();
            return Err(err.into_app_error(locale));
        }
    };

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
