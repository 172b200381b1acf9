use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use chrono::Utc;

use auth_cell::router::auth_routes;
use auth_cell::{session_middleware, AuthState};
use scheduling_cell::router::scheduling_routes;
use scheduling_cell::ScheduleStore;
use shared_config::AppConfig;

pub fn create_router(config: Arc<AppConfig>, auth: AuthState) -> Router {
    let schedule = Arc::new(ScheduleStore::with_fixtures(Utc::now().date_naive()));

    // schedule access ends with the session, not with the JWT
    let scheduling = scheduling_routes(config, schedule)
        .layer(middleware::from_fn_with_state(auth.sessions.clone(), session_middleware));

    Router::new()
        .route("/", get(|| async { "Hospital scheduling API is running!" }))
        .nest("/auth", auth_routes(auth))
        .nest("/schedule", scheduling)
}
