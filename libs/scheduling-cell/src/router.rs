use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, SchedulingState};
use crate::services::ScheduleStore;

pub fn scheduling_routes(config: Arc<AppConfig>, store: Arc<ScheduleStore>) -> Router {
    let state = SchedulingState::new(config.clone(), store);

    Router::new()
        .route("/time-grid", get(handlers::get_time_grid))
        .route("/week", get(handlers::get_week))
        .route("/doctors", get(handlers::list_doctors))
        .route(
            "/doctors/{doctor_id}/availability",
            get(handlers::get_availability).put(handlers::update_availability),
        )
        .route("/doctors/{doctor_id}/slots", get(handlers::get_day_slots))
        .route("/appointments", get(handlers::list_appointments))
        .route("/appointments/{appointment_id}/reschedule", post(handlers::reschedule_appointment))
        .route("/waiting-list", get(handlers::list_waiting_list))
        .route("/waiting-list/{entry_id}/matches", get(handlers::get_waiting_list_matches))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(state)
}
