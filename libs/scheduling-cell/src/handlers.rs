use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::{
    Appointment, AppointmentFilter, AppointmentStatus, AvailabilityProfile, DaySchedule,
    OpenSlotMatch, Priority, RescheduleOutcome, RescheduleRequest, TimeLabel,
    UpdateAvailabilityRequest, WaitingListFilter, WaitingListView,
};
use crate::services::{ScheduleStore, SchedulingService};

#[derive(Clone)]
pub struct SchedulingState {
    pub config: Arc<AppConfig>,
    pub store: Arc<ScheduleStore>,
}

impl SchedulingState {
    pub fn new(config: Arc<AppConfig>, store: Arc<ScheduleStore>) -> Self {
        Self { config, store }
    }

    fn service(&self) -> SchedulingService {
        SchedulingService::new(&self.config, self.store.clone())
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Debug, Deserialize)]
pub struct GridQuery {
    pub start_hour: Option<u32>,
    pub end_hour: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: Option<NaiveDate>,
    pub start_hour: Option<u32>,
    pub end_hour: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AppointmentQuery {
    pub date: Option<NaiveDate>,
    pub doctor_id: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct WaitingListQuery {
    pub doctor_id: Option<String>,
    pub priority: Option<Priority>,
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppointmentList {
    pub appointments: Vec<Appointment>,
    pub total: usize,
    pub summary: BTreeMap<String, usize>,
}

pub async fn get_time_grid(
    State(state): State<SchedulingState>,
    Query(query): Query<GridQuery>,
) -> Result<Json<ApiResponse<Vec<TimeLabel>>>, AppError> {
    let grid = state.service().time_grid(query.start_hour, query.end_hour)?;
    Ok(Json(ApiResponse::ok(grid)))
}

pub async fn list_doctors(
    State(state): State<SchedulingState>,
) -> Result<Json<ApiResponse<Vec<AvailabilityProfile>>>, AppError> {
    Ok(Json(ApiResponse::ok(state.service().availabilities().await)))
}

pub async fn get_availability(
    State(state): State<SchedulingState>,
    Path(doctor_id): Path<String>,
) -> Result<Json<ApiResponse<AvailabilityProfile>>, AppError> {
    let profile = state.service().availability(&doctor_id).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

pub async fn update_availability(
    State(state): State<SchedulingState>,
    Path(doctor_id): Path<String>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<ApiResponse<AvailabilityProfile>>, AppError> {
    let profile = state.service().update_availability(&doctor_id, request).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

pub async fn get_day_slots(
    State(state): State<SchedulingState>,
    Path(doctor_id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<ApiResponse<DaySchedule>>, AppError> {
    let schedule = state
        .service()
        .day_schedule(
            &doctor_id,
            query.date.unwrap_or_else(today),
            query.start_hour,
            query.end_hour,
        )
        .await?;
    Ok(Json(ApiResponse::ok(schedule)))
}

pub async fn list_appointments(
    State(state): State<SchedulingState>,
    Query(query): Query<AppointmentQuery>,
) -> Result<Json<ApiResponse<AppointmentList>>, AppError> {
    let filter = AppointmentFilter {
        date: query.date,
        doctor_id: query.doctor_id,
        status: query.status,
        search: query.search,
    };

    let service = state.service();
    let appointments = service.list_appointments(&filter);
    let summary = service.appointment_summary(&filter);

    Ok(Json(ApiResponse::ok(AppointmentList {
        total: appointments.len(),
        appointments,
        summary,
    })))
}

pub async fn get_week(
    State(state): State<SchedulingState>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<ApiResponse<Vec<NaiveDate>>>, AppError> {
    let week = state.service().week(query.date.unwrap_or_else(today));
    Ok(Json(ApiResponse::ok(week)))
}

pub async fn reschedule_appointment(
    State(state): State<SchedulingState>,
    Path(appointment_id): Path<String>,
    Json(request): Json<RescheduleRequest>,
) -> Result<Json<ApiResponse<RescheduleOutcome>>, AppError> {
    let outcome = state.service().reschedule(&appointment_id, request).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

pub async fn list_waiting_list(
    State(state): State<SchedulingState>,
    Query(query): Query<WaitingListQuery>,
) -> Result<Json<ApiResponse<Vec<WaitingListView>>>, AppError> {
    let filter = WaitingListFilter {
        doctor_id: query.doctor_id,
        priority: query.priority,
    };

    let entries = state
        .service()
        .waiting_list(&filter, query.today.unwrap_or_else(today));
    Ok(Json(ApiResponse::ok(entries)))
}

pub async fn get_waiting_list_matches(
    State(state): State<SchedulingState>,
    Path(entry_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<OpenSlotMatch>>>, AppError> {
    let matches = state.service().waiting_list_matches(&entry_id).await?;
    Ok(Json(ApiResponse::ok(matches)))
}
