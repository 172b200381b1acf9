use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use shared_config::AppConfig;

use crate::error::SchedulingError;
use crate::models::{
    Appointment, AppointmentFilter, AvailabilityProfile, DaySchedule, OpenSlotMatch,
    RescheduleOutcome, RescheduleRequest, TimeLabel, UpdateAvailabilityRequest, WaitingListFilter,
    WaitingListView,
};
use crate::services::store::ScheduleStore;
use crate::services::{availability, calendar, slot_status, time_grid, waiting_list};

pub struct SchedulingService {
    store: Arc<ScheduleStore>,
    start_hour: u32,
    end_hour: u32,
}

impl SchedulingService {
    pub fn new(config: &AppConfig, store: Arc<ScheduleStore>) -> Self {
        Self {
            store,
            start_hour: config.schedule_start_hour,
            end_hour: config.schedule_end_hour,
        }
    }

    /// Calendar grid, falling back to the configured hours.
    pub fn time_grid(&self, start_hour: Option<u32>, end_hour: Option<u32>) -> Result<Vec<TimeLabel>, SchedulingError> {
        let start = start_hour.unwrap_or(self.start_hour);
        let end = end_hour.unwrap_or(self.end_hour);

        if start > 24 || end > 24 {
            return Err(SchedulingError::InvalidHourRange { start, end });
        }

        Ok(time_grid::generate(start, end))
    }

    pub async fn day_schedule(
        &self,
        doctor_id: &str,
        date: NaiveDate,
        start_hour: Option<u32>,
        end_hour: Option<u32>,
    ) -> Result<DaySchedule, SchedulingError> {
        debug!("Resolving slots for doctor {} on {}", doctor_id, date);

        let profile = self.store.profile(doctor_id).await?;
        let grid = self.time_grid(start_hour, end_hour)?;

        Ok(availability::day_schedule(&profile, date, &grid, self.store.appointments()))
    }

    pub fn list_appointments(&self, filter: &AppointmentFilter) -> Vec<Appointment> {
        calendar::filter_appointments(self.store.appointments(), filter)
    }

    pub fn appointment_summary(&self, filter: &AppointmentFilter) -> BTreeMap<String, usize> {
        calendar::status_counts(&self.list_appointments(filter))
    }

    pub fn week(&self, date: NaiveDate) -> Vec<NaiveDate> {
        calendar::week_of(date)
    }

    pub async fn reschedule(
        &self,
        appointment_id: &str,
        request: RescheduleRequest,
    ) -> Result<RescheduleOutcome, SchedulingError> {
        let appointment = self.store.appointment(appointment_id)?;
        let doctor_id = request.doctor_id.as_deref().unwrap_or(&appointment.doctor_id);
        let profile = self.store.profile(doctor_id).await?;

        info!("Reschedule requested for appointment {}", appointment_id);
        Ok(calendar::plan_reschedule(appointment, &request, &profile, self.store.appointments()))
    }

    pub async fn availability(&self, doctor_id: &str) -> Result<AvailabilityProfile, SchedulingError> {
        self.store.profile(doctor_id).await
    }

    pub async fn availabilities(&self) -> Vec<AvailabilityProfile> {
        self.store.profiles().await
    }

    pub async fn update_availability(
        &self,
        doctor_id: &str,
        request: UpdateAvailabilityRequest,
    ) -> Result<AvailabilityProfile, SchedulingError> {
        info!("Updating availability for doctor {}", doctor_id);
        self.store
            .update_profile(doctor_id, |current| availability::apply_update(current, request))
            .await
    }

    pub fn waiting_list(&self, filter: &WaitingListFilter, today: NaiveDate) -> Vec<WaitingListView> {
        waiting_list::list_waiting(self.store.waiting_list(), filter, today)
    }

    pub async fn waiting_list_matches(&self, entry_id: &str) -> Result<Vec<OpenSlotMatch>, SchedulingError> {
        let entry = self.store.waiting_list_entry(entry_id)?;
        let profile = self.store.profile(&entry.doctor_id).await?;

        let booked_by_date: HashMap<NaiveDate, BTreeSet<TimeLabel>> = entry
            .preferred_dates
            .iter()
            .map(|&date| {
                let booked = slot_status::booked_labels(
                    self.store.appointments(),
                    &entry.doctor_id,
                    date,
                    &entry.preferred_times,
                );
                (date, booked)
            })
            .collect();

        Ok(waiting_list::open_slot_matches(entry, &profile, &booked_by_date))
    }
}
