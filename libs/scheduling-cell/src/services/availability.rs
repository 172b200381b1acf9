use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::SchedulingError;
use crate::models::{Appointment, AvailabilityProfile, DaySchedule, TimeLabel, UpdateAvailabilityRequest};
use crate::services::slot_status::{booked_labels, resolve_day};

pub const MIN_CONSULTATION_MINUTES: u32 = 5;
pub const MAX_CONSULTATION_MINUTES: u32 = 240;

pub fn validate_profile(profile: &AvailabilityProfile) -> Result<(), SchedulingError> {
    if profile.work_start >= profile.work_end {
        return Err(SchedulingError::InvalidWorkingHours);
    }

    if !(MIN_CONSULTATION_MINUTES..=MAX_CONSULTATION_MINUTES).contains(&profile.consultation_minutes) {
        return Err(SchedulingError::InvalidConsultationDuration {
            min: MIN_CONSULTATION_MINUTES,
            max: MAX_CONSULTATION_MINUTES,
        });
    }

    if profile.max_daily_consultations == 0 {
        return Err(SchedulingError::InvalidDailyLimit);
    }

    if let Some(bad) = profile
        .breaks
        .iter()
        .chain(profile.unavailable.iter())
        .find(|interval| !interval.is_well_formed())
    {
        return Err(SchedulingError::InvalidInterval(bad.label.clone()));
    }

    Ok(())
}

/// Applies the provided fields on a copy and validates the result.
/// `profile` is left untouched when validation fails.
pub fn apply_update(
    profile: &AvailabilityProfile,
    request: UpdateAvailabilityRequest,
) -> Result<AvailabilityProfile, SchedulingError> {
    let mut updated = profile.clone();

    if let Some(work_start) = request.work_start {
        updated.work_start = work_start;
    }
    if let Some(work_end) = request.work_end {
        updated.work_end = work_end;
    }
    if let Some(breaks) = request.breaks {
        updated.breaks = breaks;
    }
    if let Some(unavailable) = request.unavailable {
        updated.unavailable = unavailable;
    }
    if let Some(minutes) = request.consultation_minutes {
        updated.consultation_minutes = minutes;
    }
    if let Some(max) = request.max_daily_consultations {
        updated.max_daily_consultations = max;
    }

    validate_profile(&updated)?;
    debug!("Availability for doctor {} updated", updated.doctor_id);
    Ok(updated)
}

/// Slot grid for one doctor and day, plus a capacity summary.
///
/// Capacity is informational; it does not change any slot's status.
pub fn day_schedule(
    profile: &AvailabilityProfile,
    date: NaiveDate,
    grid: &[TimeLabel],
    appointments: &[Appointment],
) -> DaySchedule {
    let booked: BTreeSet<TimeLabel> = booked_labels(appointments, &profile.doctor_id, date, grid);
    let slots = resolve_day(grid, profile, &booked);

    let booked_count = appointments
        .iter()
        .filter(|apt| apt.doctor_id == profile.doctor_id && apt.date == date && apt.status.occupies_slot())
        .count();

    DaySchedule {
        doctor_id: profile.doctor_id.clone(),
        date,
        slots,
        booked_count,
        max_daily_consultations: profile.max_daily_consultations,
        remaining_capacity: profile
            .max_daily_consultations
            .saturating_sub(booked_count as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, Interval, SlotStatus};
    use crate::services::time_grid::generate;
    use assert_matches::assert_matches;

    fn t(raw: &str) -> TimeLabel {
        raw.parse().unwrap()
    }

    fn profile() -> AvailabilityProfile {
        AvailabilityProfile {
            doctor_id: "doc-1".to_string(),
            doctor_name: "Dr. One".to_string(),
            work_start: t("08:00"),
            work_end: t("17:00"),
            breaks: vec![Interval::new(t("12:00"), t("13:00"), "Lunch")],
            unavailable: vec![],
            consultation_minutes: 30,
            max_daily_consultations: 2,
        }
    }

    #[test]
    fn test_update_applies_only_given_fields() {
        let updated = apply_update(
            &profile(),
            UpdateAvailabilityRequest {
                work_end: Some(t("15:00")),
                max_daily_consultations: Some(6),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(updated.work_start, t("08:00"));
        assert_eq!(updated.work_end, t("15:00"));
        assert_eq!(updated.max_daily_consultations, 6);
        assert_eq!(updated.breaks.len(), 1);
    }

    #[test]
    fn test_update_validation_errors() {
        assert_matches!(
            apply_update(&profile(), UpdateAvailabilityRequest { work_start: Some(t("18:00")), ..Default::default() }),
            Err(SchedulingError::InvalidWorkingHours)
        );
        assert_matches!(
            apply_update(&profile(), UpdateAvailabilityRequest { consultation_minutes: Some(0), ..Default::default() }),
            Err(SchedulingError::InvalidConsultationDuration { .. })
        );
        assert_matches!(
            apply_update(&profile(), UpdateAvailabilityRequest { max_daily_consultations: Some(0), ..Default::default() }),
            Err(SchedulingError::InvalidDailyLimit)
        );
        assert_matches!(
            apply_update(
                &profile(),
                UpdateAvailabilityRequest {
                    unavailable: Some(vec![Interval::new(t("10:00"), t("09:00"), "Backwards")]),
                    ..Default::default()
                }
            ),
            Err(SchedulingError::InvalidInterval(label)) if label == "Backwards"
        );
    }

    #[test]
    fn test_day_schedule_capacity_is_informational() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let apt = |id: &str, start: &str| Appointment {
            id: id.to_string(),
            patient_name: "P".to_string(),
            patient_phone: "1".to_string(),
            doctor_id: "doc-1".to_string(),
            service: "Checkup".to_string(),
            date,
            start_time: t(start),
            duration_minutes: 30,
            status: AppointmentStatus::Confirmed,
            notes: None,
        };
        let appointments = vec![apt("a", "09:00"), apt("b", "10:00"), apt("c", "11:00")];

        let schedule = day_schedule(&profile(), date, &generate(8, 17), &appointments);
        assert_eq!(schedule.booked_count, 3);
        assert_eq!(schedule.remaining_capacity, 0);
        assert_eq!(schedule.slots.len(), 18);

        let available = schedule.slots.iter().filter(|s| s.status == SlotStatus::Available).count();
        assert_eq!(available, 18 - 3 - 2);
    }
}
