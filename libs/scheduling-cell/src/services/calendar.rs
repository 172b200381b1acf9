use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::info;

use crate::models::{
    Appointment, AppointmentFilter, AppointmentStatus, AvailabilityProfile, Interval,
    RescheduleOutcome, RescheduleRequest, SlotStatus, TimeLabel, MINUTES_PER_DAY,
};
use crate::services::slot_status::OUTSIDE_WORKING_HOURS;

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        if self.date.is_some_and(|date| appointment.date != date) {
            return false;
        }
        if self.doctor_id.as_ref().is_some_and(|id| &appointment.doctor_id != id) {
            return false;
        }
        if self.status.is_some_and(|status| appointment.status != status) {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                appointment.patient_name.to_lowercase().contains(&term)
                    || appointment.patient_phone.contains(&term)
                    || appointment.service.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}

/// Appointments passing `filter`, ordered by date then start time.
pub fn filter_appointments(appointments: &[Appointment], filter: &AppointmentFilter) -> Vec<Appointment> {
    let mut matching: Vec<Appointment> = appointments
        .iter()
        .filter(|apt| filter.matches(apt))
        .cloned()
        .collect();

    matching.sort_by(|a, b| (a.date, a.start_time, &a.id).cmp(&(b.date, b.start_time, &b.id)));
    matching
}

/// Per-status totals, with every status present (zero when absent).
pub fn status_counts(appointments: &[Appointment]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = AppointmentStatus::ALL
        .iter()
        .map(|status| (status.to_string(), 0))
        .collect();

    for appointment in appointments {
        *counts.entry(appointment.status.to_string()).or_default() += 1;
    }

    counts
}

/// Monday-to-Sunday week containing `date`.
pub fn week_of(date: NaiveDate) -> Vec<NaiveDate> {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (0..7).map(|offset| monday + Duration::days(offset)).collect()
}

/// Checks whether `appointment` could move to the requested slot.
///
/// The moved span `[start, start + duration)` is tested in resolver precedence
/// order: breaks, then blackout intervals, then the doctor's other live
/// appointments. Working hours bound the whole span. The intent is logged;
/// no data changes.
pub fn plan_reschedule(
    appointment: &Appointment,
    request: &RescheduleRequest,
    profile: &AvailabilityProfile,
    appointments: &[Appointment],
) -> RescheduleOutcome {
    let doctor_id = request
        .doctor_id
        .clone()
        .unwrap_or_else(|| appointment.doctor_id.clone());

    let span_end = request
        .start_time
        .plus_minutes(appointment.duration_minutes.max(1))
        .unwrap_or_else(|| TimeLabel::from_minutes(MINUTES_PER_DAY).unwrap_or(request.start_time));
    let span = Interval::new(request.start_time, span_end, appointment.service.clone());

    let reject = |blocked_at: TimeLabel, status: SlotStatus, reason: Option<String>| {
        info!(
            "Reschedule of {} to {} {} rejected: {} at {}",
            appointment.id, request.date, request.start_time, status, blocked_at
        );
        RescheduleOutcome::Rejected {
            appointment_id: appointment.id.clone(),
            blocked_at,
            status,
            reason,
        }
    };

    for status in SlotStatus::PRECEDENCE {
        let blocker = match status {
            SlotStatus::Break => first_overlap(&span, &profile.breaks),
            SlotStatus::Unavailable => first_overlap(&span, &profile.unavailable),
            SlotStatus::Booked => appointments
                .iter()
                .filter(|apt| {
                    apt.id != appointment.id
                        && apt.doctor_id == doctor_id
                        && apt.date == request.date
                        && apt.status.occupies_slot()
                })
                .map(|apt| Interval::new(apt.start_time, apt.end_time(), apt.id.clone()))
                .find(|other| other.overlaps(&span)),
            SlotStatus::Available => None,
        };

        if let Some(blocker) = blocker {
            return reject(span.start.max(blocker.start), status, Some(blocker.label));
        }
    }

    if span.start < profile.work_start || span.end > profile.work_end {
        return reject(span.start, SlotStatus::Unavailable, Some(OUTSIDE_WORKING_HOURS.to_string()));
    }

    info!(
        "Reschedule intent for {}: {} {} -> {} {} (doctor {})",
        appointment.id, appointment.date, appointment.start_time, request.date, request.start_time, doctor_id
    );

    RescheduleOutcome::Accepted {
        appointment_id: appointment.id.clone(),
        doctor_id,
        date: request.date,
        start_time: request.start_time,
    }
}

fn first_overlap(span: &Interval, intervals: &[Interval]) -> Option<Interval> {
    intervals.iter().find(|interval| interval.overlaps(span)).cloned()
}
