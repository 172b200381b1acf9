use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::{Appointment, AvailabilityProfile, Interval, SlotResolution, SlotStatus, TimeLabel};
use crate::services::interval::find_containing;

/// Classifies one slot. Precedence follows [`SlotStatus::PRECEDENCE`]:
/// a break or blackout always beats a booking.
pub fn resolve(
    time: TimeLabel,
    breaks: &[Interval],
    unavailable: &[Interval],
    booked: &BTreeSet<TimeLabel>,
) -> SlotResolution {
    for status in SlotStatus::PRECEDENCE {
        let reason = match status {
            SlotStatus::Break => match find_containing(time, breaks) {
                Some(interval) => Some(interval.label.clone()),
                None => continue,
            },
            SlotStatus::Unavailable => match find_containing(time, unavailable) {
                Some(interval) => Some(interval.label.clone()),
                None => continue,
            },
            SlotStatus::Booked if booked.contains(&time) => None,
            SlotStatus::Booked => continue,
            SlotStatus::Available => None,
        };

        return SlotResolution { time, status, reason };
    }

    SlotResolution {
        time,
        status: SlotStatus::Available,
        reason: None,
    }
}

/// Resolves every label of `grid` against a doctor's profile.
///
/// Labels outside working hours come back `unavailable` with reason
/// `"Outside working hours"`.
pub fn resolve_day(
    grid: &[TimeLabel],
    profile: &AvailabilityProfile,
    booked: &BTreeSet<TimeLabel>,
) -> Vec<SlotResolution> {
    grid.iter()
        .map(|&time| {
            let resolution = resolve(time, &profile.breaks, &profile.unavailable, booked);
            let in_hours = profile.work_start <= time && time < profile.work_end;

            if !in_hours && resolution.status != SlotStatus::Break {
                SlotResolution {
                    time,
                    status: SlotStatus::Unavailable,
                    reason: Some(OUTSIDE_WORKING_HOURS.to_string()),
                }
            } else {
                resolution
            }
        })
        .collect()
}

pub const OUTSIDE_WORKING_HOURS: &str = "Outside working hours";

/// Grid labels occupied by the doctor's live appointments on `date`.
pub fn booked_labels(
    appointments: &[Appointment],
    doctor_id: &str,
    date: NaiveDate,
    grid: &[TimeLabel],
) -> BTreeSet<TimeLabel> {
    let live: Vec<&Appointment> = appointments
        .iter()
        .filter(|apt| apt.doctor_id == doctor_id && apt.date == date && apt.status.occupies_slot())
        .collect();

    grid.iter()
        .copied()
        .filter(|&time| live.iter().any(|apt| apt.covers(time)))
        .collect()
}
