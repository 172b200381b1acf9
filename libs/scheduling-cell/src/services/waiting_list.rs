use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::models::{
    AvailabilityProfile, OpenSlotMatch, TimeLabel, WaitingListEntry, WaitingListFilter,
    WaitingListView,
};
use crate::services::slot_status::resolve_day;

/// Whole days since the entry joined the list; never negative.
pub fn days_waiting(entry: &WaitingListEntry, today: NaiveDate) -> i64 {
    (today - entry.waiting_since).num_days().max(0)
}

impl WaitingListFilter {
    pub fn matches(&self, entry: &WaitingListEntry) -> bool {
        self.doctor_id.as_ref().map_or(true, |id| &entry.doctor_id == id)
            && self.priority.map_or(true, |priority| entry.priority == priority)
    }
}

/// Filtered entries, highest priority first, then longest wait.
pub fn list_waiting(
    entries: &[WaitingListEntry],
    filter: &WaitingListFilter,
    today: NaiveDate,
) -> Vec<WaitingListView> {
    let mut views: Vec<WaitingListView> = entries
        .iter()
        .filter(|entry| filter.matches(entry))
        .map(|entry| WaitingListView {
            days_waiting: days_waiting(entry, today),
            entry: entry.clone(),
        })
        .collect();

    views.sort_by(|a, b| {
        a.entry
            .priority
            .rank()
            .cmp(&b.entry.priority.rank())
            .then(b.days_waiting.cmp(&a.days_waiting))
            .then(a.entry.id.cmp(&b.entry.id))
    });
    views
}

/// Preferred (date, time) pairs that currently resolve to `available`
/// for the requested doctor.
///
/// `booked_by_date` holds the booked labels per date; dates missing from the
/// map are treated as fully free.
pub fn open_slot_matches(
    entry: &WaitingListEntry,
    profile: &AvailabilityProfile,
    booked_by_date: &HashMap<NaiveDate, BTreeSet<TimeLabel>>,
) -> Vec<OpenSlotMatch> {
    let empty = BTreeSet::new();
    let mut times = entry.preferred_times.clone();
    times.sort();
    times.dedup();

    let mut dates = entry.preferred_dates.clone();
    dates.sort();
    dates.dedup();

    dates
        .into_iter()
        .flat_map(|date| {
            let booked = booked_by_date.get(&date).unwrap_or(&empty);
            resolve_day(&times, profile, booked)
                .into_iter()
                .filter(|slot| slot.status.is_bookable())
                .map(move |slot| OpenSlotMatch { date, time: slot.time })
        })
        .collect()
}
