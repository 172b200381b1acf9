use std::collections::HashMap;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::SchedulingError;
use crate::fixtures;
use crate::models::{Appointment, AvailabilityProfile, WaitingListEntry};

/// Process-local schedule data. Appointments and the waiting list are fixed at
/// construction; only availability profiles can be edited. Nothing is persisted.
pub struct ScheduleStore {
    appointments: Vec<Appointment>,
    waiting_list: Vec<WaitingListEntry>,
    profiles: RwLock<HashMap<String, AvailabilityProfile>>,
}

impl ScheduleStore {
    pub fn new(
        appointments: Vec<Appointment>,
        profiles: Vec<AvailabilityProfile>,
        waiting_list: Vec<WaitingListEntry>,
    ) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|profile| (profile.doctor_id.clone(), profile))
            .collect();

        Self {
            appointments,
            waiting_list,
            profiles: RwLock::new(profiles),
        }
    }

    pub fn with_fixtures(anchor: NaiveDate) -> Self {
        debug!("Seeding schedule store around {}", anchor);
        Self::new(
            fixtures::appointments(anchor),
            fixtures::availability_profiles(),
            fixtures::waiting_list(anchor),
        )
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn appointment(&self, appointment_id: &str) -> Result<&Appointment, SchedulingError> {
        self.appointments
            .iter()
            .find(|apt| apt.id == appointment_id)
            .ok_or_else(|| SchedulingError::AppointmentNotFound(appointment_id.to_string()))
    }

    pub fn waiting_list(&self) -> &[WaitingListEntry] {
        &self.waiting_list
    }

    pub fn waiting_list_entry(&self, entry_id: &str) -> Result<&WaitingListEntry, SchedulingError> {
        self.waiting_list
            .iter()
            .find(|entry| entry.id == entry_id)
            .ok_or_else(|| SchedulingError::WaitingListEntryNotFound(entry_id.to_string()))
    }

    pub async fn profile(&self, doctor_id: &str) -> Result<AvailabilityProfile, SchedulingError> {
        self.profiles
            .read()
            .await
            .get(doctor_id)
            .cloned()
            .ok_or_else(|| SchedulingError::DoctorNotFound(doctor_id.to_string()))
    }

    /// Sorted by doctor id.
    pub async fn profiles(&self) -> Vec<AvailabilityProfile> {
        let mut profiles: Vec<AvailabilityProfile> = self.profiles.read().await.values().cloned().collect();
        profiles.sort_by(|a, b| a.doctor_id.cmp(&b.doctor_id));
        profiles
    }

    /// Replaces a profile through `update`, holding the write lock for the
    /// whole read-modify-write.
    pub async fn update_profile<F>(&self, doctor_id: &str, update: F) -> Result<AvailabilityProfile, SchedulingError>
    where
        F: FnOnce(&AvailabilityProfile) -> Result<AvailabilityProfile, SchedulingError>,
    {
        let mut profiles = self.profiles.write().await;
        let current = profiles
            .get(doctor_id)
            .ok_or_else(|| SchedulingError::DoctorNotFound(doctor_id.to_string()))?;

        let updated = update(current)?;
        profiles.insert(doctor_id.to_string(), updated.clone());
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[tokio::test]
    async fn test_fixture_lookup() {
        let store = ScheduleStore::with_fixtures(anchor());
        assert!(store.appointment("apt-001").is_ok());
        assert_matches!(store.appointment("nope"), Err(SchedulingError::AppointmentNotFound(_)));
        assert_eq!(store.profiles().await.len(), 3);
        assert_matches!(store.profile("doc-x").await, Err(SchedulingError::DoctorNotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_previous_profile() {
        let store = ScheduleStore::with_fixtures(anchor());
        let before = store.profile("doc-garcia").await.unwrap();

        let result = store
            .update_profile("doc-garcia", |_| Err(SchedulingError::InvalidWorkingHours))
            .await;
        assert!(result.is_err());
        assert_eq!(store.profile("doc-garcia").await.unwrap(), before);
    }

    #[test]
    fn test_profiles_sorted_by_doctor_id() {
        let store = ScheduleStore::with_fixtures(anchor());
        let ids: Vec<String> = tokio_test::block_on(store.profiles())
            .into_iter()
            .map(|profile| profile.doctor_id)
            .collect();

        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
