// libs/scheduling-cell/src/models.rs
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SchedulingError;

// ==============================================================================
// TIME LABELS
// ==============================================================================

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Wall-clock label (`HH:MM`) stored as minutes since midnight.
///
/// `24:00` is accepted so an interval can run to the end of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeLabel(u32);

impl TimeLabel {
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Self::from_minutes(hour * 60 + minute)
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    pub fn hour(&self) -> u32 {
        self.0 / 60
    }

    pub fn minute(&self) -> u32 {
        self.0 % 60
    }

    pub fn plus_minutes(&self, minutes: u32) -> Option<Self> {
        Self::from_minutes(self.0 + minutes)
    }
}

impl fmt::Display for TimeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeLabel {
    type Err = SchedulingError;

    /// Accepts `HH:MM` and `HH:MM:SS` (seconds are dropped).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SchedulingError::InvalidTimeLabel(s.to_string());

        let parts: Vec<&str> = s.trim().split(':').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(invalid());
        }

        let numbers = parts
            .iter()
            .map(|p| {
                if p.is_empty() || p.len() > 2 || !p.chars().all(|c| c.is_ascii_digit()) {
                    Err(invalid())
                } else {
                    p.parse::<u32>().map_err(|_| invalid())
                }
            })
            .collect::<Result<Vec<u32>, _>>()?;

        let (hour, minute) = (numbers[0], numbers[1]);
        let second = numbers.get(2).copied().unwrap_or(0);

        if second >= 60 || (hour == 24 && (minute != 0 || second != 0)) {
            return Err(invalid());
        }

        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for TimeLabel {
    type Error = SchedulingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeLabel> for String {
    fn from(label: TimeLabel) -> Self {
        label.to_string()
    }
}

/// Labeled `[start, end)` span, e.g. a lunch break or a blackout period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: TimeLabel,
    pub end: TimeLabel,
    pub label: String,
}

impl Interval {
    pub fn new(start: TimeLabel, end: TimeLabel, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }
}

// ==============================================================================
// SLOT STATUS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
    Break,
    Unavailable,
}

impl SlotStatus {
    /// Evaluation order of the resolver, strongest first.
    pub const PRECEDENCE: [SlotStatus; 4] = [
        SlotStatus::Break,
        SlotStatus::Unavailable,
        SlotStatus::Booked,
        SlotStatus::Available,
    ];

    pub fn is_bookable(&self) -> bool {
        matches!(self, SlotStatus::Available)
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotStatus::Available => write!(f, "available"),
            SlotStatus::Booked => write!(f, "booked"),
            SlotStatus::Break => write!(f, "break"),
            SlotStatus::Unavailable => write!(f, "unavailable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotResolution {
    pub time: TimeLabel,
    pub status: SlotStatus,
    /// Label of the interval that blocked the slot, if any.
    pub reason: Option<String>,
}

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Confirmed,
    Pending,
    Completed,
    Cancelled,
    #[serde(alias = "no-show")]
    NoShow,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::Confirmed,
        AppointmentStatus::Pending,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
    ];

    /// Whether an appointment in this status still holds its slot.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled | AppointmentStatus::NoShow)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub patient_name: String,
    pub patient_phone: String,
    pub doctor_id: String,
    pub service: String,
    pub date: NaiveDate,
    pub start_time: TimeLabel,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

impl Appointment {
    /// Saturates at `24:00`.
    pub fn end_time(&self) -> TimeLabel {
        let end = (self.start_time.minutes() + self.duration_minutes).min(MINUTES_PER_DAY);
        TimeLabel(end)
    }

    pub fn covers(&self, time: TimeLabel) -> bool {
        self.start_time <= time && time < self.end_time()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentFilter {
    pub date: Option<NaiveDate>,
    pub doctor_id: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub date: NaiveDate,
    pub start_time: TimeLabel,
    pub doctor_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RescheduleOutcome {
    Accepted {
        appointment_id: String,
        doctor_id: String,
        date: NaiveDate,
        start_time: TimeLabel,
    },
    Rejected {
        appointment_id: String,
        blocked_at: TimeLabel,
        status: SlotStatus,
        reason: Option<String>,
    },
}

// ==============================================================================
// DOCTOR AVAILABILITY
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityProfile {
    pub doctor_id: String,
    pub doctor_name: String,
    pub work_start: TimeLabel,
    pub work_end: TimeLabel,
    pub breaks: Vec<Interval>,
    pub unavailable: Vec<Interval>,
    pub consultation_minutes: u32,
    pub max_daily_consultations: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub work_start: Option<TimeLabel>,
    pub work_end: Option<TimeLabel>,
    pub breaks: Option<Vec<Interval>>,
    pub unavailable: Option<Vec<Interval>>,
    pub consultation_minutes: Option<u32>,
    pub max_daily_consultations: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySchedule {
    pub doctor_id: String,
    pub date: NaiveDate,
    pub slots: Vec<SlotResolution>,
    pub booked_count: usize,
    pub max_daily_consultations: u32,
    pub remaining_capacity: u32,
}

// ==============================================================================
// WAITING LIST
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Lower rank is served first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitingListEntry {
    pub id: String,
    pub patient_name: String,
    pub patient_phone: String,
    pub patient_email: Option<String>,
    pub doctor_id: String,
    pub service: String,
    pub preferred_dates: Vec<NaiveDate>,
    pub preferred_times: Vec<TimeLabel>,
    pub priority: Priority,
    pub waiting_since: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaitingListFilter {
    pub doctor_id: Option<String>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitingListView {
    #[serde(flatten)]
    pub entry: WaitingListEntry,
    pub days_waiting: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenSlotMatch {
    pub date: NaiveDate,
    pub time: TimeLabel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_time_label_parse_and_display() {
        let label: TimeLabel = "08:30".parse().unwrap();
        assert_eq!(label.minutes(), 510);
        assert_eq!(label.to_string(), "08:30");

        let with_seconds: TimeLabel = "17:00:00".parse().unwrap();
        assert_eq!(with_seconds.to_string(), "17:00");

        let end_of_day: TimeLabel = "24:00".parse().unwrap();
        assert_eq!(end_of_day.minutes(), MINUTES_PER_DAY);
    }

    #[test]
    fn test_time_label_rejects_garbage() {
        for raw in ["", "8", "8:60", "25:00", "24:30", "ab:cd", "12:00:99", "123:00", "-1:00"] {
            assert_matches!(raw.parse::<TimeLabel>(), Err(SchedulingError::InvalidTimeLabel(_)), "{}", raw);
        }
    }

    #[test]
    fn test_time_label_serde_as_string() {
        let label = TimeLabel::from_hm(9, 0).unwrap();
        assert_eq!(serde_json::to_value(label).unwrap(), serde_json::json!("09:00"));

        let parsed: TimeLabel = serde_json::from_value(serde_json::json!("13:30")).unwrap();
        assert_eq!(parsed, TimeLabel::from_hm(13, 30).unwrap());

        assert!(serde_json::from_value::<TimeLabel>(serde_json::json!("99:99")).is_err());
    }

    #[test]
    fn test_appointment_status_accepts_hyphenated_no_show() {
        let status: AppointmentStatus = serde_json::from_value(serde_json::json!("no-show")).unwrap();
        assert_eq!(status, AppointmentStatus::NoShow);
        assert!(!status.occupies_slot());
        assert!(AppointmentStatus::Pending.occupies_slot());
    }

    #[test]
    fn test_appointment_end_time_saturates() {
        let appointment = Appointment {
            id: "a".into(),
            patient_name: "p".into(),
            patient_phone: "1".into(),
            doctor_id: "d".into(),
            service: "s".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            start_time: TimeLabel::from_hm(23, 30).unwrap(),
            duration_minutes: 90,
            status: AppointmentStatus::Confirmed,
            notes: None,
        };
        assert_eq!(appointment.end_time().to_string(), "24:00");
        assert!(appointment.covers(TimeLabel::from_hm(23, 45).unwrap()));
    }
}
