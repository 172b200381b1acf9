use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulingError {
    #[error("Invalid time label: {0}")]
    InvalidTimeLabel(String),

    #[error("Invalid hour range: {start}..{end}")]
    InvalidHourRange { start: u32, end: u32 },

    #[error("Working hours must start before they end")]
    InvalidWorkingHours,

    #[error("Interval '{0}' must start before it ends")]
    InvalidInterval(String),

    #[error("Consultation duration must be between {min} and {max} minutes")]
    InvalidConsultationDuration { min: u32, max: u32 },

    #[error("Maximum daily consultations must be greater than zero")]
    InvalidDailyLimit,

    #[error("Doctor not found: {0}")]
    DoctorNotFound(String),

    #[error("Appointment not found: {0}")]
    AppointmentNotFound(String),

    #[error("Waiting list entry not found: {0}")]
    WaitingListEntryNotFound(String),
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::DoctorNotFound(_)
            | SchedulingError::AppointmentNotFound(_)
            | SchedulingError::WaitingListEntryNotFound(_) => AppError::NotFound(err.to_string()),
            _ => AppError::ValidationError(err.to_string()),
        }
    }
}
