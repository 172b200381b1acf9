//! Seed data for the in-memory schedule. Dates are relative to an anchor day
//! so the calendar always has something to show around "today".

use chrono::{Duration, NaiveDate};

use crate::models::{
    Appointment, AppointmentStatus, AvailabilityProfile, Interval, Priority, TimeLabel,
    WaitingListEntry,
};

fn hm(hour: u32, minute: u32) -> TimeLabel {
    TimeLabel::from_hm(hour, minute).unwrap_or_else(|| unreachable!("fixture times are valid"))
}

pub fn availability_profiles() -> Vec<AvailabilityProfile> {
    vec![
        AvailabilityProfile {
            doctor_id: "doc-garcia".to_string(),
            doctor_name: "Dr. Elena Garcia".to_string(),
            work_start: hm(8, 0),
            work_end: hm(16, 0),
            breaks: vec![
                Interval::new(hm(10, 30), hm(11, 0), "Coffee break"),
                Interval::new(hm(13, 0), hm(14, 0), "Lunch"),
            ],
            unavailable: vec![Interval::new(hm(15, 0), hm(16, 0), "Ward round")],
            consultation_minutes: 30,
            max_daily_consultations: 12,
        },
        AvailabilityProfile {
            doctor_id: "doc-okafor".to_string(),
            doctor_name: "Dr. Samuel Okafor".to_string(),
            work_start: hm(9, 0),
            work_end: hm(18, 0),
            breaks: vec![Interval::new(hm(12, 30), hm(13, 30), "Lunch")],
            unavailable: vec![Interval::new(hm(16, 0), hm(18, 0), "Surgery block")],
            consultation_minutes: 45,
            max_daily_consultations: 8,
        },
        AvailabilityProfile {
            doctor_id: "doc-lindqvist".to_string(),
            doctor_name: "Dr. Maja Lindqvist".to_string(),
            work_start: hm(8, 0),
            work_end: hm(14, 0),
            breaks: vec![Interval::new(hm(11, 0), hm(11, 30), "Break")],
            unavailable: vec![],
            consultation_minutes: 20,
            max_daily_consultations: 15,
        },
    ]
}

pub fn appointments(anchor: NaiveDate) -> Vec<Appointment> {
    let tomorrow = anchor + Duration::days(1);
    let yesterday = anchor - Duration::days(1);

    let apt = |id: &str,
               patient: &str,
               phone: &str,
               doctor: &str,
               service: &str,
               date: NaiveDate,
               start: TimeLabel,
               minutes: u32,
               status: AppointmentStatus,
               notes: Option<&str>| Appointment {
        id: id.to_string(),
        patient_name: patient.to_string(),
        patient_phone: phone.to_string(),
        doctor_id: doctor.to_string(),
        service: service.to_string(),
        date,
        start_time: start,
        duration_minutes: minutes,
        status,
        notes: notes.map(str::to_string),
    };

    vec![
        apt("apt-001", "Lucia Fernandez", "+34 612 345 678", "doc-garcia", "General Consultation",
            anchor, hm(9, 0), 30, AppointmentStatus::Confirmed, Some("Annual check-up")),
        apt("apt-002", "Marco Rossi", "+39 347 555 0192", "doc-garcia", "Blood Test Review",
            anchor, hm(9, 30), 30, AppointmentStatus::Pending, None),
        apt("apt-003", "Aisha Bello", "+234 803 555 0147", "doc-okafor", "Cardiology Follow-up",
            anchor, hm(10, 0), 45, AppointmentStatus::Confirmed, Some("Bring ECG results")),
        apt("apt-004", "Johan Berg", "+46 70 555 0133", "doc-lindqvist", "Pediatrics",
            anchor, hm(8, 20), 20, AppointmentStatus::Completed, None),
        apt("apt-005", "Sofia Martins", "+351 912 555 014", "doc-garcia", "Dermatology Screening",
            anchor, hm(11, 0), 30, AppointmentStatus::Cancelled, Some("Patient called to cancel")),
        apt("apt-006", "Omar Haddad", "+971 50 555 0161", "doc-okafor", "Cardiology Consultation",
            anchor, hm(14, 0), 45, AppointmentStatus::NoShow, None),
        apt("apt-007", "Emma Dubois", "+33 6 55 50 12 34", "doc-garcia", "General Consultation",
            tomorrow, hm(8, 30), 30, AppointmentStatus::Pending, None),
        apt("apt-008", "Kenji Sato", "+81 90 5555 0108", "doc-lindqvist", "Vaccination",
            tomorrow, hm(9, 0), 20, AppointmentStatus::Confirmed, None),
        apt("apt-009", "Grace Mensah", "+233 24 555 0199", "doc-okafor", "ECG",
            yesterday, hm(11, 0), 45, AppointmentStatus::Completed, Some("Normal sinus rhythm")),
    ]
}

pub fn waiting_list(anchor: NaiveDate) -> Vec<WaitingListEntry> {
    vec![
        WaitingListEntry {
            id: "wl-001".to_string(),
            patient_name: "Hannah Schmidt".to_string(),
            patient_phone: "+49 151 5555 0101".to_string(),
            patient_email: Some("hannah.schmidt@example.com".to_string()),
            doctor_id: "doc-garcia".to_string(),
            service: "General Consultation".to_string(),
            preferred_dates: vec![anchor, anchor + Duration::days(1)],
            preferred_times: vec![hm(9, 0), hm(10, 0)],
            priority: Priority::High,
            waiting_since: anchor - Duration::days(6),
            notes: Some("Persistent cough".to_string()),
        },
        WaitingListEntry {
            id: "wl-002".to_string(),
            patient_name: "Diego Alvarez".to_string(),
            patient_phone: "+52 55 5555 0102".to_string(),
            patient_email: None,
            doctor_id: "doc-okafor".to_string(),
            service: "Cardiology Consultation".to_string(),
            preferred_dates: vec![anchor + Duration::days(2)],
            preferred_times: vec![hm(9, 45), hm(16, 0)],
            priority: Priority::Medium,
            waiting_since: anchor - Duration::days(12),
            notes: None,
        },
        WaitingListEntry {
            id: "wl-003".to_string(),
            patient_name: "Ingrid Nilsson".to_string(),
            patient_phone: "+46 73 555 0103".to_string(),
            patient_email: Some("ingrid.n@example.com".to_string()),
            doctor_id: "doc-lindqvist".to_string(),
            service: "Pediatrics".to_string(),
            preferred_dates: vec![anchor + Duration::days(1)],
            preferred_times: vec![hm(9, 0), hm(11, 0), hm(12, 0)],
            priority: Priority::Low,
            waiting_since: anchor - Duration::days(2),
            notes: None,
        },
    ]
}
