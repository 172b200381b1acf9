use crate::models::TimeLabel;

pub const DEFAULT_CADENCE_MINUTES: u32 = 30;

/// Half-hour labels covering `[start_hour, end_hour)`.
///
/// Empty when `end_hour <= start_hour`. Hours past midnight are clamped to 24;
/// the grid never wraps into the next day.
pub fn generate(start_hour: u32, end_hour: u32) -> Vec<TimeLabel> {
    generate_with_cadence(start_hour, end_hour, DEFAULT_CADENCE_MINUTES)
}

pub fn generate_with_cadence(start_hour: u32, end_hour: u32, cadence_minutes: u32) -> Vec<TimeLabel> {
    let end_hour = end_hour.min(24);
    if cadence_minutes == 0 || end_hour <= start_hour {
        return Vec::new();
    }

    (start_hour * 60..end_hour * 60)
        .step_by(cadence_minutes as usize)
        .filter_map(TimeLabel::from_minutes)
        .collect()
}

/// Grid spanning a working day given as labels, e.g. `08:30`..`17:00`.
pub fn generate_between(start: TimeLabel, end: TimeLabel, cadence_minutes: u32) -> Vec<TimeLabel> {
    if cadence_minutes == 0 || end <= start {
        return Vec::new();
    }

    (start.minutes()..end.minutes())
        .step_by(cadence_minutes as usize)
        .filter_map(TimeLabel::from_minutes)
        .collect()
}
