use crate::models::{Interval, TimeLabel};

impl Interval {
    /// Start-inclusive, end-exclusive. Inverted or empty intervals contain nothing.
    pub fn contains(&self, time: TimeLabel) -> bool {
        self.start <= time && time < self.end
    }

    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// First interval in declaration order that contains `time`.
///
/// Overlapping intervals are not merged: when several match, the one declared
/// first wins, so callers control the reported label through ordering.
pub fn find_containing(time: TimeLabel, intervals: &[Interval]) -> Option<&Interval> {
    intervals.iter().find(|interval| interval.contains(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(raw: &str) -> TimeLabel {
        raw.parse().unwrap()
    }

    fn interval(start: &str, end: &str, label: &str) -> Interval {
        Interval::new(t(start), t(end), label)
    }

    #[test]
    fn test_boundaries() {
        let lunch = interval("12:00", "13:00", "Lunch");
        assert!(lunch.contains(t("12:00")));
        assert!(lunch.contains(t("12:30")));
        assert!(!lunch.contains(t("13:00")));
        assert!(!lunch.contains(t("11:59")));
    }

    #[test]
    fn test_inverted_interval_contains_nothing() {
        let inverted = interval("13:00", "12:00", "Broken");
        assert!(!inverted.is_well_formed());
        assert!(!inverted.contains(t("12:30")));
        assert!(!interval("12:00", "12:00", "Empty").contains(t("12:00")));
    }

    #[test]
    fn test_first_declared_match_wins() {
        let intervals = vec![
            interval("09:00", "12:00", "Surgery"),
            interval("10:00", "11:00", "Staff meeting"),
        ];

        assert_eq!(find_containing(t("10:30"), &intervals).unwrap().label, "Surgery");

        let reversed: Vec<Interval> = intervals.into_iter().rev().collect();
        assert_eq!(find_containing(t("10:30"), &reversed).unwrap().label, "Staff meeting");
        assert_eq!(find_containing(t("09:30"), &reversed).unwrap().label, "Surgery");
    }

    #[test]
    fn test_no_match() {
        let intervals = vec![interval("12:00", "13:00", "Lunch")];
        assert!(find_containing(t("14:00"), &intervals).is_none());
        assert!(find_containing(t("14:00"), &[]).is_none());
    }

    #[test]
    fn test_overlaps() {
        let a = interval("09:00", "10:00", "a");
        assert!(a.overlaps(&interval("09:30", "10:30", "b")));
        assert!(!a.overlaps(&interval("10:00", "11:00", "c")));
    }
}
