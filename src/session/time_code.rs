//! Time Classifier
//!
//! Encodes a wall clock time as `hour * 100 + minute` (9:30 -> 930) so
//! session boundaries can be compared with plain integer ordering.

use chrono::{NaiveDateTime, Timelike};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// HHMM time code within a calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeCode(u32);

impl TimeCode {
    /// Hours and minutes outside a day are folded back into one
    pub const fn new(hour: u32, minute: u32) -> Self {
        Self::from_minute_of_day((hour % 24) * 60 + minute % MINUTES_PER_DAY)
    }

    pub fn of(timestamp: &NaiveDateTime) -> Self {
        Self::new(timestamp.hour(), timestamp.minute())
    }

    const fn from_minute_of_day(minutes: u32) -> Self {
        let minutes = minutes % MINUTES_PER_DAY;
        Self((minutes / 60) * 100 + minutes % 60)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / 100
    }

    pub fn minute(self) -> u32 {
        self.0 % 100
    }

    pub fn minute_of_day(self) -> u32 {
        self.hour() * 60 + self.minute()
    }

    /// Clock arithmetic, wrapping past midnight
    pub fn add_minutes(self, minutes: u32) -> Self {
        Self::from_minute_of_day(self.minute_of_day() + minutes % MINUTES_PER_DAY)
    }

    /// Minutes elapsed since the most recent occurrence of `earlier`, in 0..1440
    pub fn minutes_since(self, earlier: TimeCode) -> u32 {
        (self.minute_of_day() + MINUTES_PER_DAY - earlier.minute_of_day()) % MINUTES_PER_DAY
    }
}

impl std::fmt::Display for TimeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_time_code_encoding() {
        assert_eq!(TimeCode::new(9, 30).value(), 930);
        assert_eq!(TimeCode::new(0, 5).value(), 5);
        assert_eq!(TimeCode::new(23, 59).value(), 2359);
        assert!(TimeCode::new(9, 29) < TimeCode::new(9, 30));
    }

    #[test]
    fn test_of_timestamp() {
        let ts = NaiveDate::from_ymd_opt(2025, 12, 2)
            .unwrap()
            .and_hms_opt(18, 7, 42)
            .unwrap();
        assert_eq!(TimeCode::of(&ts).value(), 1807);
    }

    #[test]
    fn test_add_minutes_wraps_midnight() {
        assert_eq!(TimeCode::new(9, 30).add_minutes(60).value(), 1030);
        assert_eq!(TimeCode::new(23, 30).add_minutes(60).value(), 30);
        assert_eq!(TimeCode::new(21, 45).add_minutes(60).value(), 2245);
    }

    #[test]
    fn test_minutes_since() {
        assert_eq!(TimeCode::new(9, 30).minutes_since(TimeCode::new(9, 29)), 1);
        assert_eq!(TimeCode::new(1, 0).minutes_since(TimeCode::new(23, 59)), 61);
        assert_eq!(TimeCode::new(9, 30).minutes_since(TimeCode::new(9, 30)), 0);
    }

    #[test]
    fn test_out_of_range_inputs_fold_without_overflow() {
        assert_eq!(TimeCode::new(u32::MAX, u32::MAX).value(), 1915);
        assert_eq!(TimeCode::new(25, 0).value(), 100);
    }

    #[test]
    fn test_display() {
        assert_eq!(TimeCode::new(9, 5).to_string(), "09:05");
    }
}
