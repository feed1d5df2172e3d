//! Range Accumulators
//!
//! A `Range` can only be built with `high >= low`, and a `RangeTracker`
//! carries its range inside the state variant, so a collecting tracker
//! without a range cannot be represented.

use crate::types::Bar;

/// High/low pair with `high >= low`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    high: f64,
    low: f64,
}

impl Range {
    /// Orders the two prices so the invariant holds even for malformed bars
    pub fn new(a: f64, b: f64) -> Self {
        if a >= b {
            Self { high: a, low: b }
        } else {
            Self { high: b, low: a }
        }
    }

    pub fn of_bar(bar: &Bar) -> Self {
        Self::new(bar.high, bar.low)
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn extend(&mut self, bar: &Bar) {
        let other = Range::of_bar(bar);
        self.high = self.high.max(other.high);
        self.low = self.low.min(other.low);
    }
}

/// Lifecycle of a session range
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RangeTracker {
    /// No range for the current cycle
    #[default]
    Idle,
    /// Window open, every bar extends the range
    Collecting(Range),
    /// Window closed, range frozen until the next start
    Closed(Range),
}

impl RangeTracker {
    /// Start a new window seeded with this bar, discarding any prior range
    pub fn start(&mut self, bar: &Bar) {
        *self = RangeTracker::Collecting(Range::of_bar(bar));
    }

    /// Extend the range while collecting; no effect otherwise
    pub fn update(&mut self, bar: &Bar) {
        if let RangeTracker::Collecting(range) = self {
            range.extend(bar);
        }
    }

    /// Freeze the range. Returns true when a collecting window was closed.
    pub fn close(&mut self) -> bool {
        match *self {
            RangeTracker::Collecting(range) => {
                *self = RangeTracker::Closed(range);
                true
            }
            _ => false,
        }
    }

    /// Remove and return the current range, leaving the tracker idle
    pub fn take(&mut self) -> Option<Range> {
        let range = self.range();
        *self = RangeTracker::Idle;
        range
    }

    pub fn range(&self) -> Option<Range> {
        match *self {
            RangeTracker::Idle => None,
            RangeTracker::Collecting(range) | RangeTracker::Closed(range) => Some(range),
        }
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self, RangeTracker::Collecting(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(high: f64, low: f64) -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2025, 12, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            open: low,
            high,
            low,
            close: high,
            volume: 1.0,
            index: 0,
            is_last: false,
        }
    }

    #[test]
    fn test_range_orders_prices() {
        let r = Range::new(95.0, 105.0);
        assert_eq!((r.high(), r.low()), (105.0, 95.0));
    }

    #[test]
    fn test_tracker_lifecycle() {
        let mut t = RangeTracker::default();
        assert_eq!(t.range(), None);

        // Updates before start are ignored
        t.update(&bar(200.0, 1.0));
        assert_eq!(t, RangeTracker::Idle);

        t.start(&bar(105.0, 95.0));
        t.update(&bar(107.0, 96.0));
        t.update(&bar(104.0, 93.0));
        assert!(t.is_collecting());
        assert_eq!(t.range(), Some(Range::new(107.0, 93.0)));

        assert!(t.close());
        assert!(!t.close());
        t.update(&bar(120.0, 80.0));
        assert_eq!(t, RangeTracker::Closed(Range::new(107.0, 93.0)));

        assert_eq!(t.take(), Some(Range::new(107.0, 93.0)));
        assert_eq!(t, RangeTracker::Idle);
    }

    #[test]
    fn test_restart_discards_previous_range() {
        let mut t = RangeTracker::default();
        t.start(&bar(300.0, 1.0));
        t.close();
        t.start(&bar(105.0, 95.0));
        assert_eq!(t.range(), Some(Range::new(105.0, 95.0)));
    }

    #[test]
    fn test_high_never_below_low() {
        let mut t = RangeTracker::default();
        t.start(&bar(90.0, 110.0));
        for (h, l) in [(100.0, 99.0), (50.0, 150.0), (101.0, 101.0)] {
            t.update(&bar(h, l));
            let r = t.range().unwrap();
            assert!(r.high() >= r.low());
        }
    }
}
