use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single OHLCV bar as delivered by the charting host.
///
/// `timestamp` is chart-local wall clock time; session boundaries are
/// compared against it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Position in the stream, strictly increasing
    pub index: usize,
    /// Set on the final bar of the stream
    #[serde(rename = "isLast")]
    pub is_last: bool,
}

impl Bar {
    /// Typical price used to weight VWAP: (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Volume clamped to a usable non-negative value
    pub fn usable_volume(&self) -> f64 {
        if self.volume.is_finite() && self.volume > 0.0 {
            self.volume
        } else {
            0.0
        }
    }
}

/// Read-only random access over the bars seen so far.
pub trait History {
    /// Bar at `index`, if the host still has it
    fn get(&self, index: usize) -> Option<&Bar>;

    /// Bar immediately preceding `current`
    fn prior(&self, current: usize) -> Option<&Bar> {
        current.checked_sub(1).and_then(|i| self.get(i))
    }
}

impl History for [Bar] {
    fn get(&self, index: usize) -> Option<&Bar> {
        <[Bar]>::get(self, index)
    }
}

impl History for Vec<Bar> {
    fn get(&self, index: usize) -> Option<&Bar> {
        self.as_slice().get(index)
    }
}
