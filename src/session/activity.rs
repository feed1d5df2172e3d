//! Market-Activity Probe
//!
//! Short look-back volume check: is anything trading right around a given
//! timestamp? Used as an optional liveness gate for VWAP re-anchoring.

use chrono::{Duration, NaiveDateTime};

use crate::types::History;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityProbe {
    /// Maximum bars scanned, counting the current one
    pub lookback_bars: usize,
    /// Only bars this close to the probed timestamp count
    pub window_seconds: i64,
    /// Summed volume must exceed this to count as active
    pub volume_threshold: f64,
}

impl Default for ActivityProbe {
    fn default() -> Self {
        Self {
            lookback_bars: 10,
            window_seconds: 60,
            volume_threshold: 2.0,
        }
    }
}

impl ActivityProbe {
    /// Volume traded within the window ending at `timestamp`, scanning back
    /// from `current_index`. Stops at the first bar older than the window.
    pub fn recent_volume<H: History + ?Sized>(
        &self,
        current_index: usize,
        history: &H,
        timestamp: &NaiveDateTime,
    ) -> f64 {
        let window = Duration::seconds(self.window_seconds);
        let mut sum = 0.0;

        for offset in 0..self.lookback_bars {
            let Some(index) = current_index.checked_sub(offset) else {
                break;
            };
            let Some(bar) = history.get(index) else {
                break;
            };
            if *timestamp - bar.timestamp > window {
                break;
            }
            sum += bar.usable_volume();
        }

        sum
    }

    pub fn is_active<H: History + ?Sized>(
        &self,
        current_index: usize,
        history: &H,
        timestamp: &NaiveDateTime,
    ) -> bool {
        self.recent_volume(current_index, history, timestamp) > self.volume_threshold
    }
}

/// Probe with the default look-back, window and threshold
pub fn is_active<H: History + ?Sized>(current_index: usize, history: &H, timestamp: &NaiveDateTime) -> bool {
    ActivityProbe::default().is_active(current_index, history, timestamp)
}
