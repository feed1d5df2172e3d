//! Globex (overnight) range, keyed off fixed start/end boundaries

use tracing::debug;

use super::range::{Range, RangeTracker};
use crate::types::Bar;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobexRange {
    tracker: RangeTracker,
}

impl GlobexRange {
    pub fn on_start(&mut self, bar: &Bar) {
        self.tracker.start(bar);
        debug!("GX collecting from bar {}", bar.index);
    }

    pub fn on_end(&mut self, bar: &Bar) {
        if self.tracker.close() {
            if let Some(range) = self.tracker.range() {
                debug!("GX closed at bar {}: GXH={} GXL={}", bar.index, range.high(), range.low());
            }
        }
    }

    pub fn update(&mut self, bar: &Bar) {
        self.tracker.update(bar);
    }

    /// Current or frozen overnight range
    pub fn range(&self) -> Option<Range> {
        self.tracker.range()
    }

    pub fn is_collecting(&self) -> bool {
        self.tracker.is_collecting()
    }
}
