//! Initial Balance with yesterday's IB carried over as a display fallback

use tracing::debug;

use super::range::{Range, RangeTracker};
use crate::types::Bar;

/// Which IB range is shown on the chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IbDisplay {
    Today(Range),
    Yesterday(Range),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitialBalance {
    today: RangeTracker,
    yesterday: Option<Range>,
}

impl InitialBalance {
    /// NYO crossing: open a new IB window seeded with the crossing bar
    pub fn on_nyo(&mut self, bar: &Bar) {
        self.today.start(bar);
        debug!("IB collecting from bar {} ({:.2}-{:.2})", bar.index, bar.low, bar.high);
    }

    /// IB-end crossing: freeze today's range; it now supersedes yesterday's
    pub fn on_ib_end(&mut self, bar: &Bar) {
        if self.today.close() {
            self.yesterday = None;
            if let Some(range) = self.today.range() {
                debug!("IB closed at bar {}: IBH={} IBL={}", bar.index, range.high(), range.low());
            }
        }
    }

    /// Session-start crossing: today's range becomes yesterday's
    pub fn on_session_start(&mut self, bar: &Bar) {
        if let Some(range) = self.today.take() {
            debug!("New session at bar {}: carrying IB over as yIBH={} yIBL={}", bar.index, range.high(), range.low());
            self.yesterday = Some(range);
        }
    }

    pub fn update(&mut self, bar: &Bar) {
        self.today.update(bar);
    }

    pub fn today(&self) -> Option<Range> {
        self.today.range()
    }

    pub fn yesterday(&self) -> Option<Range> {
        self.yesterday
    }

    pub fn is_collecting(&self) -> bool {
        self.today.is_collecting()
    }

    /// Today's IB when established, otherwise yesterday's, never both
    pub fn display(&self) -> Option<IbDisplay> {
        self.today
            .range()
            .map(IbDisplay::Today)
            .or(self.yesterday.map(IbDisplay::Yesterday))
    }
}
