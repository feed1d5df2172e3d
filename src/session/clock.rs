//! Session Clock / Transition Detector
//!
//! Compares the prior bar's time code with the current bar's to decide which
//! session boundaries were crossed. A boundary `B` fires iff
//! `prior < B <= current` within one calendar day. When the calendar date
//! advances the window wraps through midnight, and a gap of a full day or more
//! crosses every boundary. Each boundary fires at most once per bar.
//!
//! When a gap crosses the session start, only the session start and the
//! boundaries after its most recent occurrence are reported. Anything older
//! belongs to a session that produced no bars.

use chrono::{Duration, NaiveDateTime};
use std::cmp::Reverse;
use tracing::warn;

use super::time_code::TimeCode;
use crate::config::CalculatorConfig;

/// CME trading day begins at 18:00 chart-local time
pub const SESSION_START: TimeCode = TimeCode::new(18, 0);
/// Globex (overnight) range window: 18:00 to 09:30
pub const GLOBEX_START: TimeCode = TimeCode::new(18, 0);
pub const GLOBEX_END: TimeCode = TimeCode::new(9, 30);
/// Length of the Initial Balance window after NYO
pub const IB_DURATION_MINUTES: u32 = 60;

/// Named session boundaries. Declaration order breaks ties between
/// boundaries that share a time code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Boundary {
    SessionStart,
    GlobexEnd,
    Nyo,
    IbEnd,
    GlobexStart,
}

impl std::fmt::Display for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Boundary::SessionStart => write!(f, "SESSION_START"),
            Boundary::GlobexEnd => write!(f, "GX_END"),
            Boundary::Nyo => write!(f, "NYO"),
            Boundary::IbEnd => write!(f, "IB_END"),
            Boundary::GlobexStart => write!(f, "GX_START"),
        }
    }
}

/// Boundary time codes for one calculator instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    session_start: TimeCode,
    globex_start: TimeCode,
    globex_end: TimeCode,
    nyo: TimeCode,
    ib_end: TimeCode,
}

impl SessionClock {
    pub fn new(nyo: TimeCode) -> Self {
        Self {
            session_start: SESSION_START,
            globex_start: GLOBEX_START,
            globex_end: GLOBEX_END,
            nyo,
            ib_end: nyo.add_minutes(IB_DURATION_MINUTES),
        }
    }

    pub fn from_config(config: &CalculatorConfig) -> Self {
        Self::new(TimeCode::new(config.nyo_hour, config.nyo_minute))
    }

    pub fn time_of(&self, boundary: Boundary) -> TimeCode {
        match boundary {
            Boundary::SessionStart => self.session_start,
            Boundary::GlobexEnd => self.globex_end,
            Boundary::Nyo => self.nyo,
            Boundary::IbEnd => self.ib_end,
            Boundary::GlobexStart => self.globex_start,
        }
    }

    /// Boundaries crossed moving from `prior` to `current`, oldest first by
    /// their most recent occurrence at or before `current`, trimmed to the
    /// latest session start. Empty for the first bar and for out-of-order
    /// timestamps.
    pub fn crossings(&self, prior: Option<&NaiveDateTime>, current: &NaiveDateTime) -> Vec<Boundary> {
        let Some(prior) = prior else {
            return Vec::new();
        };

        if current < prior {
            warn!("Bar timestamp went backwards ({} -> {}), no transitions", prior, current);
            return Vec::new();
        }

        let prior_code = TimeCode::of(prior);
        let current_code = TimeCode::of(current);
        let full_day = *current - *prior >= Duration::days(1);
        let wrapped = current.date() > prior.date();

        let mut crossed: Vec<Boundary> = [
            Boundary::SessionStart,
            Boundary::GlobexEnd,
            Boundary::Nyo,
            Boundary::IbEnd,
            Boundary::GlobexStart,
        ]
        .into_iter()
        .filter(|b| {
            let code = self.time_of(*b);
            if full_day {
                true
            } else if wrapped {
                code > prior_code || code <= current_code
            } else {
                prior_code < code && code <= current_code
            }
        })
        .collect();

        crossed.sort_by_key(|b| (Reverse(current_code.minutes_since(self.time_of(*b))), *b));

        if let Some(start) = crossed.iter().position(|b| *b == Boundary::SessionStart) {
            crossed.drain(..start);
        }
        crossed
    }
}
