//! Session Core - per-bar session analytics
//!
//! This module contains the calculator and its components:
//! - Time codes and session boundary crossing detection
//! - Initial Balance and Globex range accumulators
//! - Anchored VWAP
//! - Market-activity probe
//! - Static reference level table
//! - Label directives for the host renderer

pub mod time_code;
pub mod clock;
pub mod range;
pub mod initial_balance;
pub mod globex;
pub mod vwap;
pub mod activity;
pub mod levels;
pub mod labels;
pub mod calculator;

// Re-export commonly used types
pub use time_code::TimeCode;
pub use clock::{Boundary, SessionClock};
pub use range::{Range, RangeTracker};
pub use initial_balance::{IbDisplay, InitialBalance};
pub use globex::GlobexRange;
pub use vwap::AnchoredVwap;
pub use activity::{is_active, ActivityProbe};
pub use levels::{LevelTable, StaticLevel, DEFAULT_LEVEL_TEXT};
pub use labels::{GraphicsItem, TextLabel};
pub use calculator::{replay, BarOutput, CalculatorState, Graphics, NyoAnchor, SessionCalculator};
