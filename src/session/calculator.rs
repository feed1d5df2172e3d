//! Bar-by-bar Driver
//!
//! One `SessionCalculator` per indicator attachment. The host calls `map`
//! once per bar in increasing index order; on the terminal bar the full label
//! set is emitted alongside the VWAP series value.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::activity::ActivityProbe;
use super::clock::{Boundary, SessionClock};
use super::globex::GlobexRange;
use super::initial_balance::{IbDisplay, InitialBalance};
use super::labels::{
    format_price, format_vwap, GraphicsItem, GLOBEX_COLOR, IB_HIGH_COLOR, IB_LOW_COLOR, NYO_COLOR,
    SESSION_LABEL_OFFSET,
};
use super::levels::{LevelTable, DEFAULT_LEVEL_TEXT};
use super::vwap::AnchoredVwap;
use crate::config::CalculatorConfig;
use crate::types::{Bar, History};

/// Open of the current session, snapshotted on the NYO crossing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NyoAnchor {
    pub price: f64,
    pub timestamp: NaiveDateTime,
    pub index: usize,
}

/// Everything the calculator mutates while walking the bar stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculatorState {
    pub nyo: Option<NyoAnchor>,
    pub initial_balance: InitialBalance,
    pub globex: GlobexRange,
    pub vwap: AnchoredVwap,
    /// Index of the last bar processed
    pub last_index: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graphics {
    pub items: Vec<GraphicsItem>,
}

/// Per-bar result handed back to the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarOutput {
    /// Present on the terminal bar only
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub graphics: Option<Graphics>,
    #[serde(rename = "vwapLine")]
    pub vwap: Option<f64>,
}

pub struct SessionCalculator {
    config: CalculatorConfig,
    clock: SessionClock,
    probe: ActivityProbe,
    levels: LevelTable,
    state: CalculatorState,
}

impl SessionCalculator {
    /// Calculator with the embedded default level table
    pub fn new(config: CalculatorConfig) -> Result<Self> {
        Self::with_levels(config, LevelTable::parse(DEFAULT_LEVEL_TEXT))
    }

    /// Fails when the config holds values the session clock cannot represent
    pub fn with_levels(config: CalculatorConfig, levels: LevelTable) -> Result<Self> {
        config.validate().context("Invalid calculator parameters")?;
        if levels.skipped() > 0 {
            debug!("Level table: {} levels, {} lines skipped", levels.len(), levels.skipped());
        }
        Ok(Self {
            clock: SessionClock::from_config(&config),
            probe: ActivityProbe::default(),
            config,
            levels,
            state: CalculatorState::default(),
        })
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn vwap(&self) -> Option<f64> {
        self.state.vwap.value()
    }

    /// Process one bar. `history` must contain every bar up to and including
    /// `bar`, indexed by `Bar::index`.
    pub fn map<H: History + ?Sized>(&mut self, bar: &Bar, history: &H) -> BarOutput {
        if let Some(last) = self.state.last_index {
            if bar.index <= last {
                debug!("Ignoring replayed bar {} (last processed {})", bar.index, last);
                return BarOutput {
                    graphics: None,
                    vwap: self.vwap(),
                };
            }
        }

        let prior = history.prior(bar.index).map(|b| b.timestamp);
        for boundary in self.clock.crossings(prior.as_ref(), &bar.timestamp) {
            self.apply_transition(boundary, bar, history);
        }

        self.state.initial_balance.update(bar);
        self.state.globex.update(bar);
        self.state.vwap.update(bar);
        self.state.last_index = Some(bar.index);

        let vwap = self.vwap();
        let graphics = bar.is_last.then(|| Graphics {
            items: self.build_labels(bar, vwap),
        });

        BarOutput { graphics, vwap }
    }

    fn apply_transition<H: History + ?Sized>(&mut self, boundary: Boundary, bar: &Bar, history: &H) {
        debug!("{} crossed at bar {} ({})", boundary, bar.index, bar.timestamp);

        match boundary {
            Boundary::SessionStart => self.state.initial_balance.on_session_start(bar),
            Boundary::Nyo => {
                self.state.nyo = Some(NyoAnchor {
                    price: bar.open,
                    timestamp: bar.timestamp,
                    index: bar.index,
                });
                self.state.initial_balance.on_nyo(bar);

                let active = self.probe.is_active(bar.index, history, &bar.timestamp);
                debug!("Activity at NYO bar {}: {}", bar.index, if active { "active" } else { "quiet" });
                if active || !self.config.gate_vwap_on_activity {
                    self.state.vwap.anchor(bar.index);
                }
            }
            Boundary::IbEnd => self.state.initial_balance.on_ib_end(bar),
            Boundary::GlobexStart => self.state.globex.on_start(bar),
            Boundary::GlobexEnd => self.state.globex.on_end(bar),
        }
    }

    fn build_labels(&self, bar: &Bar, vwap: Option<f64>) -> Vec<GraphicsItem> {
        let hide = self.config.hide_decimals;
        let x = bar.index + SESSION_LABEL_OFFSET;
        let mut items = Vec::with_capacity(self.levels.len() + 6);

        let mut session_label = |key: &str, name: &str, price: f64, fill: &str| {
            items.push(GraphicsItem::text(
                format!("label-{}", key),
                x,
                price,
                format!("{} {}", name, format_price(price, hide)),
                fill,
            ));
        };

        if let Some(nyo) = self.state.nyo {
            session_label("NYO", "NYO", nyo.price, NYO_COLOR);
        }

        match self.state.initial_balance.display() {
            Some(IbDisplay::Today(range)) => {
                session_label("IBH", "IBH", range.high(), IB_HIGH_COLOR);
                session_label("IBL", "IBL", range.low(), IB_LOW_COLOR);
            }
            Some(IbDisplay::Yesterday(range)) => {
                session_label("yIBH", "yIBH", range.high(), IB_HIGH_COLOR);
                session_label("yIBL", "yIBL", range.low(), IB_LOW_COLOR);
            }
            None => {}
        }

        if let Some(range) = self.state.globex.range() {
            session_label("GXH", "GXH", range.high(), GLOBEX_COLOR);
            session_label("GXL", "GXL", range.low(), GLOBEX_COLOR);
        }

        if let Some(vwap) = vwap {
            items.push(GraphicsItem::text(
                "label-NYVWAP",
                x,
                vwap,
                format!("NYVWAP {}", format_vwap(vwap, hide)),
                &self.config.vwap_color,
            ));
        }

        let level_x = bar.index + self.config.label_offset;
        for level in self.levels.levels() {
            items.push(GraphicsItem::text(
                format!("label-{}-{}", level.label, level.price),
                level_x,
                level.price,
                format!("{} {}", level.label, format_price(level.price, hide)),
                &self.config.level_color,
            ));
        }

        items
    }
}

/// Run a fresh calculator over a complete bar sequence
pub fn replay(config: CalculatorConfig, levels: LevelTable, bars: &[Bar]) -> Result<Vec<BarOutput>> {
    let mut calculator = SessionCalculator::with_levels(config, levels)?;
    Ok(bars.iter().map(|bar| calculator.map(bar, bars)).collect())
}
