//! Label-drawing directives handed to the host renderer

use serde::{Deserialize, Serialize};

/// Bars to the right of the last bar where session labels are anchored
pub const SESSION_LABEL_OFFSET: usize = 10;

pub const NYO_COLOR: &str = "#FF6666";
pub const IB_HIGH_COLOR: &str = "#00FFAA";
pub const IB_LOW_COLOR: &str = "#FF66AA";
pub const GLOBEX_COLOR: &str = "#B0B0B0";

const FONT_SIZE: u32 = 12;
const FONT_WEIGHT: &str = "bold";
const TEXT_ALIGNMENT: &str = "rightMiddle";

/// Anchor in (bar index, price) domain units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    #[serde(rename = "fontSize")]
    pub font_size: u32,
    #[serde(rename = "fontWeight")]
    pub font_weight: String,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    /// Stable identity so the host updates rather than duplicates
    pub key: String,
    pub point: Point,
    pub text: String,
    pub style: LabelStyle,
    #[serde(rename = "textAlignment")]
    pub text_alignment: String,
    /// Not confined to the visible viewport
    pub global: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag")]
pub enum GraphicsItem {
    Text(TextLabel),
}

impl GraphicsItem {
    /// Bold right-aligned global text label at (`x`, `price`)
    pub fn text(key: impl Into<String>, x: usize, price: f64, text: String, fill: &str) -> Self {
        GraphicsItem::Text(TextLabel {
            key: key.into(),
            point: Point { x, y: price },
            text,
            style: LabelStyle {
                font_size: FONT_SIZE,
                font_weight: FONT_WEIGHT.to_string(),
                fill: fill.to_string(),
            },
            text_alignment: TEXT_ALIGNMENT.to_string(),
            global: true,
        })
    }

    pub fn key(&self) -> &str {
        match self {
            GraphicsItem::Text(label) => &label.key,
        }
    }

    pub fn text_content(&self) -> &str {
        match self {
            GraphicsItem::Text(label) => &label.text,
        }
    }
}

/// Shortest round-trip form (`24627`, `24913.5`), or a whole number when
/// decimals are hidden
pub fn format_price(price: f64, hide_decimals: bool) -> String {
    if hide_decimals {
        format!("{:.0}", price)
    } else {
        format!("{}", price)
    }
}

/// VWAP is shown to two decimals
pub fn format_vwap(vwap: f64, hide_decimals: bool) -> String {
    if hide_decimals {
        format!("{:.0}", vwap)
    } else {
        format!("{:.2}", vwap)
    }
}
