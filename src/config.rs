//! Configuration for the session calculator

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Parameters the host declares for one calculator attachment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// New York Open hour, chart-local (0-23)
    pub nyo_hour: u32,

    /// New York Open minute (0-59)
    pub nyo_minute: u32,

    /// Bars to the right of the last bar where static level labels are drawn
    pub label_offset: usize,

    /// Render every price rounded to a whole number
    pub hide_decimals: bool,

    /// Fill color of static level labels (#RRGGBB)
    pub level_color: String,

    /// Fill color of the VWAP label (#RRGGBB)
    pub vwap_color: String,

    /// Only re-anchor VWAP at NYO when the activity probe reports a live market
    pub gate_vwap_on_activity: bool,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            nyo_hour: 9,
            nyo_minute: 30,
            label_offset: 50,
            hide_decimals: false,
            level_color: "#FFD700".to_string(),
            vwap_color: "#6699FF".to_string(),
            gate_vwap_on_activity: false,
        }
    }
}

impl CalculatorConfig {
    /// Reject parameters the session clock cannot represent
    pub fn validate(&self) -> Result<()> {
        if self.nyo_hour > 23 {
            bail!("nyo_hour must be 0-23, got {}", self.nyo_hour);
        }
        if self.nyo_minute > 59 {
            bail!("nyo_minute must be 0-59, got {}", self.nyo_minute);
        }
        for (name, color) in [("level_color", &self.level_color), ("vwap_color", &self.vwap_color)] {
            if !is_hex_color(color) {
                bail!("{} must look like #RRGGBB, got {:?}", name, color);
            }
        }
        Ok(())
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CalculatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!((config.nyo_hour, config.nyo_minute), (9, 30));
        assert_eq!(config.label_offset, 50);
    }

    #[test]
    fn test_rejects_out_of_range_time() {
        let config = CalculatorConfig { nyo_hour: 24, ..Default::default() };
        assert!(config.validate().is_err());

        let config = CalculatorConfig { nyo_minute: 60, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_color() {
        let config = CalculatorConfig { level_color: "gold".to_string(), ..Default::default() };
        assert!(config.validate().is_err());

        let config = CalculatorConfig { vwap_color: "#12345G".to_string(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CalculatorConfig = serde_json::from_str(r#"{"nyo_hour": 21}"#).unwrap();
        assert_eq!(config.nyo_hour, 21);
        assert_eq!(config.nyo_minute, 30);
        assert_eq!(config.vwap_color, "#6699FF");
    }
}
