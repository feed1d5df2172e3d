//! Level Resolver
//!
//! Static reference levels curated by hand and embedded as text, one
//! `label, price` pair per line.

use tracing::debug;

/// Curated NQ reference levels shipped with the indicator
pub const DEFAULT_LEVEL_TEXT: &str = "\
PDH , 24913.5
PDL / yNYL, 24627
PDC, 24831.5
yNYH, 24899.25
GX H, 24793.5
GX L , 24694.25
BB H, 25131
BB L, 23456
D20, 24293
D5, 24797
yVAH, 24800.75
yPOC , 24724.5
yVAL, 24630
Mon.H ETH/RTH, 25027.25
Mon.L, 24748.75
PDL / Tue.L - RTH, 24780.5
Mon.L - RTH, 24814.25
PW VAH, 24742
PW POC, 24537
PW VAL, 24322.75
PW H, 24888
PW L , 24242";

#[derive(Debug, Clone, PartialEq)]
pub struct StaticLevel {
    pub label: String,
    pub price: f64,
}

impl StaticLevel {
    /// `"PDH, 24913.5"` -> `{PDH, 24913.5}`; anything else is rejected
    pub fn parse_line(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        let [label, price] = parts.as_slice() else {
            return None;
        };
        let price: f64 = price.parse().ok().filter(|p: &f64| p.is_finite())?;
        Some(Self {
            label: label.to_string(),
            price,
        })
    }
}

/// Ordered, immutable table of static levels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelTable {
    levels: Vec<StaticLevel>,
    skipped: usize,
}

impl LevelTable {
    /// Parse a level block. Blank lines are ignored; malformed lines are
    /// dropped and counted in `skipped()`.
    pub fn parse(text: &str) -> Self {
        let mut levels = Vec::new();
        let mut skipped = 0;

        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match StaticLevel::parse_line(line) {
                Some(level) => levels.push(level),
                None => {
                    skipped += 1;
                    debug!("Skipping level line {}: {:?}", line_no + 1, line);
                }
            }
        }

        Self { levels, skipped }
    }

    pub fn levels(&self) -> &[StaticLevel] {
        &self.levels
    }

    /// Number of non-blank lines that did not parse
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(
            StaticLevel::parse_line("PDH, 24913.5"),
            Some(StaticLevel { label: "PDH".to_string(), price: 24913.5 })
        );
        assert_eq!(StaticLevel::parse_line("garbage"), None);
        assert_eq!(StaticLevel::parse_line("A, B, 1"), None);
        assert_eq!(StaticLevel::parse_line("PDH, high"), None);
        assert_eq!(StaticLevel::parse_line("PDH, inf"), None);
    }

    #[test]
    fn test_labels_are_trimmed() {
        let level = StaticLevel::parse_line("  GX L , 24694.25 ").unwrap();
        assert_eq!(level.label, "GX L");
        assert_eq!(level.price, 24694.25);
    }

    #[test]
    fn test_default_table() {
        let table = LevelTable::parse(DEFAULT_LEVEL_TEXT);
        assert_eq!(table.len(), 22);
        assert_eq!(table.skipped(), 0);
        assert_eq!(table.levels()[0].label, "PDH");
        assert_eq!(table.levels()[1].label, "PDL / yNYL");
        assert_eq!(table.levels()[21].price, 24242.0);
    }

    #[test]
    fn test_skips_are_counted_and_order_kept() {
        let table = LevelTable::parse("B, 2\ngarbage\n\nA, 1\nC, x\n");
        let labels: Vec<&str> = table.levels().iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "A"]);
        assert_eq!(table.skipped(), 2);
    }
}
