//! Anchored VWAP
//!
//! Running volume-weighted mean of typical price from an anchor bar forward.
//! Never forgets contributions until re-anchored.

use crate::types::Bar;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchoredVwap {
    anchor_index: Option<usize>,
    volume_sum: f64,
    volume_price_sum: f64,
}

impl AnchoredVwap {
    /// Start accumulating from `index`, dropping everything before it
    pub fn anchor(&mut self, index: usize) {
        self.anchor_index = Some(index);
        self.volume_sum = 0.0;
        self.volume_price_sum = 0.0;
    }

    /// Add a bar if it is at or after the anchor
    pub fn update(&mut self, bar: &Bar) {
        let Some(anchor) = self.anchor_index else {
            return;
        };
        if bar.index < anchor {
            return;
        }

        let volume = bar.usable_volume();
        self.volume_sum += volume;
        self.volume_price_sum += volume * bar.typical_price();
    }

    /// `None` until some volume has been accumulated since the anchor
    pub fn value(&self) -> Option<f64> {
        if self.volume_sum > 0.0 {
            Some(self.volume_price_sum / self.volume_sum)
        } else {
            None
        }
    }

    pub fn anchor_index(&self) -> Option<usize> {
        self.anchor_index
    }

    pub fn volume_sum(&self) -> f64 {
        self.volume_sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(index: usize, high: f64, low: f64, close: f64, volume: f64) -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2025, 12, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            open: close,
            high,
            low,
            close,
            volume,
            index,
            is_last: false,
        }
    }

    #[test]
    fn test_no_anchor_no_value() {
        let mut vwap = AnchoredVwap::default();
        vwap.update(&bar(0, 101.0, 99.0, 100.0, 10.0));
        assert_eq!(vwap.value(), None);
        assert_eq!(vwap.volume_sum(), 0.0);
    }

    #[test]
    fn test_weighted_mean_of_typical_prices() {
        let mut vwap = AnchoredVwap::default();
        vwap.anchor(5);
        vwap.update(&bar(4, 500.0, 400.0, 450.0, 100.0)); // before anchor
        vwap.update(&bar(5, 103.0, 97.0, 100.0, 10.0)); // typical 100
        vwap.update(&bar(6, 112.0, 108.0, 110.0, 30.0)); // typical 110

        let expected = (10.0 * 100.0 + 30.0 * 110.0) / 40.0;
        assert!((vwap.value().unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_zero_volume_is_absent() {
        let mut vwap = AnchoredVwap::default();
        vwap.anchor(0);
        for i in 0..5 {
            vwap.update(&bar(i, 101.0, 99.0, 100.0, 0.0));
            assert_eq!(vwap.value(), None);
        }
    }

    #[test]
    fn test_reanchor_resets() {
        let mut vwap = AnchoredVwap::default();
        vwap.anchor(0);
        vwap.update(&bar(0, 201.0, 199.0, 200.0, 50.0));
        vwap.anchor(1);
        assert_eq!(vwap.value(), None);
        vwap.update(&bar(1, 101.0, 99.0, 100.0, 5.0));
        assert!((vwap.value().unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_volume_ignored() {
        let mut vwap = AnchoredVwap::default();
        vwap.anchor(0);
        vwap.update(&bar(0, 101.0, 99.0, 100.0, -5.0));
        assert_eq!(vwap.volume_sum(), 0.0);
        assert_eq!(vwap.value(), None);
    }
}
