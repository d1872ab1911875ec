//! Core data model: one daily record per symbol and its feature-vector view.
//!
//! The five numeric fields form the fixed channel order
//! `(open, close, low, high, volume)`. Every consumer — bounds accumulation,
//! normalization, windowing, export metadata — indexes channels in this order,
//! so the order is part of the crate's contract.

use serde::{Deserialize, Serialize};

/// Number of feature channels per record.
pub const CHANNELS: usize = 5;

/// A fixed-order view of a record's numeric fields:
/// `[open, close, low, high, volume]`.
pub type FeatureVector = [f64; CHANNELS];

/// The tracked numeric fields, in canonical channel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    Open,
    Close,
    Low,
    High,
    Volume,
}

impl Channel {
    /// All channels in canonical order.
    pub const ALL: [Channel; CHANNELS] = [
        Channel::Open,
        Channel::Close,
        Channel::Low,
        Channel::High,
        Channel::Volume,
    ];

    /// Index of this channel within a [`FeatureVector`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Open => 0,
            Channel::Close => 1,
            Channel::Low => 2,
            Channel::High => 3,
            Channel::Volume => 4,
        }
    }

    /// Human-readable channel name.
    pub fn name(self) -> &'static str {
        match self {
            Channel::Open => "open",
            Channel::Close => "close",
            Channel::Low => "low",
            Channel::High => "high",
            Channel::Volume => "volume",
        }
    }
}

/// One daily record for a single symbol.
///
/// The `date` field is an opaque identifier carried through from the source
/// file; chronology is taken from file order, not parsed from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub date: String,
    pub symbol: String,
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
    pub volume: f64,
}

impl StockRecord {
    pub fn new(
        date: impl Into<String>,
        symbol: impl Into<String>,
        features: FeatureVector,
    ) -> Self {
        Self {
            date: date.into(),
            symbol: symbol.into(),
            open: features[0],
            close: features[1],
            low: features[2],
            high: features[3],
            volume: features[4],
        }
    }

    /// Extract the numeric fields in canonical channel order.
    #[inline]
    pub fn features(&self) -> FeatureVector {
        [self.open, self.close, self.low, self.high, self.volume]
    }

    /// Replace the numeric fields from a feature vector, keeping identity
    /// fields intact. Used when a denoised channel set is written back.
    #[inline]
    pub fn set_features(&mut self, features: FeatureVector) {
        self.open = features[0];
        self.close = features[1];
        self.low = features[2];
        self.high = features[3];
        self.volume = features[4];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_vector_follows_channel_order() {
        let record = StockRecord::new("2016-01-04", "GOOG", [1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(record.open, 1.0);
        assert_eq!(record.close, 2.0);
        assert_eq!(record.low, 3.0);
        assert_eq!(record.high, 4.0);
        assert_eq!(record.volume, 5.0);
        assert_eq!(record.features(), [1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn channel_indices_match_feature_order() {
        let record = StockRecord::new("d", "S", [10.0, 20.0, 30.0, 40.0, 50.0]);
        let features = record.features();
        for channel in Channel::ALL {
            let expected = match channel {
                Channel::Open => record.open,
                Channel::Close => record.close,
                Channel::Low => record.low,
                Channel::High => record.high,
                Channel::Volume => record.volume,
            };
            assert_eq!(features[channel.index()], expected);
        }
    }

    #[test]
    fn set_features_overwrites_numeric_fields_only() {
        let mut record = StockRecord::new("2016-01-04", "GOOG", [1.0, 2.0, 3.0, 4.0, 5.0]);
        record.set_features([9.0, 8.0, 7.0, 6.0, 5.0]);
        assert_eq!(record.date, "2016-01-04");
        assert_eq!(record.symbol, "GOOG");
        assert_eq!(record.features(), [9.0, 8.0, 7.0, 6.0, 5.0]);
    }
}
