//! Per-channel min-max bounds and normalization.
//!
//! Bounds are accumulated once, over the *entire* parsed record set for a
//! symbol — before the train/evaluation split is applied — and are read-only
//! afterwards. Scaling is plain min-max:
//!
//! ```text
//! normalized = (value - min[c]) / (max[c] - min[c])
//! ```
//!
//! A constant channel makes the denominator zero. Rather than letting NaN
//! propagate, [`Bounds::validate`] rejects degenerate bounds up front; the
//! windowed iterator and the evaluation builder both call it at construction.

use crate::error::{DatasetError, Result};
use crate::record::{Channel, FeatureVector, StockRecord, CHANNELS};

/// Per-channel (min, max) pairs used for normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    min: FeatureVector,
    max: FeatureVector,
}

impl Bounds {
    /// Empty bounds seeded with machine-extreme sentinels, ready for
    /// [`observe`](Bounds::observe) accumulation.
    pub fn new() -> Self {
        Self {
            min: [f64::MAX; CHANNELS],
            max: [f64::MIN; CHANNELS],
        }
    }

    /// Accumulate bounds over a full record set.
    pub fn from_records(records: &[StockRecord]) -> Self {
        let mut bounds = Self::new();
        for record in records {
            bounds.observe(&record.features());
        }
        bounds
    }

    /// Widen the bounds to include one feature vector.
    pub fn observe(&mut self, features: &FeatureVector) {
        for c in 0..CHANNELS {
            if features[c] < self.min[c] {
                self.min[c] = features[c];
            }
            if features[c] > self.max[c] {
                self.max[c] = features[c];
            }
        }
    }

    /// Per-channel minimums, in canonical channel order.
    pub fn min(&self) -> &FeatureVector {
        &self.min
    }

    /// Per-channel maximums, in canonical channel order.
    pub fn max(&self) -> &FeatureVector {
        &self.max
    }

    /// Width of one channel's range.
    #[inline]
    pub fn range(&self, channel: usize) -> f64 {
        self.max[channel] - self.min[channel]
    }

    /// Check that every channel has a usable, non-degenerate range.
    ///
    /// Fails with [`DatasetError::NumericError`] when a channel is constant
    /// (zero range, normalization would divide by zero) or when no records
    /// were ever observed (sentinels still in place).
    pub fn validate(&self) -> Result<()> {
        for channel in Channel::ALL {
            let c = channel.index();
            if self.min[c] > self.max[c] {
                return Err(DatasetError::NumericError(
                    "bounds were never accumulated (empty record set)".to_string(),
                ));
            }
            let range = self.range(c);
            if range == 0.0 {
                return Err(DatasetError::NumericError(format!(
                    "channel '{}' is constant ({}); min-max normalization is undefined",
                    channel.name(),
                    self.min[c]
                )));
            }
            if !range.is_finite() {
                return Err(DatasetError::NumericError(format!(
                    "channel '{}' has non-finite range",
                    channel.name()
                )));
            }
        }
        Ok(())
    }

    /// Scale one value into `[0, 1]` relative to its channel's range.
    ///
    /// Assumes [`validate`](Bounds::validate) has passed; the range is then
    /// strictly positive.
    #[inline]
    pub fn normalize(&self, channel: usize, value: f64) -> f64 {
        (value - self.min[channel]) / self.range(channel)
    }

    /// Scale a whole feature vector.
    pub fn normalize_vector(&self, features: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; CHANNELS];
        for c in 0..CHANNELS {
            out[c] = self.normalize(c, features[c]);
        }
        out
    }

    /// Map a normalized value back to raw scale:
    /// `value = min[c] + normalized * (max[c] - min[c])`.
    ///
    /// Used by consumers to rescale model predictions for comparison against
    /// raw-scale evaluation labels.
    #[inline]
    pub fn denormalize(&self, channel: usize, normalized: f64) -> f64 {
        self.min[channel] + normalized * self.range(channel)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}
