//! Wavelet-shrinkage denoising of per-channel price series.
//!
//! Each of the five channels is denoised independently:
//!
//! 1. Wavelet-packet decomposition to a fixed depth of 3 levels. Level `p`
//!    holds the full coefficient row after `p` forward packet steps; level 0
//!    is the input signal itself.
//! 2. A universal (VisuShrink) threshold is estimated from the level-1 row:
//!    `threshold = sqrt(2 ln N) * sigma`, with `sigma` the median absolute
//!    coefficient divided by 0.6745 (the Gaussian MAD consistency constant).
//! 3. Hard thresholding zeroes every level-3 coefficient whose magnitude
//!    falls below the threshold. Only the deepest level is altered; shallower
//!    rows pass through untouched.
//! 4. The channel is reconstructed from the (partially thresholded) level-3
//!    row via the inverse packet transform.
//!
//! The decomposition periodizes the signal, so it is exact only for
//! power-of-two lengths. Inputs whose length is not a power of two (or is
//! shorter than `2^3`) are rejected with
//! [`DatasetError::UnsupportedLength`] rather than silently truncated.
//!
//! Denoising is a pure function of the channel values and the wavelet kind:
//! no randomness, bit-identical output across runs.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DatasetError, Result};
use crate::record::{StockRecord, CHANNELS};

/// Fixed wavelet-packet decomposition depth.
pub const DECOMPOSITION_LEVELS: usize = 3;

/// MAD-to-sigma consistency constant for Gaussian noise.
const MAD_SCALE: f64 = 0.6745;

/// Wavelet family used for denoising, or `None` to pass data through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveletKind {
    /// No denoising; the training subset is used as parsed.
    None,
    /// Haar (2-tap) orthonormal wavelet.
    Haar,
    /// Daubechies-3 (6-tap) orthonormal wavelet.
    Daubechies3,
}

impl FromStr for WaveletKind {
    type Err = DatasetError;

    /// Accepts the spellings used in the legacy property files:
    /// `non`/`none`, `haar`, `db3`/`daubechies3` (case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "non" | "none" => Ok(WaveletKind::None),
            "haar" => Ok(WaveletKind::Haar),
            "db3" | "daubechies3" => Ok(WaveletKind::Daubechies3),
            other => Err(DatasetError::Config(format!(
                "unknown wavelet kind '{other}' (expected none, haar, or db3)"
            ))),
        }
    }
}

impl std::fmt::Display for WaveletKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WaveletKind::None => "none",
            WaveletKind::Haar => "haar",
            WaveletKind::Daubechies3 => "db3",
        };
        f.write_str(name)
    }
}

/// Orthonormal analysis filter bank.
///
/// The wavelet (high-pass) filter is derived from the scaling filter by the
/// quadrature-mirror relation `g[k] = (-1)^k * h[L-1-k]`. For orthonormal
/// banks the same pair reconstructs.
struct FilterBank {
    scaling: Vec<f64>,
    wavelet: Vec<f64>,
}

impl FilterBank {
    fn new(scaling: Vec<f64>) -> Self {
        let len = scaling.len();
        let wavelet = (0..len)
            .map(|i| {
                let coef = scaling[len - 1 - i];
                if i % 2 == 0 {
                    coef
                } else {
                    -coef
                }
            })
            .collect();
        Self { scaling, wavelet }
    }

    fn haar() -> Self {
        Self::new(vec![std::f64::consts::FRAC_1_SQRT_2; 2])
    }

    fn daubechies3() -> Self {
        Self::new(vec![
            0.035226291882100656,
            -0.08544127388224149,
            -0.13501102001039084,
            0.4598775021193313,
            0.8068915093133388,
            0.3326705529509569,
        ])
    }

    fn for_kind(kind: WaveletKind) -> Option<Self> {
        match kind {
            WaveletKind::None => None,
            WaveletKind::Haar => Some(Self::haar()),
            WaveletKind::Daubechies3 => Some(Self::daubechies3()),
        }
    }

    /// One forward step on a single block: approximation coefficients land in
    /// the first half, detail coefficients in the second. Indices wrap
    /// circularly (periodized transform).
    fn forward_block(&self, block: &mut [f64]) {
        let n = block.len();
        let half = n / 2;
        let mut out = vec![0.0; n];
        for i in 0..half {
            for (j, (&h, &g)) in self.scaling.iter().zip(&self.wavelet).enumerate() {
                let mut k = (i << 1) + j;
                while k >= n {
                    k -= n;
                }
                out[i] += block[k] * h;
                out[i + half] += block[k] * g;
            }
        }
        block.copy_from_slice(&out);
    }

    /// Inverse of [`forward_block`](FilterBank::forward_block).
    fn reverse_block(&self, block: &mut [f64]) {
        let n = block.len();
        let half = n / 2;
        let mut out = vec![0.0; n];
        for i in 0..half {
            for (j, (&h, &g)) in self.scaling.iter().zip(&self.wavelet).enumerate() {
                let mut k = (i << 1) + j;
                while k >= n {
                    k -= n;
                }
                out[k] += block[i] * h + block[i + half] * g;
            }
        }
        block.copy_from_slice(&out);
    }

    /// Forward packet transform of `signal` to the given depth: at level `l`
    /// the row is split into `2^l` packets and every packet is transformed.
    fn packet_forward(&self, signal: &[f64], level: usize) -> Vec<f64> {
        let mut row = signal.to_vec();
        let mut block = row.len();
        for _ in 0..level {
            for chunk in row.chunks_mut(block) {
                self.forward_block(chunk);
            }
            block /= 2;
        }
        row
    }

    /// Inverse packet transform of a single coefficient row taken at `level`.
    fn packet_reverse(&self, coefficients: &[f64], level: usize) -> Vec<f64> {
        let mut row = coefficients.to_vec();
        if level == 0 {
            return row;
        }
        let mut block = row.len() >> (level - 1);
        while block <= row.len() {
            for chunk in row.chunks_mut(block) {
                self.reverse_block(chunk);
            }
            block <<= 1;
        }
        row
    }

    /// Full decomposition: rows `0..=levels`, where row `p` is the signal
    /// transformed to depth `p` (row 0 is a copy of the input).
    fn decompose(&self, signal: &[f64], levels: usize) -> Vec<Vec<f64>> {
        (0..=levels)
            .map(|p| self.packet_forward(signal, p))
            .collect()
    }
}

/// VisuShrink universal threshold: `sqrt(2 ln N) * sigma`, with a robust
/// MAD-based noise-scale estimate taken from `coefficients`.
fn visu_shrink_threshold(coefficients: &[f64], signal_len: usize) -> Result<f64> {
    if coefficients.is_empty() {
        return Err(DatasetError::NumericError(
            "cannot estimate a threshold from an empty coefficient row".to_string(),
        ));
    }
    let mut magnitudes: Vec<f64> = coefficients.iter().map(|c| c.abs()).collect();
    magnitudes.sort_by(f64::total_cmp);
    let mid = magnitudes.len() / 2;
    let median = if magnitudes.len() % 2 == 0 {
        (magnitudes[mid - 1] + magnitudes[mid]) / 2.0
    } else {
        magnitudes[mid]
    };
    let sigma = median / MAD_SCALE;
    let threshold = sigma * (2.0 * (signal_len as f64).ln()).sqrt();
    if !threshold.is_finite() {
        return Err(DatasetError::NumericError(format!(
            "non-finite denoising threshold (sigma = {sigma})"
        )));
    }
    Ok(threshold)
}

/// Zero every coefficient whose magnitude is below `threshold`; coefficients
/// at or above the threshold pass through unchanged.
fn hard_threshold(coefficients: &mut [f64], threshold: f64) {
    for c in coefficients.iter_mut() {
        if c.abs() < threshold {
            *c = 0.0;
        }
    }
}

/// Denoise a record sequence, returning a new sequence with the five numeric
/// channels rewritten; dates and symbols are carried through index-aligned.
///
/// `WaveletKind::None` is the identity transform. For the other kinds the
/// input length must be a power of two and at least `2^DECOMPOSITION_LEVELS`,
/// otherwise [`DatasetError::UnsupportedLength`] is returned. Degenerate
/// input (non-finite values) fails with [`DatasetError::NumericError`]
/// instead of silently passing raw data through.
pub fn denoise(records: &[StockRecord], kind: WaveletKind) -> Result<Vec<StockRecord>> {
    let bank = match FilterBank::for_kind(kind) {
        Some(bank) => bank,
        None => return Ok(records.to_vec()),
    };

    let len = records.len();
    let min_len = 1 << DECOMPOSITION_LEVELS;
    if !len.is_power_of_two() || len < min_len {
        return Err(DatasetError::UnsupportedLength(format!(
            "wavelet denoising needs a power-of-two record count of at least \
             {min_len}, got {len}"
        )));
    }

    let mut denoised = records.to_vec();
    for channel in 0..CHANNELS {
        let signal: Vec<f64> = records.iter().map(|r| r.features()[channel]).collect();
        if signal.iter().any(|v| !v.is_finite()) {
            return Err(DatasetError::NumericError(format!(
                "channel {channel} contains non-finite values; cannot decompose"
            )));
        }

        let rows = bank.decompose(&signal, DECOMPOSITION_LEVELS);
        let threshold = visu_shrink_threshold(&rows[1], len)?;
        debug!(kind = %kind, channel, threshold, "thresholding deepest coefficient row");

        let mut deepest = rows[DECOMPOSITION_LEVELS].clone();
        hard_threshold(&mut deepest, threshold);
        let reconstructed = bank.packet_reverse(&deepest, DECOMPOSITION_LEVELS);

        for (record, &value) in denoised.iter_mut().zip(&reconstructed) {
            let mut features = record.features();
            features[channel] = value;
            record.set_features(features);
        }
    }
    Ok(denoised)
}
