//! Preprocessing: normalization bounds and wavelet denoising.
//!
//! Two concerns live here, both applied before windowing:
//!
//! - **bounds**: per-channel min/max accumulation and min-max scaling to
//!   `[0, 1]`, shared by the training iterator and the evaluation builder.
//! - **wavelet**: optional per-channel wavelet-shrinkage denoising of the
//!   training subset (decompose, threshold, reconstruct).

pub mod bounds;
pub mod wavelet;

pub use bounds::Bounds;
pub use wavelet::{denoise, WaveletKind, DECOMPOSITION_LEVELS};
