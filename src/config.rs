//! Dataset configuration with serialization support.
//!
//! The surrounding application owns training concerns (epoch count, model
//! persistence); this config carries only what the dataset pipeline needs:
//! symbol, batch size, example length, split sizes, and the wavelet kind.
//! Configs serialize to TOML or JSON for experiment reproducibility.
//!
//! # Example
//!
//! ```ignore
//! use stock_dataset::DatasetConfig;
//!
//! let config = DatasetConfig::new("GOOG")
//!     .with_example_length(22)
//!     .with_batch_size(64);
//! config.validate().expect("invalid config");
//! config.save_toml("experiment.toml")?;
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, Result};
use crate::preprocessing::WaveletKind;

/// Configuration for dataset preparation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Symbol whose rows are kept; all others are skipped.
    pub symbol: String,

    /// Window pairs drawn per training batch.
    pub batch_size: usize,

    /// Records per window (sequence length fed to the model).
    pub example_length: usize,

    /// Number of leading records forming the training subset.
    ///
    /// Must be a power of two (>= 8) when a wavelet kind other than `None`
    /// is configured, since the packet decomposition is exact only for
    /// power-of-two lengths.
    pub train_size: usize,

    /// Number of records after the training subset held out for evaluation.
    pub eval_size: usize,

    /// Denoising applied to the training subset before windowing.
    pub wavelet: WaveletKind,
}

impl DatasetConfig {
    /// Configuration with conventional defaults for daily bars:
    /// batch 64, window 22, train 4096, eval 250, no denoising.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            batch_size: 64,
            example_length: 22,
            train_size: 4096,
            eval_size: 250,
            wavelet: WaveletKind::None,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_example_length(mut self, example_length: usize) -> Self {
        self.example_length = example_length;
        self
    }

    pub fn with_split(mut self, train_size: usize, eval_size: usize) -> Self {
        self.train_size = train_size;
        self.eval_size = eval_size;
        self
    }

    pub fn with_wavelet(mut self, wavelet: WaveletKind) -> Self {
        self.wavelet = wavelet;
        self
    }

    /// Validate configuration.
    ///
    /// Returns `Ok(())` if valid, `Err(msg)` otherwise.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.symbol.is_empty() {
            return Err("symbol must not be empty".to_string());
        }
        if self.batch_size == 0 {
            return Err("batch_size must be > 0".to_string());
        }
        if self.example_length == 0 {
            return Err("example_length must be > 0".to_string());
        }
        if self.train_size < self.example_length + 2 {
            return Err(format!(
                "train_size ({}) must exceed example_length + 1 ({}) to yield any window pair",
                self.train_size,
                self.example_length + 1
            ));
        }
        if self.wavelet != WaveletKind::None && !self.train_size.is_power_of_two() {
            return Err(format!(
                "train_size ({}) must be a power of two when wavelet denoising ({}) is enabled",
                self.train_size, self.wavelet
            ));
        }
        Ok(())
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let rendered = toml::to_string_pretty(self)
            .map_err(|e| DatasetError::Config(format!("TOML serialization failed: {e}")))?;
        fs::write(path, rendered)?;
        Ok(())
    }

    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| DatasetError::Config(format!("TOML parsing failed: {e}")))
    }

    /// Save configuration to a JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let rendered = serde_json::to_string_pretty(self)
            .map_err(|e| DatasetError::Config(format!("JSON serialization failed: {e}")))?;
        fs::write(path, rendered)?;
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| DatasetError::Config(format!("JSON parsing failed: {e}")))
    }
}
