//! Stock Dataset
//!
//! Prepares multivariate OHLCV time-series for sequence learning: loads
//! per-symbol daily records from CSV, optionally denoises each feature
//! channel with a wavelet-shrinkage filter, and exposes the result as
//! fixed-length sliding-window training batches plus a held-out evaluation
//! set.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        stock-dataset                           │
//! ├────────────────────────────────────────────────────────────────┤
//! │  store          - CSV ingestion, full-set bounds, split        │
//! │  preprocessing  - min-max bounds, wavelet denoising            │
//! │  dataset        - windowed batch iterator, evaluation set      │
//! │  pipeline       - config-driven orchestration                  │
//! │  export         - NumPy tensors + JSON metadata                │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use stock_dataset::{DatasetConfig, Pipeline, WaveletKind};
//!
//! let config = DatasetConfig::new("GOOG")
//!     .with_example_length(22)
//!     .with_batch_size(64)
//!     .with_split(4096, 250)
//!     .with_wavelet(WaveletKind::Daubechies3);
//!
//! let mut dataset = Pipeline::from_config(config)?.prepare("prices.csv")?;
//!
//! for epoch in 0..100 {
//!     while dataset.iterator.has_next() {
//!         let batch = dataset.iterator.next_batch(64)?;
//!         // feed batch.input / batch.label to the model
//!     }
//!     dataset.iterator.reset();
//! }
//! ```
//!
//! The predictive network itself is out of scope: this crate only produces
//! `(input, label)` tensor pairs of shape `[batch, channels, length]` for
//! training and `[example_length, channels]` inputs with raw-scale labels
//! for evaluation.

pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod preprocessing;
pub mod record;
pub mod store;

// Re-exports - data model
pub use record::{Channel, FeatureVector, StockRecord, CHANNELS};

// Re-exports - errors
pub use error::{DatasetError, Result};

// Re-exports - loading
pub use store::RecordStore;

// Re-exports - preprocessing
pub use preprocessing::{denoise, Bounds, WaveletKind, DECOMPOSITION_LEVELS};

// Re-exports - dataset
pub use dataset::{Batch, EvalExample, EvaluationSet, WindowedDatasetIterator};

// Re-exports - configuration and orchestration
pub use config::DatasetConfig;
pub use pipeline::{Pipeline, PreparedDataset};

// Re-exports - export
pub use export::{ExportMetadata, NumpyExporter};
