//! End-to-end dataset preparation.
//!
//! The pipeline wires the pieces together in the order the semantics
//! require:
//!
//! ```text
//! RecordStore::load          (bounds over the FULL parsed set)
//!        │
//!        ├── split ── training prefix ── denoise (optional) ── iterator
//!        │
//!        └─────────── evaluation run  ───────────────────────  eval set
//! ```
//!
//! Denoising runs only on the training subset and only after the evaluation
//! records are carved off, so the evaluation set always sees raw values. The
//! bounds, however, are computed before the split; both consumers normalize
//! with the same full-set bounds.
//!
//! All work is synchronous and in-memory; I/O happens once, in the load.

use std::path::Path;

use tracing::info;

use crate::config::DatasetConfig;
use crate::dataset::{EvaluationSet, WindowedDatasetIterator};
use crate::error::{DatasetError, Result};
use crate::preprocessing::{denoise, Bounds, WaveletKind};
use crate::store::RecordStore;

/// Everything the training loop consumes: the batch iterator, the held-out
/// evaluation set, and the shared normalization bounds (needed to rescale
/// predictions back to raw values).
#[derive(Debug)]
pub struct PreparedDataset {
    pub iterator: WindowedDatasetIterator,
    pub evaluation: EvaluationSet,
    pub bounds: Bounds,
}

/// Config-driven dataset preparation pipeline.
pub struct Pipeline {
    config: DatasetConfig,
}

impl Pipeline {
    /// Build a pipeline from a validated configuration.
    pub fn from_config(config: DatasetConfig) -> Result<Self> {
        config.validate().map_err(DatasetError::Config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Load the configured symbol from a CSV file and prepare the dataset.
    pub fn prepare<P: AsRef<Path>>(&self, path: P) -> Result<PreparedDataset> {
        let store = RecordStore::load(path, &self.config.symbol)?;
        self.prepare_from_store(&store)
    }

    /// Prepare the dataset from an already-loaded store.
    pub fn prepare_from_store(&self, store: &RecordStore) -> Result<PreparedDataset> {
        let (train, eval) = store.split(self.config.train_size, self.config.eval_size)?;
        let bounds = store.bounds().clone();

        let train = if self.config.wavelet != WaveletKind::None {
            info!(wavelet = %self.config.wavelet, records = train.len(), "denoising training subset");
            denoise(&train, self.config.wavelet)?
        } else {
            train
        };

        let iterator = WindowedDatasetIterator::new(
            train,
            bounds.clone(),
            self.config.example_length,
            self.config.batch_size,
        )?;
        let evaluation = EvaluationSet::build(&eval, self.config.example_length, &bounds)?;

        info!(
            symbol = %self.config.symbol,
            train_examples = iterator.total_examples(),
            eval_examples = evaluation.len(),
            "dataset prepared"
        );

        Ok(PreparedDataset {
            iterator,
            evaluation,
            bounds,
        })
    }
}
