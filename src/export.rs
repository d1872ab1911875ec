//! Export prepared tensors to NumPy files for the downstream trainer.
//!
//! The training component consumes `(input, label)` tensor pairs of shape
//! `[batch, channels, length]`; this module materializes the full epoch as
//! stacked `.npy` arrays plus a JSON metadata sidecar so the trainer can run
//! offline, without linking against this crate.
//!
//! Files written into the output directory:
//!
//! - `train_inputs.npy`  — `[total_examples, 5, example_length]`
//! - `train_labels.npy`  — `[total_examples, 5, example_length]`
//! - `eval_inputs.npy`   — `[eval_examples, example_length, 5]`
//! - `eval_labels.npy`   — `[eval_examples, 5]` (raw scale)
//! - `metadata.json`

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use ndarray::{concatenate, Array2, Array3, Axis};
use ndarray_npy::WriteNpyExt;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::{EvaluationSet, WindowedDatasetIterator};
use crate::error::{DatasetError, Result};
use crate::record::{Channel, CHANNELS};

/// Description of an exported dataset, written alongside the tensors.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub symbol: String,
    pub example_length: usize,
    pub channels: usize,
    pub channel_names: Vec<String>,
    pub train_examples: usize,
    pub eval_examples: usize,
    /// Per-channel minimums of the shared normalization bounds.
    pub bounds_min: Vec<f64>,
    /// Per-channel maximums of the shared normalization bounds.
    pub bounds_max: Vec<f64>,
}

/// Writes prepared tensors as `.npy` files into one output directory.
pub struct NumpyExporter {
    output_dir: PathBuf,
}

impl NumpyExporter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Export the full training epoch plus the evaluation set.
    ///
    /// Drains the iterator from its current position and resets it
    /// afterwards, so an immediately following training epoch sees the whole
    /// offset sequence again.
    pub fn export(
        &self,
        symbol: &str,
        iterator: &mut WindowedDatasetIterator,
        evaluation: &EvaluationSet,
    ) -> Result<ExportMetadata> {
        fs::create_dir_all(&self.output_dir)?;

        let (train_inputs, train_labels) = Self::stack_training(iterator)?;
        iterator.reset();
        let (eval_inputs, eval_labels) = Self::stack_evaluation(evaluation);

        self.write_npy("train_inputs.npy", &train_inputs.view().into_dyn())?;
        self.write_npy("train_labels.npy", &train_labels.view().into_dyn())?;
        self.write_npy("eval_inputs.npy", &eval_inputs.view().into_dyn())?;
        self.write_npy("eval_labels.npy", &eval_labels.view().into_dyn())?;

        let metadata = ExportMetadata {
            symbol: symbol.to_string(),
            example_length: iterator.example_length(),
            channels: CHANNELS,
            channel_names: Channel::ALL.iter().map(|c| c.name().to_string()).collect(),
            train_examples: train_inputs.len_of(Axis(0)),
            eval_examples: evaluation.len(),
            bounds_min: iterator.bounds().min().to_vec(),
            bounds_max: iterator.bounds().max().to_vec(),
        };
        let rendered = serde_json::to_string_pretty(&metadata)
            .map_err(|e| DatasetError::Config(format!("metadata serialization failed: {e}")))?;
        fs::write(self.output_dir.join("metadata.json"), rendered)?;

        info!(
            symbol,
            train_examples = metadata.train_examples,
            eval_examples = metadata.eval_examples,
            dir = %self.output_dir.display(),
            "exported dataset tensors"
        );
        Ok(metadata)
    }

    /// Drain all remaining batches and stack them along the batch axis.
    fn stack_training(
        iterator: &mut WindowedDatasetIterator,
    ) -> Result<(Array3<f64>, Array3<f64>)> {
        let mut inputs = Vec::new();
        let mut labels = Vec::new();
        while iterator.has_next() {
            let batch = iterator.next_batch(iterator.batch_size())?;
            inputs.push(batch.input);
            labels.push(batch.label);
        }
        if inputs.is_empty() {
            return Ok((
                Array3::zeros((0, CHANNELS, iterator.example_length())),
                Array3::zeros((0, CHANNELS, iterator.example_length())),
            ));
        }
        let input_views: Vec<_> = inputs.iter().map(|a| a.view()).collect();
        let label_views: Vec<_> = labels.iter().map(|a| a.view()).collect();
        let stacked_inputs = concatenate(Axis(0), &input_views)
            .map_err(|e| DatasetError::NumericError(format!("tensor stacking failed: {e}")))?;
        let stacked_labels = concatenate(Axis(0), &label_views)
            .map_err(|e| DatasetError::NumericError(format!("tensor stacking failed: {e}")))?;
        Ok((stacked_inputs, stacked_labels))
    }

    fn stack_evaluation(evaluation: &EvaluationSet) -> (Array3<f64>, Array2<f64>) {
        let n = evaluation.len();
        let len = evaluation.example_length();
        let mut inputs = Array3::zeros((n, len, CHANNELS));
        let mut labels = Array2::zeros((n, CHANNELS));
        for (i, example) in evaluation.iter().enumerate() {
            inputs.index_axis_mut(Axis(0), i).assign(&example.input);
            for c in 0..CHANNELS {
                labels[[i, c]] = example.label[c];
            }
        }
        (inputs, labels)
    }

    fn write_npy(&self, name: &str, array: &ndarray::ArrayViewD<'_, f64>) -> Result<()> {
        let path = self.output_dir.join(name);
        let file = File::create(&path)?;
        array.write_npy(file).map_err(|e| {
            DatasetError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::Bounds;
    use crate::record::StockRecord;

    fn ramp_records(len: usize) -> Vec<StockRecord> {
        (0..len)
            .map(|i| {
                let v = (i + 1) as f64;
                StockRecord::new(format!("d{i}"), "T", [v, v, v, v, v * 100.0])
            })
            .collect()
    }

    #[test]
    fn export_writes_tensors_and_metadata() {
        let records = ramp_records(20);
        let bounds = Bounds::from_records(&records);
        let mut iterator =
            WindowedDatasetIterator::new(records[..14].to_vec(), bounds.clone(), 3, 4).unwrap();
        let evaluation = EvaluationSet::build(&records[14..], 3, &bounds).unwrap();

        let dir = std::env::temp_dir().join(format!("stock_dataset_export_{}", std::process::id()));
        let exporter = NumpyExporter::new(&dir);
        let metadata = exporter.export("T", &mut iterator, &evaluation).unwrap();

        assert_eq!(metadata.train_examples, 14 - 3 - 1);
        assert_eq!(metadata.eval_examples, 6 - 3 - 1);
        assert_eq!(metadata.channels, CHANNELS);
        for name in [
            "train_inputs.npy",
            "train_labels.npy",
            "eval_inputs.npy",
            "eval_labels.npy",
            "metadata.json",
        ] {
            assert!(dir.join(name).exists(), "missing {name}");
        }
        // The exporter resets the iterator so training can start fresh.
        assert_eq!(iterator.cursor(), 0);

        fs::remove_dir_all(&dir).unwrap();
    }
}
