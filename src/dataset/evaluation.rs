//! Eagerly materialized evaluation windows over the held-out subset.
//!
//! Unlike the training iterator, the evaluation set is built once and
//! iterated non-destructively: it is a plain indexable sequence, finite and
//! restartable. Inputs are normalized with the same bounds the training
//! iterator uses; labels stay on the raw scale so predictions can be
//! denormalized and compared directly.

use ndarray::Array2;

use crate::error::{DatasetError, Result};
use crate::preprocessing::Bounds;
use crate::record::{FeatureVector, StockRecord, CHANNELS};

/// One evaluation pair: a normalized input window of shape
/// `[example_length, CHANNELS]` and the raw-scale feature vector of the
/// record immediately following the window.
#[derive(Debug, Clone)]
pub struct EvalExample {
    pub input: Array2<f64>,
    pub label: FeatureVector,
}

/// All valid evaluation windows, in chronological order.
#[derive(Debug, Clone)]
pub struct EvaluationSet {
    examples: Vec<EvalExample>,
    example_length: usize,
}

impl EvaluationSet {
    /// Materialize every valid window of the held-out subset.
    ///
    /// Produces `eval_len - example_length - 1` examples (offsets
    /// `0 ..= eval_len - example_length - 2`); an evaluation subset too short
    /// for a single window yields an empty set. The bounds must be the same
    /// full-set bounds the training iterator normalizes with, and must be
    /// non-degenerate.
    pub fn build(
        eval_records: &[StockRecord],
        example_length: usize,
        bounds: &Bounds,
    ) -> Result<Self> {
        if example_length == 0 {
            return Err(DatasetError::Config(
                "example_length must be > 0".to_string(),
            ));
        }
        bounds.validate()?;

        let window = example_length + 1;
        let count = eval_records.len().saturating_sub(window);
        let mut examples = Vec::with_capacity(count);

        for offset in 0..count {
            let mut input = Array2::zeros((example_length, CHANNELS));
            for step in 0..example_length {
                let normalized = bounds.normalize_vector(&eval_records[offset + step].features());
                for c in 0..CHANNELS {
                    input[[step, c]] = normalized[c];
                }
            }
            let label = eval_records[offset + example_length].features();
            examples.push(EvalExample { input, label });
        }

        Ok(Self {
            examples,
            example_length,
        })
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn example_length(&self) -> usize {
        self.example_length
    }

    pub fn get(&self, index: usize) -> Option<&EvalExample> {
        self.examples.get(index)
    }

    /// Non-destructive iteration; can be called any number of times.
    pub fn iter(&self) -> std::slice::Iter<'_, EvalExample> {
        self.examples.iter()
    }
}

impl<'a> IntoIterator for &'a EvaluationSet {
    type Item = &'a EvalExample;
    type IntoIter = std::slice::Iter<'a, EvalExample>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}
