//! Stateful batch generator over a sliding window of the training subset.
//!
//! Every valid starting offset `o` yields a pair of windows: the input window
//! covers records `o .. o + example_length`, the label window is the same
//! span shifted one step ahead, so a one-step-ahead target exists for
//! every position in the window, not only its last element. An offset is
//! valid iff both windows fit inside the training subset, giving the offset
//! range `0 ..= train_len - example_length - 2`.
//!
//! Offsets are consumed strictly in ascending (chronological) order, each
//! exactly once per epoch, with no shuffling and no replacement. The
//! consumption state is an explicit cursor into an immutable offset list;
//! [`reset`](WindowedDatasetIterator::reset) rewinds the cursor and is always
//! valid, typically called once per training epoch.
//!
//! The iterator is single-consumer: it mutates its cursor on every draw and
//! provides no locking.

use ndarray::{Array3, Axis};

use crate::error::{DatasetError, Result};
use crate::preprocessing::Bounds;
use crate::record::{StockRecord, CHANNELS};

/// One training batch of normalized window pairs.
///
/// Both tensors are shaped `[batch, CHANNELS, example_length]`; the label is
/// the input shifted one time step ahead.
#[derive(Debug, Clone)]
pub struct Batch {
    pub input: Array3<f64>,
    pub label: Array3<f64>,
}

impl Batch {
    /// Number of window pairs in this batch.
    pub fn len(&self) -> usize {
        self.input.len_of(Axis(0))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sliding-window batch generator with min-max normalization.
#[derive(Debug)]
pub struct WindowedDatasetIterator {
    train: Vec<StockRecord>,
    bounds: Bounds,
    example_length: usize,
    batch_size: usize,
    /// Valid window start offsets, ascending. Never mutated after
    /// construction; `cursor` tracks consumption.
    offsets: Vec<usize>,
    cursor: usize,
}

impl WindowedDatasetIterator {
    /// Build an iterator over a training subset.
    ///
    /// `bounds` must come from the full parsed record set (they are shared
    /// with the evaluation builder) and must have a non-zero range on every
    /// channel; degenerate bounds fail with [`DatasetError::NumericError`].
    pub fn new(
        train: Vec<StockRecord>,
        bounds: Bounds,
        example_length: usize,
        batch_size: usize,
    ) -> Result<Self> {
        if example_length == 0 {
            return Err(DatasetError::Config(
                "example_length must be > 0".to_string(),
            ));
        }
        if batch_size == 0 {
            return Err(DatasetError::Config("batch_size must be > 0".to_string()));
        }
        bounds.validate()?;

        // Window plus its one-step-shifted label must both fit.
        let window = example_length + 1;
        let offsets: Vec<usize> = (0..train.len().saturating_sub(window)).collect();

        Ok(Self {
            train,
            bounds,
            example_length,
            batch_size,
            offsets,
            cursor: 0,
        })
    }

    /// Draw the next batch of up to `n` window pairs, oldest offsets first.
    ///
    /// Returns fewer than `n` pairs when the queue runs short, and
    /// [`DatasetError::Exhausted`] when it is already empty. Callers that
    /// treat exhaustion as control flow should check
    /// [`has_next`](Self::has_next) first.
    pub fn next_batch(&mut self, n: usize) -> Result<Batch> {
        if !self.has_next() {
            return Err(DatasetError::Exhausted);
        }

        let count = n.min(self.remaining());
        let mut input = Array3::zeros((count, CHANNELS, self.example_length));
        let mut label = Array3::zeros((count, CHANNELS, self.example_length));

        for index in 0..count {
            let offset = self.offsets[self.cursor + index];
            for step in 0..self.example_length {
                let current = self.bounds.normalize_vector(&self.train[offset + step].features());
                let next = self
                    .bounds
                    .normalize_vector(&self.train[offset + step + 1].features());
                for c in 0..CHANNELS {
                    input[[index, c, step]] = current[c];
                    label[[index, c, step]] = next[c];
                }
            }
        }
        self.cursor += count;

        Ok(Batch { input, label })
    }

    /// Whether any offsets remain in the current epoch.
    pub fn has_next(&self) -> bool {
        self.cursor < self.offsets.len()
    }

    /// Rewind to the start of the offset sequence. Always valid; repeated
    /// resets reproduce the identical ascending offset order.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Total number of window pairs per epoch:
    /// `train_len - example_length - 1`.
    pub fn total_examples(&self) -> usize {
        self.offsets.len()
    }

    /// Number of window pairs already consumed this epoch.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of window pairs still available this epoch.
    pub fn remaining(&self) -> usize {
        self.offsets.len() - self.cursor
    }

    /// Configured window length.
    pub fn example_length(&self) -> usize {
        self.example_length
    }

    /// Configured default batch size used by the `Iterator` impl.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of feature channels per record.
    pub fn channels(&self) -> usize {
        CHANNELS
    }

    /// The normalization bounds shared with the evaluation set.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// The (possibly denoised) training records backing this iterator.
    pub fn train_records(&self) -> &[StockRecord] {
        &self.train
    }

    #[cfg(test)]
    fn peek_offsets(&self) -> &[usize] {
        &self.offsets[self.cursor..]
    }
}

/// Epoch-style consumption: each step draws `batch_size` pairs until the
/// offset queue is exhausted. Call [`reset`](WindowedDatasetIterator::reset)
/// before the next epoch.
impl Iterator for WindowedDatasetIterator {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if !self.has_next() {
            return None;
        }
        self.next_batch(self.batch_size).ok()
    }
}
