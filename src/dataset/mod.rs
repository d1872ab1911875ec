//! Windowed training batches and the held-out evaluation set.
//!
//! - **iterator**: stateful generator of normalized `(input, label)` window
//!   batches over the training subset, with exhaustion and reset semantics.
//! - **evaluation**: eagerly materialized, re-iterable evaluation windows
//!   paired with raw-scale labels.

pub mod evaluation;
pub mod iterator;

pub use evaluation::{EvalExample, EvaluationSet};
pub use iterator::{Batch, WindowedDatasetIterator};
