//! Loading and splitting the raw record source.
//!
//! The source is a headerless tabular file where each row is
//! `[id, symbol, open, close, low, high, volume]`. Rows for other symbols
//! are skipped; file order is preserved and assumed chronological.
//!
//! Loading is fail-fast. A row with a non-numeric required field fails the
//! whole load with [`DatasetError::MalformedInput`] — skipping it would
//! corrupt the chronological contiguity the windowing depends on — and I/O
//! failures surface as structured errors instead of an empty dataset.
//!
//! Per-channel min/max bounds are accumulated during the load, over the
//! **entire** parsed set. The train/evaluation split happens afterwards, so
//! the bounds intentionally include the held-out records; see DESIGN.md.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::error::{DatasetError, Result};
use crate::preprocessing::Bounds;
use crate::record::{FeatureVector, StockRecord, CHANNELS};

/// Columns preceding the numeric channels: id and symbol.
const META_COLUMNS: usize = 2;

/// The parsed, chronologically ordered record sequence for one symbol, with
/// its full-set normalization bounds. Read-only after construction.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<StockRecord>,
    bounds: Bounds,
    symbol: String,
}

impl RecordStore {
    /// Load all records for `symbol` from a CSV file.
    pub fn load<P: AsRef<Path>>(path: P, symbol: &str) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let store = Self::from_reader(file, symbol)?;
        info!(
            symbol,
            records = store.len(),
            path = %path.as_ref().display(),
            "loaded record store"
        );
        Ok(store)
    }

    /// Load all records for `symbol` from any reader of CSV rows.
    pub fn from_reader<R: Read>(reader: R, symbol: &str) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut bounds = Bounds::new();

        for (line, row) in csv_reader.records().enumerate() {
            let row = row?;
            if row.get(1) != Some(symbol) {
                continue;
            }
            if row.len() < META_COLUMNS + CHANNELS {
                return Err(DatasetError::MalformedInput(format!(
                    "row {}: expected {} fields, found {}",
                    line + 1,
                    META_COLUMNS + CHANNELS,
                    row.len()
                )));
            }

            let mut features: FeatureVector = [0.0; CHANNELS];
            for (c, value) in features.iter_mut().enumerate() {
                let field = &row[META_COLUMNS + c];
                *value = field.trim().parse::<f64>().map_err(|_| {
                    DatasetError::MalformedInput(format!(
                        "row {}: field '{}' in column {} is not numeric",
                        line + 1,
                        field,
                        META_COLUMNS + c
                    ))
                })?;
            }

            bounds.observe(&features);
            records.push(StockRecord::new(&row[0], &row[1], features));
        }

        Ok(Self {
            records,
            bounds,
            symbol: symbol.to_string(),
        })
    }

    /// Build a store from already-parsed records, accumulating bounds the
    /// same way the loader does. Intended for synthetic data and tests.
    pub fn from_records(records: Vec<StockRecord>, symbol: &str) -> Self {
        let bounds = Bounds::from_records(&records);
        Self {
            records,
            bounds,
            symbol: symbol.to_string(),
        }
    }

    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    /// Full-set normalization bounds, accumulated before any split.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Carve the ordered record sequence into a training prefix of
    /// `train_size` records and an evaluation run of the following
    /// `eval_size` records.
    pub fn split(&self, train_size: usize, eval_size: usize) -> Result<(Vec<StockRecord>, Vec<StockRecord>)> {
        let needed = train_size + eval_size;
        if needed > self.records.len() {
            return Err(DatasetError::Config(format!(
                "split needs {needed} records (train {train_size} + eval {eval_size}) \
                 but only {} were loaded for '{}'",
                self.records.len(),
                self.symbol
            )));
        }
        let train = self.records[..train_size].to_vec();
        let eval = self.records[train_size..needed].to_vec();
        Ok((train, eval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
2016-01-04,GOOG,741.0,742.0,738.0,744.0,3272800
2016-01-04,MSFT,54.3,54.8,53.4,54.8,52843404
2016-01-05,GOOG,746.4,752.0,738.6,752.0,1950700
2016-01-06,GOOG,730.0,741.0,724.0,741.7,1947000
2016-01-05,MSFT,54.9,55.4,54.5,55.4,34079674
";

    #[test]
    fn filters_to_requested_symbol_in_file_order() {
        let store = RecordStore::from_reader(CSV.as_bytes(), "GOOG").unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.symbol(), "GOOG");
        let dates: Vec<&str> = store.records().iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, ["2016-01-04", "2016-01-05", "2016-01-06"]);
        assert_eq!(store.records()[0].features(), [741.0, 742.0, 738.0, 744.0, 3272800.0]);
    }

    #[test]
    fn bounds_cover_the_full_parsed_set() {
        let store = RecordStore::from_reader(CSV.as_bytes(), "GOOG").unwrap();
        assert_eq!(store.bounds().min()[0], 730.0);
        assert_eq!(store.bounds().max()[0], 746.4);
        assert_eq!(store.bounds().min()[4], 1947000.0);
        assert_eq!(store.bounds().max()[4], 3272800.0);
    }

    #[test]
    fn malformed_numeric_field_fails_whole_load() {
        let bad = "2016-01-04,GOOG,741.0,oops,738.0,744.0,3272800\n";
        let err = RecordStore::from_reader(bad.as_bytes(), "GOOG").unwrap_err();
        assert!(matches!(err, DatasetError::MalformedInput(_)), "{err}");
    }

    #[test]
    fn malformed_rows_of_other_symbols_are_ignored() {
        let mixed = "\
2016-01-04,MSFT,not,a,number,at,all
2016-01-04,GOOG,741.0,742.0,738.0,744.0,3272800
";
        let store = RecordStore::from_reader(mixed.as_bytes(), "GOOG").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn short_row_fails_load() {
        let short = "2016-01-04,GOOG,741.0,742.0\n";
        let err = RecordStore::from_reader(short.as_bytes(), "GOOG").unwrap_err();
        assert!(matches!(err, DatasetError::MalformedInput(_)), "{err}");
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let err = RecordStore::load("/nonexistent/prices.csv", "GOOG").unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)), "{err}");
    }

    #[test]
    fn split_carves_contiguous_train_and_eval_runs() {
        let store = RecordStore::from_reader(CSV.as_bytes(), "GOOG").unwrap();
        let (train, eval) = store.split(2, 1).unwrap();
        assert_eq!(train.len(), 2);
        assert_eq!(eval.len(), 1);
        assert_eq!(train[0].date, "2016-01-04");
        assert_eq!(eval[0].date, "2016-01-06");
    }

    #[test]
    fn oversized_split_is_rejected() {
        let store = RecordStore::from_reader(CSV.as_bytes(), "GOOG").unwrap();
        assert!(store.split(3, 1).is_err());
    }
}
