//! End-to-end tests of the dataset preparation pipeline.
//!
//! Covers the full flow on synthetic data: CSV ingestion with symbol
//! filtering, full-set bounds, train/evaluation split, optional wavelet
//! denoising of the training subset, windowed batch iteration across
//! multiple epochs, and the evaluation set contract.

use std::fmt::Write as _;

use stock_dataset::{
    DatasetConfig, DatasetError, Pipeline, RecordStore, StockRecord, WaveletKind, CHANNELS,
};

/// Render a synthetic CSV with interleaved symbols. Values for the target
/// symbol trace a noisy ramp so every channel has a non-degenerate range.
fn synthetic_csv(target: &str, rows: usize) -> String {
    let mut out = String::new();
    for i in 0..rows {
        let v = 100.0 + i as f64 + (i as f64 * 0.9).sin() * 4.0;
        writeln!(
            out,
            "2016-{:03},{},{:.4},{:.4},{:.4},{:.4},{}",
            i,
            target,
            v,
            v + 1.5,
            v - 2.0,
            v + 3.0,
            1_000_000 + i * 1000
        )
        .unwrap();
        // Interleave a second symbol that must be filtered out.
        writeln!(out, "2016-{:03},OTHER,1,2,3,4,5", i).unwrap();
    }
    out
}

fn synthetic_store(rows: usize) -> RecordStore {
    let csv = synthetic_csv("SYN", rows);
    RecordStore::from_reader(csv.as_bytes(), "SYN").unwrap()
}

fn base_config() -> DatasetConfig {
    DatasetConfig::new("SYN")
        .with_batch_size(8)
        .with_example_length(5)
        .with_split(64, 16)
}

#[test]
fn csv_ingestion_filters_and_preserves_order() {
    let store = synthetic_store(80);
    assert_eq!(store.len(), 80);
    assert!(store.records().iter().all(|r| r.symbol == "SYN"));
    // File order preserved.
    assert_eq!(store.records()[0].date, "2016-000");
    assert_eq!(store.records()[79].date, "2016-079");
}

#[test]
fn epoch_loop_with_reset_reproduces_batches() {
    let pipeline = Pipeline::from_config(base_config()).unwrap();
    let mut dataset = pipeline.prepare_from_store(&synthetic_store(80)).unwrap();

    let total = dataset.iterator.total_examples();
    assert_eq!(total, 64 - 5 - 1);

    let mut epochs = Vec::new();
    for _ in 0..3 {
        let mut drawn = 0;
        let mut first_batch = None;
        while dataset.iterator.has_next() {
            let batch = dataset.iterator.next_batch(8).unwrap();
            if first_batch.is_none() {
                first_batch = Some(batch.input.clone());
            }
            drawn += batch.len();
        }
        assert_eq!(drawn, total);
        assert!(matches!(
            dataset.iterator.next_batch(8),
            Err(DatasetError::Exhausted)
        ));
        dataset.iterator.reset();
        epochs.push(first_batch.unwrap());
    }

    // Every epoch starts from the identical ascending offset sequence.
    assert_eq!(epochs[0], epochs[1]);
    assert_eq!(epochs[1], epochs[2]);
}

#[test]
fn training_batches_honor_the_tensor_contract() {
    let pipeline = Pipeline::from_config(base_config()).unwrap();
    let mut dataset = pipeline.prepare_from_store(&synthetic_store(80)).unwrap();

    let batch = dataset.iterator.next_batch(8).unwrap();
    assert_eq!(batch.input.shape(), &[8, CHANNELS, 5]);
    assert_eq!(batch.label.shape(), &[8, CHANNELS, 5]);

    // Every value is min-max normalized into [0, 1].
    for &v in batch.input.iter().chain(batch.label.iter()) {
        assert!((0.0..=1.0).contains(&v), "out of range: {v}");
    }
}

#[test]
fn labels_shift_inputs_by_one_step() {
    let pipeline = Pipeline::from_config(base_config()).unwrap();
    let mut dataset = pipeline.prepare_from_store(&synthetic_store(80)).unwrap();

    let batch = dataset.iterator.next_batch(2).unwrap();
    // Within one window pair, label step c equals input step c + 1 because
    // both come from consecutive training records.
    for index in 0..2 {
        for c in 0..CHANNELS {
            for step in 0..4 {
                assert_eq!(
                    batch.label[[index, c, step]],
                    batch.input[[index, c, step + 1]]
                );
            }
        }
    }
}

#[test]
fn evaluation_set_pairs_normalized_inputs_with_raw_labels() {
    let store = synthetic_store(80);
    let pipeline = Pipeline::from_config(base_config()).unwrap();
    let dataset = pipeline.prepare_from_store(&store).unwrap();

    assert_eq!(dataset.evaluation.len(), 16 - 5 - 1);

    let eval_records = &store.records()[64..80];
    for (offset, example) in dataset.evaluation.iter().enumerate() {
        // Raw-scale label: the record immediately following the window.
        assert_eq!(example.label, eval_records[offset + 5].features());
        // Normalized input round-trips through the shared bounds.
        for step in 0..5 {
            for c in 0..CHANNELS {
                let raw = eval_records[offset + step].features()[c];
                let restored = dataset.bounds.denormalize(c, example.input[[step, c]]);
                assert!((restored - raw).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn wavelet_none_is_identity_for_the_training_subset() {
    let store = synthetic_store(80);
    let dataset = Pipeline::from_config(base_config())
        .unwrap()
        .prepare_from_store(&store)
        .unwrap();
    assert_eq!(dataset.iterator.train_records(), &store.records()[..64]);
}

#[test]
fn wavelet_denoising_changes_train_but_not_evaluation() {
    let store = synthetic_store(80);
    let raw = Pipeline::from_config(base_config())
        .unwrap()
        .prepare_from_store(&store)
        .unwrap();

    for kind in [WaveletKind::Haar, WaveletKind::Daubechies3] {
        let denoised = Pipeline::from_config(base_config().with_wavelet(kind))
            .unwrap()
            .prepare_from_store(&store)
            .unwrap();

        assert_ne!(
            raw.iterator.train_records(),
            denoised.iterator.train_records(),
            "{kind:?} left the training subset untouched"
        );
        // Identity fields survive the channel rewrite.
        for (a, b) in raw
            .iterator
            .train_records()
            .iter()
            .zip(denoised.iterator.train_records())
        {
            assert_eq!(a.date, b.date);
            assert_eq!(a.symbol, b.symbol);
        }
        // The evaluation subset never sees denoised values.
        let raw_labels: Vec<_> = raw.evaluation.iter().map(|e| e.label).collect();
        let denoised_labels: Vec<_> = denoised.evaluation.iter().map(|e| e.label).collect();
        assert_eq!(raw_labels, denoised_labels);
    }
}

#[test]
fn denoising_rejects_non_power_of_two_training_subset() {
    // train_size 48 is not a power of two; the config validator catches it
    // before the wavelet code ever runs.
    let config = base_config().with_split(48, 16).with_wavelet(WaveletKind::Haar);
    assert!(matches!(
        Pipeline::from_config(config),
        Err(DatasetError::Config(_))
    ));

    // Bypassing the config path, the denoiser itself enforces the length
    // precondition.
    let records: Vec<StockRecord> = synthetic_store(48).records().to_vec();
    let err = stock_dataset::denoise(&records, WaveletKind::Haar).unwrap_err();
    assert!(matches!(err, DatasetError::UnsupportedLength(_)), "{err}");
}

#[test]
fn prepare_reads_csv_from_disk() {
    let csv = synthetic_csv("SYN", 80);
    let path = std::env::temp_dir().join(format!(
        "stock_dataset_integration_{}.csv",
        std::process::id()
    ));
    std::fs::write(&path, csv).unwrap();

    let pipeline = Pipeline::from_config(base_config()).unwrap();
    let dataset = pipeline.prepare(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(dataset.iterator.total_examples(), 64 - 5 - 1);
    assert_eq!(dataset.evaluation.len(), 16 - 5 - 1);
}

#[test]
fn malformed_row_for_target_symbol_fails_the_load() {
    let mut csv = synthetic_csv("SYN", 20);
    csv.push_str("2016-020,SYN,not-a-number,1,2,3,4\n");
    let err = RecordStore::from_reader(csv.as_bytes(), "SYN").unwrap_err();
    assert!(matches!(err, DatasetError::MalformedInput(_)), "{err}");
}
