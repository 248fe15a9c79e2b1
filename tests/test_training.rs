// Tests for the training loop: XOR convergence, early stopping, batching
// semantics, shuffling determinism, held-out evaluation and cancellation.

use feedforward::{
    BatchMode, BiasMode, EvalOptions, InitMethod, Loss, NetError, Network, NetworkConfig,
    TrainOptions,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn xor_dataset() -> Vec<Vec<f64>> {
    vec![
        vec![1.0, 0.0, 1.0],
        vec![1.0, 1.0, 0.0],
        vec![0.0, 1.0, 1.0],
        vec![0.0, 0.0, 0.0],
    ]
}

fn xor_config() -> NetworkConfig {
    let mut config = NetworkConfig::new(2, vec![4, 1]);
    config.speed = 1.0;
    config.momentum = 0.9;
    config.bias = BiasMode::AllButOutput;
    config
}

#[test]
fn test_xor_converges_with_fixed_seed() {
    // A handful of fixed candidate seeds; training is deterministic per
    // seed, and at least one run must reach MSE < 0.05 within 1000 epochs
    // and predict every row within 0.1.
    let seeds = [42u64, 1337, 2024, 7, 99, 271_828];
    let dataset = xor_dataset();

    for &seed in &seeds {
        let mut net = Network::new(xor_config()).unwrap();
        net.initialize_weights(InitMethod::Auto, Some(seed), None)
            .unwrap();

        let summary = net
            .train(&dataset, 1000, &TrainOptions::default(), None)
            .unwrap();

        if summary.error < 0.05 {
            assert_eq!(summary.error_kind, Loss::Mse);
            assert!((summary.truth - (1.0 - summary.error)).abs() < 1e-12);
            assert!(summary.epochs_run <= 1000);

            for row in &dataset {
                let out = net.predict(&row[..2]).unwrap();
                assert!(
                    (out[0] - row[2]).abs() < 0.1,
                    "seed {seed}: {} xor {} predicted {} (want {})",
                    row[0],
                    row[1],
                    out[0],
                    row[2]
                );
            }
            return;
        }
    }

    panic!("XOR did not converge for any fixed seed");
}

#[test]
fn test_training_is_deterministic_per_seed() {
    let dataset = xor_dataset();

    let run = || {
        let mut net = Network::new(xor_config()).unwrap();
        net.initialize_weights(InitMethod::Auto, Some(77), None)
            .unwrap();
        let summary = net.train(&dataset, 50, &TrainOptions::default(), None).unwrap();
        (summary.error, net.weights())
    };

    let (error1, weights1) = run();
    let (error2, weights2) = run();
    assert_eq!(error1, error2);
    assert_eq!(weights1, weights2);
}

#[test]
fn test_early_stop_threshold() {
    let dataset = xor_dataset();
    let mut net = Network::new(xor_config()).unwrap();
    net.initialize_weights(InitMethod::Auto, Some(42), None)
        .unwrap();

    // Any epoch error beats a threshold of 10, so exactly one epoch runs.
    let options = TrainOptions {
        until_error: 10.0,
        ..TrainOptions::default()
    };
    let summary = net.train(&dataset, 500, &options, None).unwrap();
    assert_eq!(summary.epochs_run, 1);

    let session = net.training_session().unwrap();
    assert_eq!(session.errors.len(), 1);
}

#[test]
fn test_error_history_per_epoch() {
    let dataset = xor_dataset();
    let mut net = Network::new(xor_config()).unwrap();
    net.initialize_weights(InitMethod::Auto, Some(42), None)
        .unwrap();

    let summary = net.train(&dataset, 12, &TrainOptions::default(), None).unwrap();
    assert_eq!(summary.epochs_run, 12);

    let session = net.training_session().unwrap();
    assert_eq!(session.errors.len(), 12);
    assert_eq!(session.session, summary.session);
    assert!(session.test_errors.is_empty());
    assert_eq!(*session.errors.last().unwrap(), summary.error);
}

#[test]
fn test_auto_initialization_reports_seed() {
    let dataset = xor_dataset();
    let mut net = Network::new(xor_config()).unwrap();

    assert!(!net.has_weights());
    let summary = net.train(&dataset, 3, &TrainOptions::default(), None).unwrap();
    assert!(net.has_weights());
    assert!(summary.seed.is_some());

    // A second run reuses the weights and reports no seed.
    let summary = net.train(&dataset, 3, &TrainOptions::default(), None).unwrap();
    assert!(summary.seed.is_none());
}

#[test]
fn test_batch_boundary_guard() {
    // A boundary is a nonzero multiple of the batch size, or the last row.
    // Intermediate boundaries (all but the one on the last row) record the
    // running error, and the epoch records once more.
    let row = vec![0.5, 0.25, 0.3];
    let dataset: Vec<Vec<f64>> = (0..8).map(|_| row.clone()).collect();

    let run = |batch: BatchMode| {
        let mut config = NetworkConfig::new(2, vec![2, 1]);
        config.speed = 0.05;
        let mut net = Network::new(config).unwrap();
        net.initialize_weights(InitMethod::Xavier, Some(5), None)
            .unwrap();
        let options = TrainOptions {
            batch,
            ..TrainOptions::default()
        };
        net.train(&dataset, 1, &options, None).unwrap();
        net.training_session().unwrap().errors.len()
    };

    // batch 4 over 8 rows: boundary at rows 4 and 7 -> one intermediate
    // record plus the epoch record.
    assert_eq!(run(BatchMode::Size(4)), 2);
    // batch 2: boundaries at 2, 4, 6, 7 -> three intermediate records.
    assert_eq!(run(BatchMode::Size(2)), 4);
    // batch 3: boundaries at 3, 6, 7 -> two intermediate records.
    assert_eq!(run(BatchMode::Size(3)), 3);
    // Unbatched: only the epoch record.
    assert_eq!(run(BatchMode::Off), 1);
}

#[test]
fn test_shuffle_is_deterministic_with_seed() {
    let dataset = vec![
        vec![0.1, 0.9, 0.3],
        vec![0.4, 0.2, 0.8],
        vec![0.9, 0.7, 0.1],
        vec![0.3, 0.3, 0.6],
        vec![0.6, 0.1, 0.4],
        vec![0.2, 0.8, 0.9],
    ];

    let run = || {
        let mut config = NetworkConfig::new(2, vec![3, 1]);
        config.speed = 0.5;
        let mut net = Network::new(config).unwrap();
        net.initialize_weights(InitMethod::Xavier, Some(11), None)
            .unwrap();
        let options = TrainOptions {
            shuffle: true,
            shuffle_seed: Some(4242),
            ..TrainOptions::default()
        };
        let summary = net.train(&dataset, 10, &options, None).unwrap();
        (summary.error, net.weights())
    };

    let (error1, weights1) = run();
    let (error2, weights2) = run();
    assert_eq!(error1, error2);
    assert_eq!(weights1, weights2);
}

#[test]
fn test_testset_errors_tracked_without_weight_updates() {
    let dataset = xor_dataset();
    let mut net = Network::new(xor_config()).unwrap();
    net.initialize_weights(InitMethod::Auto, Some(42), None)
        .unwrap();

    net.train(&dataset, 5, &TrainOptions::default(), Some(&dataset))
        .unwrap();
    let session = net.training_session().unwrap();
    assert_eq!(session.errors.len(), 5);
    assert_eq!(session.test_errors.len(), 5);

    // Evaluating does not move weights.
    let before = net.weights();
    net.evaluate(&dataset, &EvalOptions::default()).unwrap();
    assert_eq!(net.weights(), before);
}

#[test]
fn test_evaluate_mean_min_max() {
    let mut config = NetworkConfig::new(1, vec![1]);
    config.activation = "linear".to_string();
    let mut net = Network::new(config).unwrap();
    net.set_weights(&vec![vec![vec![1.0]]]).unwrap();

    // Rows (x, target): losses are (x - t)² per row.
    let dataset = vec![vec![1.0, 0.0], vec![2.0, 0.0], vec![3.0, 0.0]];
    let summary = net.evaluate(&dataset, &EvalOptions::default()).unwrap();

    let expected = [1.0, 4.0, 9.0];
    let mean = expected.iter().sum::<f64>() / 3.0;
    assert!((summary.error - mean).abs() < 1e-12);
    assert_eq!(summary.min, 1.0);
    assert_eq!(summary.max, 9.0);
    assert!(summary.min <= summary.error && summary.error <= summary.max);
    assert_eq!(summary.error_kind, Loss::Mse);
}

#[test]
fn test_evaluate_empty_dataset_is_input_error() {
    let mut net = Network::new(xor_config()).unwrap();
    net.initialize_weights(InitMethod::Auto, Some(1), None)
        .unwrap();
    assert!(matches!(
        net.evaluate(&[], &EvalOptions::default()).unwrap_err(),
        NetError::Input(_)
    ));
}

#[test]
fn test_train_empty_dataset_is_input_error() {
    let mut net = Network::new(xor_config()).unwrap();
    assert!(matches!(
        net.train(&[], 10, &TrainOptions::default(), None)
            .unwrap_err(),
        NetError::Input(_)
    ));
}

#[test]
fn test_explicit_output_columns() {
    // Targets in the *first* column instead of the default last column.
    let dataset = vec![
        vec![1.0, 1.0, 0.0],
        vec![0.0, 1.0, 1.0],
        vec![1.0, 0.0, 1.0],
        vec![0.0, 0.0, 0.0],
    ];

    let mut net = Network::new(xor_config()).unwrap();
    net.initialize_weights(InitMethod::Auto, Some(42), None)
        .unwrap();
    let options = TrainOptions {
        outputs: Some(vec![0]),
        ..TrainOptions::default()
    };
    let summary = net.train(&dataset, 5, &options, None).unwrap();
    assert_eq!(summary.epochs_run, 5);
}

#[test]
fn test_cancellation_token_stops_training() {
    let cancel = Arc::new(AtomicBool::new(true));
    let dataset = xor_dataset();
    let mut net = Network::new(xor_config()).unwrap();
    net.initialize_weights(InitMethod::Auto, Some(42), None)
        .unwrap();

    let options = TrainOptions {
        cancel: Some(Arc::clone(&cancel)),
        ..TrainOptions::default()
    };
    let summary = net.train(&dataset, 1000, &options, None).unwrap();

    // Cancelled before the first row of the first epoch.
    assert_eq!(summary.epochs_run, 0);
    assert!(net.training_session().unwrap().errors.is_empty());

    cancel.store(false, Ordering::Relaxed);
    let summary = net.train(&dataset, 3, &options, None).unwrap();
    assert_eq!(summary.epochs_run, 3);
}

#[test]
fn test_batched_xor_with_default_options_runs() {
    let dataset = xor_dataset();
    let mut config = xor_config();
    config.momentum = 0.0;
    let mut net = Network::new(config).unwrap();
    net.initialize_weights(InitMethod::Auto, Some(9), None)
        .unwrap();

    let options = TrainOptions {
        batch: BatchMode::Enabled,
        ..TrainOptions::default()
    };
    // 4 rows with a 100-row default batch: one update per epoch, on the
    // last row.
    let summary = net.train(&dataset, 20, &options, None).unwrap();
    assert_eq!(summary.epochs_run, 20);
    assert_eq!(net.training_session().unwrap().errors.len(), 20);
}
