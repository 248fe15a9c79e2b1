//! The training loop: epochs, mini-batches, shuffling, early stopping and
//! held-out evaluation.
//!
//! Training drives the forward and backward engines over a two-dimensional
//! dataset whose trailing columns (by default) hold the target values. The
//! loop is strictly sequential — later weight updates depend on earlier
//! ones — and runs on the caller's thread; an optional cancellation token is
//! checked between epochs and between rows.

use crate::error::{NetError, Result};
use crate::init::InitMethod;
use crate::network::Network;
use crate::utils::{Loss, SimpleRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Batch size used when batching is enabled without an explicit size.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Mini-batch policy for a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    /// Weights update after every sample.
    #[default]
    Off,
    /// Batched with [`DEFAULT_BATCH_SIZE`] rows.
    Enabled,
    /// Batched with an explicit row count; 0 behaves like `Off`.
    Size(usize),
}

impl BatchMode {
    fn rows(self) -> Option<usize> {
        match self {
            Self::Off => None,
            Self::Enabled => Some(DEFAULT_BATCH_SIZE),
            Self::Size(0) => None,
            Self::Size(n) => Some(n),
        }
    }
}

/// Options of a training run.
///
/// # Fields
///
/// * `outputs` - Target-column indices in the dataset rows; defaults to the
///   last N columns, N being the output-layer width
/// * `shuffle` - Reorder the dataset rows before every epoch after the first
/// * `shuffle_seed` - Seed for the shuffle order; absent means a time-based
///   seed (the run is then reproducible only up to shuffling)
/// * `batch` - Mini-batch policy
/// * `until_error` - Stop as soon as the epoch error falls below this
///   threshold; 0 disables early stopping
/// * `reinitialize` - Draw fresh weights even if some are already set
/// * `cancel` - Cooperative cancellation token, checked between epochs and
///   between rows; training ends cleanly with the statistics gathered so far
#[derive(Debug, Clone, Default)]
pub struct TrainOptions {
    pub outputs: Option<Vec<usize>>,
    pub shuffle: bool,
    pub shuffle_seed: Option<u64>,
    pub batch: BatchMode,
    pub until_error: f64,
    pub reinitialize: bool,
    pub cancel: Option<Arc<AtomicBool>>,
}

/// Options of an evaluation run.
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// Target-column indices; same defaulting rule as in [`TrainOptions`].
    pub outputs: Option<Vec<usize>>,
}

/// Outcome of a training run.
///
/// `truth` is `1 − error`, a rough accuracy proxy. `seed` is present when
/// the run had to initialize weights itself.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub epochs_run: usize,
    pub error: f64,
    pub error_kind: Loss,
    pub truth: f64,
    pub seed: Option<u64>,
    pub session: u64,
    pub elapsed: Duration,
}

/// Outcome of an evaluation run over a held-out dataset.
#[derive(Debug, Clone)]
pub struct EvaluationSummary {
    /// Mean per-row loss.
    pub error: f64,
    pub min: f64,
    pub max: f64,
    pub error_kind: Loss,
}

/// Error history of one training run.
///
/// `errors` gets one entry per epoch, plus one per intermediate batch
/// boundary when batching is enabled; `test_errors` runs parallel to it
/// when a held-out set was supplied.
#[derive(Debug, Clone)]
pub struct TrainingSession {
    pub session: u64,
    pub errors: Vec<f64>,
    pub test_errors: Vec<f64>,
}

/// Split a dataset row into input and target values by column membership.
fn split_row(row: &[f64], outputs: &[usize]) -> (Vec<f64>, Vec<f64>) {
    let mut input = Vec::with_capacity(row.len());
    let mut target = Vec::new();
    for (j, &v) in row.iter().enumerate() {
        if outputs.contains(&j) {
            target.push(v);
        } else {
            input.push(v);
        }
    }
    (input, target)
}

impl Network {
    /// Target-column indices for a dataset: the caller's choice, or the
    /// last N columns, N being the output-layer width.
    fn output_indexes(&self, dataset: &[Vec<f64>], outputs: Option<Vec<usize>>) -> Vec<usize> {
        match outputs {
            Some(indexes) if !indexes.is_empty() => indexes,
            _ => {
                let width = dataset[0].len();
                (0..self.output_size())
                    .map(|i| width.saturating_sub(i + 1))
                    .collect()
            }
        }
    }

    /// Full training course over `dataset` for at most `epochs` epochs.
    ///
    /// Per epoch, each row is split into input and target columns and
    /// trained on: per-sample forward+backward when unbatched; when batched,
    /// forward per row with output-delta accumulation, and one backward pass
    /// per batch boundary (a row index that is a nonzero multiple of the
    /// batch size, or the dataset's last row) followed by a delta reset.
    ///
    /// The epoch error — MSE or cross-entropy, chosen by the output layer's
    /// activation — is computed over all predictions the epoch produced and
    /// appended to the error history (batch boundaries also record the
    /// running value). When `testset` is supplied, its error is tracked in
    /// parallel without touching the weights. Training stops early when the
    /// epoch error falls below `until_error`, and rows are reshuffled
    /// between epochs when requested.
    ///
    /// Weights are initialized automatically (strategy `Auto`) when none
    /// are set; the seed used is reported in the summary.
    ///
    /// # Errors
    ///
    /// * `Input` - empty dataset
    /// * Any forward/backward failure is propagated as-is
    pub fn train(
        &mut self,
        dataset: &[Vec<f64>],
        epochs: usize,
        options: &TrainOptions,
        testset: Option<&[Vec<f64>]>,
    ) -> Result<TrainingSummary> {
        let started = Instant::now();

        let mut seed = None;
        if !self.has_weights() || options.reinitialize {
            let (_, s) = self.initialize_weights(InitMethod::Auto, None, None)?;
            seed = Some(s);
        }

        if dataset.is_empty() || dataset[0].is_empty() {
            return Err(NetError::Input("training dataset is empty".to_string()));
        }

        let batch = options.batch.rows();
        let outputs = self.output_indexes(dataset, options.outputs.clone());
        let error_kind = self.error_kind();

        let session = SimpleRng::new(SimpleRng::seed_from_time()).next_u64();
        self.session = Some(TrainingSession {
            session,
            errors: Vec::new(),
            test_errors: Vec::new(),
        });

        let mut shuffle_rng = options
            .shuffle
            .then(|| SimpleRng::new(options.shuffle_seed.unwrap_or_else(SimpleRng::seed_from_time)));

        let mut rows: Vec<Vec<f64>> = dataset.to_vec();
        let row_count = rows.len();

        let mut epochs_run = 0;
        let mut error = 1.0;
        let mut end = false;

        'epochs: for _ in 0..epochs {
            // Flattened predictions and targets of this epoch, for the
            // epoch-level (and batch-boundary) error.
            let mut predicted = Vec::new();
            let mut expected = Vec::new();

            for i in 0..row_count {
                if cancelled(&options.cancel) {
                    log::info!("training cancelled in epoch {}", epochs_run + 1);
                    break 'epochs;
                }

                let (input, target) = split_row(&rows[i], &outputs);

                if let Some(batch_size) = batch {
                    self.apply_input(&input);
                    self.run_forward(None);

                    let boundary = (i != 0 && i % batch_size == 0) || i == row_count - 1;
                    if boundary {
                        self.backward(Some(&target), true)?;
                        self.reset_output_delta();
                    } else {
                        self.accumulate_output_delta(&target)?;
                    }

                    predicted.extend_from_slice(self.last_output());
                    expected.extend_from_slice(&target);

                    if boundary && i < row_count - 1 {
                        error = error_kind.compute(&predicted, &expected);
                        self.record_error(error);
                        if let Some(test) = testset {
                            self.record_test_error(test, &outputs)?;
                        }
                    }
                } else {
                    let out = self.learn(&input, &target)?;
                    predicted.extend_from_slice(&out.values);
                    expected.extend_from_slice(&target);
                }
            }

            epochs_run += 1;

            error = error_kind.compute(&predicted, &expected);
            if error < options.until_error {
                end = true;
            }

            if let Some(test) = testset {
                self.record_test_error(test, &outputs)?;
            }

            if let Some(rng) = shuffle_rng.as_mut() {
                if !end {
                    rng.shuffle(&mut rows);
                }
            }

            self.record_error(error);
            log::debug!("epoch {epochs_run}: {error_kind} = {error}");

            if end {
                break;
            }
        }

        let truth = 1.0 - error;
        let elapsed = started.elapsed();
        log::info!(
            "training finished: {epochs_run} epochs, {error_kind} = {error}, session {session}"
        );

        Ok(TrainingSummary {
            epochs_run,
            error,
            error_kind,
            truth,
            seed,
            session,
            elapsed,
        })
    }

    /// Evaluate the network over a held-out dataset without touching any
    /// weight: one validated forward pass per row, aggregating the per-row
    /// loss into mean, minimum and maximum.
    ///
    /// # Errors
    ///
    /// * `Input` - empty dataset
    /// * Any forward failure aborts the evaluation and is propagated
    pub fn evaluate(
        &mut self,
        dataset: &[Vec<f64>],
        options: &EvalOptions,
    ) -> Result<EvaluationSummary> {
        if dataset.is_empty() || dataset[0].is_empty() {
            return Err(NetError::Input("evaluation dataset is empty".to_string()));
        }

        let outputs = self.output_indexes(dataset, options.outputs.clone());

        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for row in dataset {
            let (input, target) = split_row(row, &outputs);
            let out = self.forward(&input, Some(&target))?;
            let err = out.loss.map(|l| l.value).unwrap_or(0.0);

            sum += err;
            min = min.min(err);
            max = max.max(err);
        }

        Ok(EvaluationSummary {
            error: sum / dataset.len() as f64,
            min,
            max,
            error_kind: self.error_kind(),
        })
    }

    fn record_error(&mut self, error: f64) {
        if let Some(session) = self.session.as_mut() {
            session.errors.push(error);
        }
    }

    fn record_test_error(&mut self, testset: &[Vec<f64>], outputs: &[usize]) -> Result<()> {
        let summary = self.evaluate(
            testset,
            &EvalOptions {
                outputs: Some(outputs.to_vec()),
            },
        )?;
        if let Some(session) = self.session.as_mut() {
            session.test_errors.push(summary.error);
        }
        Ok(())
    }
}

fn cancelled(token: &Option<Arc<AtomicBool>>) -> bool {
    token
        .as_ref()
        .map(|flag| flag.load(Ordering::Relaxed))
        .unwrap_or(false)
}
