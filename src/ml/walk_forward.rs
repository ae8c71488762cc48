//! Walk-forward (expanding window) validation
//!
//! Splits the labeled table chronologically: the first `train_fraction` of
//! rows seed the training window, each fold fits a fresh model on everything
//! before `train_end` and predicts the next `step_size` rows, then the window
//! grows by `step_size`. Rows are never shuffled; a fold's model never sees a
//! row at or past its own `train_end`.

use super::classifier::Classifier;
use super::metrics::Metrics;
use crate::data::Dataset;
use crate::error::{PipelineError, PipelineResult};
use ndarray::Array1;
use tracing::info;

/// Walk-forward configuration
#[derive(Debug, Clone)]
pub struct WalkForwardConfig {
    /// Fraction of rows forming the initial training window, in (0, 1)
    pub train_fraction: f64,
    /// Rows advanced (and predicted) per fold, minimum 1
    pub step_size: usize,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        Self {
            train_fraction: 0.7,
            step_size: 10,
        }
    }
}

impl WalkForwardConfig {
    /// Fail-fast validation, before any fold executes
    pub fn validate(&self) -> PipelineResult<()> {
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(PipelineError::InvalidTrainFraction(self.train_fraction));
        }
        if self.step_size < 1 {
            return Err(PipelineError::InvalidStepSize);
        }
        Ok(())
    }
}

/// Accuracy of one fold, keyed by the training-window end at fold time
#[derive(Debug, Clone, PartialEq)]
pub struct FoldScore {
    pub train_end: usize,
    pub accuracy: f64,
}

/// Aggregated walk-forward results
#[derive(Debug, Clone)]
pub struct WalkForwardReport {
    /// Ground truth for every test row, in chronological fold order
    pub y_true: Array1<f64>,
    /// Predictions aligned with `y_true`
    pub y_pred: Array1<f64>,
    /// Per-fold accuracies
    pub folds: Vec<FoldScore>,
    /// Accuracy over the full concatenated prediction/truth arrays
    pub overall_accuracy: f64,
    /// `train_end` of the first fold
    pub initial_train_end: usize,
}

/// Drives the expanding-window train/predict loop
#[derive(Debug, Clone)]
pub struct WalkForwardEvaluator {
    config: WalkForwardConfig,
}

impl WalkForwardEvaluator {
    /// Create an evaluator; invalid configuration fails here, not mid-loop
    pub fn new(config: WalkForwardConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the loop over the labeled table.
    ///
    /// `make_model` builds a fresh classifier for each fold so no fitted
    /// state leaks between folds. The concatenated output covers exactly the
    /// rows `[initial_train_end, n)`.
    pub fn evaluate<C, F>(&self, dataset: &Dataset, make_model: F) -> PipelineResult<WalkForwardReport>
    where
        C: Classifier,
        F: Fn() -> C,
    {
        let n = dataset.n_samples();
        let initial_train_end = (n as f64 * self.config.train_fraction).floor() as usize;

        if initial_train_end == 0 {
            return Err(PipelineError::EmptyTrainWindow {
                rows: n,
                train_fraction: self.config.train_fraction,
            });
        }

        let mut y_true: Vec<f64> = Vec::with_capacity(n - initial_train_end);
        let mut y_pred: Vec<f64> = Vec::with_capacity(n - initial_train_end);
        let mut folds = Vec::new();

        let mut train_end = initial_train_end;
        while train_end < n {
            let test_end = (train_end + self.config.step_size).min(n);

            let (x_train, y_train) = dataset.rows(0, train_end);
            let (x_test, y_test) = dataset.rows(train_end, test_end);

            let mut model = make_model();
            model.fit(&x_train, &y_train);
            let pred = model.predict(&x_test);

            // Guarded even though the loop condition keeps test sets
            // non-empty: an empty fold reports NaN, never a fake score.
            let accuracy = Metrics::accuracy(&y_test, &pred);
            info!(train_end, accuracy, "walk-forward fold");

            y_true.extend(y_test.iter());
            y_pred.extend(pred.iter());
            folds.push(FoldScore {
                train_end,
                accuracy,
            });

            train_end += self.config.step_size;
        }

        let y_true = Array1::from_vec(y_true);
        let y_pred = Array1::from_vec(y_pred);
        let overall_accuracy = Metrics::accuracy(&y_true, &y_pred);

        Ok(WalkForwardReport {
            y_true,
            y_pred,
            folds,
            overall_accuracy,
            initial_train_end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::classifier::MajorityClassifier;
    use ndarray::Array2;
    use std::cell::RefCell;

    fn dataset(n: usize) -> Dataset {
        let x = Array2::from_shape_fn((n, 2), |(i, j)| (i * 2 + j) as f64);
        let y = Array1::from_shape_fn(n, |i| (i % 2) as f64);
        Dataset::new(
            x,
            y,
            vec!["f1".to_string(), "f2".to_string()],
            "f1_dir".to_string(),
            (0..n as u64).map(|i| i * 1000).collect(),
        )
    }

    /// Classifier that records the training sizes it was fitted with
    struct Probe<'a> {
        seen: &'a RefCell<Vec<usize>>,
    }

    impl Classifier for Probe<'_> {
        fn fit(&mut self, x: &Array2<f64>, _y: &Array1<f64>) {
            self.seen.borrow_mut().push(x.nrows());
        }

        fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
            Array1::zeros(x.nrows())
        }
    }

    #[test]
    fn test_fold_layout_100_rows() {
        let data = dataset(100);
        let evaluator = WalkForwardEvaluator::new(WalkForwardConfig::default()).unwrap();

        let report = evaluator
            .evaluate(&data, MajorityClassifier::default)
            .unwrap();

        assert_eq!(report.initial_train_end, 70);
        assert_eq!(report.folds.len(), 3);
        let train_ends: Vec<usize> = report.folds.iter().map(|f| f.train_end).collect();
        assert_eq!(train_ends, vec![70, 80, 90]);
        assert_eq!(report.y_pred.len(), 30);
        assert_eq!(report.y_true.len(), 30);
    }

    #[test]
    fn test_never_trains_past_train_end() {
        let data = dataset(50);
        let seen = RefCell::new(Vec::new());
        let evaluator = WalkForwardEvaluator::new(WalkForwardConfig {
            train_fraction: 0.6,
            step_size: 7,
        })
        .unwrap();

        evaluator.evaluate(&data, || Probe { seen: &seen }).unwrap();

        // Initial window is 30 rows; each fold trains on exactly the rows
        // before its own train_end.
        assert_eq!(*seen.borrow(), vec![30, 37, 44]);
    }

    #[test]
    fn test_truth_order_is_chronological() {
        let data = dataset(20);
        let evaluator = WalkForwardEvaluator::new(WalkForwardConfig {
            train_fraction: 0.5,
            step_size: 3,
        })
        .unwrap();

        let report = evaluator
            .evaluate(&data, MajorityClassifier::default)
            .unwrap();

        // Labels alternate 0/1 by construction; the concatenation picks up
        // exactly rows [10, 20) in order.
        let expected: Vec<f64> = (10..20).map(|i| (i % 2) as f64).collect();
        assert_eq!(report.y_true, Array1::from_vec(expected));
    }

    #[test]
    fn test_partial_final_fold() {
        let data = dataset(25);
        let evaluator = WalkForwardEvaluator::new(WalkForwardConfig {
            train_fraction: 0.7,
            step_size: 10,
        })
        .unwrap();

        let report = evaluator
            .evaluate(&data, MajorityClassifier::default)
            .unwrap();

        // train_end starts at 17; one fold of 8 rows, no duplicates
        assert_eq!(report.initial_train_end, 17);
        assert_eq!(report.folds.len(), 1);
        assert_eq!(report.y_pred.len(), 8);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        assert!(matches!(
            WalkForwardEvaluator::new(WalkForwardConfig {
                train_fraction: 0.0,
                step_size: 10,
            })
            .unwrap_err(),
            PipelineError::InvalidTrainFraction(_)
        ));
        assert!(matches!(
            WalkForwardEvaluator::new(WalkForwardConfig {
                train_fraction: 1.0,
                step_size: 10,
            })
            .unwrap_err(),
            PipelineError::InvalidTrainFraction(_)
        ));
        assert!(matches!(
            WalkForwardEvaluator::new(WalkForwardConfig {
                train_fraction: 0.7,
                step_size: 0,
            })
            .unwrap_err(),
            PipelineError::InvalidStepSize
        ));
    }

    #[test]
    fn test_tiny_table_rejected() {
        let data = dataset(1);
        let evaluator = WalkForwardEvaluator::new(WalkForwardConfig::default()).unwrap();
        let err = evaluator
            .evaluate(&data, MajorityClassifier::default)
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyTrainWindow { .. }));
    }
}
