//! Minimal classifier interface
//!
//! The walk-forward evaluator and the signal driver only ever need fit and
//! predict, so the model is kept behind this trait and concrete
//! implementations (or test fakes) are substituted freely.

use ndarray::{Array1, Array2};

/// A binary classifier over a numeric feature matrix.
///
/// Labels are 0.0 / 1.0. Implementations with internal randomness must be
/// seeded so that identical inputs yield identical predictions across runs.
pub trait Classifier {
    /// Fit the model on the given samples
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>);

    /// Predict a label for every row of `x`
    fn predict(&self, x: &Array2<f64>) -> Array1<f64>;
}

/// Trivial classifier predicting the majority class of its training labels.
///
/// Useful as a baseline and as a stand-in model in tests.
#[derive(Debug, Clone, Default)]
pub struct MajorityClassifier {
    majority: f64,
}

impl Classifier for MajorityClassifier {
    fn fit(&mut self, _x: &Array2<f64>, y: &Array1<f64>) {
        let positives = y.iter().filter(|&&v| v > 0.5).count();
        self.majority = if positives * 2 > y.len() { 1.0 } else { 0.0 };
    }

    fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        Array1::from_elem(x.nrows(), self.majority)
    }
}
