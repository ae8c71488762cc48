//! Classification metrics
//!
//! Accuracy, precision, recall, F1, and a per-class report over 0/1 label
//! vectors.

use ndarray::Array1;

/// Per-class summary line of a classification report
#[derive(Debug, Clone, PartialEq)]
pub struct ClassReport {
    pub class: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Metrics calculator
pub struct Metrics;

impl Metrics {
    /// Accuracy: correct predictions / total predictions.
    ///
    /// Returns NaN for empty inputs so an empty evaluation window is visible
    /// instead of masquerading as a score.
    pub fn accuracy(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        assert_eq!(y_true.len(), y_pred.len(), "Arrays must have same length");

        if y_true.is_empty() {
            return f64::NAN;
        }

        let correct = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| (*t - *p).abs() < 1e-10)
            .count();

        correct as f64 / y_true.len() as f64
    }

    /// Precision for one class: TP / (TP + FP)
    pub fn precision(y_true: &Array1<f64>, y_pred: &Array1<f64>, positive_class: f64) -> f64 {
        let (tp, fp, _, _) = Self::confusion_values(y_true, y_pred, positive_class);

        if tp + fp == 0 {
            0.0
        } else {
            tp as f64 / (tp + fp) as f64
        }
    }

    /// Recall for one class: TP / (TP + FN)
    pub fn recall(y_true: &Array1<f64>, y_pred: &Array1<f64>, positive_class: f64) -> f64 {
        let (tp, _, fn_, _) = Self::confusion_values(y_true, y_pred, positive_class);

        if tp + fn_ == 0 {
            0.0
        } else {
            tp as f64 / (tp + fn_) as f64
        }
    }

    /// F1 score: harmonic mean of precision and recall
    pub fn f1_score(y_true: &Array1<f64>, y_pred: &Array1<f64>, positive_class: f64) -> f64 {
        let precision = Self::precision(y_true, y_pred, positive_class);
        let recall = Self::recall(y_true, y_pred, positive_class);

        if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        }
    }

    /// (TP, FP, FN, TN) with respect to the given positive class
    fn confusion_values(
        y_true: &Array1<f64>,
        y_pred: &Array1<f64>,
        positive_class: f64,
    ) -> (usize, usize, usize, usize) {
        let mut tp = 0;
        let mut fp = 0;
        let mut fn_ = 0;
        let mut tn = 0;

        for (t, p) in y_true.iter().zip(y_pred.iter()) {
            let is_true_positive = (*t - positive_class).abs() < 1e-10;
            let is_pred_positive = (*p - positive_class).abs() < 1e-10;

            match (is_true_positive, is_pred_positive) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => tn += 1,
            }
        }

        (tp, fp, fn_, tn)
    }

    /// Per-class precision/recall/F1/support over the classes present in
    /// `y_true`
    pub fn classification_report(
        y_true: &Array1<f64>,
        y_pred: &Array1<f64>,
    ) -> Vec<ClassReport> {
        let mut classes: Vec<f64> = y_true.iter().cloned().collect();
        classes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        classes.dedup();

        classes
            .iter()
            .map(|&class| ClassReport {
                class,
                precision: Self::precision(y_true, y_pred, class),
                recall: Self::recall(y_true, y_pred, class),
                f1: Self::f1_score(y_true, y_pred, class),
                support: y_true.iter().filter(|&&t| (t - class).abs() < 1e-10).count(),
            })
            .collect()
    }

    /// Plain-text rendering of a classification report
    pub fn format_report(report: &[ClassReport]) -> String {
        let mut out = format!(
            "{:>8} {:>10} {:>10} {:>10} {:>10}\n",
            "class", "precision", "recall", "f1", "support"
        );
        for line in report {
            out.push_str(&format!(
                "{:>8.0} {:>10.3} {:>10.3} {:>10.3} {:>10}\n",
                line.class, line.precision, line.recall, line.f1, line.support
            ));
        }
        out
    }
}
