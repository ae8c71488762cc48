//! Backtest seam
//!
//! The execution harness (broker simulation, portfolio accounting) lives
//! outside this crate. The contract surface is small: the encoded feature
//! table with its `f`/`d`/`pct_`/`dirpct_` column names, a fitted
//! [`Classifier`], and a [`DecisionSink`] receiving one decision per row.
//!
//! Decisions follow the alternating scheme the model was validated under:
//! when flat, a predicted 1 opens a long and a predicted 0 opens a short;
//! any prediction while a position is open closes it.

use crate::data::Dataset;
use crate::error::{PipelineError, PipelineResult};
use crate::ml::Classifier;
use ndarray::s;
use serde::{Deserialize, Serialize};

/// Trading decision emitted per feature row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Buy,
    Sell,
    Close,
}

/// External consumer of the decision stream
pub trait DecisionSink {
    /// Called once per feature row, in chronological order
    fn on_decision(&mut self, timestamp: u64, prediction: f64, decision: Decision);
}

/// Sink that records every decision; handy for tests and dry runs
#[derive(Debug, Default)]
pub struct DecisionLog {
    pub entries: Vec<(u64, f64, Decision)>,
}

impl DecisionSink for DecisionLog {
    fn on_decision(&mut self, timestamp: u64, prediction: f64, decision: Decision) {
        self.entries.push((timestamp, prediction, decision));
    }
}

/// Walks the feature table row by row, predicting and emitting decisions
#[derive(Debug, Clone)]
pub struct SignalDriver {
    feature_prefixes: Vec<String>,
}

impl Default for SignalDriver {
    fn default() -> Self {
        // The model was originally driven off the f columns only
        Self::with_prefixes(&["f"])
    }
}

impl SignalDriver {
    /// Driver using the feature columns matching the given name prefixes
    pub fn with_prefixes(prefixes: &[&str]) -> Self {
        Self {
            feature_prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Run the fitted model over every row and stream decisions to the sink
    pub fn run<C, S>(&self, dataset: &Dataset, model: &C, sink: &mut S) -> PipelineResult<()>
    where
        C: Classifier,
        S: DecisionSink,
    {
        let features = self.feature_view(dataset)?;
        let mut in_position = false;

        for i in 0..features.n_samples() {
            let row = features.x.slice(s![i..i + 1, ..]).to_owned();
            let prediction = model.predict(&row)[0];

            let decision = if in_position {
                in_position = false;
                Decision::Close
            } else {
                in_position = true;
                if prediction > 0.5 {
                    Decision::Buy
                } else {
                    Decision::Sell
                }
            };

            sink.on_decision(features.timestamps[i], prediction, decision);
        }

        Ok(())
    }

    /// The column subset this driver feeds the model.
    ///
    /// A model replayed by this driver must have been fitted on the same
    /// subset, so the training side calls this too.
    pub fn feature_view(&self, dataset: &Dataset) -> PipelineResult<Dataset> {
        let prefixes: Vec<&str> = self.feature_prefixes.iter().map(String::as_str).collect();
        let columns = dataset.columns_with_prefix(&prefixes);
        if columns.is_empty() {
            return Err(PipelineError::UnknownColumn(self.feature_prefixes.join(",")));
        }
        Ok(dataset.select_features(&columns))
    }
}
