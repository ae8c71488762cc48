//! Pipeline error types

use thiserror::Error;

/// Errors produced by the wave pipeline and the walk-forward evaluator.
///
/// Configuration problems are reported before any data is processed;
/// data problems are reported at the stage boundary where they are detected.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("feature count must be at least 3, got {0}")]
    FeatureCountTooSmall(usize),

    #[error("primary wave lag {lag} exceeds configured max lag {max_lag}")]
    PrimaryWaveOutOfRange { lag: usize, max_lag: usize },

    #[error("wave lag must be at least 1")]
    InvalidWaveLag,

    #[error("train fraction must be in (0, 1), got {0}")]
    InvalidTrainFraction(f64),

    #[error("step size must be at least 1")]
    InvalidStepSize,

    #[error("price series too short: need at least {needed} points, got {got}")]
    TooFewPoints { needed: usize, got: usize },

    #[error("timestamps are not strictly increasing at index {0}")]
    UnorderedTimestamps(usize),

    #[error("non-finite price at index {0}")]
    NonFinitePrice(usize),

    #[error("no usable feature rows remain after dropping undefined rows")]
    NoValidRows,

    #[error("walk-forward has no training rows: {rows} labeled rows with train fraction {train_fraction}")]
    EmptyTrainWindow { rows: usize, train_fraction: f64 },

    #[error("feature column {0:?} not found in table")]
    UnknownColumn(String),
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
