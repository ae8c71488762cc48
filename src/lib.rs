//! # wave_ml - Pivot-wave features and walk-forward validation
//!
//! Turns a raw price series into a labeled feature table and measures how
//! well a classifier predicts the direction of the next price swing:
//!
//! - Pivot detection: tag local extrema of the close-price series
//! - Wave construction: lagged price differences between successive pivots
//! - Feature encoding: fixed-width vectors of waves, inter-wave distances,
//!   and distance-similarity ratios
//! - Labeling: next swing's direction as the binary target
//! - Walk-forward evaluation: expanding-window train/predict over the table
//!
//! Fetching market data, model persistence, and the backtest harness sit at
//! the edges ([`api`], [`ml::RandomForest`] serialization, [`backtest`]);
//! everything between is pure and deterministic.

pub mod api;
pub mod backtest;
pub mod data;
pub mod error;
pub mod ml;
pub mod waves;

pub use api::BinanceClient;
pub use backtest::{Decision, DecisionSink, SignalDriver};
pub use data::{Candle, Dataset, PricePoint};
pub use error::{PipelineError, PipelineResult};
pub use ml::{Classifier, Metrics, RandomForest, WalkForwardConfig, WalkForwardEvaluator};
pub use waves::{PivotDetector, PivotTag, WaveConfig, WavePipeline};
