//! Pivot-wave feature pipeline
//!
//! Raw price series -> pivot tags -> pivot waves -> encoded feature table ->
//! labeled dataset. Each stage is a pure function over its input; the
//! [`WavePipeline`] composes them.

pub mod builder;
pub mod encoder;
pub mod labels;
pub mod pivots;

pub use builder::{PivotWave, WaveBuilder};
pub use encoder::{EncoderConfig, FeatureEncoder, FeatureTable};
pub use labels::{LabelBuilder, TARGET_NAME};
pub use pivots::{PivotDetector, PivotTag};

use crate::data::{Dataset, PricePoint};
use crate::error::{PipelineError, PipelineResult};

/// Configuration for the whole wave pipeline
#[derive(Debug, Clone)]
pub struct WaveConfig {
    /// Number of f columns per feature row (N), minimum 3
    pub num_features: usize,
    /// Highest wave lag the builder computes
    pub max_lag: usize,
    /// Lag of the wave column the encoder expands, must not exceed `max_lag`
    pub primary_wave: usize,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            num_features: 8,
            max_lag: 1,
            primary_wave: 1,
        }
    }
}

/// Composed pipeline from price points to a labeled feature dataset
#[derive(Debug, Clone)]
pub struct WavePipeline {
    builder: WaveBuilder,
    encoder: FeatureEncoder,
}

impl WavePipeline {
    /// Create a pipeline, validating all configuration before any data flows
    pub fn new(config: WaveConfig) -> PipelineResult<Self> {
        if config.primary_wave > config.max_lag {
            return Err(PipelineError::PrimaryWaveOutOfRange {
                lag: config.primary_wave,
                max_lag: config.max_lag,
            });
        }

        Ok(Self {
            builder: WaveBuilder::new(config.max_lag)?,
            encoder: FeatureEncoder::new(EncoderConfig {
                num_features: config.num_features,
                primary_wave: config.primary_wave,
            })?,
        })
    }

    /// Detect pivots, build waves, and encode features without labeling
    pub fn encode(&self, points: &[PricePoint]) -> PipelineResult<FeatureTable> {
        let tags = PivotDetector::detect(points)?;
        let pivots = self.builder.build(points, &tags);
        self.encoder.encode(&pivots)
    }

    /// Full run: encoded table plus the direction target
    pub fn run(&self, points: &[PricePoint]) -> PipelineResult<Dataset> {
        LabelBuilder::attach(self.encode(points)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Zigzag with slightly varying amplitudes so every interior point is a
    /// pivot and all ratio branches stay defined.
    fn zigzag(n: usize) -> Vec<PricePoint> {
        (0..n)
            .map(|i| {
                let swing = if i % 2 == 0 { 10.0 } else { -10.0 };
                let drift = (i as f64) * 0.1;
                PricePoint::new(i as u64 * 60_000, 100.0 + swing + drift)
            })
            .collect()
    }

    #[test]
    fn test_pipeline_end_to_end() {
        let points = zigzag(40);
        let pipeline = WavePipeline::new(WaveConfig::default()).unwrap();

        let dataset = pipeline.run(&points).unwrap();
        assert!(dataset.n_samples() > 0);
        // 8 f + 7 d + 6 pct + 6 dirpct
        assert_eq!(dataset.n_features(), 27);
        assert_eq!(dataset.target_name, TARGET_NAME);
        assert_eq!(dataset.feature_names[0], "f1");
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let points = zigzag(40);
        let pipeline = WavePipeline::new(WaveConfig::default()).unwrap();

        let first = pipeline.encode(&points).unwrap();
        let second = pipeline.encode(&points).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_primary_wave_must_fit_max_lag() {
        let err = WavePipeline::new(WaveConfig {
            num_features: 8,
            max_lag: 1,
            primary_wave: 2,
        })
        .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::PrimaryWaveOutOfRange { lag: 2, max_lag: 1 }
        ));
    }

    #[test]
    fn test_pipeline_feeds_walk_forward() {
        use crate::ml::{ForestConfig, RandomForest, WalkForwardConfig, WalkForwardEvaluator};

        let points = zigzag(120);
        let pipeline = WavePipeline::new(WaveConfig::default()).unwrap();
        let dataset = pipeline.run(&points).unwrap();

        let evaluator = WalkForwardEvaluator::new(WalkForwardConfig::default()).unwrap();
        let report = evaluator
            .evaluate(&dataset, || {
                RandomForest::new(ForestConfig {
                    n_trees: 5,
                    ..Default::default()
                })
            })
            .unwrap();

        assert_eq!(
            report.y_pred.len(),
            dataset.n_samples() - report.initial_train_end
        );
        assert!(!report.folds.is_empty());
    }

    #[test]
    fn test_trendless_series_is_insufficient() {
        // Monotonic prices produce no pivots at all
        let points: Vec<PricePoint> = (0..30)
            .map(|i| PricePoint::new(i as u64 * 1000, i as f64))
            .collect();
        let pipeline = WavePipeline::new(WaveConfig::default()).unwrap();

        let err = pipeline.run(&points).unwrap_err();
        assert!(matches!(err, PipelineError::NoValidRows));
    }
}
