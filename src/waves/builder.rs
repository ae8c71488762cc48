//! Wave construction over the pivot sequence
//!
//! Filters the tagged price series down to its pivots and computes lagged
//! swing magnitudes between them. Lags count pivots, not time steps: wave_n at
//! pivot i is the price difference to the pivot n positions earlier in the
//! filtered sequence.

use super::pivots::PivotTag;
use crate::data::PricePoint;
use crate::error::{PipelineError, PipelineResult};

/// A pivot point with its lagged wave columns
///
/// `waves[n - 1]` holds wave_n: `price - price of the pivot n steps back`,
/// or `None` when fewer than n pivots precede this one.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotWave {
    /// Index of this point in the original price series
    pub index: usize,
    /// Timestamp of the underlying price point
    pub timestamp: u64,
    /// Price at the pivot
    pub price: f64,
    /// Lagged waves, lag 1 through the configured maximum
    pub waves: Vec<Option<f64>>,
}

impl PivotWave {
    /// Wave at the given lag (1-based), if defined
    pub fn wave(&self, lag: usize) -> Option<f64> {
        self.waves.get(lag.checked_sub(1)?).copied().flatten()
    }
}

/// Builds the pivot sequence with wave columns up to a maximum lag
#[derive(Debug, Clone)]
pub struct WaveBuilder {
    max_lag: usize,
}

impl WaveBuilder {
    /// Create a builder computing waves for lags `1..=max_lag`
    pub fn new(max_lag: usize) -> PipelineResult<Self> {
        if max_lag < 1 {
            return Err(PipelineError::InvalidWaveLag);
        }
        Ok(Self { max_lag })
    }

    pub fn max_lag(&self) -> usize {
        self.max_lag
    }

    /// Filter to pivot points and attach wave columns.
    ///
    /// `points` and `tags` must be the same length (the detector guarantees
    /// this for its own output).
    pub fn build(&self, points: &[PricePoint], tags: &[PivotTag]) -> Vec<PivotWave> {
        assert_eq!(points.len(), tags.len(), "points and tags must align");

        let pivots: Vec<(usize, &PricePoint)> = points
            .iter()
            .enumerate()
            .filter(|(i, _)| tags[*i].is_pivot())
            .collect();

        pivots
            .iter()
            .enumerate()
            .map(|(i, &(index, point))| {
                let waves = (1..=self.max_lag)
                    .map(|n| {
                        i.checked_sub(n)
                            .map(|prev| point.price - pivots[prev].1.price)
                    })
                    .collect();

                PivotWave {
                    index,
                    timestamp: point.timestamp,
                    price: point.price,
                    waves,
                }
            })
            .collect()
    }
}
