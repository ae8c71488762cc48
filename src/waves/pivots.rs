//! Local extremum (pivot) detection
//!
//! Tags every point of a price series as a local maximum, local minimum, or
//! neither. Only strict inequalities count: a point equal to a neighbour is
//! never a pivot, and the first and last points are never pivots.

use crate::data::PricePoint;
use crate::error::{PipelineError, PipelineResult};

/// Pivot classification for a single price point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotTag {
    /// Local maximum: strictly above both neighbours
    Max,
    /// Local minimum: strictly below both neighbours
    Min,
    /// Not a pivot
    None,
}

impl PivotTag {
    /// Whether this point is a pivot of either kind
    pub fn is_pivot(&self) -> bool {
        !matches!(self, PivotTag::None)
    }
}

/// Pivot detector over an ordered price series
pub struct PivotDetector;

impl PivotDetector {
    /// Tag every point of the series.
    ///
    /// Rejects series shorter than 3 points, series whose timestamps are not
    /// strictly increasing, and series containing non-finite prices. A valid
    /// series always yields a same-length tag sequence whose first and last
    /// entries are [`PivotTag::None`].
    pub fn detect(points: &[PricePoint]) -> PipelineResult<Vec<PivotTag>> {
        Self::validate(points)?;

        let mut tags = vec![PivotTag::None; points.len()];

        for i in 1..points.len() - 1 {
            let (prev, here, next) = (points[i - 1].price, points[i].price, points[i + 1].price);
            if here > prev && here > next {
                tags[i] = PivotTag::Max;
            } else if here < prev && here < next {
                tags[i] = PivotTag::Min;
            }
        }

        Ok(tags)
    }

    /// Boundary validation: length, timestamp order, finite prices
    fn validate(points: &[PricePoint]) -> PipelineResult<()> {
        if points.len() < 3 {
            return Err(PipelineError::TooFewPoints {
                needed: 3,
                got: points.len(),
            });
        }

        for (i, point) in points.iter().enumerate() {
            if !point.price.is_finite() {
                return Err(PipelineError::NonFinitePrice(i));
            }
            if i > 0 && point.timestamp <= points[i - 1].timestamp {
                return Err(PipelineError::UnorderedTimestamps(i));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(i as u64 * 1000, p))
            .collect()
    }

    #[test]
    fn test_detect_known_sequence() {
        // [1,3,2,5,1,4]: every interior point is a strict extremum against
        // its own neighbours, so tags alternate Max/Min
        let tags = PivotDetector::detect(&series(&[1.0, 3.0, 2.0, 5.0, 1.0, 4.0])).unwrap();
        assert_eq!(
            tags,
            vec![
                PivotTag::None,
                PivotTag::Max,
                PivotTag::Min,
                PivotTag::Max,
                PivotTag::Min,
                PivotTag::None,
            ]
        );
    }

    #[test]
    fn test_boundaries_never_pivot() {
        let tags = PivotDetector::detect(&series(&[5.0, 1.0, 5.0, 1.0, 5.0])).unwrap();
        assert_eq!(tags.first(), Some(&PivotTag::None));
        assert_eq!(tags.last(), Some(&PivotTag::None));
        assert_eq!(tags.len(), 5);
    }

    #[test]
    fn test_ties_are_not_pivots() {
        // Plateau at 3.0: equality with a neighbour disqualifies the point
        let tags = PivotDetector::detect(&series(&[1.0, 3.0, 3.0, 1.0])).unwrap();
        assert!(tags.iter().all(|t| !t.is_pivot()));
    }

    #[test]
    fn test_monotonic_series_has_no_pivots() {
        let tags = PivotDetector::detect(&series(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        assert!(tags.iter().all(|t| *t == PivotTag::None));
    }

    #[test]
    fn test_too_short_rejected() {
        let err = PivotDetector::detect(&series(&[1.0, 2.0])).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::TooFewPoints { needed: 3, got: 2 }
        ));
    }

    #[test]
    fn test_nan_price_rejected() {
        let mut points = series(&[1.0, 2.0, 3.0]);
        points[1].price = f64::NAN;
        let err = PivotDetector::detect(&points).unwrap_err();
        assert!(matches!(err, PipelineError::NonFinitePrice(1)));
    }

    #[test]
    fn test_unordered_timestamps_rejected() {
        let mut points = series(&[1.0, 2.0, 1.0]);
        points[2].timestamp = points[1].timestamp;
        let err = PivotDetector::detect(&points).unwrap_err();
        assert!(matches!(err, PipelineError::UnorderedTimestamps(2)));
    }
}
