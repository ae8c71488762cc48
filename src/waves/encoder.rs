//! Wave feature encoding
//!
//! Expands a window of recent waves at each pivot into a fixed-width feature
//! vector:
//!
//! - `f1..fN`: the primary wave at this pivot and its N-1 predecessors
//! - `d1..d(N-1)`: absolute differences between consecutive f columns
//! - `pct_1..pct_(N-2)`: symmetric similarity of consecutive distances,
//!   bounded to [0, 100]
//! - `dirpct_1..dirpct_(N-2)`: directional ratio of consecutive distances,
//!   unbounded above
//!
//! Ratios of zero distances are resolved explicitly rather than dividing by
//! zero; any value that cannot be computed leaves the whole row undefined,
//! and undefined rows are dropped.

use super::builder::PivotWave;
use crate::error::{PipelineError, PipelineResult};
use ndarray::Array2;

/// Encoder configuration
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Number of f columns per row (N), minimum 3
    pub num_features: usize,
    /// Which wave lag serves as the primary wave column
    pub primary_wave: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            num_features: 8,
            primary_wave: 1,
        }
    }
}

/// Encoded feature table: fully-defined rows only
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    /// Feature matrix (n_rows x n_columns)
    pub x: Array2<f64>,
    /// Column names in `f`, `d`, `pct_`, `dirpct_` order
    pub feature_names: Vec<String>,
    /// Timestamp of the pivot behind each row
    pub timestamps: Vec<u64>,
    /// Index of each row's pivot in the original price series
    pub pivot_indices: Vec<usize>,
}

impl FeatureTable {
    pub fn n_rows(&self) -> usize {
        self.x.nrows()
    }

    /// Position of a named column
    pub fn column(&self, name: &str) -> PipelineResult<usize> {
        self.feature_names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| PipelineError::UnknownColumn(name.to_string()))
    }
}

/// Symmetric similarity of two distances, in [0, 100].
///
/// Both zero means the distances are equal, hence maximally similar.
pub fn symmetric_pct(a: f64, b: f64) -> Option<f64> {
    let (min, max) = if a <= b { (a, b) } else { (b, a) };
    if max == 0.0 {
        if min == 0.0 {
            Some(100.0)
        } else {
            None
        }
    } else {
        Some(min / max * 100.0)
    }
}

/// Directional ratio `a / b * 100`, preserving which operand dominates.
///
/// Both zero resolves to 100 (equal); a zero denominator alone is undefined.
pub fn directional_pct(a: f64, b: f64) -> Option<f64> {
    if b == 0.0 {
        if a == 0.0 {
            Some(100.0)
        } else {
            None
        }
    } else {
        Some(a / b * 100.0)
    }
}

/// Encodes the pivot sequence into the fixed-width feature table
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    config: EncoderConfig,
}

impl FeatureEncoder {
    /// Create an encoder, validating the configuration up front
    pub fn new(config: EncoderConfig) -> PipelineResult<Self> {
        if config.num_features < 3 {
            return Err(PipelineError::FeatureCountTooSmall(config.num_features));
        }
        if config.primary_wave < 1 {
            return Err(PipelineError::InvalidWaveLag);
        }
        Ok(Self { config })
    }

    /// Column names in table order for a given feature count
    pub fn column_names(num_features: usize) -> Vec<String> {
        let mut names = Vec::with_capacity(4 * num_features - 5);
        for k in 1..=num_features {
            names.push(format!("f{}", k));
        }
        for k in 1..num_features {
            names.push(format!("d{}", k));
        }
        for k in 1..num_features - 1 {
            names.push(format!("pct_{}", k));
        }
        for k in 1..num_features - 1 {
            names.push(format!("dirpct_{}", k));
        }
        names
    }

    /// Encode the pivot sequence.
    ///
    /// Rows whose history is too short to define every column are dropped
    /// whole. An input that leaves no rows at all is an error, so callers can
    /// distinguish "ran fine, zero rows" from "nothing to work with".
    pub fn encode(&self, pivots: &[PivotWave]) -> PipelineResult<FeatureTable> {
        // N f columns, N-1 distances, N-2 of each ratio kind
        let n = self.config.num_features;
        let width = 4 * n - 5;

        let mut data: Vec<f64> = Vec::new();
        let mut timestamps = Vec::new();
        let mut pivot_indices = Vec::new();

        for i in 0..pivots.len() {
            if let Some(row) = self.encode_row(pivots, i) {
                debug_assert_eq!(row.len(), width);
                data.extend_from_slice(&row);
                timestamps.push(pivots[i].timestamp);
                pivot_indices.push(pivots[i].index);
            }
        }

        if timestamps.is_empty() {
            return Err(PipelineError::NoValidRows);
        }

        let x = Array2::from_shape_vec((timestamps.len(), width), data)
            .expect("row width is constant by construction");

        Ok(FeatureTable {
            x,
            feature_names: Self::column_names(n),
            timestamps,
            pivot_indices,
        })
    }

    /// Encode one pivot row, or None if any value is undefined
    fn encode_row(&self, pivots: &[PivotWave], i: usize) -> Option<Vec<f64>> {
        let n = self.config.num_features;
        let lag = self.config.primary_wave;

        // f_k = primary wave shifted back k-1 pivots
        let mut f = Vec::with_capacity(n);
        for k in 1..=n {
            let row = i.checked_sub(k - 1)?;
            f.push(pivots[row].wave(lag)?);
        }

        // d_k = |f_k - f_{k+1}|
        let d: Vec<f64> = f.windows(2).map(|w| (w[0] - w[1]).abs()).collect();

        let mut pct = Vec::with_capacity(n - 2);
        let mut dirpct = Vec::with_capacity(n - 2);
        for w in d.windows(2) {
            pct.push(symmetric_pct(w[0], w[1])?);
            dirpct.push(directional_pct(w[0], w[1])?);
        }

        let mut row = f;
        row.extend(d);
        row.extend(pct);
        row.extend(dirpct);
        Some(row)
    }
}
