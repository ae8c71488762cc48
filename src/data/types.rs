//! Core data types
//!
//! - Candle: OHLCV candlestick data as supplied by the exchange
//! - PricePoint: the {timestamp, close} slice of a candle the pipeline consumes
//! - Dataset: labeled feature table for model fitting and evaluation

use chrono::{DateTime, TimeZone, Utc};
use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};

/// OHLCV candlestick data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    /// Unix timestamp in milliseconds
    pub timestamp: u64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume (base currency)
    pub volume: f64,
}

impl Candle {
    /// Get the candle's datetime
    pub fn datetime(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp as i64)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// The close-price view the wave pipeline operates on
    pub fn price_point(&self) -> PricePoint {
        PricePoint {
            timestamp: self.timestamp,
            price: self.close,
        }
    }
}

/// A single observation of the price series: timestamp plus close price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix timestamp in milliseconds
    pub timestamp: u64,
    /// Price at this timestamp
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: u64, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Get the point's datetime
    pub fn datetime(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp as i64)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Extract the price-point sequence from a candle series
pub fn price_points(candles: &[Candle]) -> Vec<PricePoint> {
    candles.iter().map(Candle::price_point).collect()
}

/// Labeled dataset for machine learning
///
/// Contains feature matrix X, target vector y, and the column naming that
/// forms the contract with downstream consumers.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Feature matrix (n_samples x n_features)
    pub x: Array2<f64>,
    /// Target vector (n_samples)
    pub y: Array1<f64>,
    /// Feature names
    pub feature_names: Vec<String>,
    /// Target name
    pub target_name: String,
    /// Timestamp of the pivot each row was built at
    pub timestamps: Vec<u64>,
}

impl Dataset {
    /// Create a new dataset
    pub fn new(
        x: Array2<f64>,
        y: Array1<f64>,
        feature_names: Vec<String>,
        target_name: String,
        timestamps: Vec<u64>,
    ) -> Self {
        assert_eq!(x.nrows(), y.len(), "X rows must match y length");
        assert_eq!(x.nrows(), timestamps.len(), "X rows must match timestamps");
        assert_eq!(x.ncols(), feature_names.len(), "X cols must match names");
        Self {
            x,
            y,
            feature_names,
            target_name,
            timestamps,
        }
    }

    /// Get number of samples
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    /// Get number of features
    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Feature matrix and labels for a row range `[start, end)`
    pub fn rows(&self, start: usize, end: usize) -> (Array2<f64>, Array1<f64>) {
        (
            self.x.slice(s![start..end, ..]).to_owned(),
            self.y.slice(s![start..end]).to_owned(),
        )
    }

    /// Column indices whose names start with any of the given prefixes
    pub fn columns_with_prefix(&self, prefixes: &[&str]) -> Vec<usize> {
        self.feature_names
            .iter()
            .enumerate()
            .filter(|(_, name)| prefixes.iter().any(|p| name.starts_with(p)))
            .map(|(i, _)| i)
            .collect()
    }

    /// Restrict the dataset to a subset of feature columns
    pub fn select_features(&self, indices: &[usize]) -> Dataset {
        let x_new = self.x.select(ndarray::Axis(1), indices);
        let feature_names: Vec<String> = indices
            .iter()
            .map(|&i| self.feature_names[i].clone())
            .collect();

        Dataset::new(
            x_new,
            self.y.clone(),
            feature_names,
            self.target_name.clone(),
            self.timestamps.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample_dataset() -> Dataset {
        let x = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0], [7.0, 8.0]];
        let y = array![0.0, 1.0, 0.0, 1.0];
        Dataset::new(
            x,
            y,
            vec!["f1".to_string(), "d1".to_string()],
            "f1_dir".to_string(),
            vec![100, 200, 300, 400],
        )
    }

    #[test]
    fn test_candle_price_point() {
        let candle = Candle {
            timestamp: 1000,
            open: 100.0,
            high: 110.0,
            low: 95.0,
            close: 105.0,
            volume: 1000.0,
        };
        let point = candle.price_point();
        assert_eq!(point.timestamp, 1000);
        assert_eq!(point.price, 105.0);
    }

    #[test]
    fn test_dataset_rows() {
        let dataset = sample_dataset();
        let (x, y) = dataset.rows(1, 3);
        assert_eq!(x.nrows(), 2);
        assert_eq!(x[[0, 0]], 3.0);
        assert_eq!(y[0], 1.0);
    }

    #[test]
    fn test_columns_with_prefix() {
        let dataset = sample_dataset();
        assert_eq!(dataset.columns_with_prefix(&["f"]), vec![0]);
        assert_eq!(dataset.columns_with_prefix(&["f", "d"]), vec![0, 1]);
    }

    #[test]
    fn test_select_features() {
        let dataset = sample_dataset();
        let subset = dataset.select_features(&[1]);
        assert_eq!(subset.n_features(), 1);
        assert_eq!(subset.feature_names, vec!["d1".to_string()]);
        assert_eq!(subset.x[[0, 0]], 2.0);
    }
}
