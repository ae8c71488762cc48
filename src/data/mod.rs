//! Data structures and utilities for market data

pub mod loader;
pub mod types;

pub use loader::DataLoader;
pub use types::{price_points, Candle, Dataset, PricePoint};
