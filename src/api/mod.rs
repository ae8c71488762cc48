//! API modules for the exchange data source

pub mod binance;
pub mod error;

pub use binance::BinanceClient;
pub use error::ApiError;
