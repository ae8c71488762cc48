//! Binance exchange API client
//!
//! Fetches public market data (no API keys required):
//! - Kline (candlestick) data
//!
//! # Example
//!
//! ```rust,no_run
//! use wave_ml::api::BinanceClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = BinanceClient::new();
//!     let candles = client.get_klines("BTCUSDT", "1h", 1000).await.unwrap();
//!     println!("Got {} candles", candles.len());
//! }
//! ```

use super::error::{ApiError, ApiResult};
use crate::data::types::Candle;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Binance API base URL
const BASE_URL: &str = "https://api.binance.com";

/// Maximum klines per request allowed by the endpoint
const MAX_LIMIT: usize = 1000;

/// Binance API client for fetching market data
#[derive(Debug, Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

/// Error body returned by Binance on failed requests
#[derive(Debug, Deserialize)]
struct BinanceError {
    code: i64,
    msg: String,
}

/// Available kline intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Min1,
    Min5,
    Min15,
    Min30,
    Hour1,
    Hour4,
    Hour12,
    Day1,
    Week1,
}

impl Interval {
    /// Convert interval to API string
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Min1 => "1m",
            Interval::Min5 => "5m",
            Interval::Min15 => "15m",
            Interval::Min30 => "30m",
            Interval::Hour1 => "1h",
            Interval::Hour4 => "4h",
            Interval::Hour12 => "12h",
            Interval::Day1 => "1d",
            Interval::Week1 => "1w",
        }
    }

    /// Parse interval from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "1m" | "1min" => Some(Interval::Min1),
            "5m" | "5min" => Some(Interval::Min5),
            "15m" | "15min" => Some(Interval::Min15),
            "30m" | "30min" => Some(Interval::Min30),
            "1h" | "1hour" => Some(Interval::Hour1),
            "4h" | "4hour" => Some(Interval::Hour4),
            "12h" | "12hour" => Some(Interval::Hour12),
            "1d" | "day" => Some(Interval::Day1),
            "1w" | "week" => Some(Interval::Week1),
            _ => None,
        }
    }
}

impl Default for BinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BinanceClient {
    /// Create a new Binance client with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Create a client with a custom base URL (for the testnet)
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
        }
    }

    /// Fetch kline (candlestick) data
    ///
    /// # Arguments
    ///
    /// * `symbol` - Trading pair symbol (e.g., "BTCUSDT")
    /// * `interval` - Kline interval (e.g., "1h", "4h", "1d")
    /// * `limit` - Number of candles to fetch (max 1000)
    ///
    /// # Returns
    ///
    /// Vector of candles sorted by time (oldest first)
    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> ApiResult<Vec<Candle>> {
        let interval_enum = Interval::parse(interval)
            .ok_or_else(|| ApiError::InvalidInterval(interval.to_string()))?;

        let url = format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url,
            symbol.to_uppercase(),
            interval_enum.as_str(),
            limit.min(MAX_LIMIT)
        );

        let body: Value = self.client.get(&url).send().await?.json().await?;

        // Failed requests come back as an object with code/msg
        if body.is_object() {
            let err: BinanceError = serde_json::from_value(body)?;
            return Err(ApiError::ApiResponseError {
                code: err.code,
                message: err.msg,
            });
        }

        let rows = body.as_array().ok_or(ApiError::MalformedKline)?;
        let mut candles = Vec::with_capacity(rows.len());

        for row in rows {
            candles.push(Self::parse_kline(row)?);
        }

        if candles.is_empty() {
            return Err(ApiError::NoData);
        }

        // Sort by timestamp (oldest first)
        candles.sort_by_key(|c| c.timestamp);

        Ok(candles)
    }

    /// Parse one kline entry:
    /// `[open_time, open, high, low, close, volume, close_time, ...]`
    /// where prices and volume arrive as strings.
    fn parse_kline(row: &Value) -> ApiResult<Candle> {
        let fields = row.as_array().ok_or(ApiError::MalformedKline)?;
        if fields.len() < 6 {
            return Err(ApiError::MalformedKline);
        }

        let timestamp = fields[0].as_u64().ok_or(ApiError::MalformedKline)?;
        let parse_price = |v: &Value| -> ApiResult<f64> {
            v.as_str()
                .and_then(|s| s.parse().ok())
                .ok_or(ApiError::MalformedKline)
        };

        Ok(Candle {
            timestamp,
            open: parse_price(&fields[1])?,
            high: parse_price(&fields[2])?,
            low: parse_price(&fields[3])?,
            close: parse_price(&fields[4])?,
            volume: parse_price(&fields[5])?,
        })
    }
}
