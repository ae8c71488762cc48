//! Data loading and saving utilities
//!
//! Load and save candle series to/from CSV and JSON files so the pipeline
//! can run offline from previously fetched data.

use super::types::Candle;
use anyhow::{Context, Result};
use csv::{Reader, Writer};
use std::fs::File;
use std::path::Path;

/// Data loader for candle files
pub struct DataLoader;

impl DataLoader {
    /// Load candles from a CSV file
    pub fn load_candles<P: AsRef<Path>>(path: P) -> Result<Vec<Candle>> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open file: {:?}", path.as_ref()))?;

        let mut reader = Reader::from_reader(file);
        let mut candles = Vec::new();

        for result in reader.deserialize() {
            let candle: Candle = result.context("Failed to parse candle")?;
            candles.push(candle);
        }

        // Sort by timestamp
        candles.sort_by_key(|c| c.timestamp);

        Ok(candles)
    }

    /// Save candles to a CSV file
    pub fn save_candles<P: AsRef<Path>>(candles: &[Candle], path: P) -> Result<()> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create file: {:?}", path.as_ref()))?;

        let mut writer = Writer::from_writer(file);

        for candle in candles {
            writer.serialize(candle)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Load candles from a JSON file
    pub fn load_candles_json<P: AsRef<Path>>(path: P) -> Result<Vec<Candle>> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open file: {:?}", path.as_ref()))?;

        let mut candles: Vec<Candle> = serde_json::from_reader(file)?;
        candles.sort_by_key(|c| c.timestamp);
        Ok(candles)
    }

    /// Save candles to a JSON file
    pub fn save_candles_json<P: AsRef<Path>>(candles: &[Candle], path: P) -> Result<()> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create file: {:?}", path.as_ref()))?;

        serde_json::to_writer_pretty(file, candles)?;
        Ok(())
    }
}
