//! wave_ml - pivot-wave feature extraction and walk-forward validation
//!
//! ```bash
//! cargo run -- fetch --symbol BTCUSDT --interval 1h --limit 1000 --output btc.csv
//! cargo run -- evaluate --data btc.csv --model-out rf_model.json
//! cargo run -- signals --data btc.csv --model rf_model.json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use wave_ml::api::BinanceClient;
use wave_ml::backtest::{Decision, DecisionLog, SignalDriver};
use wave_ml::data::{price_points, Candle, DataLoader};
use wave_ml::ml::{
    Classifier, ForestConfig, Metrics, RandomForest, WalkForwardConfig, WalkForwardEvaluator,
};
use wave_ml::waves::{WaveConfig, WavePipeline};

#[derive(Parser)]
#[command(name = "wave_ml")]
#[command(about = "Pivot-wave features and walk-forward model validation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch candles from Binance
    Fetch {
        /// Trading symbol (e.g., BTCUSDT)
        #[arg(short, long, default_value = "BTCUSDT")]
        symbol: String,

        /// Kline interval (e.g., 1m, 5m, 1h, 1d)
        #[arg(short, long, default_value = "1h")]
        interval: String,

        /// Number of candles to fetch
        #[arg(short, long, default_value = "1000")]
        limit: usize,

        /// Output file path (CSV)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build wave features, run walk-forward validation, fit and save the
    /// final model
    Evaluate {
        /// Path to candle data CSV (fetches live data when omitted)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Number of f columns per feature row
        #[arg(short = 'n', long, default_value = "8")]
        num_features: usize,

        /// Initial training window as a fraction of rows
        #[arg(short, long, default_value = "0.7")]
        train_fraction: f64,

        /// Rows advanced per walk-forward fold
        #[arg(short, long, default_value = "10")]
        step_size: usize,

        /// Where to save the final fitted model
        #[arg(short, long, default_value = "rf_model.json")]
        model_out: PathBuf,
    },

    /// Replay a saved model over a candle file and print decisions
    Signals {
        /// Path to candle data CSV
        #[arg(short, long)]
        data: PathBuf,

        /// Path to a saved model
        #[arg(short, long, default_value = "rf_model.json")]
        model: PathBuf,

        /// Number of f columns per feature row (must match the model)
        #[arg(short = 'n', long, default_value = "8")]
        num_features: usize,
    },
}

async fn load_or_fetch(data: Option<PathBuf>) -> anyhow::Result<Vec<Candle>> {
    match data {
        Some(path) => {
            let candles = DataLoader::load_candles(&path)?;
            info!("Loaded {} candles from {:?}", candles.len(), path);
            Ok(candles)
        }
        None => {
            info!("No data file provided, fetching from Binance...");
            let client = BinanceClient::new();
            let candles = client.get_klines("BTCUSDT", "1h", 1000).await?;
            info!("Fetched {} candles", candles.len());
            Ok(candles)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder().with_max_level(Level::INFO).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            symbol,
            interval,
            limit,
            output,
        } => {
            info!("Fetching {} {} candles for {}", limit, interval, symbol);

            let client = BinanceClient::new();
            let candles = client.get_klines(&symbol, &interval, limit).await?;

            info!("Fetched {} candles", candles.len());

            if let Some(path) = output {
                DataLoader::save_candles(&candles, &path)?;
                info!("Saved to {:?}", path);
            } else if let (Some(first), Some(last)) = (candles.first(), candles.last()) {
                println!("\n{} {} Data Summary", symbol, interval);
                println!("================");
                println!("First candle: {}", first.datetime());
                println!("Last candle:  {}", last.datetime());
                println!("Total candles: {}", candles.len());
                println!(
                    "Close range: {:.2} - {:.2}",
                    candles.iter().map(|c| c.close).fold(f64::INFINITY, f64::min),
                    candles
                        .iter()
                        .map(|c| c.close)
                        .fold(f64::NEG_INFINITY, f64::max)
                );
            }
        }

        Commands::Evaluate {
            data,
            num_features,
            train_fraction,
            step_size,
            model_out,
        } => {
            let candles = load_or_fetch(data).await?;
            let points = price_points(&candles);

            let pipeline = WavePipeline::new(WaveConfig {
                num_features,
                ..Default::default()
            })?;
            let dataset = pipeline.run(&points)?;
            info!(
                "Encoded {} labeled rows with {} features",
                dataset.n_samples(),
                dataset.n_features()
            );

            let evaluator = WalkForwardEvaluator::new(WalkForwardConfig {
                train_fraction,
                step_size,
            })?;
            let report = evaluator.evaluate(&dataset, RandomForest::with_defaults)?;

            println!("\nWalk-Forward Results");
            println!("====================");
            println!("{:>10} {:>10}", "train_end", "accuracy");
            for fold in &report.folds {
                println!("{:>10} {:>10.3}", fold.train_end, fold.accuracy);
            }
            println!("\nOverall Accuracy: {:.4}", report.overall_accuracy);
            println!(
                "\nClassification Report:\n{}",
                Metrics::format_report(&Metrics::classification_report(
                    &report.y_true,
                    &report.y_pred
                ))
            );

            // Final model: fitted on all rows, restricted to the column
            // subset the signal driver will replay it on
            let view = SignalDriver::default().feature_view(&dataset)?;
            let mut model = RandomForest::new(ForestConfig::default());
            model.fit(&view.x, &view.y);
            model.save_json(&model_out)?;
            info!("Saved final model to {:?}", model_out);
        }

        Commands::Signals {
            data,
            model,
            num_features,
        } => {
            let candles = DataLoader::load_candles(&data)?;
            let points = price_points(&candles);

            let pipeline = WavePipeline::new(WaveConfig {
                num_features,
                ..Default::default()
            })?;
            let dataset = pipeline.run(&points)?;
            let forest = RandomForest::load_json(&model)?;

            let mut log = DecisionLog::default();
            SignalDriver::default().run(&dataset, &forest, &mut log)?;

            println!("\n{:>24} {:>6} {:>10}", "time", "pred", "decision");
            for (timestamp, prediction, decision) in &log.entries {
                let when = chrono::DateTime::from_timestamp_millis(*timestamp as i64)
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| timestamp.to_string());
                let action = match decision {
                    Decision::Buy => "BUY",
                    Decision::Sell => "SELL",
                    Decision::Close => "CLOSE",
                };
                println!("{:>24} {:>6.0} {:>10}", when, prediction, action);
            }
            info!("Emitted {} decisions", log.entries.len());
        }
    }

    Ok(())
}
