//! pricecast - next-day close forecaster over an OHLCV CSV file.
//!
//! # Usage
//! ```sh
//! cargo run --bin pricecast -- --input data/AAPL.csv --symbol AAPL --horizon 7 --summary
//! ```
//!
//! Model and indicator settings come from the environment (see `config`).
//! The outcome is printed to stdout as JSON; logs go to stderr.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use pricecast::application::analytics::{MarketSummary, market_summary};
use pricecast::application::ml::{ForecastOutcome, ForecastService};
use pricecast::config::ForecastEnvConfig;
use pricecast::domain::indicators::IndicatorFrame;
use pricecast::domain::market::{PriceBar, Series};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the OHLCV CSV (timestamp,open,high,low,close,volume)
    #[arg(long)]
    input: PathBuf,

    /// Ticker label echoed in the output
    #[arg(long, default_value = "UNKNOWN")]
    symbol: String,

    /// Days to forecast (defaults to FORECAST_HORIZON)
    #[arg(long)]
    horizon: Option<usize>,

    /// Also print a market summary built from the display indicators
    #[arg(long)]
    summary: bool,
}

#[derive(Debug, Deserialize)]
struct CsvBar {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

#[derive(Debug, Serialize)]
struct Report {
    symbol: String,
    bars: usize,
    #[serde(flatten)]
    outcome: ForecastOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<MarketSummary>,
}

/// Accepts RFC 3339 or a bare `YYYY-MM-DD` (taken as midnight UTC).
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Unrecognised timestamp '{}'", raw))?;
    match date.and_hms_opt(0, 0, 0) {
        Some(naive) => Ok(naive.and_utc()),
        None => bail!("Invalid date '{}'", raw),
    }
}

fn load_series(path: &Path) -> Result<Series> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let mut bars = Vec::new();
    for (line, record) in reader.deserialize::<CsvBar>().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV row {}", line + 1))?;
        bars.push(PriceBar::new(
            parse_timestamp(&record.timestamp)?,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }
    info!("Loaded {} bars from {}", bars.len(), path.display());

    Series::new(bars).context("Rejected price series")
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let args = Args::parse();
    let config = ForecastEnvConfig::from_env()?;
    let horizon = args.horizon.unwrap_or(config.horizon);

    let series = load_series(&args.input)?;
    let bars = series.len();

    let summary = if args.summary {
        let frame = IndicatorFrame::with_defaults(series.clone(), &config.indicators)?;
        Some(market_summary(&frame)?)
    } else {
        None
    };

    info!("Forecasting {} over {} days", args.symbol, horizon);
    let outcome = ForecastService::new(config.forecaster).run(series, horizon)?;
    info!(
        "Reliability for {}: {}",
        args.symbol, outcome.confidence.reliability
    );

    let report = Report {
        symbol: args.symbol,
        bars,
        outcome,
        summary,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
