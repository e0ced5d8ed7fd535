// Core modules
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod sync;
pub mod utils;

use std::path::PathBuf;

use anyhow::{Context, Result};

// Re-export commonly used types
pub use data::{CryptowatchSource, FileStore, MarketDataSource, TimeSeriesStore};
pub use domain::{Candle, Period, SeriesId};
pub use error::{ConfigError, SyncError};
pub use sync::{LogReporter, SyncReport, SyncReporter, Syncer};

use config::{CRYPTOWATCH, CryptowatchApiConfig, PERSISTENCE};

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Fetch OHLC candles and append the new ones to a local store", long_about = None)]
pub struct Cli {
    /// Store directory in which to keep the fetched data, or whose data to complete
    #[arg(short = 'f', long, default_value = PERSISTENCE.store_path)]
    pub filepath: PathBuf,

    /// Exchange to fetch from (e.g. kraken, bitstamp)
    #[arg(short, long)]
    pub exchange: String,

    /// Pair symbol (e.g. btceur, etheur, zecbtc)
    #[arg(short, long)]
    pub symbol: String,

    /// Candle period, one of: 1m 3m 5m 15m 30m 1h 2h 4h 6h 12h 1d 3d 1w
    #[arg(short, long, default_value = "1m")]
    pub period: String,

    /// Also write logs to this file
    #[arg(short, long)]
    pub logfile: Option<PathBuf>,

    /// Market data API base URL
    #[arg(long, default_value = CRYPTOWATCH.base_url)]
    pub api_url: String,
}

/// One sync run as driven by the command line.
pub async fn run(args: &Cli) -> Result<SyncReport> {
    // Reject a bad identity before opening anything
    let id = SeriesId::parse(&args.exchange, &args.symbol, &args.period)
        .map_err(SyncError::from)?;

    let source = CryptowatchSource::new(&CryptowatchApiConfig::with_base_url(&args.api_url))
        .context("Failed to build HTTP client")?;

    log::info!("Opening store: {}", args.filepath.display());
    let mut store = FileStore::open(&args.filepath)
        .with_context(|| format!("Failed to open store {}", args.filepath.display()))?;

    let syncer = Syncer::new(source, LogReporter);
    let report = syncer
        .sync_series(&mut store, &id)
        .await
        .with_context(|| format!("Sync of {} via {} failed", id, syncer.source().signature()))?;
    Ok(report)
}
