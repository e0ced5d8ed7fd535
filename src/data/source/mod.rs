pub mod cryptowatch;
pub mod error;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Candle, SeriesId};
use error::Result;

pub use cryptowatch::CryptowatchSource;
pub use error::DataSourceError;

/// Rate-limit quota reported alongside each API response.
/// Purely informational: nothing throttles on it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Allowance {
    pub cost: f64,
    pub remaining: f64,
    #[serde(default)]
    pub remaining_paid: Option<f64>,
    #[serde(default)]
    pub upgrade: Option<String>,
}

/// One batch of candles, ascending by timestamp, plus the quota report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedCandles {
    pub candles: Vec<Candle>,
    pub allowance: Option<Allowance>,
}

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch candles for `id` whose timestamps are at or after `after`
    /// (epoch seconds). `after = 1` asks for the whole available history.
    async fn fetch(&self, id: &SeriesId, after: i64) -> Result<FetchedCandles>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}
