//! Cryptowatch REST OHLC client.
//!
//! `GET {base}/markets/{exchange}/{pair}/ohlc?periods={secs}&after={after}` returns:
//! ```json
//! {
//!   "result": { "3600": [[close_time, open, high, low, close, volume, quote_volume], ...] },
//!   "allowance": { "cost": 0.015, "remaining": 9.985 }
//! }
//! ```
//! Rows come back oldest-first.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::error::{DataSourceError, Result};
use super::{Allowance, FetchedCandles, MarketDataSource};
use crate::config::CryptowatchApiConfig;
use crate::domain::candle::first_unordered;
use crate::domain::{Candle, Period, SeriesId};

#[derive(Debug, Deserialize)]
struct OhlcResponse {
    result: HashMap<String, Vec<RawCandle>>,
    #[serde(default)]
    allowance: Option<Allowance>,
}

/// `[close_time, open, high, low, close, volume_base, volume_quote]`
#[derive(Debug, Deserialize)]
struct RawCandle(i64, f64, f64, f64, f64, f64, f64);

impl RawCandle {
    fn into_candle(self) -> Candle {
        let RawCandle(timestamp, open, high, low, close, volume_base, volume_quote) = self;
        Candle::new(timestamp, open, high, low, close, volume_base, volume_quote)
    }
}

/// Error payload, e.g. `{ "error": "Instrument not found" }`
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error)
}

/// Decode a successful OHLC body for `period`.
pub fn parse_ohlc_body(body: &str, period: Period) -> Result<FetchedCandles> {
    let mut response: OhlcResponse = serde_json::from_str(body)?;
    let period_secs = period.seconds();

    let raw = response
        .result
        .remove(&period_secs.to_string())
        .ok_or(DataSourceError::MissingPeriod { period_secs })?;
    let candles: Vec<Candle> = raw.into_iter().map(RawCandle::into_candle).collect();

    if let Some(index) = first_unordered(&candles) {
        return Err(DataSourceError::Unordered {
            index,
            timestamp: candles[index].timestamp,
        });
    }

    Ok(FetchedCandles {
        candles,
        allowance: response.allowance,
    })
}

#[derive(Debug, Clone)]
pub struct CryptowatchSource {
    client: Client,
    base_url: String,
}

impl CryptowatchSource {
    pub fn new(config: &CryptowatchApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(&CryptowatchApiConfig::with_base_url(base_url))
    }

    pub fn ohlc_url(&self, id: &SeriesId) -> String {
        format!(
            "{}/markets/{}/{}/ohlc",
            self.base_url,
            id.exchange(),
            id.pair()
        )
    }
}

#[async_trait]
impl MarketDataSource for CryptowatchSource {
    fn signature(&self) -> &'static str {
        "Cryptowatch API"
    }

    async fn fetch(&self, id: &SeriesId, after: i64) -> Result<FetchedCandles> {
        let url = self.ohlc_url(id);
        let period_secs = id.period().seconds();
        log::debug!("GET {} periods={} after={}", url, period_secs, after);

        let response = self
            .client
            .get(&url)
            .query(&[("periods", period_secs.to_string()), ("after", after.to_string())])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DataSourceError::RateLimited {
                message: api_error_message(&body).unwrap_or_else(|| status.to_string()),
            });
        }
        if !status.is_success() {
            return Err(DataSourceError::Status {
                status: status.as_u16(),
                message: api_error_message(&body).unwrap_or(body),
            });
        }

        parse_ohlc_body(&body, id.period())
    }
}
