use std::result;

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DataSourceError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("rate limit exhausted: {message}")]
    RateLimited { message: String },

    #[error("API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("response has no candles for period {period_secs}s")]
    MissingPeriod { period_secs: u32 },

    #[error("candles not in ascending time order at index {index} (timestamp {timestamp})")]
    Unordered { index: usize, timestamp: i64 },
}

pub type Result<T> = result::Result<T, DataSourceError>;
