use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// One OHLCV sample. `timestamp` is the bucket's epoch time in seconds.
///
/// Field order is the on-disk record order, so don't reorder.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume_base: f64,
    pub volume_quote: f64,
}

impl Candle {
    // A constructor for convenience
    pub fn new(
        timestamp: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume_base: f64,
        volume_quote: f64,
    ) -> Self {
        Candle {
            timestamp,
            open,
            high,
            low,
            close,
            volume_base,
            volume_quote,
        }
    }
}

/// Position of the first candle whose timestamp does not strictly exceed its
/// predecessor, or `None` if the slice is strictly ascending.
pub fn first_unordered(candles: &[Candle]) -> Option<usize> {
    candles
        .iter()
        .tuple_windows()
        .position(|(prev, next)| next.timestamp <= prev.timestamp)
        .map(|i| i + 1)
}

#[cfg(test)]
pub(crate) fn flat(timestamp: i64, price: f64) -> Candle {
    Candle::new(timestamp, price, price, price, price, 1.0, price)
}
