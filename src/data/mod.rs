// Market data retrieval and candle persistence
pub mod source;
pub mod store;

// Re-export commonly used types
pub use source::{Allowance, CryptowatchSource, FetchedCandles, MarketDataSource};
pub use store::{FileStore, SeriesLock, StorageError, TimeSeriesStore};
