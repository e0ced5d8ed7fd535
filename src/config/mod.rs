//! Configuration module for the candle syncer.

pub mod cryptowatch;
pub mod persistence;

// Re-export commonly used items
pub use cryptowatch::{CRYPTOWATCH, CryptowatchApiConfig};
pub use persistence::{PERSISTENCE, series_file_path};
