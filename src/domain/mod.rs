// Domain types and value objects
pub mod candle;
pub mod period;
pub mod series_id;

// Re-export commonly used types
pub use candle::Candle;
pub use period::Period;
pub use series_id::SeriesId;
