pub mod error;
pub mod file_store;
pub mod series_file;

use crate::domain::{Candle, SeriesId};
use error::Result;

pub use error::StorageError;
pub use file_store::{FileStore, SeriesLock};

/// Append-only candle storage keyed by [`SeriesId`].
///
/// Writers must hold the guard returned by [`TimeSeriesStore::lock`] for the
/// whole read-last / append sequence.
pub trait TimeSeriesStore {
    /// Exclusive access to one series, released when dropped.
    type Lock;

    fn lock(&self, id: &SeriesId) -> Result<Self::Lock>;

    fn exists(&self, id: &SeriesId) -> Result<bool>;

    /// Last stored candle, `None` for an empty series.
    fn read_last(&self, id: &SeriesId) -> Result<Option<Candle>>;

    /// Create the series with `rows` (possibly none). All-or-nothing.
    fn create(&mut self, id: &SeriesId, rows: &[Candle]) -> Result<()>;

    /// Append `rows` to the tail. All-or-nothing; an empty slice is a no-op.
    fn append(&mut self, id: &SeriesId, rows: &[Candle]) -> Result<()>;

    fn read_all(&self, id: &SeriesId) -> Result<Vec<Candle>>;
}
