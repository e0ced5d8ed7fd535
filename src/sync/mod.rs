//! Incremental candle sync.
//!
//! A new series is seeded with everything the source has (`after = 1`). An
//! existing one resumes strictly after its last stored candle
//! (`after = t_last + 1`), so the tail row is never fetched twice. Rows are
//! appended in the order received; nothing is sorted or deduplicated here.

pub mod reporter;

use crate::data::{Allowance, MarketDataSource, TimeSeriesStore};
use crate::domain::SeriesId;
use crate::error::Result;

pub use reporter::{LogReporter, SyncReporter};

/// `after` value that asks the source for its whole history.
pub const HISTORY_START: i64 = 1;

/// Outcome of one successful sync.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub series: SeriesId,
    /// The series did not exist before this run
    pub created: bool,
    /// Lower bound that was sent to the source
    pub after: i64,
    pub rows_added: usize,
    /// Timestamp of the series tail after the run
    pub last_timestamp: Option<i64>,
    pub allowance: Option<Allowance>,
}

pub struct Syncer<S, R> {
    source: S,
    reporter: R,
}

impl<S, R> Syncer<S, R>
where
    S: MarketDataSource,
    R: SyncReporter,
{
    pub fn new(source: S, reporter: R) -> Self {
        Self { source, reporter }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Validate the raw identity, then sync it. Bad input fails before the
    /// store or the source are touched.
    pub async fn sync<T: TimeSeriesStore>(
        &self,
        store: &mut T,
        exchange: &str,
        pair: &str,
        period: &str,
    ) -> Result<SyncReport> {
        let id = SeriesId::parse(exchange, pair, period)?;
        self.sync_series(store, &id).await
    }

    pub async fn sync_series<T: TimeSeriesStore>(
        &self,
        store: &mut T,
        id: &SeriesId,
    ) -> Result<SyncReport> {
        let _lock = store.lock(id)?;

        let existing = if store.exists(id)? {
            let last = store.read_last(id)?;
            self.reporter.resuming(id, last.as_ref());
            Some(last)
        } else {
            self.reporter.series_missing(id);
            None
        };

        let previous_last = existing.flatten().map(|c| c.timestamp);
        let after = previous_last.map_or(HISTORY_START, |t| t + 1);

        let fetched = self.source.fetch(id, after).await?;
        self.reporter.fetched(
            id,
            after,
            fetched.candles.len(),
            fetched.allowance.as_ref(),
        );

        let created = existing.is_none();
        if created {
            store.create(id, &fetched.candles)?;
        } else if !fetched.candles.is_empty() {
            store.append(id, &fetched.candles)?;
        }

        let report = SyncReport {
            series: id.clone(),
            created,
            after,
            rows_added: fetched.candles.len(),
            last_timestamp: fetched
                .candles
                .last()
                .map(|c| c.timestamp)
                .or(previous_last),
            allowance: fetched.allowance,
        };
        self.reporter.stored(&report);
        Ok(report)
    }
}
