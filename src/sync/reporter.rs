use crate::data::Allowance;
use crate::domain::{Candle, SeriesId};
use crate::sync::SyncReport;
use crate::utils::time_utils::epoch_sec_to_utc;

/// Progress callbacks for a sync. Every method defaults to doing nothing.
pub trait SyncReporter {
    fn series_missing(&self, _id: &SeriesId) {}

    fn resuming(&self, _id: &SeriesId, _last: Option<&Candle>) {}

    fn fetched(&self, _id: &SeriesId, _after: i64, _rows: usize, _allowance: Option<&Allowance>) {}

    fn stored(&self, _report: &SyncReport) {}
}

impl<R: SyncReporter + ?Sized> SyncReporter for &R {
    fn series_missing(&self, id: &SeriesId) {
        (**self).series_missing(id)
    }

    fn resuming(&self, id: &SeriesId, last: Option<&Candle>) {
        (**self).resuming(id, last)
    }

    fn fetched(&self, id: &SeriesId, after: i64, rows: usize, allowance: Option<&Allowance>) {
        (**self).fetched(id, after, rows, allowance)
    }

    fn stored(&self, report: &SyncReport) {
        (**self).stored(report)
    }
}

/// Reports through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl SyncReporter for LogReporter {
    fn series_missing(&self, id: &SeriesId) {
        log::info!("{} does not exist yet: fetching full history", id);
    }

    fn resuming(&self, id: &SeriesId, last: Option<&Candle>) {
        match last {
            Some(candle) => log::info!(
                "{} last stored candle at {} ({})",
                id,
                candle.timestamp,
                epoch_sec_to_utc(candle.timestamp)
            ),
            None => log::info!("{} exists but is empty: fetching full history", id),
        }
    }

    fn fetched(&self, id: &SeriesId, after: i64, rows: usize, allowance: Option<&Allowance>) {
        log::debug!("{} fetched {} rows after {}", id, rows, after);
        if let Some(allowance) = allowance {
            log::info!(
                "Cryptowatch remaining allowance: {} (cost {})",
                allowance.remaining,
                allowance.cost
            );
        }
    }

    fn stored(&self, report: &SyncReport) {
        if report.created {
            log::info!("Created {} with {} rows", report.series, report.rows_added);
        } else {
            log::info!("Added {} new rows to {}", report.rows_added, report.series);
        }
    }
}
