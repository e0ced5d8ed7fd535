use std::fs::{self, File, TryLockError};
use std::path::{Path, PathBuf};

use super::TimeSeriesStore;
use super::error::{Result, StorageError};
use super::series_file::SeriesFile;
use crate::config::PERSISTENCE;
use crate::config::persistence::{series_file_path, sibling_path};
use crate::domain::candle::first_unordered;
use crate::domain::{Candle, SeriesId};

/// Exclusive lock on one series. Held for the whole sync and released on drop,
/// including when the sync bails out with an error.
#[derive(Debug)]
pub struct SeriesLock {
    file: File,
    path: PathBuf,
}

impl SeriesLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SeriesLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            log::warn!("Failed to release lock {}: {}", self.path.display(), e);
        }
    }
}

/// Directory-backed store: one series file per (exchange, pair, period).
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open the store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(StorageError::io(&root))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn series_path(&self, id: &SeriesId) -> PathBuf {
        series_file_path(&self.root, id)
    }

    fn open_existing(&self, id: &SeriesId, writable: bool) -> Result<SeriesFile> {
        if !self.exists(id)? {
            return Err(StorageError::NotFound { id: id.to_string() });
        }
        SeriesFile::open(&self.series_path(id), id.period(), writable)
    }
}

/// Rows must be strictly ascending and start after `previous` (if any).
fn check_ordering(id: &SeriesId, previous: Option<i64>, rows: &[Candle]) -> Result<()> {
    if let (Some(previous), Some(first)) = (previous, rows.first())
        && first.timestamp <= previous
    {
        return Err(StorageError::OutOfOrder {
            id: id.to_string(),
            index: 0,
            timestamp: first.timestamp,
            previous,
        });
    }
    if let Some(index) = first_unordered(rows) {
        return Err(StorageError::OutOfOrder {
            id: id.to_string(),
            index,
            timestamp: rows[index].timestamp,
            previous: rows[index - 1].timestamp,
        });
    }
    Ok(())
}

impl TimeSeriesStore for FileStore {
    type Lock = SeriesLock;

    fn lock(&self, id: &SeriesId) -> Result<SeriesLock> {
        let path = sibling_path(&self.series_path(id), PERSISTENCE.lock_ext);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(StorageError::io(parent))?;
        }
        let file = File::options()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(StorageError::io(&path))?;

        match file.try_lock() {
            Ok(()) => Ok(SeriesLock { file, path }),
            Err(TryLockError::WouldBlock) => Err(StorageError::Locked { path }),
            Err(TryLockError::Error(source)) => Err(StorageError::Io { path, source }),
        }
    }

    fn exists(&self, id: &SeriesId) -> Result<bool> {
        let path = self.series_path(id);
        path.try_exists().map_err(StorageError::io(&path))
    }

    fn read_last(&self, id: &SeriesId) -> Result<Option<Candle>> {
        self.open_existing(id, false)?.last()
    }

    fn create(&mut self, id: &SeriesId, rows: &[Candle]) -> Result<()> {
        if self.exists(id)? {
            return Err(StorageError::AlreadyExists { id: id.to_string() });
        }
        check_ordering(id, None, rows)?;
        SeriesFile::create(&self.series_path(id), id.period(), rows)
    }

    fn append(&mut self, id: &SeriesId, rows: &[Candle]) -> Result<()> {
        let mut file = self.open_existing(id, true)?;
        if rows.is_empty() {
            return Ok(());
        }
        let previous = file.last()?.map(|c| c.timestamp);
        check_ordering(id, previous, rows)?;
        file.append(rows)
    }

    fn read_all(&self, id: &SeriesId) -> Result<Vec<Candle>> {
        self.open_existing(id, false)?.read_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candle::flat;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStore, SeriesId) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("store")).unwrap();
        let id = SeriesId::parse("kraken", "btceur", "1m").unwrap();
        (dir, store, id)
    }

    fn stamps(store: &FileStore, id: &SeriesId) -> Vec<i64> {
        store
            .read_all(id)
            .unwrap()
            .iter()
            .map(|c| c.timestamp)
            .collect()
    }

    #[test]
    fn open_creates_root_and_series_paths_nest() {
        let (dir, store, id) = setup();
        assert!(dir.path().join("store").is_dir());
        assert_eq!(
            store.series_path(&id),
            dir.path().join("store/kraken/btceur/1m.ohlc")
        );
    }

    #[test]
    fn create_append_and_read_last() {
        let (_dir, mut store, id) = setup();
        assert!(!store.exists(&id).unwrap());

        store.create(&id, &[flat(60, 1.0), flat(120, 2.0)]).unwrap();
        assert!(store.exists(&id).unwrap());
        assert_eq!(store.read_last(&id).unwrap(), Some(flat(120, 2.0)));

        store.append(&id, &[flat(180, 3.0), flat(240, 4.0)]).unwrap();
        store.append(&id, &[]).unwrap();
        assert_eq!(stamps(&store, &id), vec![60, 120, 180, 240]);
    }

    #[test]
    fn create_twice_is_refused() {
        let (_dir, mut store, id) = setup();
        store.create(&id, &[]).unwrap();
        let err = store.create(&id, &[flat(60, 1.0)]).unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists { .. }));
        assert!(store.read_all(&id).unwrap().is_empty());
    }

    #[test]
    fn missing_series_is_not_found() {
        let (_dir, mut store, id) = setup();
        assert!(matches!(
            store.read_last(&id),
            Err(StorageError::NotFound { .. })
        ));
        assert!(matches!(
            store.append(&id, &[flat(60, 1.0)]),
            Err(StorageError::NotFound { .. })
        ));
    }

    #[test]
    fn overlapping_append_leaves_series_untouched() {
        let (_dir, mut store, id) = setup();
        store.create(&id, &[flat(60, 1.0), flat(120, 2.0)]).unwrap();

        let err = store.append(&id, &[flat(120, 9.0), flat(180, 3.0)]).unwrap_err();
        assert!(matches!(
            err,
            StorageError::OutOfOrder {
                index: 0,
                timestamp: 120,
                previous: 120,
                ..
            }
        ));

        let err = store.append(&id, &[flat(240, 4.0), flat(180, 3.0)]).unwrap_err();
        assert!(matches!(err, StorageError::OutOfOrder { index: 1, .. }));

        assert_eq!(stamps(&store, &id), vec![60, 120]);
    }

    #[test]
    fn unordered_create_writes_nothing() {
        let (_dir, mut store, id) = setup();
        let err = store.create(&id, &[flat(120, 1.0), flat(60, 1.0)]).unwrap_err();
        assert!(matches!(err, StorageError::OutOfOrder { .. }));
        assert!(!store.exists(&id).unwrap());
    }

    #[test]
    fn second_lock_on_same_series_is_refused_until_release() {
        let (_dir, store, id) = setup();
        let other = SeriesId::parse("kraken", "btceur", "5m").unwrap();

        let guard = store.lock(&id).unwrap();
        assert!(guard.path().ends_with("1m.ohlc.lock"));
        assert!(matches!(store.lock(&id), Err(StorageError::Locked { .. })));

        // Other series are independent
        let _other_guard = store.lock(&other).unwrap();

        drop(guard);
        assert!(store.lock(&id).is_ok());
    }
}
