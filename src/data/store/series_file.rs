//! On-disk layout of one series.
//!
//! A bincode header followed by fixed-width bincode candle records, so the
//! last row can be read with a single seek and new rows are a plain tail write.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{Result, StorageError};
use crate::config::PERSISTENCE;
use crate::config::persistence::sibling_path;
use crate::domain::{Candle, Period};

/// Encoded size of [`SeriesHeader`] (bincode fixint: 4 + 4 + 4).
pub const HEADER_LEN: u64 = 12;
/// Encoded size of one [`Candle`] (bincode fixint: 8 + 6 * 8).
pub const RECORD_LEN: u64 = 56;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SeriesHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub period_secs: u32,
}

impl SeriesHeader {
    pub fn new(period: Period) -> Self {
        Self {
            magic: PERSISTENCE.magic,
            version: PERSISTENCE.version,
            period_secs: period.seconds(),
        }
    }

    fn check(&self, path: &Path, period: Period) -> Result<()> {
        if self.magic != PERSISTENCE.magic {
            return Err(StorageError::Corrupt {
                path: path.to_path_buf(),
                reason: format!("bad magic {:?}", self.magic),
            });
        }
        if self.version != PERSISTENCE.version {
            return Err(StorageError::UnsupportedVersion {
                path: path.to_path_buf(),
                found: self.version,
                expected: PERSISTENCE.version,
            });
        }
        if self.period_secs != period.seconds() {
            return Err(StorageError::Corrupt {
                path: path.to_path_buf(),
                reason: format!(
                    "holds {}s candles but is filed under {}",
                    self.period_secs, period
                ),
            });
        }
        Ok(())
    }
}

fn encode_rows(buf: &mut Vec<u8>, rows: &[Candle]) -> Result<()> {
    buf.reserve(rows.len() * RECORD_LEN as usize);
    for row in rows {
        bincode::serialize_into(&mut *buf, row)?;
    }
    Ok(())
}

/// An opened, header-checked series file.
pub struct SeriesFile {
    file: File,
    path: PathBuf,
    records: u64,
}

impl SeriesFile {
    /// Write a new series file holding `rows`. The data goes to a temporary
    /// sibling first and is renamed into place, so readers never see a
    /// half-written series.
    pub fn create(path: &Path, period: Period, rows: &[Candle]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(StorageError::io(parent))?;
        }

        let mut buf = bincode::serialize(&SeriesHeader::new(period))?;
        debug_assert_eq!(buf.len() as u64, HEADER_LEN);
        encode_rows(&mut buf, rows)?;

        let tmp_path = sibling_path(path, PERSISTENCE.tmp_ext);
        let written = File::create(&tmp_path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            writer.write_all(&buf)?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
            fs::rename(&tmp_path, path)
        });

        if let Err(source) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
        Ok(())
    }

    pub fn open(path: &Path, period: Period, writable: bool) -> Result<Self> {
        let io_err = StorageError::io(path);
        let mut file = File::options()
            .read(true)
            .write(writable)
            .open(path)
            .map_err(io_err)?;

        let byte_len = file.metadata().map_err(StorageError::io(path))?.len();
        if byte_len < HEADER_LEN {
            return Err(StorageError::Corrupt {
                path: path.to_path_buf(),
                reason: format!("{} bytes is shorter than the header", byte_len),
            });
        }

        let mut header_bytes = [0u8; HEADER_LEN as usize];
        file.read_exact(&mut header_bytes)
            .map_err(StorageError::io(path))?;
        let header: SeriesHeader =
            bincode::deserialize(&header_bytes).map_err(|e| StorageError::Corrupt {
                path: path.to_path_buf(),
                reason: format!("unreadable header: {}", e),
            })?;
        header.check(path, period)?;

        let body_len = byte_len - HEADER_LEN;
        if body_len % RECORD_LEN != 0 {
            return Err(StorageError::Corrupt {
                path: path.to_path_buf(),
                reason: format!(
                    "{} trailing bytes after the last whole record",
                    body_len % RECORD_LEN
                ),
            });
        }

        Ok(Self {
            file,
            path: path.to_path_buf(),
            records: body_len / RECORD_LEN,
        })
    }

    pub fn len(&self) -> u64 {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    fn decode(&self, bytes: &[u8]) -> Result<Candle> {
        bincode::deserialize(bytes).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            reason: format!("unreadable record: {}", e),
        })
    }

    pub fn last(&mut self) -> Result<Option<Candle>> {
        if self.is_empty() {
            return Ok(None);
        }
        let offset = HEADER_LEN + (self.records - 1) * RECORD_LEN;
        let mut bytes = [0u8; RECORD_LEN as usize];
        self.file
            .seek(SeekFrom::Start(offset))
            .and_then(|_| self.file.read_exact(&mut bytes))
            .map_err(StorageError::io(&self.path))?;
        self.decode(&bytes).map(Some)
    }

    pub fn read_all(&mut self) -> Result<Vec<Candle>> {
        let mut bytes = Vec::with_capacity((self.records * RECORD_LEN) as usize);
        self.file
            .seek(SeekFrom::Start(HEADER_LEN))
            .and_then(|_| self.file.read_to_end(&mut bytes))
            .map_err(StorageError::io(&self.path))?;
        bytes
            .chunks_exact(RECORD_LEN as usize)
            .map(|chunk| self.decode(chunk))
            .collect()
    }

    /// Write `rows` after the last record in one go. If anything fails the file
    /// is cut back to its previous length.
    pub fn append(&mut self, rows: &[Candle]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut buf = Vec::new();
        encode_rows(&mut buf, rows)?;

        let old_len = HEADER_LEN + self.records * RECORD_LEN;
        let written = self
            .file
            .seek(SeekFrom::Start(old_len))
            .and_then(|_| self.file.write_all(&buf))
            .and_then(|_| self.file.sync_data());

        if let Err(source) = written {
            if let Err(e) = self.file.set_len(old_len) {
                log::error!(
                    "Failed to roll back partial append to {}: {}",
                    self.path.display(),
                    e
                );
            }
            return Err(StorageError::Io {
                path: self.path.clone(),
                source,
            });
        }

        self.records += rows.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candle::flat;
    use tempfile::TempDir;

    #[test]
    fn encoded_sizes_match_layout_constants() {
        let header = SeriesHeader::new(Period::Week1);
        assert_eq!(bincode::serialized_size(&header).unwrap(), HEADER_LEN);
        assert_eq!(bincode::serialized_size(&flat(1, 1.0)).unwrap(), RECORD_LEN);
    }

    #[test]
    fn create_then_append_reads_back_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("1m.ohlc");

        SeriesFile::create(&path, Period::Minute1, &[flat(60, 1.0), flat(120, 2.0)]).unwrap();
        assert!(!sibling_path(&path, PERSISTENCE.tmp_ext).exists());

        let mut file = SeriesFile::open(&path, Period::Minute1, true).unwrap();
        assert_eq!(file.len(), 2);
        file.append(&[flat(180, 3.0)]).unwrap();
        assert_eq!(file.len(), 3);
        assert_eq!(file.last().unwrap(), Some(flat(180, 3.0)));

        let mut reopened = SeriesFile::open(&path, Period::Minute1, false).unwrap();
        let all = reopened.read_all().unwrap();
        let stamps: Vec<i64> = all.iter().map(|c| c.timestamp).collect();
        assert_eq!(stamps, vec![60, 120, 180]);
        assert_eq!(
            fs::metadata(&path).unwrap().len(),
            HEADER_LEN + 3 * RECORD_LEN
        );
    }

    #[test]
    fn empty_series_has_no_last() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1d.ohlc");
        SeriesFile::create(&path, Period::Day1, &[]).unwrap();

        let mut file = SeriesFile::open(&path, Period::Day1, false).unwrap();
        assert!(file.is_empty());
        assert_eq!(file.last().unwrap(), None);
        assert!(file.read_all().unwrap().is_empty());
    }

    #[test]
    fn truncated_tail_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1m.ohlc");
        SeriesFile::create(&path, Period::Minute1, &[flat(60, 1.0)]).unwrap();

        let file = File::options().write(true).open(&path).unwrap();
        file.set_len(HEADER_LEN + RECORD_LEN - 3).unwrap();
        drop(file);

        let err = SeriesFile::open(&path, Period::Minute1, false).err().unwrap();
        assert!(matches!(err, StorageError::Corrupt { .. }), "{err}");
    }

    #[test]
    fn foreign_file_and_wrong_period_are_rejected() {
        let dir = TempDir::new().unwrap();
        let junk = dir.path().join("junk.ohlc");
        fs::write(&junk, b"definitely not a series file").unwrap();
        let err = SeriesFile::open(&junk, Period::Minute1, false).err().unwrap();
        assert!(matches!(err, StorageError::Corrupt { .. }), "{err}");

        let path = dir.path().join("1h.ohlc");
        SeriesFile::create(&path, Period::Hour1, &[]).unwrap();
        let err = SeriesFile::open(&path, Period::Hour4, false).err().unwrap();
        assert!(matches!(err, StorageError::Corrupt { .. }), "{err}");
    }

    #[test]
    fn newer_format_version_is_refused() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1m.ohlc");
        let header = SeriesHeader {
            version: PERSISTENCE.version + 1,
            ..SeriesHeader::new(Period::Minute1)
        };
        fs::write(&path, bincode::serialize(&header).unwrap()).unwrap();

        let err = SeriesFile::open(&path, Period::Minute1, false).err().unwrap();
        assert!(matches!(
            err,
            StorageError::UnsupportedVersion { found: 2, expected: 1, .. }
        ));
    }
}
