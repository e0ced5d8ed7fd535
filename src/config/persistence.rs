//! File persistence and serialization configuration

use std::path::{Path, PathBuf};

use crate::domain::SeriesId;

pub struct PersistenceConfig {
    /// Default store root directory (relative to the working directory)
    pub store_path: &'static str,
    /// Extension of a series data file
    pub series_ext: &'static str,
    /// Extension appended to a series file name to form its lock file
    pub lock_ext: &'static str,
    /// Extension appended to a series file name while it is being created
    pub tmp_ext: &'static str,
    /// Leading bytes of every series file
    pub magic: [u8; 4],
    /// Current version of the series file format
    pub version: u32,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    store_path: "store",
    series_ext: "ohlc",
    lock_ext: "lock",
    tmp_ext: "tmp",
    magic: *b"OHLC",
    version: 1,
};

/// Location of a series file under `root`.
/// Example: "store/kraken/btceur/1h.ohlc"
pub fn series_file_path(root: &Path, id: &SeriesId) -> PathBuf {
    root.join(id.exchange())
        .join(id.pair())
        .join(format!("{}.{}", id.period(), PERSISTENCE.series_ext))
}

/// Sibling of `series_path` with an extra extension, e.g. "1h.ohlc.lock"
pub fn sibling_path(series_path: &Path, ext: &str) -> PathBuf {
    let mut name = series_path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
