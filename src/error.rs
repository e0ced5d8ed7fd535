use std::result;

use thiserror::Error;

use crate::data::source::error::DataSourceError;
use crate::data::store::error::StorageError;

/// Bad identity input. Always raised before any network or store access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown period `{code}` (supported: {supported})")]
    UnknownPeriod { code: String, supported: String },

    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("invalid {field} `{value}`: character {bad:?} is not allowed")]
    InvalidField {
        field: &'static str,
        value: String,
        bad: char,
    },
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SyncError {
    #[error("[InvalidConfiguration] {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("[DataSource] {0}")]
    DataSource(#[from] DataSourceError),

    #[error("[Storage] {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = result::Result<T, SyncError>;
