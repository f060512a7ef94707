use crate::types::records::SchemaError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No snapshot has been written to table '{0}'")]
    NotFound(String),

    #[error("Invalid table name '{0}': use ASCII letters, digits, '_' or '-'")]
    InvalidTableName(String),

    #[error("Failed to resolve the default snapshot directory")]
    DirResolution(#[source] std::io::Error),

    #[error("Failed to create snapshot directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("I/O error writing snapshot file '{0}'")]
    WriteIo(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing snapshot file '{0}'")]
    WritePolars(PathBuf, #[source] PolarsError),

    #[error("I/O error reading snapshot file '{0}'")]
    ReadIo(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode snapshot file '{0}'")]
    ReadPolars(PathBuf, #[source] PolarsError),

    #[error("Snapshot table '{table}' does not have the combined layout")]
    Schema {
        table: String,
        #[source]
        source: SchemaError,
    },

    #[error("Failed building the snapshot frame")]
    Frame(#[from] PolarsError),

    #[error("Snapshot store lock is poisoned")]
    Poisoned,

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
