use crate::store::error::StoreError;
use crate::types::records::SchemaError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Invalid view parameter: {0}")]
    InvalidParameter(String),

    #[error("No snapshot in table '{table}' yet")]
    NoData { table: String },

    #[error("Failed to read the snapshot")]
    Store(#[source] StoreError),

    #[error("Snapshot does not have the combined layout")]
    Schema(#[from] SchemaError),

    #[error("Failed filtering the snapshot")]
    Frame(#[from] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl From<StoreError> for ViewError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(table) => ViewError::NoData { table },
            other => ViewError::Store(other),
        }
    }
}
