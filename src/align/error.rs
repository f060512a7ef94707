use crate::types::records::SchemaError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignError {
    #[error("Failed building or joining the daily and monthly frames")]
    Frame(#[from] PolarsError),

    #[error("Merged table does not match the combined schema")]
    Schema(#[from] SchemaError),
}
