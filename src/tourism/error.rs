use chrono::NaiveDate;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TourismError {
    #[error("Tourism series lists month {0} more than once")]
    DuplicateMonth(NaiveDate),

    #[error("Tourism month {0} is not the first day of a month")]
    NotFirstOfMonth(NaiveDate),

    #[error("Failed to read tourism CSV '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Tourism CSV '{path}' has no usable '{column}' column")]
    CsvColumn {
        path: PathBuf,
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Tourism CSV '{path}' row {row}: month '{value}' is not YYYY-MM or YYYY-MM-DD")]
    InvalidMonth {
        path: PathBuf,
        row: usize,
        value: String,
    },

    #[error("Tourism CSV '{path}' row {row}: tourist count is missing or negative")]
    InvalidCount { path: PathBuf, row: usize },

    #[error("Failed building the tourism frame")]
    Frame(#[from] PolarsError),
}
