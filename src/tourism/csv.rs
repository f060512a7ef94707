use crate::tourism::error::TourismError;
use crate::tourism::series::TourismSeries;
use crate::types::records::{columns, MonthlyTourismRecord};
use chrono::NaiveDate;
use log::info;
use polars::prelude::*;
use std::path::Path;

impl TourismSeries {
    /// Loads a series from a CSV file with a `month,tourists` header.
    ///
    /// `month` is `YYYY-MM` or a first-of-month `YYYY-MM-DD`. Extra columns are ignored.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, TourismError> {
        let path = path.as_ref();
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| TourismError::CsvRead(path.to_path_buf(), e))?
            .finish()
            .map_err(|e| TourismError::CsvRead(path.to_path_buf(), e))?;

        let column_error = |column: &str, source: PolarsError| TourismError::CsvColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
            source,
        };

        // Dates may or may not have been inferred, strings cover both.
        let months = df
            .column(columns::MONTH)
            .and_then(|c| c.cast(&DataType::String))
            .map_err(|e| column_error(columns::MONTH, e))?;
        let months = months.str().map_err(|e| column_error(columns::MONTH, e))?;
        let tourists = df
            .column(columns::TOURISTS)
            .and_then(|c| c.cast(&DataType::Int64))
            .map_err(|e| column_error(columns::TOURISTS, e))?;
        let tourists = tourists
            .i64()
            .map_err(|e| column_error(columns::TOURISTS, e))?;

        let records = months
            .into_iter()
            .zip(tourists.into_iter())
            .enumerate()
            .map(|(row, (month, count))| {
                let value = month.unwrap_or_default();
                let month = parse_month(value).ok_or_else(|| TourismError::InvalidMonth {
                    path: path.to_path_buf(),
                    row,
                    value: value.to_string(),
                })?;
                let tourists = count
                    .and_then(|c| u64::try_from(c).ok())
                    .ok_or_else(|| TourismError::InvalidCount {
                        path: path.to_path_buf(),
                        row,
                    })?;
                Ok(MonthlyTourismRecord { month, tourists })
            })
            .collect::<Result<Vec<_>, TourismError>>()?;

        info!(
            "Loaded {} tourism months from {}",
            records.len(),
            path.display()
        );
        TourismSeries::new(records)
    }
}

fn parse_month(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d"))
        .ok()
}
