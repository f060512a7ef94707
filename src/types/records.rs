//! Row types flowing through the pipeline, and the tabular layout of the combined table.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column names of the combined table.
pub mod columns {
    pub const DATE: &str = "date";
    pub const TEMP_MAX: &str = "temp_max";
    pub const TEMP_MIN: &str = "temp_min";
    pub const PRECIPITATION: &str = "precipitation";
    pub const MONTH: &str = "month";
    pub const TOURISTS: &str = "tourists";

    pub const ALL: [&str; 6] = [DATE, TEMP_MAX, TEMP_MIN, PRECIPITATION, MONTH, TOURISTS];
}

/// One day of archived weather for the requested location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyWeatherRecord {
    pub date: NaiveDate,    // time
    pub temp_max: f64,      // temperature_2m_max (°C)
    pub temp_min: f64,      // temperature_2m_min (°C)
    pub precipitation: f64, // precipitation_sum (mm)
}

/// Tourist arrivals for one calendar month. `month` is always the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTourismRecord {
    pub month: NaiveDate,
    pub tourists: u64,
}

/// A daily weather row joined with the tourism volume of its month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedRecord {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub temp_min: f64,
    pub precipitation: f64,
    pub month: NaiveDate,
    /// `None` when no tourism figure exists for `month`.
    pub tourists: Option<u64>,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Required column '{0}' not found in combined table")]
    MissingColumn(String, #[source] PolarsError),

    #[error("Column '{0}' has an unexpected data type")]
    ColumnType(String, #[source] PolarsError),

    #[error("Column '{column}' is null at row {row}")]
    UnexpectedNull { column: String, row: usize },

    #[error("Column '{column}' has type {found}, expected {expected}")]
    DataType {
        column: String,
        expected: DataType,
        found: DataType,
    },
}

/// The column types of the combined table, in column order.
pub fn combined_schema() -> [(&'static str, DataType); 6] {
    [
        (columns::DATE, DataType::Date),
        (columns::TEMP_MAX, DataType::Float64),
        (columns::TEMP_MIN, DataType::Float64),
        (columns::PRECIPITATION, DataType::Float64),
        (columns::MONTH, DataType::Date),
        (columns::TOURISTS, DataType::UInt64),
    ]
}

/// Checks that `df` carries every combined column with the expected type.
pub fn check_combined_schema(df: &DataFrame) -> Result<(), SchemaError> {
    for (name, expected) in combined_schema() {
        let found = column(df, name)?.dtype();
        if found != &expected {
            return Err(SchemaError::DataType {
                column: name.to_string(),
                expected,
                found: found.clone(),
            });
        }
    }
    Ok(())
}

/// Builds the combined table from records, keeping their order.
pub fn combined_to_frame(records: &[CombinedRecord]) -> PolarsResult<DataFrame> {
    let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
    let temp_max: Vec<f64> = records.iter().map(|r| r.temp_max).collect();
    let temp_min: Vec<f64> = records.iter().map(|r| r.temp_min).collect();
    let precipitation: Vec<f64> = records.iter().map(|r| r.precipitation).collect();
    let months: Vec<NaiveDate> = records.iter().map(|r| r.month).collect();
    let tourists: Vec<Option<u64>> = records.iter().map(|r| r.tourists).collect();

    df!(
        columns::DATE => dates,
        columns::TEMP_MAX => temp_max,
        columns::TEMP_MIN => temp_min,
        columns::PRECIPITATION => precipitation,
        columns::MONTH => months,
        columns::TOURISTS => tourists,
    )
}

/// Reads the combined table back into records, in row order.
///
/// Extra columns are ignored. Every column except `tourists` must be free of nulls.
pub fn frame_to_combined(df: &DataFrame) -> Result<Vec<CombinedRecord>, SchemaError> {
    let dates = date_values(df, columns::DATE)?;
    let temp_max = float_values(df, columns::TEMP_MAX)?;
    let temp_min = float_values(df, columns::TEMP_MIN)?;
    let precipitation = float_values(df, columns::PRECIPITATION)?;
    let months = date_values(df, columns::MONTH)?;
    let tourists = count_values(df, columns::TOURISTS)?;

    (0..df.height())
        .map(|row| {
            Ok(CombinedRecord {
                date: required(&dates, columns::DATE, row)?,
                temp_max: required(&temp_max, columns::TEMP_MAX, row)?,
                temp_min: required(&temp_min, columns::TEMP_MIN, row)?,
                precipitation: required(&precipitation, columns::PRECIPITATION, row)?,
                month: required(&months, columns::MONTH, row)?,
                tourists: tourists.get(row).copied().flatten(),
            })
        })
        .collect()
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, SchemaError> {
    df.column(name)
        .map_err(|e| SchemaError::MissingColumn(name.to_string(), e))
}

pub(crate) fn date_values(
    df: &DataFrame,
    name: &str,
) -> Result<Vec<Option<NaiveDate>>, SchemaError> {
    let values = column(df, name)?
        .date()
        .map_err(|e| SchemaError::ColumnType(name.to_string(), e))?;
    Ok(values.as_date_iter().collect())
}

pub(crate) fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, SchemaError> {
    let values = column(df, name)?
        .f64()
        .map_err(|e| SchemaError::ColumnType(name.to_string(), e))?;
    Ok(values.into_iter().collect())
}

pub(crate) fn count_values(df: &DataFrame, name: &str) -> Result<Vec<Option<u64>>, SchemaError> {
    let values = column(df, name)?
        .u64()
        .map_err(|e| SchemaError::ColumnType(name.to_string(), e))?;
    Ok(values.into_iter().collect())
}

pub(crate) fn required<T: Copy>(
    values: &[Option<T>],
    column: &str,
    row: usize,
) -> Result<T, SchemaError> {
    values
        .get(row)
        .copied()
        .flatten()
        .ok_or_else(|| SchemaError::UnexpectedNull {
            column: column.to_string(),
            row,
        })
}
