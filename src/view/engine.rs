//! Derives the two display views from the combined table.

use crate::store::SnapshotStore;
use crate::types::records::{
    check_combined_schema, columns, count_values, date_values, float_values, required,
};
use crate::view::error::ViewError;
use crate::view::params::{TemperatureField, ViewParams};
use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;

/// Daily values of the selected temperature field, ascending by date.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureView {
    pub field: TemperatureField,
    pub points: Vec<(NaiveDate, f64)>,
}

impl TemperatureView {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest and largest value, for axis bounds.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|(_, v)| *v).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// One entry per month in range, ascending by month. `None` where no tourism figure exists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TourismView {
    pub points: Vec<(NaiveDate, Option<u64>)>,
}

impl TourismView {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_tourists(&self) -> Option<u64> {
        self.points.iter().filter_map(|(_, t)| *t).max()
    }
}

/// Both views, tagged with the parameters that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Views {
    pub params: ViewParams,
    pub temperature: TemperatureView,
    pub tourism: TourismView,
}

/// Filters `snapshot` to the month range in `params` and projects it into the two views.
///
/// A record is kept when the calendar month of its `date` lies in the inclusive range,
/// whatever its year. The tourism view holds each month once, however many days of it
/// are in the snapshot. A range matching no record gives two empty views.
///
/// # Errors
///
/// * [`ViewError::InvalidParameter`] when the month range is not `1 <= start <= end <= 12`.
/// * [`ViewError::Schema`] when `snapshot` lacks a combined column or has nulls in one.
/// * [`ViewError::Frame`] when polars fails to evaluate the filter.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use weather_tourism::{combined_to_frame, derive_views, CombinedRecord, ViewParams};
///
/// let day = |m, d| NaiveDate::from_ymd_opt(2023, m, d).unwrap();
/// let row = |m, d, t| CombinedRecord {
///     date: day(m, d), temp_max: t, temp_min: t - 10.0, precipitation: 0.0,
///     month: day(m, 1), tourists: Some(1_000),
/// };
/// let snapshot = combined_to_frame(&[row(2, 1, 24.0), row(3, 1, 28.0), row(3, 2, 29.0)])?;
///
/// let views = derive_views(&snapshot, ViewParams::new("temp_max", 3, 5)?)?;
/// assert_eq!(views.temperature.points, vec![(day(3, 1), 28.0), (day(3, 2), 29.0)]);
/// assert_eq!(views.tourism.points, vec![(day(3, 1), Some(1_000))]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn derive_views(snapshot: &DataFrame, params: ViewParams) -> Result<Views, ViewError> {
    params.validate()?;
    check_combined_schema(snapshot)?;

    let month_of_date = col(columns::DATE).dt().month().cast(DataType::UInt32);
    let in_range = month_of_date
        .clone()
        .gt_eq(lit(params.months.start()))
        .and(month_of_date.lt_eq(lit(params.months.end())));

    let filtered = snapshot
        .clone()
        .lazy()
        .filter(in_range)
        .sort([columns::DATE], SortMultipleOptions::default())
        .collect()?;

    let dates = date_values(&filtered, columns::DATE)?;
    let values = float_values(&filtered, params.field.column())?;
    let points = (0..filtered.height())
        .map(|row| {
            Ok((
                required(&dates, columns::DATE, row)?,
                required(&values, params.field.column(), row)?,
            ))
        })
        .collect::<Result<Vec<_>, ViewError>>()?;

    let per_month = filtered
        .lazy()
        .group_by_stable([col(columns::MONTH)])
        .agg([col(columns::TOURISTS).first()])
        .sort([columns::MONTH], SortMultipleOptions::default())
        .collect()?;
    let months = date_values(&per_month, columns::MONTH)?;
    let tourists = count_values(&per_month, columns::TOURISTS)?;
    let tourism_points = (0..per_month.height())
        .map(|row| {
            Ok((
                required(&months, columns::MONTH, row)?,
                tourists.get(row).copied().flatten(),
            ))
        })
        .collect::<Result<Vec<_>, ViewError>>()?;

    debug!(
        "Derived views for {}: {} days, {} months",
        params,
        points.len(),
        tourism_points.len()
    );

    Ok(Views {
        params,
        temperature: TemperatureView {
            field: params.field,
            points,
        },
        tourism: TourismView {
            points: tourism_points,
        },
    })
}

/// Reads the current snapshot of `table` and derives the views from it.
///
/// A table that was never written yields [`ViewError::NoData`].
pub fn load_views(
    store: &dyn SnapshotStore,
    table: &str,
    params: ViewParams,
) -> Result<Views, ViewError> {
    params.validate()?;
    let snapshot = store.read_frame(table)?;
    derive_views(&snapshot, params)
}
