//! Left join of daily weather onto monthly tourism volumes.

use crate::align::error::AlignError;
use crate::align::normalize::month_start;
use crate::tourism::TourismSeries;
use crate::types::records::{columns, frame_to_combined, CombinedRecord, DailyWeatherRecord};
use chrono::NaiveDate;
use log::{debug, warn};
use polars::prelude::*;

const ROW_INDEX: &str = "__daily_row";

/// Daily records as a frame, with the derived `month` key appended.
pub fn daily_to_frame(daily: &[DailyWeatherRecord]) -> PolarsResult<DataFrame> {
    let dates: Vec<NaiveDate> = daily.iter().map(|r| r.date).collect();
    let temp_max: Vec<f64> = daily.iter().map(|r| r.temp_max).collect();
    let temp_min: Vec<f64> = daily.iter().map(|r| r.temp_min).collect();
    let precipitation: Vec<f64> = daily.iter().map(|r| r.precipitation).collect();
    let months: Vec<NaiveDate> = daily.iter().map(|r| month_start(r.date)).collect();

    df!(
        columns::DATE => dates,
        columns::TEMP_MAX => temp_max,
        columns::TEMP_MIN => temp_min,
        columns::PRECIPITATION => precipitation,
        columns::MONTH => months,
    )
}

/// Joins every daily record with the tourism volume of its month.
///
/// The result has exactly one row per daily record, in the order of `daily`.
/// Months absent from `tourism` leave `tourists` null; the row is kept.
/// Uniqueness of tourism months is guaranteed by [`TourismSeries`].
pub fn merge_frame(
    daily: &[DailyWeatherRecord],
    tourism: &TourismSeries,
) -> Result<DataFrame, AlignError> {
    if !daily.windows(2).all(|pair| pair[0].date < pair[1].date) {
        warn!("Daily weather input is not strictly ascending by date; keeping input order");
    }

    let daily_frame = daily_to_frame(daily)?;
    let tourism_frame = tourism.to_frame()?;

    let merged = daily_frame
        .lazy()
        .with_row_index(ROW_INDEX, None)
        .join(
            tourism_frame.lazy(),
            [col(columns::MONTH)],
            [col(columns::MONTH)],
            JoinArgs::new(JoinType::Left),
        )
        // The join does not promise to keep left order.
        .sort([ROW_INDEX], SortMultipleOptions::default())
        .select(columns::ALL.map(col))
        .collect()?;

    debug!(
        "Merged {} daily rows with {} tourism months ({} rows without tourism data)",
        daily.len(),
        tourism.len(),
        merged.column(columns::TOURISTS)?.null_count()
    );
    Ok(merged)
}

/// Record-level form of [`merge_frame`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use weather_tourism::{merge, DailyWeatherRecord, MonthlyTourismRecord, TourismSeries};
///
/// let day = |m, d| NaiveDate::from_ymd_opt(2023, m, d).unwrap();
/// let daily = [DailyWeatherRecord {
///     date: day(1, 5),
///     temp_max: 20.0,
///     temp_min: 10.0,
///     precipitation: 0.0,
/// }];
/// let tourism = TourismSeries::new(vec![MonthlyTourismRecord {
///     month: day(1, 1),
///     tourists: 500_000,
/// }])?;
///
/// let combined = merge(&daily, &tourism)?;
/// assert_eq!(combined[0].month, day(1, 1));
/// assert_eq!(combined[0].tourists, Some(500_000));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn merge(
    daily: &[DailyWeatherRecord],
    tourism: &TourismSeries,
) -> Result<Vec<CombinedRecord>, AlignError> {
    let frame = merge_frame(daily, tourism)?;
    Ok(frame_to_combined(&frame)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::records::MonthlyTourismRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day(
        date: NaiveDate,
        temp_max: f64,
        temp_min: f64,
        precipitation: f64,
    ) -> DailyWeatherRecord {
        DailyWeatherRecord {
            date,
            temp_max,
            temp_min,
            precipitation,
        }
    }

    /// One record per day from `start`, for `n` days, with deterministic values.
    fn daily_run(start: NaiveDate, n: usize) -> Vec<DailyWeatherRecord> {
        start
            .iter_days()
            .take(n)
            .enumerate()
            .map(|(i, d)| day(d, 20.0 + i as f64 * 0.1, 10.0 + i as f64 * 0.05, (i % 7) as f64))
            .collect()
    }

    #[test]
    fn test_matching_month_is_joined() -> Result<(), Box<dyn std::error::Error>> {
        let daily = [day(date(2023, 1, 5), 20.0, 10.0, 0.0)];
        let tourism = TourismSeries::new(vec![MonthlyTourismRecord {
            month: date(2023, 1, 1),
            tourists: 500_000,
        }])?;

        let combined = merge(&daily, &tourism)?;
        assert_eq!(
            combined,
            vec![CombinedRecord {
                date: date(2023, 1, 5),
                temp_max: 20.0,
                temp_min: 10.0,
                precipitation: 0.0,
                month: date(2023, 1, 1),
                tourists: Some(500_000),
            }]
        );
        Ok(())
    }

    #[test]
    fn test_missing_month_keeps_row_with_null() -> Result<(), Box<dyn std::error::Error>> {
        let daily = [day(date(2023, 2, 10), 18.0, 9.0, 2.0)];
        let tourism = TourismSeries::new(Vec::new())?;

        let combined = merge(&daily, &tourism)?;
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].month, date(2023, 2, 1));
        assert_eq!(combined[0].tourists, None);
        assert_eq!(combined[0].precipitation, 2.0);
        Ok(())
    }

    #[test]
    fn test_left_join_completeness_and_order() -> Result<(), Box<dyn std::error::Error>> {
        let daily = daily_run(date(2022, 11, 20), 120);
        // Only some months have tourism figures.
        let tourism = TourismSeries::new(vec![
            MonthlyTourismRecord {
                month: date(2023, 1, 1),
                tourists: 1_680_000,
            },
            MonthlyTourismRecord {
                month: date(2022, 12, 1),
                tourists: 1_900_000,
            },
        ])?;

        let combined = merge(&daily, &tourism)?;
        assert_eq!(combined.len(), daily.len());
        for (row, source) in combined.iter().zip(&daily) {
            assert_eq!(row.date, source.date);
            assert_eq!(row.temp_max, source.temp_max);
            assert_eq!(row.month, month_start(source.date));
            let expected = match (row.month.format("%Y-%m").to_string()).as_str() {
                "2022-12" => Some(1_900_000),
                "2023-01" => Some(1_680_000),
                _ => None,
            };
            assert_eq!(row.tourists, expected, "{}", row.date);
        }
        Ok(())
    }

    #[test]
    fn test_merge_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
        let daily = daily_run(date(2023, 1, 1), 365);
        let tourism = TourismSeries::dubai_2023();
        let first = merge(&daily, &tourism)?;
        let second = merge(&daily, &tourism)?;
        assert_eq!(first, second);
        assert!(first.iter().all(|r| r.tourists.is_some()));
        Ok(())
    }

    #[test]
    fn test_unsorted_input_keeps_input_order() -> Result<(), Box<dyn std::error::Error>> {
        let daily = [
            day(date(2023, 3, 2), 30.0, 20.0, 0.0),
            day(date(2023, 1, 9), 22.0, 12.0, 0.0),
            day(date(2023, 3, 1), 29.0, 19.0, 1.0),
        ];
        let combined = merge(&daily, &TourismSeries::dubai_2023())?;
        let dates: Vec<NaiveDate> = combined.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2023, 3, 2), date(2023, 1, 9), date(2023, 3, 1)]);
        Ok(())
    }

    #[test]
    fn test_empty_daily_input() -> Result<(), Box<dyn std::error::Error>> {
        let frame = merge_frame(&[], &TourismSeries::dubai_2023())?;
        assert_eq!(frame.height(), 0);
        assert_eq!(frame.get_column_names().len(), columns::ALL.len());
        Ok(())
    }
}
