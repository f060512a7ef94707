//! Reduces daily dates to the month key used to join against monthly series.

use chrono::{Datelike, NaiveDate};

/// The first day of the month containing `date`.
///
/// Works on the plain calendar date; no timezone conversion is involved, so a date
/// already expressed in the location's local calendar keeps its month.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use weather_tourism::month_start;
///
/// let date = NaiveDate::from_ymd_opt(2023, 2, 28).unwrap();
/// assert_eq!(month_start(date), NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
/// ```
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month, so this cannot fall outside the calendar.
    date - chrono::Days::new(u64::from(date.day0()))
}

/// The last day of the month containing `date`. `None` only past the end of the calendar.
pub(crate) fn month_end(date: NaiveDate) -> Option<NaiveDate> {
    month_start(date)
        .checked_add_months(chrono::Months::new(1))?
        .pred_opt()
}

/// Whether `date` is already a month key.
pub fn is_month_start(date: NaiveDate) -> bool {
    date.day() == 1
}
