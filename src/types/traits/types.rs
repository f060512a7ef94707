use chrono::NaiveDate;
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);
impl Year {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A calendar month of a specific year: `Month(year, month)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);
impl Month {
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

/// An inclusive span of calendar days, `start <= end`.
///
/// Used as the requested period of an archive download. Build one from concrete
/// dates with [`DateSpan::new`], or from anything implementing
/// [`crate::AnyDate`] (a [`Year`], a [`Month`], a `NaiveDate` or a
/// `"YYYY-MM-DD"` string) with [`DateSpan::of`] and [`DateSpan::between`].
///
/// # Examples
///
/// ```
/// use weather_tourism::{DateSpan, Month, Year};
///
/// let year = DateSpan::of(Year(2023)).unwrap();
/// assert_eq!(year.days(), 365);
///
/// let spring = DateSpan::between(Month(2024, 3), Month(2024, 5)).unwrap();
/// assert_eq!(spring.start.to_string(), "2024-03-01");
/// assert_eq!(spring.end.to_string(), "2024-05-31");
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    /// Returns `None` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// The full span covered by a single period (a day, a month, a year).
    pub fn of(period: impl crate::AnyDate) -> Option<Self> {
        period.get_date_range()
    }

    /// From the first day of `start` up to and including the last day of `end`.
    pub fn between(start: impl crate::AnyDate, end: impl crate::AnyDate) -> Option<Self> {
        let start = start.get_date_range()?.start;
        let end = end.get_date_range()?.end;
        Self::new(start, end)
    }

    /// Number of calendar days in the span, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for DateSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_reversed_span() {
        let a = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2023, 4, 30).unwrap();
        assert!(DateSpan::new(a, b).is_none());
        assert_eq!(DateSpan::new(b, a).map(|s| s.days()), Some(2));
        assert_eq!(DateSpan::new(a, a).map(|s| s.days()), Some(1));
    }

    #[test]
    fn test_leap_year_span() {
        let span = DateSpan::of(Year(2024)).unwrap();
        assert_eq!(span.days(), 366);
        assert!(span.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!span.contains(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
    }

    #[test]
    fn test_between_strings() {
        let span = DateSpan::between("2023-01-01", "2023-12-31").unwrap();
        assert_eq!(span, DateSpan::of(Year(2023)).unwrap());
        assert!(DateSpan::between("2023-12-31", "2023-01-01").is_none());
        assert!(DateSpan::between("not a date", "2023-01-01").is_none());
    }

    #[test]
    fn test_month_display() {
        assert_eq!(Month(2023, 7).to_string(), "2023-07");
        assert_eq!(Year(987).to_string(), "0987");
    }
}
