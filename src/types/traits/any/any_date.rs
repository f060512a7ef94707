use crate::align::normalize::month_end;
use crate::types::traits::types::{DateSpan, Month, Year};
use chrono::NaiveDate;

/// Anything that resolves to an inclusive span of calendar days.
pub trait AnyDate {
    fn get_date_range(self) -> Option<DateSpan>;
}

impl AnyDate for NaiveDate {
    fn get_date_range(self) -> Option<DateSpan> {
        Some(DateSpan {
            start: self,
            end: self,
        })
    }
}

impl AnyDate for &str {
    fn get_date_range(self) -> Option<DateSpan> {
        NaiveDate::parse_from_str(self.trim(), "%Y-%m-%d")
            .ok()?
            .get_date_range()
    }
}

impl AnyDate for String {
    fn get_date_range(self) -> Option<DateSpan> {
        self.as_str().get_date_range()
    }
}

impl AnyDate for Year {
    fn get_date_range(self) -> Option<DateSpan> {
        Some(DateSpan {
            start: NaiveDate::from_ymd_opt(self.0, 1, 1)?,
            end: NaiveDate::from_ymd_opt(self.0, 12, 31)?,
        })
    }
}

impl AnyDate for Month {
    fn get_date_range(self) -> Option<DateSpan> {
        let start = NaiveDate::from_ymd_opt(self.year(), self.month(), 1)?;
        Some(DateSpan {
            start,
            end: month_end(start)?,
        })
    }
}

impl AnyDate for DateSpan {
    fn get_date_range(self) -> Option<DateSpan> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_range_february() {
        let span = Month(2023, 2).get_date_range().unwrap();
        assert_eq!(span.start, NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
        assert_eq!(span.end, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
    }

    #[test]
    fn test_invalid_month_is_none() {
        assert!(Month(2023, 13).get_date_range().is_none());
        assert!(Month(2023, 0).get_date_range().is_none());
    }

    #[test]
    fn test_str_is_trimmed() {
        let span = " 2023-06-15 ".get_date_range().unwrap();
        assert_eq!(span.start, span.end);
        assert_eq!(span.start, NaiveDate::from_ymd_opt(2023, 6, 15).unwrap());
    }
}
