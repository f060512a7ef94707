use crate::types::location::LatLon;
use crate::types::traits::any::any_date::AnyDate;
use crate::weather_data::error::FetchError;
use bon::Builder;
use chrono::NaiveDate;

/// What to ask the archive for: one location over an inclusive range of days.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use weather_tourism::{LatLon, WeatherRequest};
///
/// let request = WeatherRequest::builder()
///     .location(LatLon::DUBAI)
///     .start(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
///     .end(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())
///     .build();
/// assert_eq!(request.timezone, "auto");
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct WeatherRequest {
    pub location: LatLon,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// IANA name, or `auto` to let the archive resolve the location's local zone.
    #[builder(default = "auto".to_string(), into)]
    pub timezone: String,
}

impl WeatherRequest {
    /// A request covering `period`, e.g. a `Year`, a `Month` or a `"YYYY-MM-DD"` day.
    pub fn for_period(location: LatLon, period: impl AnyDate) -> Option<Self> {
        let span = period.get_date_range()?;
        Some(WeatherRequest {
            location,
            start: span.start,
            end: span.end,
            timezone: "auto".to_string(),
        })
    }

    pub(crate) fn validate(&self) -> Result<(), FetchError> {
        if !self.location.is_valid() {
            return Err(FetchError::InvalidRequest(format!(
                "location {} is out of range",
                self.location
            )));
        }
        if self.start > self.end {
            return Err(FetchError::InvalidRequest(format!(
                "start date {} is after end date {}",
                self.start, self.end
            )));
        }
        if self.timezone.trim().is_empty() {
            return Err(FetchError::InvalidRequest("timezone is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::traits::types::Year;

    #[test]
    fn test_for_period_year() {
        let request = WeatherRequest::for_period(LatLon::DUBAI, Year(2023)).unwrap();
        assert_eq!(request.start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(request.end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_reversed_range_is_invalid() {
        let request = WeatherRequest::builder()
            .location(LatLon::DUBAI)
            .start(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap())
            .end(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
            .timezone("Asia/Dubai")
            .build();
        assert!(matches!(
            request.validate(),
            Err(FetchError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_bad_location_is_invalid() {
        let request = WeatherRequest::for_period(LatLon(120.0, 0.0), "2023-03-04").unwrap();
        assert!(request.validate().is_err());
    }
}
