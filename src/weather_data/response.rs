//! Open-Meteo archive payloads and their conversion to daily records.

use crate::types::records::DailyWeatherRecord;
use crate::weather_data::error::FetchError;
use chrono::NaiveDate;
use log::warn;
use serde::Deserialize;

pub(crate) const TIME: &str = "time";
pub(crate) const TEMPERATURE_MAX: &str = "temperature_2m_max";
pub(crate) const TEMPERATURE_MIN: &str = "temperature_2m_min";
pub(crate) const PRECIPITATION_SUM: &str = "precipitation_sum";

/// The `daily` request parameter.
pub(crate) const DAILY_VARIABLES: [&str; 3] = [TEMPERATURE_MAX, TEMPERATURE_MIN, PRECIPITATION_SUM];

#[derive(Debug, Deserialize)]
pub(crate) struct ArchiveResponse {
    pub daily: Option<DailyColumns>,
}

/// Parallel arrays, one entry per day. Open-Meteo uses `null` for days it has no value for;
/// those days are left out of the records.
#[derive(Debug, Deserialize)]
pub(crate) struct DailyColumns {
    pub time: Option<Vec<String>>,
    pub temperature_2m_max: Option<Vec<Option<f64>>>,
    pub temperature_2m_min: Option<Vec<Option<f64>>>,
    pub precipitation_sum: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    reason: Option<String>,
}

impl ArchiveResponse {
    pub(crate) fn into_records(self) -> Result<Vec<DailyWeatherRecord>, FetchError> {
        let daily = self
            .daily
            .ok_or_else(|| FetchError::MissingField("daily".to_string()))?;
        daily.into_records()
    }
}

impl DailyColumns {
    /// Turns the columnar layout into one record per day, in response order.
    pub(crate) fn into_records(self) -> Result<Vec<DailyWeatherRecord>, FetchError> {
        let time = require(self.time, TIME)?;
        let temp_max = require(self.temperature_2m_max, TEMPERATURE_MAX)?;
        let temp_min = require(self.temperature_2m_min, TEMPERATURE_MIN)?;
        let precipitation = require(self.precipitation_sum, PRECIPITATION_SUM)?;

        for (field, found) in [
            (TEMPERATURE_MAX, temp_max.len()),
            (TEMPERATURE_MIN, temp_min.len()),
            (PRECIPITATION_SUM, precipitation.len()),
        ] {
            if found != time.len() {
                return Err(FetchError::LengthMismatch {
                    field: field.to_string(),
                    expected: time.len(),
                    found,
                });
            }
        }

        let mut records = Vec::with_capacity(time.len());
        let mut incomplete = Vec::new();
        for (i, raw) in time.iter().enumerate() {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|e| FetchError::InvalidDate(raw.clone(), e))?;
            match (temp_max[i], temp_min[i], precipitation[i]) {
                (Some(temp_max), Some(temp_min), Some(precipitation)) => {
                    records.push(DailyWeatherRecord {
                        date,
                        temp_max,
                        temp_min,
                        precipitation,
                    })
                }
                _ => incomplete.push(date),
            }
        }

        // Recent days the archive has not published yet come back as nulls.
        if let (Some(first), Some(last)) = (incomplete.first(), incomplete.last()) {
            warn!(
                "Skipping {} of {} days with missing values ({} to {})",
                incomplete.len(),
                time.len(),
                first,
                last
            );
        }
        Ok(records)
    }
}

fn require<T>(values: Option<Vec<T>>, field: &str) -> Result<Vec<T>, FetchError> {
    values.ok_or_else(|| FetchError::MissingField(format!("daily.{field}")))
}

/// Pulls Open-Meteo's `{"error": true, "reason": "..."}` explanation out of an error body,
/// falling back to the raw text.
pub(crate) fn error_reason(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            reason: Some(reason),
        }) => reason,
        _ if body.trim().is_empty() => "no response body".to_string(),
        _ => body.trim().chars().take(200).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<DailyWeatherRecord>, FetchError> {
        let response: ArchiveResponse = serde_json::from_str(json).unwrap();
        response.into_records()
    }

    #[test]
    fn test_columns_become_rows() -> Result<(), Box<dyn std::error::Error>> {
        let records = parse(
            r#"{
                "latitude": 25.25,
                "longitude": 55.25,
                "daily_units": {"time": "iso8601", "temperature_2m_max": "°C"},
                "daily": {
                    "time": ["2023-01-01", "2023-01-02"],
                    "temperature_2m_max": [24.1, 23.7],
                    "temperature_2m_min": [16.0, 15.2],
                    "precipitation_sum": [0.0, 1.4]
                }
            }"#,
        )?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());
        assert_eq!(records[1].temp_max, 23.7);
        assert_eq!(records[1].temp_min, 15.2);
        assert_eq!(records[1].precipitation, 1.4);
        Ok(())
    }

    #[test]
    fn test_missing_daily_block() {
        match parse(r#"{"latitude": 25.25}"#) {
            Err(FetchError::MissingField(field)) => assert_eq!(field, "daily"),
            other => panic!("expected missing field, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_array() {
        let result = parse(
            r#"{"daily": {"time": ["2023-01-01"], "temperature_2m_max": [1.0],
                "temperature_2m_min": [0.5]}}"#,
        );
        match result {
            Err(FetchError::MissingField(field)) => assert_eq!(field, "daily.precipitation_sum"),
            other => panic!("expected missing field, got {other:?}"),
        }
    }

    #[test]
    fn test_length_mismatch() {
        let result = parse(
            r#"{"daily": {"time": ["2023-01-01", "2023-01-02"], "temperature_2m_max": [1.0, 2.0],
                "temperature_2m_min": [0.5], "precipitation_sum": [0.0, 0.0]}}"#,
        );
        match result {
            Err(FetchError::LengthMismatch {
                field,
                expected,
                found,
            }) => {
                assert_eq!(field, TEMPERATURE_MIN);
                assert_eq!((expected, found), (2, 1));
            }
            other => panic!("expected length mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_days_with_nulls_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
        let records = parse(
            r#"{"daily": {"time": ["2023-01-01", "2023-01-02", "2023-01-03"],
                "temperature_2m_max": [21.0, 22.5, null],
                "temperature_2m_min": [14.0, null, null],
                "precipitation_sum": [0.0, 0.3, null]}}"#,
        )?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(records[0].temp_max, 21.0);

        let unpublished = parse(
            r#"{"daily": {"time": ["2023-01-01", "2023-01-02", "2023-01-03"],
                "temperature_2m_max": [21.0, 22.5, null],
                "temperature_2m_min": [14.0, 15.1, null],
                "precipitation_sum": [0.0, 0.3, null]}}"#,
        )?;
        let dates: Vec<_> = unpublished.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(dates, ["2023-01-01", "2023-01-02"]);
        Ok(())
    }

    #[test]
    fn test_bad_date() {
        let bad_date = parse(
            r#"{"daily": {"time": ["01/01/2023"], "temperature_2m_max": [1.0],
                "temperature_2m_min": [0.5], "precipitation_sum": [0.0]}}"#,
        );
        assert!(matches!(bad_date, Err(FetchError::InvalidDate(..))));
    }

    #[test]
    fn test_error_reason_extraction() {
        assert_eq!(
            error_reason(r#"{"error": true, "reason": "Parameter 'start_date' is out of range"}"#),
            "Parameter 'start_date' is out of range"
        );
        assert_eq!(error_reason("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_reason("   "), "no response body");
    }
}
