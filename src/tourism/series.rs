use crate::align::normalize::is_month_start;
use crate::tourism::error::TourismError;
use crate::types::records::{columns, MonthlyTourismRecord};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashSet;

/// Monthly tourist arrivals for one location, one entry per calendar month.
///
/// Construction rejects repeated months, so joining daily rows against a
/// `TourismSeries` can never fan out. Records are kept sorted by month.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TourismSeries {
    records: Vec<MonthlyTourismRecord>,
}

/// Dubai international overnight visitors, 2023, by month.
const DUBAI_2023: [u64; 12] = [
    1_680_000, 1_520_000, 1_420_000, 1_230_000, 1_190_000, 990_000, 1_130_000, 980_000,
    1_050_000, 1_370_000, 1_560_000, 1_840_000,
];

impl TourismSeries {
    pub fn new(mut records: Vec<MonthlyTourismRecord>) -> Result<Self, TourismError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !is_month_start(record.month) {
                return Err(TourismError::NotFirstOfMonth(record.month));
            }
            if !seen.insert(record.month) {
                return Err(TourismError::DuplicateMonth(record.month));
            }
        }
        records.sort_by_key(|r| r.month);
        Ok(TourismSeries { records })
    }

    /// The built-in series used when no tourism file is supplied.
    pub fn dubai_2023() -> Self {
        let records = DUBAI_2023
            .iter()
            .zip(1u32..)
            .filter_map(|(&tourists, month)| {
                NaiveDate::from_ymd_opt(2023, month, 1)
                    .map(|month| MonthlyTourismRecord { month, tourists })
            })
            .collect();
        TourismSeries { records }
    }

    pub fn records(&self) -> &[MonthlyTourismRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Tourists for the month starting at `month`, if known.
    pub fn get(&self, month: NaiveDate) -> Option<u64> {
        self.records
            .binary_search_by_key(&month, |r| r.month)
            .ok()
            .map(|i| self.records[i].tourists)
    }

    /// The series as a two column frame: `month` (Date) and `tourists` (UInt64).
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let months: Vec<NaiveDate> = self.records.iter().map(|r| r.month).collect();
        let tourists: Vec<u64> = self.records.iter().map(|r| r.tourists).collect();
        df!(
            columns::MONTH => months,
            columns::TOURISTS => tourists,
        )
    }
}
