//! Aligns the daily weather series with the monthly tourism series.

pub mod error;
pub mod merge;
pub mod normalize;
