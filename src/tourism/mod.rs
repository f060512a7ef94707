//! Monthly tourism volumes: the built-in Dubai series and a CSV loader.

mod csv;
pub mod error;
pub mod series;

pub use error::TourismError;
pub use series::TourismSeries;
