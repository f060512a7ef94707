mod align;
mod error;
mod pipeline;
mod store;
mod tourism;
mod types;
mod utils;
mod view;
mod weather_data;

pub use error::WeatherTourismError;
pub use pipeline::*;

pub use align::error::AlignError;
pub use align::merge::{daily_to_frame, merge, merge_frame};
pub use align::normalize::{is_month_start, month_start};

pub use store::error::StoreError;
pub use store::memory_store::MemorySnapshotStore;
pub use store::parquet_store::ParquetSnapshotStore;
pub use store::{validate_table_name, SnapshotStore, DEFAULT_TABLE};

pub use tourism::{TourismError, TourismSeries};

pub use types::location::LatLon;
pub use types::records::*;
pub use types::traits::any::any_date::AnyDate;
pub use types::traits::types::{DateSpan, Month, Year};

pub use view::engine::*;
pub use view::error::ViewError;
pub use view::params::{MonthRange, TemperatureField, ViewParams};
pub use view::session::{SessionState, ViewOutcome, ViewSession, ViewUpdate};

pub use weather_data::archive_client::*;
pub use weather_data::error::FetchError;
pub use weather_data::request::WeatherRequest;

pub use utils::get_cache_dir;
