use crate::align::error::AlignError;
use crate::store::error::StoreError;
use crate::tourism::error::TourismError;
use crate::view::error::ViewError;
use crate::weather_data::error::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherTourismError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Tourism(#[from] TourismError),

    #[error(transparent)]
    Align(#[from] AlignError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
