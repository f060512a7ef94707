//! Fetch, merge and store: one re-invocable pipeline run, optionally on a schedule.

use crate::align::merge::merge_frame;
use crate::align::normalize::month_start;
use crate::error::WeatherTourismError;
use crate::store::{SnapshotStore, DEFAULT_TABLE};
use crate::tourism::TourismSeries;
use crate::weather_data::archive_client::ArchiveClient;
use crate::weather_data::request::WeatherRequest;
use bon::bon;
use chrono::NaiveDate;
use log::{error, info, warn};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub table: String,
    pub rows: usize,
    /// Rows whose month has no tourism figure.
    pub rows_without_tourism: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows written to '{}'", self.rows, self.table)?;
        if let (Some(first), Some(last)) = (self.first_date, self.last_date) {
            write!(f, " ({first} to {last})")?;
        }
        if self.rows_without_tourism > 0 {
            write!(f, ", {} without tourism data", self.rows_without_tourism)?;
        }
        Ok(())
    }
}

/// Ties the archive client to a snapshot store and table.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use weather_tourism::{
///     LatLon, ParquetSnapshotStore, Pipeline, TourismSeries, WeatherRequest, Year,
/// };
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), weather_tourism::WeatherTourismError> {
/// let pipeline = Pipeline::builder()
///     .store(Arc::new(ParquetSnapshotStore::in_cache_dir()?))
///     .build();
/// let request = WeatherRequest::for_period(LatLon::DUBAI, Year(2023)).unwrap();
/// let report = pipeline.run(&request, &TourismSeries::dubai_2023()).await?;
/// println!("{report}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Pipeline {
    client: ArchiveClient,
    store: Arc<dyn SnapshotStore>,
    table: String,
}

#[bon]
impl Pipeline {
    /// * `.store(..)`: **Required.** Where the snapshot is written.
    /// * `.client(..)`: archive client. Defaults to [`ArchiveClient::default`].
    /// * `.table(..)`: snapshot table name. Defaults to [`DEFAULT_TABLE`].
    #[builder]
    pub fn new(
        store: Arc<dyn SnapshotStore>,
        client: Option<ArchiveClient>,
        #[builder(into)] table: Option<String>,
    ) -> Self {
        Pipeline {
            client: client.unwrap_or_default(),
            store,
            table: table.unwrap_or_else(|| DEFAULT_TABLE.to_string()),
        }
    }

    pub fn store(&self) -> Arc<dyn SnapshotStore> {
        Arc::clone(&self.store)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Fetches the daily weather for `request`, joins `tourism` onto it and replaces the
    /// snapshot table.
    ///
    /// Nothing is written unless every step succeeds, so a failed run leaves the previous
    /// snapshot in place.
    pub async fn run(
        &self,
        request: &WeatherRequest,
        tourism: &TourismSeries,
    ) -> Result<PipelineReport, WeatherTourismError> {
        info!(
            "Pipeline run for {} from {} to {} into '{}'",
            request.location, request.start, request.end, self.table
        );
        let daily = self.client.fetch_daily(request).await.inspect_err(|e| {
            error!("Weather fetch failed, snapshot '{}' left unchanged: {}", self.table, e)
        })?;

        let report = PipelineReport {
            table: self.table.clone(),
            rows: daily.len(),
            rows_without_tourism: daily
                .iter()
                .filter(|d| tourism.get(month_start(d.date)).is_none())
                .count(),
            first_date: daily.first().map(|d| d.date),
            last_date: daily.last().map(|d| d.date),
        };
        if report.rows_without_tourism > 0 {
            warn!(
                "{} of {} days have no tourism figure for their month",
                report.rows_without_tourism, report.rows
            );
        }

        let tourism = tourism.clone();
        let store = Arc::clone(&self.store);
        let table = self.table.clone();
        tokio::task::spawn_blocking(move || -> Result<(), WeatherTourismError> {
            let combined = merge_frame(&daily, &tourism)?;
            store.write_frame(&table, &combined)?;
            Ok(())
        })
        .await??;

        info!("Pipeline run complete: {}", report);
        Ok(report)
    }

    /// Runs the pipeline every `every`, starting one period from now, until the handle is
    /// aborted. Each outcome is passed to `on_run`; a failed run keeps the previous snapshot.
    pub fn spawn_periodic<F>(
        self,
        request: WeatherRequest,
        tourism: TourismSeries,
        every: Duration,
        mut on_run: F,
    ) -> JoinHandle<()>
    where
        F: FnMut(&Result<PipelineReport, WeatherTourismError>) + Send + 'static,
    {
        tokio::spawn(async move {
            info!("Scheduling pipeline runs every {:?}", every);
            let mut ticker = interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let result = self.run(&request, &tourism).await;
                if let Err(e) = &result {
                    warn!("Scheduled pipeline run failed, keeping previous snapshot: {}", e);
                }
                on_run(&result);
            }
        })
    }
}
