//! Command-line front end: refresh the snapshot, print views, or explore them in a terminal UI.

mod tui;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use weather_tourism::{
    load_views, ArchiveClient, LatLon, MonthRange, ParquetSnapshotStore, Pipeline, SnapshotStore,
    TemperatureField, TourismSeries, ViewParams, ViewSession, Views, WeatherRequest,
    WeatherTourismError, DEFAULT_TABLE,
};

#[derive(Debug, Parser)]
#[command(
    name = "weather-tourism",
    version,
    about = "Daily weather from the Open-Meteo archive joined with monthly tourism volumes"
)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the weather, merge it with the tourism series and replace the snapshot.
    Refresh,
    /// Print both views for one set of parameters. Reads the snapshot only.
    View {
        /// temp_max or temp_min.
        #[arg(long, default_value = "temp_max")]
        field: String,

        /// Inclusive month range, e.g. 3-5, or a single month.
        #[arg(long, default_value = "1-12")]
        months: String,
    },
    /// Launch the interactive dashboard.
    Show {
        /// Fetch a fresh snapshot in the background at startup.
        #[arg(long)]
        fetch: bool,

        /// Re-run the pipeline every N minutes while the dashboard is open.
        #[arg(long, value_name = "MINUTES")]
        refresh_every: Option<u64>,
    },
}

#[derive(Debug, Args, Clone)]
struct SourceArgs {
    /// Latitude of the location.
    #[arg(long, global = true, allow_hyphen_values = true, default_value_t = LatLon::DUBAI.lat())]
    lat: f64,

    /// Longitude of the location.
    #[arg(long, global = true, allow_hyphen_values = true, default_value_t = LatLon::DUBAI.lon())]
    lon: f64,

    /// First day to fetch (YYYY-MM-DD).
    #[arg(long, global = true, default_value = "2023-01-01")]
    start: NaiveDate,

    /// Last day to fetch (YYYY-MM-DD), inclusive.
    #[arg(long, global = true, default_value = "2023-12-31")]
    end: NaiveDate,

    /// Timezone for daily aggregation, or `auto`.
    #[arg(long, global = true, default_value = "auto")]
    timezone: String,

    /// Directory holding the snapshot. Defaults to the system cache directory.
    #[arg(long, global = true)]
    snapshot_dir: Option<PathBuf>,

    /// Snapshot table name.
    #[arg(long, global = true, default_value = DEFAULT_TABLE)]
    table: String,

    /// CSV with `month,tourists` columns. Defaults to the built-in Dubai 2023 series.
    #[arg(long, global = true)]
    tourism_csv: Option<PathBuf>,

    /// Timeout for one archive request, in seconds.
    #[arg(long, global = true, default_value_t = 30)]
    timeout_secs: u64,

    /// Retries after a transient archive failure.
    #[arg(long, global = true, default_value_t = 2)]
    retries: u32,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Core(#[from] WeatherTourismError),

    #[error("Terminal error")]
    Terminal(#[from] std::io::Error),
}

impl SourceArgs {
    fn store(&self) -> Result<Arc<dyn SnapshotStore>, WeatherTourismError> {
        let store = match &self.snapshot_dir {
            Some(dir) => ParquetSnapshotStore::new(dir),
            None => ParquetSnapshotStore::in_cache_dir()?,
        };
        info!("Using snapshot directory {}", store.dir().display());
        Ok(Arc::new(store))
    }

    fn request(&self) -> WeatherRequest {
        WeatherRequest::builder()
            .location(LatLon(self.lat, self.lon))
            .start(self.start)
            .end(self.end)
            .timezone(self.timezone.clone())
            .build()
    }

    fn tourism(&self) -> Result<TourismSeries, WeatherTourismError> {
        Ok(match &self.tourism_csv {
            Some(path) => TourismSeries::from_csv(path)?,
            None => TourismSeries::dubai_2023(),
        })
    }

    fn pipeline(&self, store: Arc<dyn SnapshotStore>) -> Pipeline {
        let client = ArchiveClient::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.retries)
            .build();
        Pipeline::builder()
            .store(store)
            .client(client)
            .table(self.table.clone())
            .build()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                error!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let args = cli.source;
    match cli.command {
        Command::Refresh => refresh(&args).await?,
        Command::View { field, months } => view(&args, &field, &months).await?,
        Command::Show {
            fetch,
            refresh_every,
        } => show(&args, fetch, refresh_every).await?,
    }
    Ok(())
}

async fn refresh(args: &SourceArgs) -> Result<(), WeatherTourismError> {
    let tourism = args.tourism()?;
    let pipeline = args.pipeline(args.store()?);
    let report = pipeline.run(&args.request(), &tourism).await?;
    println!("{report}");
    Ok(())
}

async fn view(args: &SourceArgs, field: &str, months: &str) -> Result<(), WeatherTourismError> {
    let params = ViewParams {
        field: field.parse::<TemperatureField>()?,
        months: months.parse::<MonthRange>()?,
    };
    let store = args.store()?;
    let table = args.table.clone();
    let views = tokio::task::spawn_blocking(move || load_views(store.as_ref(), &table, params))
        .await??;
    print_views(&views);
    Ok(())
}

fn print_views(views: &Views) {
    println!(
        "{} | months {} | {} days",
        views.temperature.field.label(),
        views.params.months,
        views.temperature.points.len()
    );
    for (date, value) in &views.temperature.points {
        println!("{date}  {value:>6.1}");
    }
    println!();
    println!("Tourists | {} months", views.tourism.points.len());
    for (month, tourists) in &views.tourism.points {
        match tourists {
            Some(count) => println!("{}  {count:>10}", month.format("%Y-%m")),
            None => println!("{}  {:>10}", month.format("%Y-%m"), "n/a"),
        }
    }
}

async fn show(args: &SourceArgs, fetch: bool, refresh_every: Option<u64>) -> Result<(), AppError> {
    let store = args.store()?;
    let tourism = args.tourism()?;
    let pipeline = args.pipeline(Arc::clone(&store));
    let session = ViewSession::spawn(store, args.table.clone(), ViewParams::default());
    let (status_tx, status_rx) = watch::channel(String::from("Reading snapshot"));
    let status_tx = Arc::new(status_tx);

    if fetch {
        let pipeline = pipeline.clone();
        let request = args.request();
        let tourism = tourism.clone();
        let session = session.clone();
        let status = Arc::clone(&status_tx);
        status.send_replace("Fetching weather".to_string());
        tokio::spawn(async move {
            let result = pipeline.run(&request, &tourism).await;
            report_run(&status, &session, &result);
        });
    }

    let periodic = refresh_every.filter(|m| *m > 0).map(|minutes| {
        let session = session.clone();
        let status = Arc::clone(&status_tx);
        pipeline.spawn_periodic(
            args.request(),
            tourism,
            Duration::from_secs(minutes * 60),
            move |result| report_run(&status, &session, result),
        )
    });

    let location = LatLon(args.lat, args.lon);
    let outcome = tokio::task::spawn_blocking(move || tui::run(session, status_rx, location))
        .await
        .map_err(WeatherTourismError::from)?;

    if let Some(handle) = periodic {
        handle.abort();
    }
    outcome?;
    Ok(())
}

fn report_run(
    status: &watch::Sender<String>,
    session: &ViewSession,
    result: &Result<weather_tourism::PipelineReport, WeatherTourismError>,
) {
    match result {
        Ok(report) => {
            status.send_replace(format!("Snapshot updated: {report}"));
            session.refresh();
        }
        Err(e) => {
            status.send_replace(format!("Fetch failed, showing previous snapshot: {e}"));
        }
    }
}
