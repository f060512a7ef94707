//! demos/plot_views.rs
//!
//! Reads the snapshot written by `weather-tourism refresh` and plots both views in the
//! browser: daily temperatures for the chosen months and tourists per month.
//!
//! To run this demo:
//! cargo run --example plot_views --features examples -- temp_max 3 5

use std::error::Error;
use std::sync::Arc;

use plotlars::{BarPlot, Plot, Rgb, Text, TimeSeriesPlot};
use polars::prelude::*;
use weather_tourism::{
    load_views, ParquetSnapshotStore, SnapshotStore, ViewParams, Views, DEFAULT_TABLE,
};

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let field = args.first().map(String::as_str).unwrap_or("temp_max");
    let start = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(1);
    let end = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(12);
    let params = ViewParams::new(field, start, end)?;

    let store: Arc<dyn SnapshotStore> = Arc::new(ParquetSnapshotStore::in_cache_dir()?);
    let views = load_views(store.as_ref(), DEFAULT_TABLE, params)?;

    println!(
        "Plotting {} days and {} months for {}",
        views.temperature.points.len(),
        views.tourism.points.len(),
        views.params
    );
    plot_temperature(&views)?;
    plot_tourism(&views)?;
    println!("Plots shown in browser.");
    Ok(())
}

fn plot_temperature(views: &Views) -> PolarsResult<()> {
    let dates: Vec<_> = views.temperature.points.iter().map(|(d, _)| *d).collect();
    let values: Vec<f64> = views.temperature.points.iter().map(|(_, v)| *v).collect();
    let column = views.temperature.field.to_string();
    let data = df!(
        "date" => dates,
        column.as_str() => values,
    )?;

    TimeSeriesPlot::builder()
        .data(&data)
        .x("date")
        .y(column.as_str())
        .colors(vec![Rgb(235, 117, 0)])
        .plot_title(Text::from(views.temperature.field.label()).size(18))
        .x_title("date")
        .y_title("°C")
        .build()
        .plot();
    Ok(())
}

fn plot_tourism(views: &Views) -> PolarsResult<()> {
    let months: Vec<String> = views
        .tourism
        .points
        .iter()
        .map(|(m, _)| m.format("%Y-%m").to_string())
        .collect();
    let tourists: Vec<Option<f64>> = views
        .tourism
        .points
        .iter()
        .map(|(_, t)| t.map(|t| t as f64))
        .collect();
    let data = df!(
        "month" => months,
        "tourists" => tourists,
    )?;

    BarPlot::builder()
        .data(&data)
        .labels("month")
        .values("tourists")
        .colors(vec![Rgb(69, 157, 230)])
        .plot_title(Text::from("Tourists per month").size(18))
        .x_title("month")
        .y_title("tourists")
        .build()
        .plot();
    Ok(())
}
