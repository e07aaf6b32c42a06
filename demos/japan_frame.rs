//! Fetches today's forecast for the built-in Japan catalog, prints the current hour
//! ranked by temperature, and dumps the map frame as JSON.

use std::env;
use temperature_map::{TemperatureMap, TemperatureMapError};

#[tokio::main]
async fn main() -> Result<(), TemperatureMapError> {
    configure_polars_display();
    let client = TemperatureMap::new();

    let frame = client.frame().call().await;
    let Some(selected) = frame.selected.clone() else {
        println!("No forecast available.");
        return Ok(());
    };
    println!(
        "{} of {} hours, showing {}",
        frame.default_index + 1,
        frame.timestamps.len(),
        selected
    );

    let snapshot = frame.snapshot();
    for entry in snapshot.ranked_by_temperature() {
        println!(
            "{:>10} {:>6.1} °C  {:>8.0} m  {}",
            entry.record.point_name,
            entry.record.temperature,
            entry.elevation,
            temperature_map::TemperatureBand::classify(entry.record.temperature)
        );
    }

    println!("{}", snapshot.to_dataframe()?);
    match frame.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize frame: {}", e),
    }

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
}
