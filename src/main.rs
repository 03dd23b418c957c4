use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, instrument, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use raingauge_monitor::config::Config;
use raingauge_monitor::export;
use raingauge_monitor::fleet_status::{FleetStatusFetcher, FleetStatusTable};
use raingauge_monitor::map_fetcher::MapPageFetcher;
use raingauge_monitor::normalize;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,raingauge_monitor=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    info!("Starting rain gauge monitor with config: {:?}", config);

    // Fleet evidence is best-effort: the map page alone still produces a
    // usable record set.
    let fleet_fetcher = FleetStatusFetcher::new(config.fleet_status_url.clone());
    let fleet = match fleet_fetcher.fetch_fleet_status().await {
        Ok(table) => {
            info!("Fetched fleet status for {} stations", table.len());
            table
        }
        Err(e) => {
            warn!("Fleet status fetch failed, proceeding without it: {}", e);
            FleetStatusTable::new()
        }
    };
    let fleet_evidence = (!fleet.is_empty()).then_some(&fleet);

    let map_fetcher = MapPageFetcher::new(config.map_url.clone());
    let records = map_fetcher.fetch_stations(fleet_evidence).await?;
    info!("Parsed {} station records from map page", records.len());

    let normalized = normalize::dedupe_latest(records);
    info!("{} stations after deduplication", normalized.len());

    export::write_json(&normalized, Path::new(&config.json_output_path))?;
    export::write_csv(&normalized, Path::new(&config.csv_output_path))?;

    let mut summary: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &normalized {
        *summary.entry(record.record.status.as_str()).or_default() += 1;
    }
    for (status, count) in &summary {
        info!("Status {}: {} stations", status, count);
    }

    Ok(())
}
